pub mod discovery;
pub mod library;
pub mod providers;
pub mod recommendations;
pub mod title_search;

pub use providers::{CatalogClient, TmdbClient};
pub use recommendations::{DiscoveryPlan, EngineSettings, RecommendationEngine};
pub use title_search::search_titles;
