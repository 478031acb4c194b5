//! Movie catalog abstraction
//!
//! The rest of the crate only sees normalized [`MovieSummary`] /
//! [`MovieDetails`] values; each provider owns the mapping from its own
//! wire format.
use crate::{
    error::AppResult,
    models::{
        CatalogPage, DiscoverFilters, Genre, GenreId, MovieDetails, MovieId, MovieSummary,
        TimeWindow,
    },
};

pub mod tmdb;

pub use tmdb::TmdbClient;

/// Trait for movie catalog providers
///
/// Every call may fail with a transport, timeout or rate-limit error; the
/// recommendation engine treats any failure as "this query is unavailable".
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Movies in a genre, ordered by the catalog's popularity signal
    async fn discover_by_genre(&self, genre_id: GenreId, page: u32) -> AppResult<CatalogPage>;

    /// Movies matching every filter, most popular first
    async fn discover(&self, filters: &DiscoverFilters, page: u32) -> AppResult<CatalogPage>;

    async fn popular(&self, page: u32) -> AppResult<CatalogPage>;

    /// Title search; rejects blank queries
    async fn search(&self, query: &str, page: u32) -> AppResult<CatalogPage>;

    async fn trending(&self, window: TimeWindow) -> AppResult<Vec<MovieSummary>>;

    async fn details(&self, movie_id: MovieId) -> AppResult<MovieDetails>;

    /// Catalog-side "more like this" list for one movie
    async fn similar(&self, movie_id: MovieId, page: u32) -> AppResult<CatalogPage>;

    async fn trailer_url(&self, movie_id: MovieId) -> AppResult<Option<String>>;

    async fn genres(&self) -> AppResult<Vec<Genre>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
