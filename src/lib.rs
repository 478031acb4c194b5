//! MovieMate: the back end of a movie-discovery chat bot.
//!
//! Users search the TMDb catalog, keep favorites and a watch history, and
//! get recommendations derived from the genres of their favorites. Every
//! command is exposed over HTTP and answered with the raw data plus a
//! rendered chat [`Reply`](presentation::Reply).

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod presentation;
pub mod routes;
pub mod services;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{AppError, AppResult};
