use axum::{http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::MovieId;

pub mod library;
pub mod movies;
pub mod recommendations;
pub mod users;

/// Body of the favorite / mark-watched commands
#[derive(Debug, Deserialize)]
pub struct MovieRef {
    pub movie_id: MovieId,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

impl PageQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
