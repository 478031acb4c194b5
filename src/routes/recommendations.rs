use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    api::AppState,
    error::AppResult,
    models::{Recommendations, UserId},
    presentation::{formatters, keyboards, CommandResponse, Reply},
    services::library,
};

#[derive(Debug, Default, Deserialize)]
pub struct RecommendationQuery {
    pub limit: Option<usize>,
}

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(query): Query<RecommendationQuery>,
) -> AppResult<Json<CommandResponse<Recommendations>>> {
    library::require_user(state.store.as_ref(), user_id).await?;

    let limit = query
        .limit
        .unwrap_or(state.engine.settings().default_limit);
    let recommendations = state.engine.recommend(user_id, limit).await?;

    let reply = Reply::new(
        formatters::recommendations_header(&recommendations),
        keyboards::movie_list(&recommendations.movies),
    );
    Ok(Json(CommandResponse::new(recommendations, reply)))
}
