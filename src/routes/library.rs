use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use super::MovieRef;
use crate::{
    api::AppState,
    error::AppResult,
    models::{FavoriteEntry, MovieId, MovieSummary, UserId, WatchHistoryEntry},
    presentation::{formatters, keyboards, CommandResponse, Reply},
    services::library::{self, LibraryChange, MovieStatus},
};

#[derive(Debug, Serialize)]
pub struct Removal {
    pub movie_id: MovieId,
    pub removed: bool,
}

pub async fn list_favorites(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> AppResult<Json<CommandResponse<Vec<FavoriteEntry>>>> {
    let favorites = library::favorites(state.store.as_ref(), user_id).await?;

    let movies: Vec<MovieSummary> = favorites.iter().map(FavoriteEntry::to_summary).collect();
    let reply = Reply::new(
        formatters::favorites_list(&favorites),
        keyboards::movie_list(&movies),
    );
    Ok(Json(CommandResponse::new(favorites, reply)))
}

/// `fav_{id}`
pub async fn add_favorite(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(request): Json<MovieRef>,
) -> AppResult<(StatusCode, Json<CommandResponse<LibraryChange>>)> {
    let change = library::add_favorite(
        state.store.as_ref(),
        state.catalog.as_ref(),
        user_id,
        request.movie_id,
    )
    .await?;

    let status =
        library::movie_status(state.store.as_ref(), Some(user_id), request.movie_id).await?;
    let reply = Reply::new(
        formatters::favorite_added(&change.movie.summary.title, change.changed),
        keyboards::movie_details(request.movie_id, status, false),
    );
    let code = if change.changed {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((code, Json(CommandResponse::new(change, reply))))
}

/// `unfav_{id}`
pub async fn remove_favorite(
    State(state): State<AppState>,
    Path((user_id, movie_id)): Path<(UserId, MovieId)>,
) -> AppResult<Json<CommandResponse<Removal>>> {
    let removed = library::remove_favorite(state.store.as_ref(), user_id, movie_id).await?;

    let status = MovieStatus {
        is_favorite: false,
        is_watched: state.store.is_watched(user_id, movie_id).await?,
    };
    let reply = Reply::new(
        formatters::favorite_removed(removed),
        keyboards::movie_details(movie_id, status, false),
    );
    Ok(Json(CommandResponse::new(Removal { movie_id, removed }, reply)))
}

pub async fn list_history(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> AppResult<Json<CommandResponse<Vec<WatchHistoryEntry>>>> {
    let history = library::watch_history(state.store.as_ref(), user_id).await?;

    let movies: Vec<MovieSummary> = history.iter().map(WatchHistoryEntry::to_summary).collect();
    let reply = Reply::new(
        formatters::watch_history(&history),
        keyboards::movie_list(&movies),
    );
    Ok(Json(CommandResponse::new(history, reply)))
}

/// `watched_{id}`
pub async fn mark_watched(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(request): Json<MovieRef>,
) -> AppResult<(StatusCode, Json<CommandResponse<LibraryChange>>)> {
    let change = library::mark_watched(
        state.store.as_ref(),
        state.catalog.as_ref(),
        user_id,
        request.movie_id,
    )
    .await?;

    let status =
        library::movie_status(state.store.as_ref(), Some(user_id), request.movie_id).await?;
    let reply = Reply::new(
        formatters::marked_watched(&change.movie.summary.title, change.changed),
        keyboards::movie_details(request.movie_id, status, false),
    );
    let code = if change.changed {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((code, Json(CommandResponse::new(change, reply))))
}
