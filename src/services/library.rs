//! Favorite and watch-history flows
//!
//! Movie metadata is resolved through the catalog before anything is
//! written, so stored rows always carry the genres the recommendation
//! engine weighs. Every mutation that reaches the store drops the user's
//! cached recommendations, no-ops included, so a retry after a failed
//! invalidation still clears a stale list.
use chrono::Utc;
use serde::Serialize;

use crate::{
    db::PreferenceStore,
    error::{AppError, AppResult},
    models::{
        FavoriteEntry, MovieDetails, MovieId, User, UserId, UserStats, WatchHistoryEntry,
    },
    services::providers::CatalogClient,
};

/// Result of a favorite/watched mutation
#[derive(Debug, Clone, Serialize)]
pub struct LibraryChange {
    pub movie: MovieDetails,
    /// False when the request was a no-op (already present)
    pub changed: bool,
}

/// Whether a movie is already in the user's lists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MovieStatus {
    pub is_favorite: bool,
    pub is_watched: bool,
}

/// Fails with `NotFound` for users who never registered
pub async fn require_user(store: &dyn PreferenceStore, user_id: UserId) -> AppResult<User> {
    store
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} is not registered", user_id)))
}

pub async fn add_favorite(
    store: &dyn PreferenceStore,
    catalog: &dyn CatalogClient,
    user_id: UserId,
    movie_id: MovieId,
) -> AppResult<LibraryChange> {
    require_user(store, user_id).await?;
    let movie = catalog.details(movie_id).await?;

    let entry = FavoriteEntry::from_details(user_id, &movie, Utc::now());
    let changed = store.add_favorite(entry).await?;
    store.invalidate_cache(user_id).await?;

    tracing::info!(user_id, movie_id, changed, "Favorite added");
    Ok(LibraryChange { movie, changed })
}

/// Returns whether anything was removed
pub async fn remove_favorite(
    store: &dyn PreferenceStore,
    user_id: UserId,
    movie_id: MovieId,
) -> AppResult<bool> {
    require_user(store, user_id).await?;

    let removed = store.remove_favorite(user_id, movie_id).await?;
    store.invalidate_cache(user_id).await?;

    tracing::info!(user_id, movie_id, removed, "Favorite removed");
    Ok(removed)
}

/// Appends to the watch history; watching the same movie twice is a no-op
pub async fn mark_watched(
    store: &dyn PreferenceStore,
    catalog: &dyn CatalogClient,
    user_id: UserId,
    movie_id: MovieId,
) -> AppResult<LibraryChange> {
    require_user(store, user_id).await?;
    let movie = catalog.details(movie_id).await?;

    let entry = WatchHistoryEntry::from_details(user_id, &movie, Utc::now());
    let changed = store.add_watched(entry).await?;
    store.invalidate_cache(user_id).await?;

    tracing::info!(user_id, movie_id, changed, "Movie marked as watched");
    Ok(LibraryChange { movie, changed })
}

pub async fn favorites(
    store: &dyn PreferenceStore,
    user_id: UserId,
) -> AppResult<Vec<FavoriteEntry>> {
    require_user(store, user_id).await?;
    store.get_favorites(user_id).await
}

pub async fn watch_history(
    store: &dyn PreferenceStore,
    user_id: UserId,
) -> AppResult<Vec<WatchHistoryEntry>> {
    require_user(store, user_id).await?;
    store.get_watch_history(user_id).await
}

pub async fn stats(store: &dyn PreferenceStore, user_id: UserId) -> AppResult<UserStats> {
    require_user(store, user_id).await?;
    store.get_stats(user_id).await
}

/// Anonymous lookups (no user) report both flags as false
pub async fn movie_status(
    store: &dyn PreferenceStore,
    user_id: Option<UserId>,
    movie_id: MovieId,
) -> AppResult<MovieStatus> {
    let Some(user_id) = user_id else {
        return Ok(MovieStatus::default());
    };

    Ok(MovieStatus {
        is_favorite: store.is_favorite(user_id, movie_id).await?,
        is_watched: store.is_watched(user_id, movie_id).await?,
    })
}
