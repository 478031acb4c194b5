use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    api::AppState,
    error::{AppError, AppResult},
    models::{NewUser, User, UserId, UserSettings, UserStats},
    presentation::{formatters, CommandResponse, Reply},
    services::{discovery, library},
};

#[derive(Debug, Serialize)]
pub struct Registration {
    pub user: User,
    pub is_new: bool,
    pub stats: UserStats,
}

/// `/start`: creates the user on first contact, refreshes the profile after
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<NewUser>,
) -> AppResult<(StatusCode, Json<CommandResponse<Registration>>)> {
    if request.id <= 0 {
        return Err(AppError::InvalidInput("user id must be positive".to_string()));
    }
    if request.first_name.trim().is_empty() {
        return Err(AppError::InvalidInput("first_name is required".to_string()));
    }

    let is_new = state.store.get_user(request.id).await?.is_none();
    let user = state.store.upsert_user(request).await?;
    let stats = state.store.get_stats(user.id).await?;

    if is_new {
        tracing::info!(user_id = user.id, "New user registered");
    }

    let reply = Reply::with_menu(formatters::welcome(&user, &stats, is_new));
    let status = if is_new {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(CommandResponse::new(
            Registration {
                user,
                is_new,
                stats,
            },
            reply,
        )),
    ))
}

pub async fn stats(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> AppResult<Json<CommandResponse<UserStats>>> {
    let user = library::require_user(state.store.as_ref(), user_id).await?;
    let stats = state.store.get_stats(user_id).await?;

    let reply = Reply::with_menu(formatters::stats(&user, &stats));
    Ok(Json(CommandResponse::new(stats, reply)))
}

#[derive(Debug, Deserialize)]
pub struct SettingsUpdate {
    pub min_rating: f64,
}

pub async fn get_settings(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> AppResult<Json<CommandResponse<UserSettings>>> {
    let settings = discovery::settings(state.store.as_ref(), user_id).await?;

    let reply = Reply::with_menu(formatters::settings(&settings));
    Ok(Json(CommandResponse::new(settings, reply)))
}

/// `set_rating_{value}`
pub async fn update_settings(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(update): Json<SettingsUpdate>,
) -> AppResult<Json<CommandResponse<UserSettings>>> {
    let settings =
        discovery::set_min_rating(state.store.as_ref(), user_id, update.min_rating).await?;

    let reply = Reply::with_menu(formatters::min_rating_updated(&settings));
    Ok(Json(CommandResponse::new(settings, reply)))
}
