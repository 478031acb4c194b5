use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::AppState;
use crate::{
    middleware::request_id::{make_span_with_request_id, request_id_middleware},
    routes::{library, movies, recommendations, users},
};

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(crate::routes::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            // Request id first so the trace span can pick it up
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Users
        .route("/users", post(users::register))
        .route("/users/:user_id/stats", get(users::stats))
        .route(
            "/users/:user_id/settings",
            get(users::get_settings).put(users::update_settings),
        )
        // Favorites and watch history
        .route(
            "/users/:user_id/favorites",
            get(library::list_favorites).post(library::add_favorite),
        )
        .route(
            "/users/:user_id/favorites/:movie_id",
            delete(library::remove_favorite),
        )
        .route(
            "/users/:user_id/history",
            get(library::list_history).post(library::mark_watched),
        )
        // Recommendations
        .route(
            "/users/:user_id/recommendations",
            get(recommendations::recommend),
        )
        // Catalog
        .route("/movies/search", get(movies::search))
        .route("/movies/popular", get(movies::popular))
        .route("/movies/trending", get(movies::trending))
        .route("/movies/discover", get(movies::discover))
        .route("/movies/:movie_id", get(movies::details))
        .route("/movies/:movie_id/similar", get(movies::similar))
        .route("/genres", get(movies::genres))
}
