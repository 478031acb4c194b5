use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::PageQuery;
use crate::{
    api::AppState,
    error::{AppError, AppResult},
    models::{
        CatalogPage, DiscoverFilters, Genre, GenreId, MovieDetails, MovieId, MovieSummary,
        TimeWindow, UserId,
    },
    presentation::{formatters, keyboards, CommandResponse, Reply},
    services::{
        discovery::{self, Discovery},
        library::{self, MovieStatus},
        search_titles,
    },
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub page: Option<u32>,
    pub user_id: Option<UserId>,
}

/// `genres` is a comma-separated id list, e.g. `28,18`
#[derive(Debug, Default, Deserialize)]
pub struct DiscoverQuery {
    pub genres: Option<String>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub min_rating: Option<f64>,
    pub page: Option<u32>,
    pub user_id: Option<UserId>,
}

impl DiscoverQuery {
    fn filters(&self) -> AppResult<DiscoverFilters> {
        let genres = match self.genres.as_deref() {
            Some(list) => list
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(|id| {
                    id.parse::<GenreId>().map_err(|_| {
                        AppError::InvalidInput(format!("invalid genre id: {}", id))
                    })
                })
                .collect::<AppResult<Vec<_>>>()?,
            None => Vec::new(),
        };

        Ok(DiscoverFilters {
            genres,
            year_from: self.year_from,
            year_to: self.year_to,
            min_rating: self.min_rating,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TrendingQuery {
    #[serde(default)]
    pub window: TimeWindow,
}

#[derive(Debug, Default, Deserialize)]
pub struct DetailsQuery {
    pub user_id: Option<UserId>,
}

/// Movie card data: details plus the caller's flags and a trailer link
#[derive(Debug, Serialize)]
pub struct MovieView {
    #[serde(flatten)]
    pub movie: MovieDetails,
    #[serde(flatten)]
    pub status: MovieStatus,
    pub trailer_url: Option<String>,
}

/// Handler for title search endpoint
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<CommandResponse<CatalogPage>>> {
    let page = query.page.unwrap_or(1).max(1);
    let result = search_titles(
        state.catalog.as_ref(),
        state.store.as_ref(),
        &query.q,
        page,
        query.user_id,
    )
    .await?;

    let q = query.q.trim();
    let reply = if result.results.is_empty() {
        Reply::with_menu(formatters::no_results(q))
    } else {
        Reply::new(
            formatters::search_results_header(q, result.results.len()),
            keyboards::movie_list(&result.results),
        )
    };
    Ok(Json(CommandResponse::new(result, reply)))
}

/// Advanced search: genre, year range and rating filters
pub async fn discover(
    State(state): State<AppState>,
    Query(query): Query<DiscoverQuery>,
) -> AppResult<Json<CommandResponse<Discovery>>> {
    let filters = query.filters()?;
    let found = discovery::discover_movies(
        state.catalog.as_ref(),
        state.store.as_ref(),
        filters,
        query.page.unwrap_or(1),
        query.user_id,
    )
    .await?;

    let results = &found.page.results;
    let reply = if results.is_empty() {
        Reply::with_menu(formatters::discover_header(&found.filters, 0))
    } else {
        Reply::new(
            formatters::discover_header(&found.filters, results.len()),
            keyboards::movie_list(results),
        )
    };
    Ok(Json(CommandResponse::new(found, reply)))
}

pub async fn popular(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<CommandResponse<CatalogPage>>> {
    let page = query.page();
    let result = state.catalog.popular(page).await?;

    let reply = Reply::new(
        formatters::popular_header(page, result.results.len()),
        keyboards::movie_list(&result.results),
    );
    Ok(Json(CommandResponse::new(result, reply)))
}

pub async fn trending(
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> AppResult<Json<CommandResponse<Vec<MovieSummary>>>> {
    let movies = state.catalog.trending(query.window).await?;

    let reply = Reply::new(
        formatters::trending_header(query.window, movies.len()),
        keyboards::movie_list(&movies),
    );
    Ok(Json(CommandResponse::new(movies, reply)))
}

/// `movie_{id}`: the movie card
pub async fn details(
    State(state): State<AppState>,
    Path(movie_id): Path<MovieId>,
    Query(query): Query<DetailsQuery>,
) -> AppResult<Json<CommandResponse<MovieView>>> {
    let movie = state.catalog.details(movie_id).await?;

    // A missing trailer only hides the button
    let trailer_url = match state.catalog.trailer_url(movie_id).await {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(movie_id, error = %e, "Trailer lookup failed");
            None
        }
    };
    let status = library::movie_status(state.store.as_ref(), query.user_id, movie_id).await?;

    let reply = Reply::new(
        formatters::movie_card(&movie),
        keyboards::movie_details(movie_id, status, trailer_url.is_some()),
    );
    Ok(Json(CommandResponse::new(
        MovieView {
            movie,
            status,
            trailer_url,
        },
        reply,
    )))
}

/// `similar_{id}`
pub async fn similar(
    State(state): State<AppState>,
    Path(movie_id): Path<MovieId>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<CommandResponse<CatalogPage>>> {
    let result = state.catalog.similar(movie_id, query.page()).await?;

    let reply = Reply::new(
        formatters::similar_header(result.results.len()),
        keyboards::movie_list(&result.results),
    );
    Ok(Json(CommandResponse::new(result, reply)))
}

pub async fn genres(
    State(state): State<AppState>,
) -> AppResult<Json<CommandResponse<Vec<Genre>>>> {
    let genres = state.catalog.genres().await?;

    let reply = Reply::with_menu(formatters::genres_list(&genres));
    Ok(Json(CommandResponse::new(genres, reply)))
}
