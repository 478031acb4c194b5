/// TMDb (The Movie Database) API v3 provider
///
/// Search, discovery, popular/trending lists, movie details, trailers and
/// the genre list. Successful list and detail responses are cached in Redis
/// through the background writer; trailers are cached alongside details.
use crate::{
    cached,
    config::Config,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{
        tmdb::{TmdbGenreList, TmdbMovieDetails, TmdbPage, TmdbVideoList},
        CatalogPage, DiscoverFilters, Genre, GenreId, MovieDetails, MovieId, MovieSummary,
        TimeWindow,
    },
    services::providers::CatalogClient,
};
use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;

const LANGUAGE: &str = "en-US";

#[derive(Clone)]
pub struct TmdbClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
    cache_ttl: u64,
    max_search_results: usize,
    discover_min_votes: u32,
}

impl TmdbClient {
    pub fn new(cache: Cache, config: &Config) -> AppResult<Self> {
        let http_client = HttpClient::builder()
            .timeout(config.catalog_timeout())
            .build()?;

        Ok(Self {
            http_client,
            api_key: config.tmdb_api_key.clone(),
            api_url: config.tmdb_api_url.trim_end_matches('/').to_string(),
            cache,
            cache_ttl: config.catalog_cache_ttl_secs,
            max_search_results: config.max_search_results,
            discover_min_votes: config.discover_min_votes,
        })
    }

    /// GETs `path` with the API key and language attached and decodes the body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", LANGUAGE)])
            .query(params)
            .send()
            .await
            .map_err(classify_transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(path = %path, status = %status, "TMDb request failed");
            return Err(status_error(status, &body));
        }

        let text = response.text().await.map_err(classify_transport_error)?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(error = %e, path = %path, "Failed to deserialize TMDb response");
            AppError::ExternalApi(format!("Failed to parse TMDb response: {}", e))
        })
    }

    async fn fetch_page(&self, path: &str, params: &[(&str, String)]) -> AppResult<CatalogPage> {
        let page: TmdbPage = self.get_json(path, params).await?;
        Ok(CatalogPage::from(page))
    }
}

/// Timeouts are reported separately so logs can tell them from hard failures
fn classify_transport_error(e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::Timeout
    } else {
        AppError::HttpClient(e)
    }
}

fn status_error(status: StatusCode, body: &str) -> AppError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => AppError::RateLimited,
        StatusCode::NOT_FOUND => AppError::NotFound("Movie not found in catalog".to_string()),
        _ => AppError::ExternalApi(format!("TMDb API returned status {}: {}", status, body)),
    }
}

fn discover_params(genre_id: GenreId, page: u32, min_votes: u32) -> Vec<(&'static str, String)> {
    vec![
        ("with_genres", genre_id.to_string()),
        ("sort_by", "popularity.desc".to_string()),
        ("vote_count.gte", min_votes.to_string()),
        ("include_adult", "false".to_string()),
        ("page", page.to_string()),
    ]
}

/// Genres are OR-ed (`|`); a rating floor also requires `min_votes` votes
fn filtered_params(
    filters: &DiscoverFilters,
    page: u32,
    min_votes: u32,
) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("sort_by", "popularity.desc".to_string()),
        ("include_adult", "false".to_string()),
        ("page", page.max(1).to_string()),
    ];

    if !filters.genres.is_empty() {
        let genres: Vec<String> = filters.genres.iter().map(|g| g.to_string()).collect();
        params.push(("with_genres", genres.join("|")));
    }
    if let Some(rating) = filters.min_rating.filter(|r| *r > 0.0) {
        params.push(("vote_average.gte", rating.to_string()));
        params.push(("vote_count.gte", min_votes.to_string()));
    }
    if let Some(year) = filters.year_from {
        params.push(("primary_release_date.gte", format!("{}-01-01", year)));
    }
    if let Some(year) = filters.year_to {
        params.push(("primary_release_date.lte", format!("{}-12-31", year)));
    }

    params
}

fn page_param(page: u32) -> Vec<(&'static str, String)> {
    vec![("page", page.max(1).to_string())]
}

#[async_trait::async_trait]
impl CatalogClient for TmdbClient {
    async fn discover_by_genre(&self, genre_id: GenreId, page: u32) -> AppResult<CatalogPage> {
        cached!(
            self.cache,
            CacheKey::Discover {
                genre: genre_id,
                page
            },
            self.cache_ttl,
            async {
                let params = discover_params(genre_id, page.max(1), self.discover_min_votes);
                let result = self.fetch_page("/discover/movie", &params).await?;

                tracing::debug!(
                    genre_id,
                    page,
                    results = result.results.len(),
                    provider = "tmdb",
                    "Discovery completed"
                );

                Ok::<_, AppError>(result)
            }
        )
    }

    async fn discover(&self, filters: &DiscoverFilters, page: u32) -> AppResult<CatalogPage> {
        filters.validate()?;

        cached!(
            self.cache,
            CacheKey::Filtered {
                filters: filters.fingerprint(),
                page
            },
            self.cache_ttl,
            async {
                let params = filtered_params(filters, page, self.discover_min_votes);
                let result = self.fetch_page("/discover/movie", &params).await?;

                tracing::info!(
                    filters = %filters.fingerprint(),
                    page,
                    results = result.results.len(),
                    provider = "tmdb",
                    "Filtered discovery completed"
                );

                Ok::<_, AppError>(result)
            }
        )
    }

    async fn popular(&self, page: u32) -> AppResult<CatalogPage> {
        cached!(
            self.cache,
            CacheKey::Popular(page),
            self.cache_ttl,
            self.fetch_page("/movie/popular", &page_param(page))
        )
    }

    async fn search(&self, query: &str, page: u32) -> AppResult<CatalogPage> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::Search {
                query: query.to_string(),
                page
            },
            self.cache_ttl,
            async {
                let mut params = page_param(page);
                params.push(("query", query.to_string()));
                params.push(("include_adult", "false".to_string()));

                let mut result = self.fetch_page("/search/movie", &params).await?;
                result.results.truncate(self.max_search_results);

                tracing::info!(
                    query = %query,
                    results = result.results.len(),
                    provider = "tmdb",
                    "Title search completed"
                );

                Ok::<_, AppError>(result)
            }
        )
    }

    async fn trending(&self, window: TimeWindow) -> AppResult<Vec<MovieSummary>> {
        cached!(
            self.cache,
            CacheKey::Trending(window),
            self.cache_ttl,
            async {
                let path = format!("/trending/movie/{}", window);
                let result = self.fetch_page(&path, &[]).await?;
                Ok::<_, AppError>(result.results)
            }
        )
    }

    async fn details(&self, movie_id: MovieId) -> AppResult<MovieDetails> {
        cached!(
            self.cache,
            CacheKey::Details(movie_id),
            self.cache_ttl,
            async {
                let path = format!("/movie/{}", movie_id);
                let details: TmdbMovieDetails = self.get_json(&path, &[]).await?;
                Ok::<_, AppError>(MovieDetails::from(details))
            }
        )
    }

    async fn similar(&self, movie_id: MovieId, page: u32) -> AppResult<CatalogPage> {
        cached!(
            self.cache,
            CacheKey::Similar {
                movie: movie_id,
                page
            },
            self.cache_ttl,
            async {
                let path = format!("/movie/{}/recommendations", movie_id);
                self.fetch_page(&path, &page_param(page)).await
            }
        )
    }

    async fn trailer_url(&self, movie_id: MovieId) -> AppResult<Option<String>> {
        cached!(
            self.cache,
            CacheKey::Trailer(movie_id),
            self.cache_ttl,
            async {
                let path = format!("/movie/{}/videos", movie_id);
                let videos: TmdbVideoList = self.get_json(&path, &[]).await?;
                Ok::<_, AppError>(videos.youtube_trailer_url())
            }
        )
    }

    async fn genres(&self) -> AppResult<Vec<Genre>> {
        cached!(self.cache, CacheKey::Genres, self.cache_ttl, async {
            let list: TmdbGenreList = self.get_json("/genre/movie/list", &[]).await?;
            tracing::info!(count = list.genres.len(), "Loaded movie genres");
            Ok::<_, AppError>(list.genres)
        })
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_params() {
        let params = discover_params(28, 2, 100);
        assert!(params.contains(&("with_genres", "28".to_string())));
        assert!(params.contains(&("sort_by", "popularity.desc".to_string())));
        assert!(params.contains(&("vote_count.gte", "100".to_string())));
        assert!(params.contains(&("page", "2".to_string())));
    }

    #[test]
    fn test_filtered_params_full() {
        let filters = DiscoverFilters {
            genres: vec![18, 28],
            year_from: Some(2000),
            year_to: Some(2010),
            min_rating: Some(7.5),
        };
        let params = filtered_params(&filters, 1, 100);

        assert!(params.contains(&("with_genres", "18|28".to_string())));
        assert!(params.contains(&("vote_average.gte", "7.5".to_string())));
        assert!(params.contains(&("vote_count.gte", "100".to_string())));
        assert!(params.contains(&("primary_release_date.gte", "2000-01-01".to_string())));
        assert!(params.contains(&("primary_release_date.lte", "2010-12-31".to_string())));
        assert!(params.contains(&("page", "1".to_string())));
    }

    #[test]
    fn test_filtered_params_skip_unset_filters() {
        let filters = DiscoverFilters {
            min_rating: Some(0.0),
            ..Default::default()
        };
        let params = filtered_params(&filters, 0, 100);
        let names: Vec<&str> = params.iter().map(|(name, _)| *name).collect();

        assert_eq!(names, vec!["sort_by", "include_adult", "page"]);
        assert!(params.contains(&("page", "1".to_string())));
    }

    #[test]
    fn test_page_param_clamps_to_first_page() {
        assert_eq!(page_param(0), vec![("page", "1".to_string())]);
        assert_eq!(page_param(4), vec![("page", "4".to_string())]);
    }

    #[test]
    fn test_status_error_rate_limited() {
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, ""),
            AppError::RateLimited
        ));
    }

    #[test]
    fn test_status_error_not_found() {
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, "{}"),
            AppError::NotFound(_)
        ));
    }

    #[test]
    fn test_status_error_other_is_external_api() {
        let err = status_error(StatusCode::UNAUTHORIZED, "Invalid API key");
        match err {
            AppError::ExternalApi(msg) => {
                assert!(msg.contains("401"));
                assert!(msg.contains("Invalid API key"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
