// ============================================================================
// TMDb API v3 Types
// ============================================================================

use serde::Deserialize;

use super::{CatalogPage, Genre, GenreId, MediaType, MovieDetails, MovieSummary};

/// Paged list response (`/discover/movie`, `/movie/popular`, `/search/movie`, ...)
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

fn first_page() -> u32 {
    1
}

/// Movie (or TV series) entry inside a list response
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    /// TV series carry `name` instead of `title`
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u32>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub genre_ids: Vec<GenreId>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl From<TmdbMovie> for MovieSummary {
    fn from(movie: TmdbMovie) -> Self {
        let media_type = match movie.media_type.as_deref() {
            Some("tv") => MediaType::Tv,
            _ if movie.title.is_none() && movie.name.is_some() => MediaType::Tv,
            _ => MediaType::Movie,
        };

        let title = non_empty(movie.title)
            .or(non_empty(movie.name))
            .or(non_empty(movie.original_title))
            .unwrap_or_else(|| "Unknown Movie".to_string());

        MovieSummary {
            id: movie.id,
            title,
            media_type,
            overview: non_empty(movie.overview),
            release_date: non_empty(movie.release_date).or(non_empty(movie.first_air_date)),
            // Catalog reports e.g. 7.456; keep one decimal
            vote_average: (movie.vote_average.unwrap_or(0.0) * 10.0).round() / 10.0,
            vote_count: movie.vote_count.unwrap_or(0),
            popularity: movie.popularity.unwrap_or(0.0),
            genre_ids: movie.genre_ids,
            poster_path: non_empty(movie.poster_path),
        }
    }
}

impl From<TmdbPage> for CatalogPage {
    fn from(page: TmdbPage) -> Self {
        CatalogPage {
            page: page.page,
            total_pages: page.total_pages,
            results: page
                .results
                .into_iter()
                .filter(|m| m.id > 0)
                .map(MovieSummary::from)
                .collect(),
        }
    }
}

/// `/movie/{id}` response
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u32>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
}

impl From<TmdbMovieDetails> for MovieDetails {
    fn from(details: TmdbMovieDetails) -> Self {
        let genre_ids = details.genres.iter().map(|g| g.id).collect();
        let genres = details.genres.into_iter().map(|g| g.name).collect();

        let summary = MovieSummary::from(TmdbMovie {
            id: details.id,
            title: details.title,
            name: None,
            original_title: details.original_title,
            overview: details.overview,
            release_date: details.release_date,
            first_air_date: None,
            vote_average: details.vote_average,
            vote_count: details.vote_count,
            popularity: details.popularity,
            genre_ids,
            poster_path: details.poster_path,
            media_type: Some("movie".to_string()),
        });

        MovieDetails {
            summary,
            genres,
            runtime: details.runtime.filter(|r| *r > 0),
            tagline: non_empty(details.tagline),
            imdb_id: non_empty(details.imdb_id),
            homepage: non_empty(details.homepage),
        }
    }
}

/// `/genre/movie/list` response
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenreList {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// `/movie/{id}/videos` response
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideoList {
    #[serde(default)]
    pub results: Vec<TmdbVideo>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbVideo {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

impl TmdbVideoList {
    /// First YouTube trailer, falling back to the first YouTube teaser
    pub fn youtube_trailer_url(&self) -> Option<String> {
        let youtube = |kind: &str| {
            self.results
                .iter()
                .find(|v| v.site == "YouTube" && v.video_type == kind)
        };

        youtube("Trailer")
            .or_else(|| youtube("Teaser"))
            .map(|v| format!("https://www.youtube.com/watch?v={}", v.key))
    }
}
