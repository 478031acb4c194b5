use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod discover;
pub mod recommendation;
pub mod tmdb;
pub mod user;

pub use discover::DiscoverFilters;
pub use recommendation::{GenreWeights, RecommendationCacheEntry, Recommendations};
pub use user::{
    FavoriteEntry, NewUser, SearchHistoryEntry, User, UserSettings, UserStats,
    WatchHistoryEntry,
};

/// Chat platform user identifier
pub type UserId = i64;

/// Catalog (TMDb) movie identifier
pub type MovieId = i64;

/// Catalog (TMDb) genre identifier
pub type GenreId = i32;

const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Movie,
    Tv,
}

impl Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Movie => write!(f, "movie"),
            MediaType::Tv => write!(f, "tv"),
        }
    }
}

/// Normalized metadata for one movie, independent of the catalog's wire format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub media_type: MediaType,
    pub overview: Option<String>,
    /// `YYYY-MM-DD` as reported by the catalog
    pub release_date: Option<String>,
    pub vote_average: f64,
    pub vote_count: u32,
    pub popularity: f64,
    pub genre_ids: Vec<GenreId>,
    pub poster_path: Option<String>,
}

impl MovieSummary {
    pub fn year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .and_then(|year| year.parse().ok())
    }

    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_ref()
            .map(|path| format!("{}{}", POSTER_BASE_URL, path))
    }
}

/// Full detail view of a movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub summary: MovieSummary,
    pub genres: Vec<String>,
    pub runtime: Option<u32>,
    pub tagline: Option<String>,
    pub imdb_id: Option<String>,
    pub homepage: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

/// One page of catalog results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogPage {
    pub page: u32,
    pub total_pages: u32,
    pub results: Vec<MovieSummary>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Day,
    #[default]
    Week,
}

impl Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeWindow::Day => write!(f, "day"),
            TimeWindow::Week => write!(f, "week"),
        }
    }
}

#[cfg(test)]
pub(crate) fn movie(id: MovieId, genre_ids: &[GenreId]) -> MovieSummary {
    MovieSummary {
        id,
        title: format!("Movie {}", id),
        media_type: MediaType::Movie,
        overview: None,
        release_date: Some("2010-07-16".to_string()),
        vote_average: 7.5,
        vote_count: 1000,
        popularity: 50.0,
        genre_ids: genre_ids.to_vec(),
        poster_path: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_parsed_from_release_date() {
        let m = movie(1, &[]);
        assert_eq!(m.year(), Some(2010));
    }

    #[test]
    fn test_year_missing_or_malformed() {
        let mut m = movie(1, &[]);
        m.release_date = Some(String::new());
        assert_eq!(m.year(), None);
        m.release_date = Some("n/a".to_string());
        assert_eq!(m.year(), None);
        m.release_date = None;
        assert_eq!(m.year(), None);
    }

    #[test]
    fn test_poster_url() {
        let mut m = movie(1, &[]);
        assert_eq!(m.poster_url(), None);
        m.poster_path = Some("/abc.jpg".to_string());
        assert_eq!(
            m.poster_url(),
            Some("https://image.tmdb.org/t/p/w500/abc.jpg".to_string())
        );
    }

    #[test]
    fn test_time_window_serde() {
        assert_eq!(serde_json::to_string(&TimeWindow::Day).unwrap(), "\"day\"");
        let window: TimeWindow = serde_json::from_str("\"week\"").unwrap();
        assert_eq!(window, TimeWindow::Week);
    }
}
