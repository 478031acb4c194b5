use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{GenreId, MovieDetails, MovieId, MovieSummary, UserId};

/// A registered chat user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: UserId,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_active_at: DateTime<Utc>,
}

/// Profile fields supplied on first contact (or re-registration)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewUser {
    pub id: UserId,
    #[serde(default)]
    pub username: Option<String>,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl NewUser {
    pub fn into_user(self, now: DateTime<Utc>) -> User {
        User {
            id: self.id,
            username: self.username,
            first_name: self.first_name,
            last_name: self.last_name,
            created_at: now,
            last_active_at: now,
        }
    }
}

/// A movie the user marked as favorite; unique per (user, movie)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct FavoriteEntry {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub genre_ids: Vec<GenreId>,
    pub title: String,
    pub overview: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    pub poster_path: Option<String>,
    pub added_at: DateTime<Utc>,
}

impl FavoriteEntry {
    pub fn from_details(user_id: UserId, details: &MovieDetails, now: DateTime<Utc>) -> Self {
        let movie = &details.summary;
        Self {
            user_id,
            movie_id: movie.id,
            genre_ids: movie.genre_ids.clone(),
            title: movie.title.clone(),
            overview: movie.overview.clone(),
            release_date: movie.release_date.clone(),
            vote_average: Some(movie.vote_average),
            poster_path: movie.poster_path.clone(),
            added_at: now,
        }
    }

    /// Rebuilds a summary from the cached display fields
    pub fn to_summary(&self) -> MovieSummary {
        MovieSummary {
            id: self.movie_id,
            title: self.title.clone(),
            media_type: Default::default(),
            overview: self.overview.clone(),
            release_date: self.release_date.clone(),
            vote_average: self.vote_average.unwrap_or_default(),
            vote_count: 0,
            popularity: 0.0,
            genre_ids: self.genre_ids.clone(),
            poster_path: self.poster_path.clone(),
        }
    }
}

/// A movie the user marked as watched; append-only
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct WatchHistoryEntry {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub title: String,
    pub genre_ids: Vec<GenreId>,
    pub release_date: Option<String>,
    pub watched_at: DateTime<Utc>,
}

impl WatchHistoryEntry {
    pub fn from_details(user_id: UserId, details: &MovieDetails, now: DateTime<Utc>) -> Self {
        let movie = &details.summary;
        Self {
            user_id,
            movie_id: movie.id,
            title: movie.title.clone(),
            genre_ids: movie.genre_ids.clone(),
            release_date: movie.release_date.clone(),
            watched_at: now,
        }
    }

    pub fn to_summary(&self) -> MovieSummary {
        MovieSummary {
            id: self.movie_id,
            title: self.title.clone(),
            media_type: Default::default(),
            overview: None,
            release_date: self.release_date.clone(),
            vote_average: 0.0,
            vote_count: 0,
            popularity: 0.0,
            genre_ids: self.genre_ids.clone(),
            poster_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHistoryEntry {
    pub user_id: UserId,
    pub query: String,
    pub results_count: i32,
    pub searched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserStats {
    pub favorites: i64,
    /// Distinct movies in the watch history
    pub watched: i64,
    pub searches: i64,
}

/// Rating floor applied when a user never chose one
pub const DEFAULT_MIN_RATING: f64 = 6.0;

/// Per-user preferences
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct UserSettings {
    /// Default lower bound on vote average for filtered discovery
    pub min_rating: f64,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            min_rating: DEFAULT_MIN_RATING,
        }
    }
}
