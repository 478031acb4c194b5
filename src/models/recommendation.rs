use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{FavoriteEntry, GenreId, MovieId, MovieSummary, UserId};

/// Result of a recommendation request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendations {
    pub movies: Vec<MovieSummary>,
    /// False when the list is the popularity fallback for a user with no favorites
    pub personalized: bool,
    /// Genres that seeded discovery, in weight order
    pub genres: Vec<GenreId>,
    pub from_cache: bool,
}

impl Recommendations {
    pub fn movie_ids(&self) -> Vec<MovieId> {
        self.movies.iter().map(|m| m.id).collect()
    }
}

/// Last computed recommendation list for a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationCacheEntry {
    pub user_id: UserId,
    pub generated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// The `limit` the list was computed for
    pub limit: usize,
    pub personalized: bool,
    pub genres: Vec<GenreId>,
    pub movies: Vec<MovieSummary>,
}

impl RecommendationCacheEntry {
    pub fn new(
        user_id: UserId,
        limit: usize,
        recommendations: &Recommendations,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            user_id,
            generated_at: now,
            expires_at: now + ttl,
            limit,
            personalized: recommendations.personalized,
            genres: recommendations.genres.clone(),
            movies: recommendations.movies.clone(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether this entry can answer a request for `limit` items
    pub fn serves(&self, limit: usize, now: DateTime<Utc>) -> bool {
        !self.is_expired(now) && self.limit >= limit
    }

    /// Seconds until expiry, never less than one
    pub fn remaining_ttl_secs(&self, now: DateTime<Utc>) -> u64 {
        (self.expires_at - now).num_seconds().max(1) as u64
    }

    pub fn to_recommendations(&self, limit: usize) -> Recommendations {
        Recommendations {
            movies: self.movies.iter().take(limit).cloned().collect(),
            personalized: self.personalized,
            genres: self.genres.clone(),
            from_cache: true,
        }
    }
}

/// Genre occurrence counts across a user's favorites
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenreWeights(HashMap<GenreId, u32>);

impl GenreWeights {
    pub fn from_favorites(favorites: &[FavoriteEntry]) -> Self {
        let mut counts = HashMap::new();
        for favorite in favorites {
            for genre in &favorite.genre_ids {
                *counts.entry(*genre).or_insert(0) += 1;
            }
        }
        Self(counts)
    }

    /// Up to `k` genres by weight descending, ties broken by ascending id
    pub fn top(&self, k: usize) -> Vec<GenreId> {
        let mut ranked: Vec<(GenreId, u32)> = self.0.iter().map(|(g, w)| (*g, *w)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.into_iter().take(k).map(|(genre, _)| genre).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::movie;

    fn favorite(movie_id: MovieId, genre_ids: &[GenreId]) -> FavoriteEntry {
        FavoriteEntry {
            user_id: 1,
            movie_id,
            genre_ids: genre_ids.to_vec(),
            title: format!("Movie {}", movie_id),
            overview: None,
            release_date: None,
            vote_average: None,
            poster_path: None,
            added_at: Utc::now(),
        }
    }

    #[test]
    fn test_genre_weights_rank_by_occurrences() {
        let favorites = vec![
            favorite(1, &[35, 18]),
            favorite(2, &[28]),
            favorite(3, &[28, 35]),
            favorite(4, &[28]),
        ];
        let weights = GenreWeights::from_favorites(&favorites);

        assert_eq!(weights.top(1), vec![28]);
        assert_eq!(weights.top(3), vec![28, 35, 18]);
    }

    #[test]
    fn test_top_genres_break_ties_by_ascending_id() {
        let favorites = vec![favorite(1, &[35, 18, 28]), favorite(2, &[80, 28])];
        let weights = GenreWeights::from_favorites(&favorites);

        assert_eq!(weights.top(3), vec![28, 18, 35]);
        assert_eq!(weights.top(10), vec![28, 18, 35, 80]);
        assert_eq!(weights.top(0), Vec::<GenreId>::new());
    }

    #[test]
    fn test_favorites_without_genres_give_empty_weights() {
        let weights = GenreWeights::from_favorites(&[favorite(1, &[])]);
        assert_eq!(weights, GenreWeights::default());
        assert!(weights.top(3).is_empty());
    }

    #[test]
    fn test_cache_entry_serves_within_window_and_limit() {
        let now = Utc::now();
        let recs = Recommendations {
            movies: vec![movie(1, &[]), movie(2, &[]), movie(3, &[])],
            personalized: true,
            genres: vec![28],
            from_cache: false,
        };
        let entry = RecommendationCacheEntry::new(9, 10, &recs, now, Duration::hours(24));

        assert!(entry.serves(10, now));
        assert!(entry.serves(2, now + Duration::hours(23)));
        assert!(!entry.serves(11, now));
        assert!(!entry.serves(5, now + Duration::hours(24)));

        let served = entry.to_recommendations(2);
        assert_eq!(served.movie_ids(), vec![1, 2]);
        assert!(served.from_cache);
        assert!(served.personalized);
    }

    #[test]
    fn test_remaining_ttl_is_at_least_one_second() {
        let now = Utc::now();
        let recs = Recommendations {
            movies: vec![],
            personalized: false,
            genres: vec![],
            from_cache: false,
        };
        let entry = RecommendationCacheEntry::new(9, 10, &recs, now, Duration::seconds(90));
        assert_eq!(entry.remaining_ttl_secs(now), 90);
        assert_eq!(entry.remaining_ttl_secs(now + Duration::hours(1)), 1);
    }
}
