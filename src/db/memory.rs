use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    db::PreferenceStore,
    error::AppResult,
    models::{
        FavoriteEntry, MovieId, NewUser, RecommendationCacheEntry, SearchHistoryEntry, User,
        UserId, UserSettings, UserStats, WatchHistoryEntry,
    },
};

/// In-process preference store
///
/// Backs local runs without PostgreSQL/Redis and the test suites. Behaves
/// like [`PgPreferenceStore`](crate::db::PgPreferenceStore): favorites are
/// unique per (user, movie), history is append-only and deduplicated, and
/// a user has at most one cache entry.
#[derive(Clone, Default)]
pub struct MemoryPreferenceStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
}

#[derive(Default)]
struct MemoryStoreInner {
    users: HashMap<UserId, User>,
    settings: HashMap<UserId, UserSettings>,
    favorites: HashMap<UserId, Vec<FavoriteEntry>>,
    history: HashMap<UserId, Vec<WatchHistoryEntry>>,
    searches: HashMap<UserId, Vec<SearchHistoryEntry>>,
    cache: HashMap<UserId, RecommendationCacheEntry>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PreferenceStore for MemoryPreferenceStore {
    async fn upsert_user(&self, user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let mut inner = self.inner.write().await;

        let stored = inner
            .users
            .entry(user.id)
            .and_modify(|existing| {
                existing.username = user.username.clone();
                existing.first_name = user.first_name.clone();
                existing.last_name = user.last_name.clone();
                existing.last_active_at = now;
            })
            .or_insert_with(|| user.clone().into_user(now));

        Ok(stored.clone())
    }

    async fn get_user(&self, user_id: UserId) -> AppResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&user_id).cloned())
    }

    async fn get_settings(&self, user_id: UserId) -> AppResult<UserSettings> {
        let inner = self.inner.read().await;
        Ok(inner.settings.get(&user_id).copied().unwrap_or_default())
    }

    async fn update_settings(
        &self,
        user_id: UserId,
        settings: UserSettings,
    ) -> AppResult<UserSettings> {
        self.inner.write().await.settings.insert(user_id, settings);
        Ok(settings)
    }

    async fn add_favorite(&self, entry: FavoriteEntry) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let favorites = inner.favorites.entry(entry.user_id).or_default();

        if favorites.iter().any(|f| f.movie_id == entry.movie_id) {
            return Ok(false);
        }
        favorites.push(entry);
        Ok(true)
    }

    async fn remove_favorite(&self, user_id: UserId, movie_id: MovieId) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let Some(favorites) = inner.favorites.get_mut(&user_id) else {
            return Ok(false);
        };

        let before = favorites.len();
        favorites.retain(|f| f.movie_id != movie_id);
        Ok(favorites.len() < before)
    }

    async fn get_favorites(&self, user_id: UserId) -> AppResult<Vec<FavoriteEntry>> {
        let inner = self.inner.read().await;
        let mut favorites = inner.favorites.get(&user_id).cloned().unwrap_or_default();
        favorites.reverse();
        Ok(favorites)
    }

    async fn is_favorite(&self, user_id: UserId, movie_id: MovieId) -> AppResult<bool> {
        let inner = self.inner.read().await;
        Ok(inner
            .favorites
            .get(&user_id)
            .is_some_and(|favorites| favorites.iter().any(|f| f.movie_id == movie_id)))
    }

    async fn add_watched(&self, entry: WatchHistoryEntry) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let history = inner.history.entry(entry.user_id).or_default();

        if history.iter().any(|w| w.movie_id == entry.movie_id) {
            return Ok(false);
        }
        history.push(entry);
        Ok(true)
    }

    async fn get_watch_history(&self, user_id: UserId) -> AppResult<Vec<WatchHistoryEntry>> {
        let inner = self.inner.read().await;
        let mut history = inner.history.get(&user_id).cloned().unwrap_or_default();
        history.reverse();
        Ok(history)
    }

    async fn is_watched(&self, user_id: UserId, movie_id: MovieId) -> AppResult<bool> {
        let inner = self.inner.read().await;
        Ok(inner
            .history
            .get(&user_id)
            .is_some_and(|history| history.iter().any(|w| w.movie_id == movie_id)))
    }

    async fn record_search(&self, entry: SearchHistoryEntry) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.searches.entry(entry.user_id).or_default().push(entry);
        Ok(())
    }

    async fn get_stats(&self, user_id: UserId) -> AppResult<UserStats> {
        let inner = self.inner.read().await;
        let count = |len: Option<usize>| len.unwrap_or(0) as i64;

        Ok(UserStats {
            favorites: count(inner.favorites.get(&user_id).map(Vec::len)),
            watched: count(inner.history.get(&user_id).map(Vec::len)),
            searches: count(inner.searches.get(&user_id).map(Vec::len)),
        })
    }

    async fn get_cache(&self, user_id: UserId) -> AppResult<Option<RecommendationCacheEntry>> {
        Ok(self.inner.read().await.cache.get(&user_id).cloned())
    }

    async fn put_cache(&self, entry: RecommendationCacheEntry) -> AppResult<()> {
        self.inner.write().await.cache.insert(entry.user_id, entry);
        Ok(())
    }

    async fn invalidate_cache(&self, user_id: UserId) -> AppResult<()> {
        self.inner.write().await.cache.remove(&user_id);
        Ok(())
    }
}
