use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::{
    db::PreferenceStore,
    error::{AppError, AppResult},
    models::{
        CatalogPage, GenreId, GenreWeights, MovieId, MovieSummary, RecommendationCacheEntry,
        Recommendations, UserId,
    },
    services::providers::CatalogClient,
};

/// Tunables for [`RecommendationEngine`]
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Used when the caller does not ask for a specific count
    pub default_limit: usize,
    /// Larger requests are clamped to this
    pub max_limit: usize,
    /// Number of favorite genres that seed discovery (K)
    pub top_genres: usize,
    /// Upper bound on follow-up queries when the first round comes up short
    pub max_extra_pages: usize,
    pub cache_ttl: chrono::Duration,
    /// Per catalog call; an elapsed timeout counts as a failed query
    pub catalog_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 20,
            top_genres: 3,
            max_extra_pages: 3,
            cache_ttl: chrono::Duration::hours(24),
            catalog_timeout: Duration::from_secs(5),
        }
    }
}

/// One catalog call the engine may issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateQuery {
    Discover { genre: GenreId, page: u32 },
    Popular { page: u32 },
}

impl CandidateQuery {
    fn source(&self) -> Option<GenreId> {
        match self {
            CandidateQuery::Discover { genre, .. } => Some(*genre),
            CandidateQuery::Popular { .. } => None,
        }
    }

    fn page(&self) -> u32 {
        match self {
            CandidateQuery::Discover { page, .. } | CandidateQuery::Popular { page } => *page,
        }
    }
}

/// Ordered, bounded query policy for a single request
///
/// `initial` always runs in full. `extra` lists follow-up pages in the order
/// they may be tried; at most `max_extra` of them are issued, and only while
/// the result is short of the requested limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryPlan {
    pub initial: Vec<CandidateQuery>,
    pub extra: Vec<CandidateQuery>,
    pub max_extra: usize,
}

impl DiscoveryPlan {
    /// Page 1 of every genre in weight order, then page 2 of each, page 3...
    pub fn personalized(genres: &[GenreId], max_extra: usize) -> Self {
        let initial = genres
            .iter()
            .map(|&genre| CandidateQuery::Discover { genre, page: 1 })
            .collect();

        // No genre ever needs a page past 1 + max_extra
        let last_page = 1 + max_extra as u32;
        let extra = (2..=last_page)
            .flat_map(|page| {
                genres
                    .iter()
                    .map(move |&genre| CandidateQuery::Discover { genre, page })
            })
            .collect();

        Self {
            initial,
            extra,
            max_extra,
        }
    }

    pub fn popular(max_extra: usize) -> Self {
        Self {
            initial: vec![CandidateQuery::Popular { page: 1 }],
            extra: (2..=1 + max_extra as u32)
                .map(|page| CandidateQuery::Popular { page })
                .collect(),
            max_extra,
        }
    }
}

/// Merged candidate list: first occurrence wins, excluded ids never enter
#[derive(Debug, Default)]
struct Candidates {
    excluded: HashSet<MovieId>,
    seen: HashSet<MovieId>,
    movies: Vec<MovieSummary>,
}

impl Candidates {
    fn new(excluded: HashSet<MovieId>) -> Self {
        Self {
            excluded,
            ..Default::default()
        }
    }

    fn extend(&mut self, results: Vec<MovieSummary>) {
        for movie in results {
            if self.excluded.contains(&movie.id) || !self.seen.insert(movie.id) {
                continue;
            }
            self.movies.push(movie);
        }
    }

    fn len(&self) -> usize {
        self.movies.len()
    }

    fn into_movies(mut self, limit: usize) -> Vec<MovieSummary> {
        self.movies.truncate(limit);
        self.movies
    }
}

/// Builds personalized recommendation lists from a user's favorite genres
pub struct RecommendationEngine {
    store: Arc<dyn PreferenceStore>,
    catalog: Arc<dyn CatalogClient>,
    settings: EngineSettings,
}

impl RecommendationEngine {
    pub fn new(
        store: Arc<dyn PreferenceStore>,
        catalog: Arc<dyn CatalogClient>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            store,
            catalog,
            settings,
        }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns up to `limit` movies the user has neither favorited nor watched
    ///
    /// Serves from the user's cache entry while it is valid. Users without
    /// favorites get the catalog's popular list, flagged as not personalized.
    /// Fails with [`AppError::CatalogUnavailable`] only when every catalog
    /// query of the first round failed, and with
    /// [`AppError::StorageUnavailable`] when favorites or history cannot be read.
    pub async fn recommend(&self, user_id: UserId, limit: usize) -> AppResult<Recommendations> {
        if limit == 0 {
            return Err(AppError::InvalidInput(
                "limit must be greater than zero".to_string(),
            ));
        }
        let limit = limit.min(self.settings.max_limit);

        if let Some(entry) = self
            .store
            .get_cache(user_id)
            .await
            .map_err(AppError::into_storage)?
        {
            if entry.serves(limit, Utc::now()) {
                tracing::debug!(user_id, limit, "Serving cached recommendations");
                return Ok(entry.to_recommendations(limit));
            }
        }

        let favorites = self
            .store
            .get_favorites(user_id)
            .await
            .map_err(AppError::into_storage)?;
        let history = self
            .store
            .get_watch_history(user_id)
            .await
            .map_err(AppError::into_storage)?;

        let excluded: HashSet<MovieId> = favorites
            .iter()
            .map(|f| f.movie_id)
            .chain(history.iter().map(|w| w.movie_id))
            .collect();

        let weights = GenreWeights::from_favorites(&favorites);
        let genres = weights.top(self.settings.top_genres);

        // Favorites without any genre data cannot seed discovery either
        let (plan, personalized) = if genres.is_empty() {
            (DiscoveryPlan::popular(self.settings.max_extra_pages), false)
        } else {
            (
                DiscoveryPlan::personalized(&genres, self.settings.max_extra_pages),
                true,
            )
        };

        let movies = self.execute(user_id, &plan, excluded, limit).await?;

        let recommendations = Recommendations {
            movies,
            personalized,
            genres,
            from_cache: false,
        };

        tracing::info!(
            user_id,
            favorites = favorites.len(),
            watched = history.len(),
            personalized,
            movies = ?recommendations.movie_ids(),
            "Recommendations computed"
        );

        let entry = RecommendationCacheEntry::new(
            user_id,
            limit,
            &recommendations,
            Utc::now(),
            self.settings.cache_ttl,
        );
        if let Err(e) = self.store.put_cache(entry).await {
            tracing::warn!(user_id, error = %e, "Failed to cache recommendations");
        }

        Ok(recommendations)
    }

    /// Runs the plan and returns the filtered, truncated candidate list
    async fn execute(
        &self,
        user_id: UserId,
        plan: &DiscoveryPlan,
        excluded: HashSet<MovieId>,
        limit: usize,
    ) -> AppResult<Vec<MovieSummary>> {
        let mut candidates = Candidates::new(excluded);
        // Last page each source reported, so exhausted sources are skipped
        let mut total_pages: HashMap<Option<GenreId>, u32> = HashMap::new();
        let mut succeeded = 0;

        for query in &plan.initial {
            match self.run_query(user_id, *query).await {
                Some(page) => {
                    succeeded += 1;
                    total_pages.insert(query.source(), page.total_pages);
                    candidates.extend(page.results);
                }
                // A failing source gets no follow-up pages
                None => {
                    total_pages.insert(query.source(), 0);
                }
            }
        }

        if succeeded == 0 {
            tracing::error!(
                user_id,
                queries = plan.initial.len(),
                "Every catalog query failed"
            );
            return Err(AppError::CatalogUnavailable);
        }

        let mut issued = 0;
        for query in &plan.extra {
            if candidates.len() >= limit || issued >= plan.max_extra {
                break;
            }
            let exhausted = total_pages
                .get(&query.source())
                .is_some_and(|&last| query.page() > last);
            if exhausted {
                continue;
            }

            issued += 1;
            match self.run_query(user_id, *query).await {
                Some(page) => {
                    total_pages.insert(query.source(), page.total_pages);
                    candidates.extend(page.results);
                }
                None => {
                    total_pages.insert(query.source(), 0);
                }
            }
        }

        if issued > 0 {
            tracing::debug!(user_id, extra_queries = issued, "Padded short result");
        }

        Ok(candidates.into_movies(limit))
    }

    /// One catalog call; any failure, including a timeout, yields `None`
    async fn run_query(&self, user_id: UserId, query: CandidateQuery) -> Option<CatalogPage> {
        let result = match query {
            CandidateQuery::Discover { genre, page } => {
                self.with_timeout(self.catalog.discover_by_genre(genre, page))
                    .await
            }
            CandidateQuery::Popular { page } => {
                self.with_timeout(self.catalog.popular(page)).await
            }
        };

        match result {
            Ok(page) => Some(page),
            Err(e) => {
                tracing::warn!(
                    user_id,
                    query = ?query,
                    provider = self.catalog.name(),
                    error = %e,
                    "Catalog query unavailable, skipping"
                );
                None
            }
        }
    }

    async fn with_timeout<F>(&self, fut: F) -> AppResult<CatalogPage>
    where
        F: Future<Output = AppResult<CatalogPage>>,
    {
        tokio::time::timeout(self.settings.catalog_timeout, fut)
            .await
            .map_err(|_| AppError::Timeout)?
    }
}
