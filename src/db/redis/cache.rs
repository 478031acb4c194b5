use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::error::AppResult;
use crate::models::{GenreId, MovieId, TimeWindow, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Search { query: String, page: u32 },
    Popular(u32),
    Trending(TimeWindow),
    Discover { genre: GenreId, page: u32 },
    /// Keyed by [`DiscoverFilters::fingerprint`](crate::models::DiscoverFilters::fingerprint)
    Filtered { filters: String, page: u32 },
    Details(MovieId),
    Similar { movie: MovieId, page: u32 },
    Trailer(MovieId),
    Genres,
    Recommendations(UserId),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Search { query, page } => {
                write!(f, "search:{}:{}", query.trim().to_lowercase(), page)
            }
            CacheKey::Popular(page) => write!(f, "popular:{}", page),
            CacheKey::Trending(window) => write!(f, "trending:{}", window),
            CacheKey::Discover { genre, page } => write!(f, "discover:{}:{}", genre, page),
            CacheKey::Filtered { filters, page } => write!(f, "filtered:{}:{}", filters, page),
            CacheKey::Details(id) => write!(f, "movie:{}", id),
            CacheKey::Similar { movie, page } => write!(f, "similar:{}:{}", movie, page),
            CacheKey::Trailer(id) => write!(f, "trailer:{}", id),
            CacheKey::Genres => write!(f, "genres:movie"),
            CacheKey::Recommendations(user_id) => write!(f, "recs:{}", user_id),
        }
    }
}

/// Creates a Redis client for caching
///
/// Establishes a connection to Redis for fast data caching.
/// Uses connection pooling via the connection-manager feature.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Cache handler for storing and retrieving data from Redis
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: tokio::task::JoinHandle<()>,
}

impl CacheWriterHandle {
    /// Initiates a graceful shutdown of the cache writer
    ///
    /// Sends a shutdown signal to the writer task and waits for it to flush
    /// all pending writes to Redis.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");

        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Cache writer task panicked");
        }
    }
}

impl Cache {
    /// Creates a new Cache instance with an async write background task
    ///
    /// Catalog responses are written through the background task so a slow
    /// Redis never delays a reply.
    pub fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        let task = tokio::spawn(async move {
            Self::cache_writer_task(client, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            redis_client,
            write_tx,
        };

        (cache, CacheWriterHandle { shutdown_tx, task })
    }

    /// Background task that processes cache write messages
    ///
    /// On shutdown signal, flushes everything already queued before exiting.
    async fn cache_writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    if let Err(e) = Self::write_to_redis(&client, msg).await {
                        tracing::error!(error = %e, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    write_rx.close();
                    tracing::info!("Cache writer shutting down, flushing remaining writes");

                    while let Some(msg) = write_rx.recv().await {
                        if let Err(e) = Self::write_to_redis(&client, msg).await {
                            tracing::error!(error = %e, "Failed to flush cache write during shutdown");
                        }
                    }

                    tracing::info!("Cache writer task stopped");
                    break;
                }
            }
        }
    }

    async fn write_to_redis(client: &Client, msg: CacheWriteMessage) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
        Ok(())
    }

    /// Retrieves a value from the cache by key
    ///
    /// Returns `None` when the key does not exist.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;

        match cached {
            Some(json) => {
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Stores a value and waits for Redis to acknowledge it
    ///
    /// Used where a later `delete` must not race with a queued write.
    pub async fn set<T: serde::Serialize>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: u64,
    ) -> AppResult<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::Internal(format!("Cache serialization error: {}", e)))?;

        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(key.to_string(), json, ttl).await?;
        Ok(())
    }

    pub async fn delete(&self, key: &CacheKey) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.del(key.to_string()).await?;
        Ok(())
    }

    /// Stores a value in the cache asynchronously without blocking
    ///
    /// The value is serialized here and handed to the background writer;
    /// failures are logged, never returned.
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: key.to_string(),
            value: json,
            ttl,
        };

        if let Err(e) = self.write_tx.send(msg) {
            tracing::error!(error = %e, "Failed to send cache write message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_display_search_is_normalized() {
        let key = CacheKey::Search {
            query: "  The Matrix ".to_string(),
            page: 1,
        };
        assert_eq!(key.to_string(), "search:the matrix:1");
    }

    #[test]
    fn test_cache_key_display_catalog_lists() {
        assert_eq!(CacheKey::Popular(3).to_string(), "popular:3");
        assert_eq!(CacheKey::Trending(TimeWindow::Day).to_string(), "trending:day");
        assert_eq!(
            CacheKey::Discover { genre: 28, page: 2 }.to_string(),
            "discover:28:2"
        );
        assert_eq!(
            CacheKey::Filtered {
                filters: "g=18,28;y=2000-2010;r=7".to_string(),
                page: 1
            }
            .to_string(),
            "filtered:g=18,28;y=2000-2010;r=7:1"
        );
        assert_eq!(
            CacheKey::Similar { movie: 603, page: 1 }.to_string(),
            "similar:603:1"
        );
        assert_eq!(CacheKey::Genres.to_string(), "genres:movie");
    }

    #[test]
    fn test_cache_key_display_per_movie_and_user() {
        assert_eq!(CacheKey::Details(27205).to_string(), "movie:27205");
        assert_eq!(CacheKey::Trailer(27205).to_string(), "trailer:27205");
        assert_eq!(CacheKey::Recommendations(42).to_string(), "recs:42");
    }

    fn redis_url() -> String {
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
    }

    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_set_get_delete() {
        let client = create_redis_client(&redis_url()).unwrap();
        let (cache, _handle) = Cache::new(client);

        let key = CacheKey::Recommendations(-1);
        cache.set(&key, &vec![1_i64, 2, 3], 60).await.unwrap();

        let stored: Option<Vec<i64>> = cache.get_from_cache(&key).await.unwrap();
        assert_eq!(stored, Some(vec![1, 2, 3]));

        cache.delete(&key).await.unwrap();
        let gone: Option<Vec<i64>> = cache.get_from_cache(&key).await.unwrap();
        assert_eq!(gone, None);
    }

    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_background_writes_flush_on_shutdown() {
        let client = create_redis_client(&redis_url()).unwrap();
        let (cache, handle) = Cache::new(client);

        let key = CacheKey::Popular(9_999);
        let value = vec!["shutdown_test".to_string()];
        cache.set_in_background(&key, &value, 60);

        handle.shutdown().await;

        let retrieved: Option<Vec<String>> = cache.get_from_cache(&key).await.unwrap();
        assert_eq!(retrieved, Some(value));

        cache.delete(&key).await.unwrap();
    }
}
