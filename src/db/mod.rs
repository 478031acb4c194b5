pub mod memory;
pub mod postgres;
pub mod preferences;
pub mod redis;

pub use memory::MemoryPreferenceStore;
pub use postgres::{create_pool, run_migrations};
pub use preferences::{PgPreferenceStore, PreferenceStore};
#[cfg(test)]
pub use preferences::MockPreferenceStore;
pub use redis::create_redis_client;
pub use redis::Cache;
pub use redis::CacheKey;
pub use redis::CacheWriterHandle;
