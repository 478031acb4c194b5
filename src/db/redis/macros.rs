/// Read-through caching over [`Cache`](crate::db::Cache).
///
/// Returns the cached value for `$key` when present. Otherwise awaits
/// `$block`, queues the result for a background write with `$ttl` seconds
/// to live, and returns it. Must be used inside a function returning
/// `AppResult`. An unreachable cache counts as a miss.
///
/// # Example
/// ```rust,ignore
/// cached!(self.cache, CacheKey::Popular(1), 3600, async {
///     self.fetch_page("/movie/popular", &[]).await
/// })
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await {
            Ok(Some(cached)) => {
                tracing::debug!(key = %key, "Cache hit");
                Ok(cached)
            }
            miss => {
                if let Err(e) = miss {
                    tracing::warn!(key = %key, error = %e, "Cache read failed, fetching");
                }
                let value = $block.await?;
                $cache.set_in_background(&key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
