use chrono::Utc;

use crate::{
    db::PreferenceStore,
    error::{AppError, AppResult},
    models::{CatalogPage, SearchHistoryEntry, UserId},
    services::providers::CatalogClient,
};

/// Service function for title search
///
/// Delegates to the configured CatalogClient. When the search is made on
/// behalf of a user it is appended to their search history; a failure to
/// record it is logged and does not fail the search.
pub async fn search_titles(
    catalog: &dyn CatalogClient,
    store: &dyn PreferenceStore,
    query: &str,
    page: u32,
    user_id: Option<UserId>,
) -> AppResult<CatalogPage> {
    if query.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Search query cannot be empty".to_string(),
        ));
    }

    let result = catalog.search(query, page).await?;

    if let Some(user_id) = user_id {
        let entry = SearchHistoryEntry {
            user_id,
            query: query.trim().to_string(),
            results_count: result.results.len() as i32,
            searched_at: Utc::now(),
        };
        if let Err(e) = store.record_search(entry).await {
            tracing::warn!(user_id, error = %e, "Failed to record search");
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{MemoryPreferenceStore, MockPreferenceStore};
    use crate::models::movie;
    use crate::services::providers::MockCatalogClient;

    fn catalog_returning(ids: &'static [i64]) -> MockCatalogClient {
        let mut catalog = MockCatalogClient::new();
        catalog.expect_search().returning(move |_, page| {
            Ok(CatalogPage {
                page,
                total_pages: 1,
                results: ids.iter().map(|&id| movie(id, &[])).collect(),
            })
        });
        catalog
    }

    #[tokio::test]
    async fn test_search_records_history_for_users() {
        let store = MemoryPreferenceStore::new();
        let catalog = catalog_returning(&[1, 2, 3]);

        let result = search_titles(&catalog, &store, " Inception ", 1, Some(5))
            .await
            .unwrap();

        assert_eq!(result.results.len(), 3);
        assert_eq!(store.get_stats(5).await.unwrap().searches, 1);
    }

    #[tokio::test]
    async fn test_anonymous_search_records_nothing() {
        let mut store = MockPreferenceStore::new();
        store.expect_record_search().never();
        let catalog = catalog_returning(&[1]);

        search_titles(&catalog, &store, "matrix", 1, None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_history_failure_does_not_fail_search() {
        let mut store = MockPreferenceStore::new();
        store
            .expect_record_search()
            .returning(|_| Err(AppError::StorageUnavailable("down".to_string())));
        let catalog = catalog_returning(&[1]);

        let result = search_titles(&catalog, &store, "matrix", 1, Some(5)).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_blank_query_is_rejected_before_catalog() {
        let store = MemoryPreferenceStore::new();
        let mut catalog = MockCatalogClient::new();
        catalog.expect_search().never();

        let result = search_titles(&catalog, &store, "   ", 1, Some(5)).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
        assert_eq!(store.get_stats(5).await.unwrap().searches, 0);
    }
}
