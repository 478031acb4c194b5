//! Filtered discovery and the per-user rating floor it defaults to
use serde::Serialize;

use crate::{
    db::PreferenceStore,
    error::AppResult,
    models::{discover::validate_rating, CatalogPage, DiscoverFilters, UserId, UserSettings},
    services::{library::require_user, providers::CatalogClient},
};

/// A discovery page together with the filters actually applied
#[derive(Debug, Clone, Serialize)]
pub struct Discovery {
    pub filters: DiscoverFilters,
    #[serde(flatten)]
    pub page: CatalogPage,
}

/// Runs a filtered discovery query
///
/// Without an explicit `min_rating` the user's saved floor applies, or the
/// default floor for anonymous callers.
pub async fn discover_movies(
    catalog: &dyn CatalogClient,
    store: &dyn PreferenceStore,
    filters: DiscoverFilters,
    page: u32,
    user_id: Option<UserId>,
) -> AppResult<Discovery> {
    filters.validate()?;
    let mut filters = filters.normalized();

    if filters.min_rating.is_none() {
        let settings = match user_id {
            Some(user_id) => store.get_settings(user_id).await?,
            None => UserSettings::default(),
        };
        filters.min_rating = Some(settings.min_rating);
    }

    let page = catalog.discover(&filters, page.max(1)).await?;
    Ok(Discovery { filters, page })
}

pub async fn settings(store: &dyn PreferenceStore, user_id: UserId) -> AppResult<UserSettings> {
    require_user(store, user_id).await?;
    store.get_settings(user_id).await
}

pub async fn set_min_rating(
    store: &dyn PreferenceStore,
    user_id: UserId,
    min_rating: f64,
) -> AppResult<UserSettings> {
    validate_rating(min_rating)?;
    require_user(store, user_id).await?;

    let updated = store
        .update_settings(user_id, UserSettings { min_rating })
        .await?;

    tracing::info!(user_id, min_rating, "Minimum rating updated");
    Ok(updated)
}
