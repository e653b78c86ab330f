//! Public, read-only catalog endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use kinodex_core::api_types::{FilterOptions, ListingQuery};
use kinodex_core::catalog::ListingPage;
use kinodex_model::CatalogItem;

use crate::infra::app_state::AppState;
use crate::infra::errors::AppResult;

/// List published items, paginated.
pub async fn list_catalog(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<ListingPage>> {
    let page = state.catalog.list(&query, true).await?;
    Ok(Json(page))
}

/// Item detail by id or slug. Stale enrichment sub-caches are refreshed
/// opportunistically on the way out; a provider failure still serves the
/// cached copy.
pub async fn get_item(
    State(state): State<AppState>,
    Path(id_or_slug): Path<String>,
) -> AppResult<Json<CatalogItem>> {
    let item = state.catalog.get_by_id_or_slug(&id_or_slug).await?;
    let (item, _, _) = state.enrichment.refresh_item(&item, false, None).await;
    Ok(Json(item))
}

/// Distinct category, language and rate values across published items.
pub async fn filter_options(
    State(state): State<AppState>,
) -> AppResult<Json<FilterOptions>> {
    let options = state.catalog.filter_options(true).await?;
    Ok(Json(options))
}
