//! Admin endpoints: item CRUD, curation, slugs, enrichment sync, repair.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use kinodex_core::api_types::{
    BulkCreateRequest, BulkCreateResponse, EnrichmentSyncRequest, ItemDraft,
    ItemUpdate, ListingQuery, MoveRequest, MoveResponse, ReorderRequest,
    ReorderResponse, RepairResponse, SlugRegenResponse, SyncResult,
};
use kinodex_core::catalog::ListingPage;
use kinodex_model::{CatalogItem, ItemID};

use crate::infra::app_state::AppState;
use crate::infra::errors::{AppError, AppResult};

fn parse_id(raw: &str) -> Result<ItemID, AppError> {
    ItemID::parse(raw)
        .ok_or_else(|| AppError::bad_request(format!("invalid item id {raw:?}")))
}

/// Admin listing; includes unpublished items.
pub async fn list_catalog(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<ListingPage>> {
    let page = state.catalog.list(&query, false).await?;
    Ok(Json(page))
}

pub async fn create_item(
    State(state): State<AppState>,
    Json(draft): Json<ItemDraft>,
) -> AppResult<(StatusCode, Json<CatalogItem>)> {
    let item = state.catalog.create(draft).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<ItemUpdate>,
) -> AppResult<Json<CatalogItem>> {
    let id = parse_id(&id)?;
    let item = state.catalog.update(&id, update).await?;
    Ok(Json(item))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id)?;
    state.catalog.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Bulk create; per-entry failures are reported, not fatal.
pub async fn create_items_bulk(
    State(state): State<AppState>,
    Json(request): Json<BulkCreateRequest>,
) -> AppResult<Json<BulkCreateResponse>> {
    let response = state.catalog.create_bulk(request.items).await?;
    Ok(Json(response))
}

/// Permute the rank slots of one admin-view page.
pub async fn reorder_page(
    State(state): State<AppState>,
    Json(request): Json<ReorderRequest>,
) -> AppResult<Json<ReorderResponse>> {
    let response = state.catalog.reorder_page(&request).await?;
    Ok(Json(response))
}

/// Relocate items to a target page, renumbering the whole catalog.
pub async fn move_to_page(
    State(state): State<AppState>,
    Json(request): Json<MoveRequest>,
) -> AppResult<Json<MoveResponse>> {
    let response = state.catalog.move_to_page(&request).await?;
    Ok(Json(response))
}

/// Regenerate all slugs from current names.
pub async fn regenerate_slugs(
    State(state): State<AppState>,
) -> AppResult<Json<SlugRegenResponse>> {
    let response = state.catalog.regenerate_slugs().await?;
    Ok(Json(response))
}

/// Trigger an enrichment sync batch.
pub async fn sync_enrichment(
    State(state): State<AppState>,
    Json(request): Json<EnrichmentSyncRequest>,
) -> AppResult<Json<Vec<SyncResult>>> {
    let results = state.enrichment.sync(&request).await?;
    Ok(Json(results))
}

/// Resynthesize contiguous order ranks for the whole catalog.
pub async fn repair_order(
    State(state): State<AppState>,
) -> AppResult<Json<RepairResponse>> {
    let response = state.catalog.repair_order().await?;
    Ok(Json(response))
}
