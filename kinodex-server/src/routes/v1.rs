use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::handlers::{admin, catalog};
use crate::infra::app_state::AppState;

/// Create all v1 API routes
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        // Public catalog endpoints
        .route("/catalog", get(catalog::list_catalog))
        .route("/catalog/filters", get(catalog::filter_options))
        .route("/catalog/{id_or_slug}", get(catalog::get_item))
        // Admin routes
        .merge(create_admin_routes())
}

fn create_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/catalog", get(admin::list_catalog))
        .route("/admin/items", post(admin::create_item))
        .route("/admin/items/bulk", post(admin::create_items_bulk))
        .route("/admin/items/{id}", put(admin::update_item))
        .route("/admin/items/{id}", delete(admin::delete_item))
        .route("/admin/catalog/reorder", post(admin::reorder_page))
        .route("/admin/catalog/move", post(admin::move_to_page))
        .route("/admin/slugs/regenerate", post(admin::regenerate_slugs))
        .route("/admin/enrichment/sync", post(admin::sync_enrichment))
        .route("/admin/order/repair", post(admin::repair_order))
}
