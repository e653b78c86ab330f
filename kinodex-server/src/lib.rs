//! HTTP surface of the Kinodex catalog backend.
//!
//! The server crate wires the catalog engine and the enrichment service
//! behind an Axum router: public read endpoints under `/api/v1/catalog` and
//! curation endpoints under `/api/v1/admin`.

pub mod handlers;
pub mod infra;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use kinodex_core::catalog::CatalogService;
use kinodex_core::enrichment::{
    CachePolicy, CreditsProvider, EnrichmentService, RatingsProvider,
};
use kinodex_core::store::CatalogStore;

pub use infra::app_state::AppState;
pub use infra::config::{Config, ConfigLoadError, ConfigLoader};
pub use infra::errors::{AppError, AppResult};

/// Assemble the application router over a store and provider pair.
pub fn build_app(
    store: Arc<dyn CatalogStore>,
    credits: Arc<dyn CreditsProvider>,
    ratings: Arc<dyn RatingsProvider>,
    config: Arc<Config>,
) -> Router {
    let catalog = Arc::new(CatalogService::new(
        Arc::clone(&store),
        config.catalog.page_size,
    ));
    let policy = CachePolicy::from_days(
        config.enrichment.credits_ttl_days,
        config.enrichment.ratings_ttl_days,
        config.enrichment.sync_batch_cap,
        config.enrichment.cast_limit,
    );
    let enrichment =
        Arc::new(EnrichmentService::new(store, credits, ratings, policy));
    let state = AppState::new(catalog, enrichment, config);
    routes::create_api_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
