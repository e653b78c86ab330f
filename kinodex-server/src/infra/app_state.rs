use std::fmt;
use std::sync::Arc;

use kinodex_core::catalog::CatalogService;
use kinodex_core::enrichment::EnrichmentService;

use crate::infra::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub enrichment: Arc<EnrichmentService>,
    pub config: Arc<Config>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    pub fn new(
        catalog: Arc<CatalogService>,
        enrichment: Arc<EnrichmentService>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            catalog,
            enrichment,
            config,
        }
    }
}
