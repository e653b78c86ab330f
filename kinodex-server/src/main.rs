//! # Kinodex Server
//!
//! Content catalog backend for a movie and series site.
//!
//! - **Public catalog**: filtered, two-partition paginated listings and
//!   slug-addressable item details
//! - **Curation**: page reorders, cross-page moves, placement flags
//! - **Enrichment**: lazily cached credits and ratings from third-party
//!   providers

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kinodex_core::enrichment::{
    CreditsProvider, DisabledProvider, OmdbRatingsClient, RatingsProvider,
    TmdbCreditsClient,
};
use kinodex_core::store::MemoryCatalogStore;
use kinodex_server::{Config, ConfigLoader, build_app};

fn credits_provider(config: &Config) -> Arc<dyn CreditsProvider> {
    match &config.providers.tmdb_api_key {
        Some(key) => {
            match TmdbCreditsClient::new(
                key.clone(),
                config.providers.request_timeout,
            ) {
                Ok(client) => {
                    let client = match &config.providers.tmdb_base_url {
                        Some(url) => client.with_base_url(url.clone()),
                        None => client,
                    };
                    return Arc::new(client);
                }
                Err(err) => {
                    warn!(error = %err, "failed to build credits client");
                }
            }
            Arc::new(DisabledProvider)
        }
        None => {
            warn!("no TMDB API key configured; credits enrichment disabled");
            Arc::new(DisabledProvider)
        }
    }
}

fn ratings_provider(config: &Config) -> Arc<dyn RatingsProvider> {
    match &config.providers.omdb_api_key {
        Some(key) => {
            match OmdbRatingsClient::new(
                key.clone(),
                config.providers.request_timeout,
            ) {
                Ok(client) => {
                    let client = match &config.providers.omdb_base_url {
                        Some(url) => client.with_base_url(url.clone()),
                        None => client,
                    };
                    return Arc::new(client);
                }
                Err(err) => {
                    warn!(error = %err, "failed to build ratings client");
                }
            }
            Arc::new(DisabledProvider)
        }
        None => {
            warn!("no OMDb API key configured; ratings enrichment disabled");
            Arc::new(DisabledProvider)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(
            |_| "kinodex_server=info,kinodex_core=info,tower_http=info".into(),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(
        ConfigLoader::new()
            .load()
            .context("failed to load configuration")?,
    );

    let store = Arc::new(MemoryCatalogStore::new());
    let credits = credits_provider(&config);
    let ratings = ratings_provider(&config);

    let app = build_app(store, credits, ratings, Arc::clone(&config));

    let addr: SocketAddr =
        format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .context("invalid server host/port")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, page_size = config.catalog.page_size, "kinodex listening");

    axum::serve(listener, app)
        .await
        .context("server terminated")?;
    Ok(())
}
