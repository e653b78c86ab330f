//! Server configuration: a TOML file overlaid with environment variables.
//!
//! Lookup order for each value is environment variable, then config file,
//! then built-in default, so a containerized deployment can run with no
//! file at all.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "kinodex.toml";
const DEFAULT_PAGE_SIZE: u64 = 50;
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub enrichment: EnrichmentConfig,
    pub providers: ProviderConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub page_size: u64,
}

/// Knobs for the enrichment caches, day-granular like the cache policy.
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    pub credits_ttl_days: i64,
    pub ratings_ttl_days: i64,
    pub sync_batch_cap: usize,
    pub cast_limit: usize,
}

/// Third-party metadata provider credentials. Either key may be absent, in
/// which case the corresponding enrichment sub-cache simply never fills.
/// Base URLs are overridable for self-hosted mirrors and tests.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub tmdb_api_key: Option<String>,
    pub omdb_api_key: Option<String>,
    pub tmdb_base_url: Option<String>,
    pub omdb_base_url: Option<String>,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8090,
            },
            catalog: CatalogConfig {
                page_size: DEFAULT_PAGE_SIZE,
            },
            enrichment: EnrichmentConfig {
                credits_ttl_days: 7,
                ratings_ttl_days: 3,
                sync_batch_cap: 25,
                cast_limit: 12,
            },
            providers: ProviderConfig {
                tmdb_api_key: None,
                omdb_api_key: None,
                tmdb_base_url: None,
                omdb_base_url: None,
                request_timeout: Duration::from_secs(
                    DEFAULT_PROVIDER_TIMEOUT_SECS,
                ),
            },
        }
    }
}

/// On-disk shape; every field optional so partial files work.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    server: FileServer,
    #[serde(default)]
    catalog: FileCatalog,
    #[serde(default)]
    enrichment: FileEnrichment,
    #[serde(default)]
    providers: FileProviders,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileServer {
    host: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileCatalog {
    page_size: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileEnrichment {
    credits_ttl_days: Option<i64>,
    ratings_ttl_days: Option<i64>,
    sync_batch_cap: Option<usize>,
    cast_limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileProviders {
    tmdb_api_key: Option<String>,
    omdb_api_key: Option<String>,
    tmdb_base_url: Option<String>,
    omdb_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn load(self) -> Result<Config, ConfigLoadError> {
        let path = self
            .path
            .or_else(|| std::env::var_os("KINODEX_CONFIG").map(Into::into))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        let file = Self::read_file(&path)?;
        let mut config = Config::default();
        Self::apply_file(&mut config, file);
        Self::apply_env(&mut config)?;
        if config.catalog.page_size == 0 {
            return Err(ConfigLoadError::InvalidValue {
                key: "catalog.page_size",
                value: "0".to_string(),
            });
        }
        if config.enrichment.credits_ttl_days <= 0
            || config.enrichment.ratings_ttl_days <= 0
        {
            return Err(ConfigLoadError::InvalidValue {
                key: "enrichment ttl",
                value: format!(
                    "{}/{}",
                    config.enrichment.credits_ttl_days,
                    config.enrichment.ratings_ttl_days
                ),
            });
        }
        if config.enrichment.sync_batch_cap == 0 {
            return Err(ConfigLoadError::InvalidValue {
                key: "enrichment.sync_batch_cap",
                value: "0".to_string(),
            });
        }
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<FileConfig, ConfigLoadError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            // A missing default config file is not an error.
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(FileConfig::default());
            }
            Err(err) => {
                return Err(ConfigLoadError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };
        toml::from_str(&raw).map_err(|err| ConfigLoadError::Parse {
            path: path.to_path_buf(),
            source: err,
        })
    }

    fn apply_file(config: &mut Config, file: FileConfig) {
        if let Some(host) = file.server.host {
            config.server.host = host;
        }
        if let Some(port) = file.server.port {
            config.server.port = port;
        }
        if let Some(page_size) = file.catalog.page_size {
            config.catalog.page_size = page_size;
        }
        if let Some(days) = file.enrichment.credits_ttl_days {
            config.enrichment.credits_ttl_days = days;
        }
        if let Some(days) = file.enrichment.ratings_ttl_days {
            config.enrichment.ratings_ttl_days = days;
        }
        if let Some(cap) = file.enrichment.sync_batch_cap {
            config.enrichment.sync_batch_cap = cap;
        }
        if let Some(limit) = file.enrichment.cast_limit {
            config.enrichment.cast_limit = limit;
        }
        if let Some(key) = file.providers.tmdb_api_key {
            config.providers.tmdb_api_key = Some(key);
        }
        if let Some(key) = file.providers.omdb_api_key {
            config.providers.omdb_api_key = Some(key);
        }
        if let Some(url) = file.providers.tmdb_base_url {
            config.providers.tmdb_base_url = Some(url);
        }
        if let Some(url) = file.providers.omdb_base_url {
            config.providers.omdb_base_url = Some(url);
        }
        if let Some(secs) = file.providers.request_timeout_secs {
            config.providers.request_timeout = Duration::from_secs(secs);
        }
    }

    fn apply_env(config: &mut Config) -> Result<(), ConfigLoadError> {
        if let Ok(host) = std::env::var("KINODEX_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("KINODEX_PORT") {
            config.server.port = port.parse().map_err(|_| {
                ConfigLoadError::InvalidValue {
                    key: "KINODEX_PORT",
                    value: port,
                }
            })?;
        }
        if let Ok(size) = std::env::var("KINODEX_PAGE_SIZE") {
            config.catalog.page_size = size.parse().map_err(|_| {
                ConfigLoadError::InvalidValue {
                    key: "KINODEX_PAGE_SIZE",
                    value: size,
                }
            })?;
        }
        if let Ok(key) = std::env::var("KINODEX_TMDB_API_KEY") {
            config.providers.tmdb_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("KINODEX_OMDB_API_KEY") {
            config.providers.omdb_api_key = Some(key);
        }
        Ok(())
    }
}
