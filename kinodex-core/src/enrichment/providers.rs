//! External metadata provider ports.

use async_trait::async_trait;
use kinodex_model::{CastMember, ItemKind, RatingSummary};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Not found")]
    NotFound,

    #[error("Request timed out")]
    Timeout,

    #[error("Rate limited")]
    RateLimited,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// A title as the credits provider knows it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderTitle {
    pub provider_id: String,
    pub title: String,
    pub year: Option<i32>,
}

/// Credits for one resolved title.
#[derive(Debug, Clone, Default)]
pub struct ProviderCredits {
    pub cast: Vec<CastMember>,
    pub director: Option<String>,
}

/// Cast/director source (TMDB-shaped).
#[async_trait]
pub trait CreditsProvider: Send + Sync {
    /// Direct lookup by the provider's own id.
    async fn find_by_external_id(
        &self,
        external_id: &str,
        kind: ItemKind,
    ) -> ProviderResult<Option<ProviderTitle>>;

    /// Lookup by an alternate identifier (e.g. IMDb id).
    async fn find_by_alternate_id(
        &self,
        alternate_id: &str,
        kind: ItemKind,
    ) -> ProviderResult<Option<ProviderTitle>>;

    /// Title search, optionally constrained to a release year.
    async fn search(
        &self,
        title: &str,
        year: Option<i32>,
        kind: ItemKind,
    ) -> ProviderResult<Vec<ProviderTitle>>;

    /// Fetch credits for a previously resolved provider id.
    async fn credits(
        &self,
        provider_id: &str,
        kind: ItemKind,
    ) -> ProviderResult<ProviderCredits>;
}

/// Third-party ratings source (OMDb-shaped).
#[async_trait]
pub trait RatingsProvider: Send + Sync {
    async fn find_by_external_id(
        &self,
        external_id: &str,
    ) -> ProviderResult<Option<RatingSummary>>;

    async fn search(
        &self,
        title: &str,
        year: Option<i32>,
    ) -> ProviderResult<Option<RatingSummary>>;
}

/// Stand-in for deployments without provider credentials: every lookup
/// misses, so caches fill with failure stamps and nothing is hammered.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledProvider;

#[async_trait]
impl CreditsProvider for DisabledProvider {
    async fn find_by_external_id(
        &self,
        _external_id: &str,
        _kind: ItemKind,
    ) -> ProviderResult<Option<ProviderTitle>> {
        Ok(None)
    }

    async fn find_by_alternate_id(
        &self,
        _alternate_id: &str,
        _kind: ItemKind,
    ) -> ProviderResult<Option<ProviderTitle>> {
        Ok(None)
    }

    async fn search(
        &self,
        _title: &str,
        _year: Option<i32>,
        _kind: ItemKind,
    ) -> ProviderResult<Vec<ProviderTitle>> {
        Ok(Vec::new())
    }

    async fn credits(
        &self,
        _provider_id: &str,
        _kind: ItemKind,
    ) -> ProviderResult<ProviderCredits> {
        Err(ProviderError::NotFound)
    }
}

#[async_trait]
impl RatingsProvider for DisabledProvider {
    async fn find_by_external_id(
        &self,
        _external_id: &str,
    ) -> ProviderResult<Option<RatingSummary>> {
        Ok(None)
    }

    async fn search(
        &self,
        _title: &str,
        _year: Option<i32>,
    ) -> ProviderResult<Option<RatingSummary>> {
        Ok(None)
    }
}
