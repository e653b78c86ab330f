//! Credits lookup cascade.
//!
//! The fallback order is an explicit list of strategies tried until one
//! yields a positive match, so the order itself is testable in isolation.

use kinodex_model::CatalogItem;

use super::providers::{CreditsProvider, ProviderError, ProviderTitle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditsLookup {
    ByExternalId,
    ByAlternateId,
    ByTitleYear,
    ByTitle,
}

impl CreditsLookup {
    /// The cascade, in priority order.
    pub fn cascade() -> &'static [CreditsLookup] {
        &[
            CreditsLookup::ByExternalId,
            CreditsLookup::ByAlternateId,
            CreditsLookup::ByTitleYear,
            CreditsLookup::ByTitle,
        ]
    }

    /// Run one strategy. Strategies whose inputs are absent, and provider
    /// not-found answers, yield `None` so the cascade can continue.
    pub async fn attempt(
        &self,
        provider: &dyn CreditsProvider,
        item: &CatalogItem,
    ) -> Result<Option<ProviderTitle>, ProviderError> {
        let outcome = match self {
            CreditsLookup::ByExternalId => match &item.external_id {
                Some(id) => {
                    provider.find_by_external_id(id, item.kind).await
                }
                None => return Ok(None),
            },
            CreditsLookup::ByAlternateId => match &item.alternate_id {
                Some(id) => {
                    provider.find_by_alternate_id(id, item.kind).await
                }
                None => return Ok(None),
            },
            CreditsLookup::ByTitleYear => match item.year {
                Some(year) => provider
                    .search(&item.name, Some(year), item.kind)
                    .await
                    .map(|results| {
                        pick_search_result(results, Some(year))
                    }),
                None => return Ok(None),
            },
            CreditsLookup::ByTitle => provider
                .search(&item.name, None, item.kind)
                .await
                .map(|results| pick_search_result(results, item.year)),
        };
        match outcome {
            Err(ProviderError::NotFound) => Ok(None),
            other => other,
        }
    }
}

/// Resolve an item to a provider title: first positive hit wins.
pub async fn resolve_title(
    provider: &dyn CreditsProvider,
    item: &CatalogItem,
) -> Result<Option<ProviderTitle>, ProviderError> {
    for strategy in CreditsLookup::cascade() {
        if let Some(hit) = strategy.attempt(provider, item).await? {
            return Ok(Some(hit));
        }
    }
    Ok(None)
}

/// Among multiple search results, prefer the one whose release year matches
/// exactly; otherwise take the first.
pub fn pick_search_result(
    results: Vec<ProviderTitle>,
    year: Option<i32>,
) -> Option<ProviderTitle> {
    if let Some(year) = year
        && let Some(exact) =
            results.iter().find(|result| result.year == Some(year))
    {
        return Some(exact.clone());
    }
    results.into_iter().next()
}
