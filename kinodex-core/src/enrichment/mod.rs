//! Lazy metadata enrichment.
//!
//! Two independent sub-caches per item (credits and ratings), each refreshed
//! under its own TTL, both invalidated when the item's identity fingerprint
//! changes. Refresh happens opportunistically on detail reads and on demand
//! through the admin sync endpoint; provider failures are recorded in the
//! per-item reason and never surfaced to callers.

pub mod lookup;
pub mod providers;
pub mod remote;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use kinodex_model::{CacheState, CatalogItem, RatingSummary};
use tracing::{debug, warn};

use crate::api_types::{EnrichmentSyncRequest, SyncReason, SyncResult};
use crate::error::Result;
use crate::store::{CatalogStore, ItemFilter, ItemPatch, ItemSort, WriteOp};

pub use lookup::{CreditsLookup, pick_search_result, resolve_title};
pub use providers::{
    CreditsProvider, DisabledProvider, ProviderCredits, ProviderError,
    ProviderResult, ProviderTitle, RatingsProvider,
};
pub use remote::{OmdbRatingsClient, TmdbCreditsClient};

/// TTLs and caps governing the enrichment caches.
#[derive(Debug, Clone, Copy)]
pub struct CachePolicy {
    pub credits_ttl: Duration,
    pub ratings_ttl: Duration,
    /// Hard cap on one forced-sync batch, protecting provider rate limits.
    pub sync_batch_cap: usize,
    /// Default number of cast entries kept per item.
    pub cast_limit: usize,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            credits_ttl: Duration::days(7),
            ratings_ttl: Duration::days(3),
            sync_batch_cap: 25,
            cast_limit: 12,
        }
    }
}

impl CachePolicy {
    /// Build from the day-granular knobs the server config exposes.
    pub fn from_days(
        credits_ttl_days: i64,
        ratings_ttl_days: i64,
        sync_batch_cap: usize,
        cast_limit: usize,
    ) -> Self {
        Self {
            credits_ttl: Duration::days(credits_ttl_days),
            ratings_ttl: Duration::days(ratings_ttl_days),
            sync_batch_cap,
            cast_limit,
        }
    }
}

pub struct EnrichmentService {
    store: Arc<dyn CatalogStore>,
    credits: Arc<dyn CreditsProvider>,
    ratings: Arc<dyn RatingsProvider>,
    policy: CachePolicy,
}

impl EnrichmentService {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        credits: Arc<dyn CreditsProvider>,
        ratings: Arc<dyn RatingsProvider>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            store,
            credits,
            ratings,
            policy,
        }
    }

    fn identity_changed(item: &CatalogItem) -> bool {
        match &item.enrichment.fingerprint {
            Some(fingerprint) => *fingerprint != item.fingerprint(),
            None => false,
        }
    }

    pub fn credits_state(
        &self,
        item: &CatalogItem,
        now: DateTime<Utc>,
    ) -> CacheState {
        CacheState::classify(
            item.enrichment.has_credits(),
            item.enrichment.credits_refreshed_at,
            self.policy.credits_ttl,
            Self::identity_changed(item),
            now,
        )
    }

    pub fn ratings_state(
        &self,
        item: &CatalogItem,
        now: DateTime<Utc>,
    ) -> CacheState {
        CacheState::classify(
            item.enrichment.has_ratings(),
            item.enrichment.ratings_refreshed_at,
            self.policy.ratings_ttl,
            Self::identity_changed(item),
            now,
        )
    }

    /// Refresh whichever sub-caches need it and persist the result.
    ///
    /// Never raises: provider failures stamp the refresh timestamp anyway
    /// (so an unmatched title is not hammered on every read) and the
    /// existing cached value is returned. Store write failures are logged
    /// and swallowed for the same reason.
    pub async fn refresh_item(
        &self,
        item: &CatalogItem,
        force: bool,
        cast_limit: Option<usize>,
    ) -> (CatalogItem, bool, SyncReason) {
        let now = Utc::now();
        let credits_state = self.credits_state(item, now);
        let ratings_state = self.ratings_state(item, now);
        let refresh_credits = force || credits_state.needs_refresh();
        let refresh_ratings = force || ratings_state.needs_refresh();
        if !refresh_credits && !refresh_ratings {
            return (item.clone(), false, SyncReason::Fresh);
        }

        let mut updated_item = item.clone();
        if Self::identity_changed(item) {
            updated_item.enrichment.clear();
        }
        let captured_external = updated_item.external_id.clone();
        let cast_limit = cast_limit.unwrap_or(self.policy.cast_limit);
        let mut updated = false;
        let mut reason = SyncReason::Fresh;

        if refresh_credits {
            debug!(
                item = %item.id,
                from = ?credits_state,
                to = ?CacheState::Pending,
                "refreshing credits cache"
            );
            match self.fetch_credits(&updated_item, cast_limit).await {
                Ok(Some((matched, credits))) => {
                    updated_item.enrichment.cast = credits.cast;
                    updated_item.enrichment.director = credits.director;
                    if updated_item.external_id.is_none() {
                        updated_item.external_id =
                            Some(matched.provider_id);
                    }
                    updated = true;
                    reason = SyncReason::Ok;
                }
                Ok(None) | Err(ProviderError::NotFound) => {
                    reason = SyncReason::NotFound;
                }
                Err(ProviderError::Timeout) => {
                    warn!(item = %item.id, "credits refresh timed out");
                    reason = SyncReason::Timeout;
                }
                Err(err) => {
                    warn!(item = %item.id, error = %err, "credits refresh failed");
                    reason = SyncReason::Error;
                }
            }
            updated_item.enrichment.credits_refreshed_at = Some(now);
        }

        if refresh_ratings {
            debug!(
                item = %item.id,
                from = ?ratings_state,
                to = ?CacheState::Pending,
                "refreshing ratings cache"
            );
            match self.fetch_ratings(&updated_item).await {
                Ok(Some(summary)) if !summary.is_empty() => {
                    updated_item.enrichment.ratings = Some(summary);
                    updated = true;
                    if !refresh_credits {
                        reason = SyncReason::Ok;
                    }
                }
                Ok(_) | Err(ProviderError::NotFound) => {
                    if !refresh_credits {
                        reason = SyncReason::NotFound;
                    }
                }
                Err(ProviderError::Timeout) => {
                    warn!(item = %item.id, "ratings refresh timed out");
                    if !refresh_credits {
                        reason = SyncReason::Timeout;
                    }
                }
                Err(err) => {
                    warn!(item = %item.id, error = %err, "ratings refresh failed");
                    if !refresh_credits {
                        reason = SyncReason::Error;
                    }
                }
            }
            updated_item.enrichment.ratings_refreshed_at = Some(now);
        }

        updated_item.enrichment.fingerprint =
            Some(updated_item.fingerprint());

        let patch = ItemPatch {
            enrichment: Some(updated_item.enrichment.clone()),
            external_id: (updated_item.external_id != captured_external)
                .then(|| updated_item.external_id.clone()),
            ..Default::default()
        };
        if let Err(err) = self
            .store
            .bulk_write(vec![WriteOp::Update {
                id: item.id,
                patch,
            }])
            .await
        {
            warn!(item = %item.id, error = %err, "failed to persist enrichment");
        }

        (updated_item, updated, reason)
    }

    async fn fetch_credits(
        &self,
        item: &CatalogItem,
        cast_limit: usize,
    ) -> ProviderResult<Option<(ProviderTitle, ProviderCredits)>> {
        let Some(matched) =
            resolve_title(self.credits.as_ref(), item).await?
        else {
            return Ok(None);
        };
        let mut credits = self
            .credits
            .credits(&matched.provider_id, item.kind)
            .await?;
        credits.cast.truncate(cast_limit);
        Ok(Some((matched, credits)))
    }

    async fn fetch_ratings(
        &self,
        item: &CatalogItem,
    ) -> ProviderResult<Option<RatingSummary>> {
        if let Some(alternate_id) = &item.alternate_id {
            match self.ratings.find_by_external_id(alternate_id).await {
                Ok(Some(summary)) => return Ok(Some(summary)),
                Ok(None) | Err(ProviderError::NotFound) => {}
                Err(err) => return Err(err),
            }
        }
        match self.ratings.search(&item.name, item.year).await {
            Err(ProviderError::NotFound) => Ok(None),
            other => other,
        }
    }

    /// Admin-triggered sync. Bypasses the TTL with `force`, scopes to an id
    /// list or to items missing credits, and is capped at the policy's
    /// batch size regardless of the requested limit.
    pub async fn sync(
        &self,
        request: &EnrichmentSyncRequest,
    ) -> Result<Vec<SyncResult>> {
        let cap = self.policy.sync_batch_cap as u64;
        let limit = request.limit.unwrap_or(cap).clamp(1, cap);
        let mut results = Vec::new();

        let targets: Vec<CatalogItem> = match &request.movie_ids {
            Some(ids) => {
                let mut items = Vec::new();
                for id in ids.iter().take(limit as usize) {
                    match self.store.get(id).await? {
                        Some(item) => items.push(item),
                        None => results.push(SyncResult {
                            id: *id,
                            updated: false,
                            reason: SyncReason::NotFound,
                        }),
                    }
                }
                items
            }
            None => {
                let filter = ItemFilter {
                    missing_credits: true,
                    ..Default::default()
                };
                self.store.find(&filter, ItemSort::Rank, 0, limit).await?
            }
        };

        for item in targets {
            if request.only_missing && item.enrichment.has_credits() {
                results.push(SyncResult {
                    id: item.id,
                    updated: false,
                    reason: SyncReason::Fresh,
                });
                continue;
            }
            let (_, updated, reason) = self
                .refresh_item(&item, request.force, request.cast_limit)
                .await;
            results.push(SyncResult {
                id: item.id,
                updated,
                reason,
            });
        }
        Ok(results)
    }
}
