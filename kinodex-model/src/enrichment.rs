use chrono::{DateTime, Duration, Utc};

/// One cast credit, as cached from the credits provider.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastMember {
    pub name: String,
    pub character: Option<String>,
    /// Billing order as reported by the provider.
    pub order: u32,
}

/// Third-party rating fields, as cached from the ratings provider.
#[derive(
    Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub imdb_rating: Option<String>,
    pub imdb_votes: Option<String>,
    pub metascore: Option<String>,
}

impl RatingSummary {
    pub fn is_empty(&self) -> bool {
        self.imdb_rating.is_none()
            && self.imdb_votes.is_none()
            && self.metascore.is_none()
    }
}

/// Externally sourced fields embedded in a [`crate::CatalogItem`].
///
/// The credits and ratings sub-caches are independent: each carries its own
/// refresh timestamp and is refreshed under its own TTL. The fingerprint is
/// the identity captured at the last refresh; when the item's current
/// fingerprint differs, both sub-caches are stale regardless of TTL.
#[derive(
    Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentRecord {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    pub director: Option<String>,
    pub credits_refreshed_at: Option<DateTime<Utc>>,
    pub ratings: Option<RatingSummary>,
    pub ratings_refreshed_at: Option<DateTime<Utc>>,
    /// Identity fingerprint (name, year, external id) at last refresh.
    pub fingerprint: Option<String>,
}

impl EnrichmentRecord {
    pub fn has_credits(&self) -> bool {
        !self.cast.is_empty() || self.director.is_some()
    }

    pub fn has_ratings(&self) -> bool {
        self.ratings.as_ref().is_some_and(|r| !r.is_empty())
    }

    /// Drop cached values and timestamps, e.g. after an identity change.
    pub fn clear(&mut self) {
        *self = EnrichmentRecord::default();
    }
}

/// Lifecycle of one enrichment sub-cache.
///
/// `Pending` is the in-flight marker the enrichment service holds while a
/// provider call is outstanding; it is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// Never populated, or invalidated by an identity change.
    Empty,
    /// Populated and inside its TTL window.
    Fresh,
    /// Populated but past its TTL, or stamped by a failed refresh.
    Stale,
    /// A refresh attempt is in flight.
    Pending,
}

impl CacheState {
    /// Classify one sub-cache from its stored value, refresh stamp and TTL.
    ///
    /// A missing stamp counts as never-refreshed even when a value exists,
    /// and an identity change overrides everything else.
    pub fn classify(
        has_value: bool,
        refreshed_at: Option<DateTime<Utc>>,
        ttl: Duration,
        identity_changed: bool,
        now: DateTime<Utc>,
    ) -> Self {
        if identity_changed {
            return CacheState::Empty;
        }
        let Some(stamp) = refreshed_at else {
            return if has_value {
                CacheState::Stale
            } else {
                CacheState::Empty
            };
        };
        if now - stamp > ttl {
            CacheState::Stale
        } else if has_value {
            CacheState::Fresh
        } else {
            // Stamped by a failed refresh; fresh enough to skip, but empty.
            CacheState::Fresh
        }
    }

    pub fn needs_refresh(&self) -> bool {
        matches!(self, CacheState::Empty | CacheState::Stale)
    }
}
