//! Wire-level request and response types shared by the server handlers.
//!
//! Field names follow the public API (camelCase); the legacy flag names
//! `latest` and `previousHit` are kept on the wire for compatibility and
//! map onto [`Placement`] internally.

use kinodex_model::{Decade, ItemID, ItemKind, Placement};

use crate::catalog::reorder::MoveOutcome;
use crate::error::{CatalogError, Result};
use crate::store::ItemFilter;

/// Listing query parameters, public and admin.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListingQuery {
    pub category: Option<String>,
    /// Decade label, e.g. `1990s`.
    pub time: Option<String>,
    pub language: Option<String>,
    pub rate: Option<String>,
    pub year: Option<i32>,
    /// Comma-separated category list, OR-matched.
    pub browse_by: Option<String>,
    /// Case-insensitive name prefix.
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub page_number: Option<u64>,
}

impl ListingQuery {
    pub fn page(&self) -> u64 {
        self.page_number.unwrap_or(1).max(1)
    }

    pub fn to_filter(&self, published_only: bool) -> Result<ItemFilter> {
        let kind = self
            .kind
            .as_deref()
            .map(ItemKind::parse)
            .transpose()?;
        let time = self
            .time
            .as_deref()
            .map(|label| {
                Decade::parse(label).ok_or_else(|| {
                    CatalogError::Validation(format!(
                        "time must be a decade label like 2010s, got {label:?}"
                    ))
                })
            })
            .transpose()?;
        let browse_by = self
            .browse_by
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(|part| part.trim().to_string())
                    .filter(|part| !part.is_empty())
                    .collect()
            })
            .unwrap_or_default();
        Ok(ItemFilter {
            category: self.category.clone(),
            time,
            language: self.language.clone(),
            rate: self.rate.clone(),
            year: self.year,
            browse_by,
            search: self.search.clone(),
            kind,
            published_only,
            ..Default::default()
        })
    }
}

/// Payload for creating an item.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(default)]
    pub categories: Vec<String>,
    pub language: Option<String>,
    pub rate: Option<String>,
    pub year: Option<i32>,
    /// Legacy wire name for the promoted flag.
    #[serde(default, rename = "latest")]
    pub promoted: bool,
    /// Legacy wire name for the pinned flag.
    #[serde(default, rename = "previousHit")]
    pub pinned: bool,
    pub is_published: Option<bool>,
    pub external_id: Option<String>,
    pub alternate_id: Option<String>,
}

impl ItemDraft {
    /// Resolve the boolean pair, rejecting promoted-and-pinned.
    pub fn placement(&self) -> Result<Placement> {
        Ok(Placement::from_flags(self.promoted, self.pinned)?)
    }
}

/// Partial update payload; absent fields stay untouched.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemUpdate {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ItemKind>,
    pub categories: Option<Vec<String>>,
    pub language: Option<String>,
    pub rate: Option<String>,
    pub year: Option<i32>,
    #[serde(rename = "latest")]
    pub promoted: Option<bool>,
    #[serde(rename = "previousHit")]
    pub pinned: Option<bool>,
    pub is_published: Option<bool>,
    pub external_id: Option<String>,
    pub alternate_id: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub page_number: u64,
    pub ordered_ids: Vec<ItemID>,
    /// Optional filter matching the admin view the page was rendered under.
    #[serde(default)]
    pub query: Option<ListingQuery>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderResponse {
    pub reordered_count: u64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub target_page: u64,
    pub movie_ids: Vec<ItemID>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    pub total: u64,
    pub target_page: u64,
    pub moved_count: u64,
}

impl From<MoveOutcome> for MoveResponse {
    fn from(outcome: MoveOutcome) -> Self {
        Self {
            total: outcome.total,
            target_page: outcome.target_page,
            moved_count: outcome.moved_count,
        }
    }
}

/// Per-item failure inside a partial-failure-tolerant bulk operation.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkItemError {
    pub id: ItemID,
    pub message: String,
}

/// Per-entry failure in a bulk create, keyed by input position.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkIndexError {
    pub index: usize,
    pub message: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlugRegenResponse {
    pub updated_count: u64,
    pub errors: Vec<BulkItemError>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCreateRequest {
    pub items: Vec<ItemDraft>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkCreateResponse {
    pub created_count: u64,
    pub errors: Vec<BulkIndexError>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairResponse {
    pub repaired_count: u64,
}

/// Distinct attribute values for the browse UI.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub categories: Vec<String>,
    pub languages: Vec<String>,
    pub rates: Vec<String>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnrichmentSyncRequest {
    pub movie_ids: Option<Vec<ItemID>>,
    pub only_missing: bool,
    pub force: bool,
    pub limit: Option<u64>,
    pub cast_limit: Option<usize>,
}

/// Why a sync entry did or did not update.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SyncReason {
    Ok,
    NotFound,
    Timeout,
    Error,
    Fresh,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub id: ItemID,
    pub updated: bool,
    pub reason: SyncReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browse_by_splits_and_trims() {
        let query = ListingQuery {
            browse_by: Some("action, drama ,,thriller".into()),
            ..Default::default()
        };
        let filter = query.to_filter(true).unwrap();
        assert_eq!(filter.browse_by, vec!["action", "drama", "thriller"]);
        assert!(filter.published_only);
    }

    #[test]
    fn bad_type_and_time_are_validation_errors() {
        let query = ListingQuery {
            kind: Some("podcast".into()),
            ..Default::default()
        };
        assert!(matches!(
            query.to_filter(true),
            Err(CatalogError::Validation(_))
        ));

        let query = ListingQuery {
            time: Some("ancient".into()),
            ..Default::default()
        };
        assert!(matches!(
            query.to_filter(true),
            Err(CatalogError::Validation(_))
        ));
    }

    #[test]
    fn reorder_request_round_trips_with_embedded_query() {
        let request = ReorderRequest {
            page_number: 2,
            ordered_ids: vec![ItemID::new()],
            query: Some(ListingQuery {
                search: Some("no".into()),
                ..Default::default()
            }),
        };
        let raw = serde_json::to_string(&request).unwrap();
        assert!(raw.contains("\"pageNumber\":2"));
        assert!(raw.contains("\"search\":\"no\""));
        let back: ReorderRequest = serde_json::from_str(&raw).unwrap();
        assert_eq!(back.ordered_ids, request.ordered_ids);
    }

    #[test]
    fn sync_reason_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&SyncReason::NotFound).unwrap(),
            "\"not_found\""
        );
        assert_eq!(
            serde_json::to_string(&SyncReason::Ok).unwrap(),
            "\"ok\""
        );
    }
}
