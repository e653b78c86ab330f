use chrono::{DateTime, Utc};

use crate::enrichment::EnrichmentRecord;
use crate::error::ModelError;
use crate::ids::ItemID;

/// Simple enum for catalog item kinds
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Movie item kind
    Movie,
    /// Series item kind
    Series,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::Movie => write!(f, "movie"),
            ItemKind::Series => write!(f, "series"),
        }
    }
}

impl ItemKind {
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "movie" => Ok(ItemKind::Movie),
            "series" => Ok(ItemKind::Series),
            other => Err(ModelError::InvalidKind(format!(
                "expected movie or series, got {other:?}"
            ))),
        }
    }
}

/// Where an item sits in the curated listing.
///
/// A single variant replaces the legacy `latest`/`previousHit` boolean pair,
/// so "promoted and pinned at once" cannot be represented at all.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default,
    serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Ordinary member of the normal partition.
    #[default]
    Normal,
    /// Sorted to the front of the normal partition.
    Promoted,
    /// Member of the secondary partition, appended after all normal items.
    Pinned,
}

impl Placement {
    /// Build from the wire-level boolean pair, rejecting the invalid
    /// promoted-and-pinned combination.
    pub fn from_flags(
        promoted: bool,
        pinned: bool,
    ) -> Result<Self, ModelError> {
        match (promoted, pinned) {
            (true, true) => Err(ModelError::InvalidPlacement(
                "an item cannot be both promoted and pinned".into(),
            )),
            (true, false) => Ok(Placement::Promoted),
            (false, true) => Ok(Placement::Pinned),
            (false, false) => Ok(Placement::Normal),
        }
    }

    pub fn is_promoted(&self) -> bool {
        matches!(self, Placement::Promoted)
    }

    pub fn is_pinned(&self) -> bool {
        matches!(self, Placement::Pinned)
    }
}

/// A movie or series entry in the catalog.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: ItemID,
    pub name: String,
    pub kind: ItemKind,
    #[serde(default)]
    pub categories: Vec<String>,
    pub language: Option<String>,
    /// Age/content rating tag, e.g. "PG-13".
    pub rate: Option<String>,
    pub year: Option<i32>,
    /// URL-safe identifier derived from the name; unique across the catalog.
    pub slug: Option<String>,
    /// Manual rank within the item's partition. `None` marks a legacy item
    /// that predates ordering and is waiting for the repair pass.
    pub order_index: Option<i64>,
    #[serde(default)]
    pub placement: Placement,
    pub is_published: bool,
    /// Credits-provider id, admin supplied or captured from a search match.
    pub external_id: Option<String>,
    /// Alternate identifier (e.g. an IMDb id) for fallback lookups.
    pub alternate_id: Option<String>,
    #[serde(default)]
    pub enrichment: EnrichmentRecord,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CatalogItem {
    /// Identity fingerprint over (name, year, external id). A change in any
    /// component force-invalidates cached enrichment data.
    pub fn fingerprint(&self) -> String {
        format!(
            "{}|{}|{}",
            self.name.trim().to_lowercase(),
            self.year.map(|y| y.to_string()).unwrap_or_default(),
            self.external_id.as_deref().unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placement_rejects_promoted_and_pinned() {
        assert!(Placement::from_flags(true, true).is_err());
        assert_eq!(
            Placement::from_flags(true, false).unwrap(),
            Placement::Promoted
        );
        assert_eq!(
            Placement::from_flags(false, true).unwrap(),
            Placement::Pinned
        );
        assert_eq!(
            Placement::from_flags(false, false).unwrap(),
            Placement::Normal
        );
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!(ItemKind::parse("Movie").unwrap(), ItemKind::Movie);
        assert_eq!(ItemKind::parse(" series ").unwrap(), ItemKind::Series);
        assert!(ItemKind::parse("podcast").is_err());
    }
}
