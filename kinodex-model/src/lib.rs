//! Core data model definitions shared across Kinodex crates.
#![allow(missing_docs)]

pub mod decade;
pub mod enrichment;
pub mod error;
pub mod ids;
pub mod item;

// Intentionally curated re-exports for downstream consumers.
pub use decade::Decade;
pub use enrichment::{
    CacheState, CastMember, EnrichmentRecord, RatingSummary,
};
pub use error::{ModelError, Result as ModelResult};
pub use ids::ItemID;
pub use item::{CatalogItem, ItemKind, Placement};
