//! Kinodex catalog engine.
//!
//! The heart of the backend: two-partition listing assembly, slot-preserving
//! page reorders, catalog-wide moves, slug assignment, and the lazy
//! enrichment cache. Everything talks to the backing document store through
//! the narrow [`store::CatalogStore`] port.
#![allow(missing_docs)]

pub mod api_types;
pub mod catalog;
pub mod enrichment;
pub mod error;
pub mod store;

pub use catalog::{
    CatalogService, ListingAssembler, ListingPage, OrderIndexer,
    PageReorderer, PagesMover, SlugAssigner, slugify,
};
pub use enrichment::{
    CachePolicy, CreditsProvider, EnrichmentService, ProviderError,
    RatingsProvider,
};
pub use error::{CatalogError, Result};
pub use store::{
    CatalogStore, DistinctField, ItemFilter, ItemPatch, ItemSort,
    MemoryCatalogStore, WriteOp,
};
