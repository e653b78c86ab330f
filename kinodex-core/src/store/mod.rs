//! Document store port.
//!
//! The catalog engine consumes its backing store through this narrow trait:
//! filtered count, filtered range query, get by id or slug, one atomic bulk
//! write, and distinct values. Everything else (indexes, transactions, the
//! wire protocol) belongs to the store implementation.

pub mod memory;

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kinodex_model::{
    CatalogItem, Decade, EnrichmentRecord, ItemID, ItemKind, Placement,
};

use crate::error::Result;

pub use memory::MemoryCatalogStore;

/// Filter predicate for catalog queries.
///
/// All present fields must match (AND), except `browse_by` which is
/// OR-matched against the item's categories.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    pub category: Option<String>,
    /// Decade bucket matched against the item's year.
    pub time: Option<Decade>,
    pub language: Option<String>,
    pub rate: Option<String>,
    pub year: Option<i32>,
    /// OR-matched category list.
    pub browse_by: Vec<String>,
    /// Case-insensitive prefix match on the name.
    pub search: Option<String>,
    pub kind: Option<ItemKind>,
    /// Public listings set this; admin reads leave it false.
    pub published_only: bool,
    /// Partition selector: `Some(true)` pinned, `Some(false)` normal,
    /// `None` both.
    pub pinned: Option<bool>,
    /// Select only items with no order index (repair scan).
    pub missing_order: bool,
    /// Select only items with no cached credits (enrichment sync scope).
    pub missing_credits: bool,
}

impl ItemFilter {
    pub fn with_pinned(mut self, pinned: bool) -> Self {
        self.pinned = Some(pinned);
        self
    }

    /// Evaluate the predicate against one item. Store implementations that
    /// compile filters to native queries must preserve these semantics.
    pub fn matches(&self, item: &CatalogItem) -> bool {
        if self.published_only && !item.is_published {
            return false;
        }
        if let Some(pinned) = self.pinned
            && item.placement.is_pinned() != pinned
        {
            return false;
        }
        if let Some(kind) = self.kind
            && item.kind != kind
        {
            return false;
        }
        if let Some(category) = &self.category
            && !item.categories.iter().any(|c| c.eq_ignore_ascii_case(category))
        {
            return false;
        }
        if !self.browse_by.is_empty()
            && !self.browse_by.iter().any(|wanted| {
                item.categories.iter().any(|c| c.eq_ignore_ascii_case(wanted))
            })
        {
            return false;
        }
        if let Some(language) = &self.language
            && item
                .language
                .as_deref()
                .is_none_or(|l| !l.eq_ignore_ascii_case(language))
        {
            return false;
        }
        if let Some(rate) = &self.rate
            && item.rate.as_deref().is_none_or(|r| !r.eq_ignore_ascii_case(rate))
        {
            return false;
        }
        if let Some(year) = self.year
            && item.year != Some(year)
        {
            return false;
        }
        if let Some(decade) = self.time
            && !item.year.is_some_and(|y| decade.contains(y))
        {
            return false;
        }
        if let Some(prefix) = &self.search {
            let name = item.name.to_lowercase();
            if !name.starts_with(&prefix.to_lowercase()) {
                return false;
            }
        }
        if self.missing_order && item.order_index.is_some() {
            return false;
        }
        if self.missing_credits && item.enrichment.has_credits() {
            return false;
        }
        true
    }
}

/// Sort orders the engine asks of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSort {
    /// Normal-partition listing order: promoted first, then order index
    /// ascending, then created-at descending. Unranked items sort last.
    Curated,
    /// Pinned-partition order: order index ascending, created-at descending.
    Rank,
    /// Order index descending; used to probe the current partition tail.
    RankDesc,
}

impl ItemSort {
    pub fn cmp(&self, a: &CatalogItem, b: &CatalogItem) -> Ordering {
        match self {
            ItemSort::Curated => curated_cmp(a, b),
            ItemSort::Rank => rank_cmp(a, b),
            ItemSort::RankDesc => rank_cmp(b, a),
        }
    }
}

fn effective_rank(item: &CatalogItem) -> i64 {
    item.order_index.unwrap_or(i64::MAX)
}

/// Composite listing order for the normal partition.
pub fn curated_cmp(a: &CatalogItem, b: &CatalogItem) -> Ordering {
    b.placement
        .is_promoted()
        .cmp(&a.placement.is_promoted())
        .then_with(|| rank_cmp(a, b))
}

/// Rank order shared by both partitions: order index ascending with
/// unranked items last, ties broken by newest first.
pub fn rank_cmp(a: &CatalogItem, b: &CatalogItem) -> Ordering {
    effective_rank(a)
        .cmp(&effective_rank(b))
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

/// Partial update applied through [`WriteOp::Update`]. `None` leaves the
/// field untouched; the nested `Option` patterns clear optional fields.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub kind: Option<ItemKind>,
    pub categories: Option<Vec<String>>,
    pub language: Option<Option<String>>,
    pub rate: Option<Option<String>>,
    pub year: Option<Option<i32>>,
    pub slug: Option<String>,
    pub order_index: Option<i64>,
    pub placement: Option<Placement>,
    pub is_published: Option<bool>,
    pub external_id: Option<Option<String>>,
    pub alternate_id: Option<Option<String>>,
    pub enrichment: Option<EnrichmentRecord>,
}

impl ItemPatch {
    /// Patch that only moves an item's rank.
    pub fn order(order_index: i64) -> Self {
        Self {
            order_index: Some(order_index),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.kind.is_none()
            && self.categories.is_none()
            && self.language.is_none()
            && self.rate.is_none()
            && self.year.is_none()
            && self.slug.is_none()
            && self.order_index.is_none()
            && self.placement.is_none()
            && self.is_published.is_none()
            && self.external_id.is_none()
            && self.alternate_id.is_none()
            && self.enrichment.is_none()
    }

    pub fn apply(&self, item: &mut CatalogItem, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            item.name = name.clone();
        }
        if let Some(kind) = self.kind {
            item.kind = kind;
        }
        if let Some(categories) = &self.categories {
            item.categories = categories.clone();
        }
        if let Some(language) = &self.language {
            item.language = language.clone();
        }
        if let Some(rate) = &self.rate {
            item.rate = rate.clone();
        }
        if let Some(year) = self.year {
            item.year = year;
        }
        if let Some(slug) = &self.slug {
            item.slug = Some(slug.clone());
        }
        if let Some(order_index) = self.order_index {
            item.order_index = Some(order_index);
        }
        if let Some(placement) = self.placement {
            item.placement = placement;
        }
        if let Some(is_published) = self.is_published {
            item.is_published = is_published;
        }
        if let Some(external_id) = &self.external_id {
            item.external_id = external_id.clone();
        }
        if let Some(alternate_id) = &self.alternate_id {
            item.alternate_id = alternate_id.clone();
        }
        if let Some(enrichment) = &self.enrichment {
            item.enrichment = enrichment.clone();
        }
        item.updated_at = now;
    }
}

/// One entry of an atomic bulk write.
#[derive(Debug, Clone)]
pub enum WriteOp {
    Insert(Box<CatalogItem>),
    Update { id: ItemID, patch: ItemPatch },
    Delete(ItemID),
}

/// Fields the distinct-values query can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistinctField {
    Category,
    Language,
    Rate,
}

/// The document store as the catalog engine consumes it.
///
/// `bulk_write` applies all operations in one atomic multi-document call;
/// it is *not* a transaction, and a crash mid-batch may leave a partially
/// applied write. The order repair pass recovers from that.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn count(&self, filter: &ItemFilter) -> Result<u64>;

    async fn find(
        &self,
        filter: &ItemFilter,
        sort: ItemSort,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<CatalogItem>>;

    async fn get(&self, id: &ItemID) -> Result<Option<CatalogItem>>;

    async fn get_by_slug(&self, slug: &str) -> Result<Option<CatalogItem>>;

    /// Apply all operations atomically; returns the number of documents
    /// that matched (updates of unknown ids count zero, like a document
    /// store's matched count).
    async fn bulk_write(&self, ops: Vec<WriteOp>) -> Result<u64>;

    async fn distinct(
        &self,
        field: DistinctField,
        filter: &ItemFilter,
    ) -> Result<Vec<String>>;
}
