//! Shared fixtures: an item builder, seeded memory stores, and scripted
//! provider fakes.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{Duration, Utc};
use kinodex_core::enrichment::{
    CreditsProvider, ProviderCredits, ProviderError, ProviderResult,
    ProviderTitle, RatingsProvider,
};
use kinodex_core::store::MemoryCatalogStore;
use kinodex_model::{
    CastMember, CatalogItem, ItemID, ItemKind, Placement, RatingSummary,
};

pub struct ItemBuilder {
    item: CatalogItem,
}

pub fn item(name: &str) -> ItemBuilder {
    let now = Utc::now();
    ItemBuilder {
        item: CatalogItem {
            id: ItemID::new(),
            name: name.to_string(),
            kind: ItemKind::Movie,
            categories: Vec::new(),
            language: None,
            rate: None,
            year: None,
            slug: None,
            order_index: None,
            placement: Placement::Normal,
            is_published: true,
            external_id: None,
            alternate_id: None,
            enrichment: Default::default(),
            created_at: now,
            updated_at: now,
        },
    }
}

impl ItemBuilder {
    pub fn kind(mut self, kind: ItemKind) -> Self {
        self.item.kind = kind;
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.item.categories.push(category.to_string());
        self
    }

    pub fn language(mut self, language: &str) -> Self {
        self.item.language = Some(language.to_string());
        self
    }

    pub fn rate(mut self, rate: &str) -> Self {
        self.item.rate = Some(rate.to_string());
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.item.year = Some(year);
        self
    }

    pub fn slug(mut self, slug: &str) -> Self {
        self.item.slug = Some(slug.to_string());
        self
    }

    pub fn rank(mut self, order_index: i64) -> Self {
        self.item.order_index = Some(order_index);
        self
    }

    pub fn unranked(mut self) -> Self {
        self.item.order_index = None;
        self
    }

    pub fn placement(mut self, placement: Placement) -> Self {
        self.item.placement = placement;
        self
    }

    pub fn unpublished(mut self) -> Self {
        self.item.is_published = false;
        self
    }

    pub fn external_id(mut self, external_id: &str) -> Self {
        self.item.external_id = Some(external_id.to_string());
        self
    }

    pub fn alternate_id(mut self, alternate_id: &str) -> Self {
        self.item.alternate_id = Some(alternate_id.to_string());
        self
    }

    /// Push creation back so rank ties resolve deterministically.
    pub fn created_secs_ago(mut self, secs: i64) -> Self {
        self.item.created_at = Utc::now() - Duration::seconds(secs);
        self.item.updated_at = self.item.created_at;
        self
    }

    pub fn enrichment(
        mut self,
        enrichment: kinodex_model::EnrichmentRecord,
    ) -> Self {
        self.item.enrichment = enrichment;
        self
    }

    pub fn build(self) -> CatalogItem {
        self.item
    }
}

pub fn seeded(items: Vec<CatalogItem>) -> Arc<MemoryCatalogStore> {
    Arc::new(MemoryCatalogStore::with_items(items))
}

/// A normal-partition catalog of `normal` ranked items plus `pinned` pinned
/// items, ranks 1..=n within each partition.
pub fn two_partition_catalog(
    normal: usize,
    pinned: usize,
) -> Vec<CatalogItem> {
    let mut items = Vec::with_capacity(normal + pinned);
    for i in 0..normal {
        items.push(
            item(&format!("Normal {i:03}"))
                .rank(i as i64 + 1)
                .created_secs_ago(i as i64)
                .build(),
        );
    }
    for i in 0..pinned {
        items.push(
            item(&format!("Pinned {i:03}"))
                .placement(Placement::Pinned)
                .rank(i as i64 + 1)
                .created_secs_ago(i as i64)
                .build(),
        );
    }
    items
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailureMode {
    #[default]
    None,
    Timeout,
    Error,
}

impl FailureMode {
    fn as_error(self) -> Option<ProviderError> {
        match self {
            FailureMode::None => None,
            FailureMode::Timeout => Some(ProviderError::Timeout),
            FailureMode::Error => {
                Some(ProviderError::ApiError("scripted failure".into()))
            }
        }
    }
}

/// Scripted credits provider; every lookup channel is a lookup table.
#[derive(Default)]
pub struct FakeCreditsProvider {
    pub by_external_id: HashMap<String, ProviderTitle>,
    pub by_alternate_id: HashMap<String, ProviderTitle>,
    pub search_results: Vec<ProviderTitle>,
    pub credits_by_id: HashMap<String, ProviderCredits>,
    pub failure: FailureMode,
    pub search_calls: AtomicUsize,
    pub credits_calls: AtomicUsize,
}

impl FakeCreditsProvider {
    pub fn with_search_hit(
        provider_id: &str,
        title: &str,
        year: Option<i32>,
    ) -> Self {
        let mut fake = Self::default();
        fake.search_results.push(ProviderTitle {
            provider_id: provider_id.to_string(),
            title: title.to_string(),
            year,
        });
        fake.credits_by_id.insert(
            provider_id.to_string(),
            ProviderCredits {
                cast: vec![CastMember {
                    name: "Lead Actor".into(),
                    character: Some("Protagonist".into()),
                    order: 0,
                }],
                director: Some("A Director".into()),
            },
        );
        fake
    }

    pub fn failing(failure: FailureMode) -> Self {
        Self {
            failure,
            ..Default::default()
        }
    }
}

#[async_trait::async_trait]
impl CreditsProvider for FakeCreditsProvider {
    async fn find_by_external_id(
        &self,
        external_id: &str,
        _kind: ItemKind,
    ) -> ProviderResult<Option<ProviderTitle>> {
        if let Some(err) = self.failure.as_error() {
            return Err(err);
        }
        Ok(self.by_external_id.get(external_id).cloned())
    }

    async fn find_by_alternate_id(
        &self,
        alternate_id: &str,
        _kind: ItemKind,
    ) -> ProviderResult<Option<ProviderTitle>> {
        if let Some(err) = self.failure.as_error() {
            return Err(err);
        }
        Ok(self.by_alternate_id.get(alternate_id).cloned())
    }

    async fn search(
        &self,
        _title: &str,
        year: Option<i32>,
        _kind: ItemKind,
    ) -> ProviderResult<Vec<ProviderTitle>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.failure.as_error() {
            return Err(err);
        }
        Ok(self
            .search_results
            .iter()
            .filter(|result| {
                year.is_none() || result.year == year || result.year.is_none()
            })
            .cloned()
            .collect())
    }

    async fn credits(
        &self,
        provider_id: &str,
        _kind: ItemKind,
    ) -> ProviderResult<ProviderCredits> {
        self.credits_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.failure.as_error() {
            return Err(err);
        }
        self.credits_by_id
            .get(provider_id)
            .cloned()
            .ok_or(ProviderError::NotFound)
    }
}

/// Scripted ratings provider.
#[derive(Default)]
pub struct FakeRatingsProvider {
    pub summary: Option<RatingSummary>,
    pub failure: FailureMode,
    pub calls: AtomicUsize,
}

impl FakeRatingsProvider {
    pub fn with_summary(imdb_rating: &str) -> Self {
        Self {
            summary: Some(RatingSummary {
                imdb_rating: Some(imdb_rating.to_string()),
                imdb_votes: Some("1,234".into()),
                metascore: None,
            }),
            ..Default::default()
        }
    }
}

#[async_trait::async_trait]
impl RatingsProvider for FakeRatingsProvider {
    async fn find_by_external_id(
        &self,
        _external_id: &str,
    ) -> ProviderResult<Option<RatingSummary>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.failure.as_error() {
            return Err(err);
        }
        Ok(self.summary.clone())
    }

    async fn search(
        &self,
        _title: &str,
        _year: Option<i32>,
    ) -> ProviderResult<Option<RatingSummary>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.failure.as_error() {
            return Err(err);
        }
        Ok(self.summary.clone())
    }
}
