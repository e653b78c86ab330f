//! The catalog engine: listing assembly, ordering, slugs, CRUD.

pub mod listing;
pub mod order;
pub mod reorder;
pub mod slug;

use std::sync::Arc;

use chrono::Utc;
use kinodex_model::{CatalogItem, EnrichmentRecord, ItemID, Placement};
use tracing::debug;

use crate::api_types::{
    BulkCreateResponse, BulkIndexError, BulkItemError, FilterOptions,
    ItemDraft, ItemUpdate, ListingQuery, MoveRequest, MoveResponse,
    ReorderRequest, ReorderResponse, RepairResponse, SlugRegenResponse,
};
use crate::error::{CatalogError, Result};
use crate::store::{
    CatalogStore, DistinctField, ItemFilter, ItemPatch, WriteOp,
};

pub use listing::{ListingAssembler, ListingPage};
pub use order::OrderIndexer;
pub use reorder::{MoveOutcome, PageReorderer, PagesMover};
pub use slug::{SlugAssigner, slugify};

/// Facade over the catalog engine, shared by all handlers.
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    page_size: u64,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>, page_size: u64) -> Self {
        Self { store, page_size }
    }

    pub fn store(&self) -> Arc<dyn CatalogStore> {
        Arc::clone(&self.store)
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    /// Assemble one listing page. Public reads pass `published_only`.
    pub async fn list(
        &self,
        query: &ListingQuery,
        published_only: bool,
    ) -> Result<ListingPage> {
        let filter = query.to_filter(published_only)?;
        ListingAssembler::new(self.store.as_ref(), self.page_size)
            .assemble(&filter, query.page())
            .await
    }

    /// Detail lookup by canonical id or by slug.
    pub async fn get_by_id_or_slug(&self, key: &str) -> Result<CatalogItem> {
        if let Some(id) = ItemID::parse(key)
            && let Some(item) = self.store.get(&id).await?
        {
            return Ok(item);
        }
        self.store.get_by_slug(key).await?.ok_or_else(|| {
            CatalogError::NotFound(format!("item {key:?} not found"))
        })
    }

    /// Create an item: validate placement, derive a unique slug, place at
    /// the tail of its partition.
    pub async fn create(&self, draft: ItemDraft) -> Result<CatalogItem> {
        if draft.name.trim().is_empty() {
            return Err(CatalogError::Validation(
                "name must not be empty".into(),
            ));
        }
        let placement = draft.placement()?;
        let id = ItemID::new();
        let slug = SlugAssigner::new(self.store.as_ref())
            .assign(&id, &draft.name)
            .await?;
        let order_index = OrderIndexer::new(self.store.as_ref())
            .next_rank(placement)
            .await?;
        let now = Utc::now();
        let item = CatalogItem {
            id,
            name: draft.name,
            kind: draft.kind,
            categories: draft.categories,
            language: draft.language,
            rate: draft.rate,
            year: draft.year,
            slug: Some(slug),
            order_index: Some(order_index),
            placement,
            is_published: draft.is_published.unwrap_or(true),
            external_id: draft.external_id,
            alternate_id: draft.alternate_id,
            enrichment: EnrichmentRecord::default(),
            created_at: now,
            updated_at: now,
        };
        self.store
            .bulk_write(vec![WriteOp::Insert(Box::new(item.clone()))])
            .await?;
        debug!(%id, slug = ?item.slug, "created catalog item");
        Ok(item)
    }

    /// Update an item. Regenerates the slug when name or year changed,
    /// re-ranks on partition change, and clears the enrichment cache when
    /// the identity fingerprint changed.
    pub async fn update(
        &self,
        id: &ItemID,
        update: ItemUpdate,
    ) -> Result<CatalogItem> {
        let current = self.store.get(id).await?.ok_or_else(|| {
            CatalogError::NotFound(format!("item {id} not found"))
        })?;

        let new_name = update.name.clone().unwrap_or_else(|| {
            current.name.clone()
        });
        if new_name.trim().is_empty() {
            return Err(CatalogError::Validation(
                "name must not be empty".into(),
            ));
        }
        let new_year = update.year.or(current.year);

        let placement = match (update.promoted, update.pinned) {
            (None, None) => None,
            (promoted, pinned) => Some(Placement::from_flags(
                promoted.unwrap_or(current.placement.is_promoted()),
                pinned.unwrap_or(current.placement.is_pinned()),
            )?),
        };

        let mut patch = ItemPatch {
            name: update.name,
            kind: update.kind,
            categories: update.categories,
            language: update.language.map(Some),
            rate: update.rate.map(Some),
            year: update.year.map(Some),
            is_published: update.is_published,
            external_id: update.external_id.map(Some),
            alternate_id: update.alternate_id.map(Some),
            ..Default::default()
        };

        if SlugAssigner::needs_regeneration(&current, &new_name, new_year) {
            patch.slug = Some(
                SlugAssigner::new(self.store.as_ref())
                    .assign(id, &new_name)
                    .await?,
            );
        }

        if let Some(placement) = placement {
            patch.placement = Some(placement);
            // Crossing partitions invalidates the old rank; append to the
            // target partition's tail.
            if placement.is_pinned() != current.placement.is_pinned() {
                patch.order_index = Some(
                    OrderIndexer::new(self.store.as_ref())
                        .next_rank(placement)
                        .await?,
                );
            }
        }

        let now = Utc::now();
        let mut preview = current.clone();
        patch.apply(&mut preview, now);
        if preview.fingerprint() != current.fingerprint() {
            patch.enrichment = Some(EnrichmentRecord::default());
            preview.enrichment = EnrichmentRecord::default();
        }

        self.store
            .bulk_write(vec![WriteOp::Update { id: *id, patch }])
            .await?;
        Ok(preview)
    }

    pub async fn delete(&self, id: &ItemID) -> Result<()> {
        if self.store.get(id).await?.is_none() {
            return Err(CatalogError::NotFound(format!(
                "item {id} not found"
            )));
        }
        self.store.bulk_write(vec![WriteOp::Delete(*id)]).await?;
        Ok(())
    }

    /// Bulk create; each entry is processed independently and failures are
    /// collected instead of aborting the batch.
    pub async fn create_bulk(
        &self,
        drafts: Vec<ItemDraft>,
    ) -> Result<BulkCreateResponse> {
        let mut created_count = 0u64;
        let mut errors = Vec::new();
        for (index, draft) in drafts.into_iter().enumerate() {
            match self.create(draft).await {
                Ok(_) => created_count += 1,
                Err(err) => errors.push(BulkIndexError {
                    index,
                    message: err.to_string(),
                }),
            }
        }
        Ok(BulkCreateResponse {
            created_count,
            errors,
        })
    }

    /// Permute one page's rank slots; all-or-nothing per call.
    pub async fn reorder_page(
        &self,
        request: &ReorderRequest,
    ) -> Result<ReorderResponse> {
        let filter = match &request.query {
            Some(query) => query.to_filter(false)?,
            None => ItemFilter::default(),
        };
        let reordered_count =
            PageReorderer::new(self.store.as_ref(), self.page_size)
                .reorder(&filter, request.page_number, &request.ordered_ids)
                .await?;
        Ok(ReorderResponse { reordered_count })
    }

    /// Relocate items to a target page, renumbering the catalog.
    pub async fn move_to_page(
        &self,
        request: &MoveRequest,
    ) -> Result<MoveResponse> {
        let outcome = PagesMover::new(self.store.as_ref(), self.page_size)
            .move_to_page(request.target_page, &request.movie_ids)
            .await?;
        Ok(outcome.into())
    }

    /// Regenerate every item's slug from its current name, keeping slugs
    /// unique. Items are processed independently so earlier writes are
    /// visible to later collision probes.
    pub async fn regenerate_slugs(&self) -> Result<SlugRegenResponse> {
        let assembler =
            ListingAssembler::new(self.store.as_ref(), self.page_size);
        let all = assembler.load_global_order(&ItemFilter::default()).await?;
        let assigner = SlugAssigner::new(self.store.as_ref());
        let mut updated_count = 0u64;
        let mut errors = Vec::new();
        for item in all {
            let outcome: Result<bool> = async {
                let slug = assigner.assign(&item.id, &item.name).await?;
                if item.slug.as_deref() == Some(slug.as_str()) {
                    return Ok(false);
                }
                self.store
                    .bulk_write(vec![WriteOp::Update {
                        id: item.id,
                        patch: ItemPatch {
                            slug: Some(slug),
                            ..Default::default()
                        },
                    }])
                    .await?;
                Ok(true)
            }
            .await;
            match outcome {
                Ok(true) => updated_count += 1,
                Ok(false) => {}
                Err(err) => errors.push(BulkItemError {
                    id: item.id,
                    message: err.to_string(),
                }),
            }
        }
        Ok(SlugRegenResponse {
            updated_count,
            errors,
        })
    }

    /// Run the order repair pass.
    pub async fn repair_order(&self) -> Result<RepairResponse> {
        let repaired_count = OrderIndexer::new(self.store.as_ref())
            .repair(self.page_size)
            .await?;
        Ok(RepairResponse { repaired_count })
    }

    /// Distinct attribute values for the browse UI.
    pub async fn filter_options(
        &self,
        published_only: bool,
    ) -> Result<FilterOptions> {
        let filter = ItemFilter {
            published_only,
            ..Default::default()
        };
        Ok(FilterOptions {
            categories: self
                .store
                .distinct(DistinctField::Category, &filter)
                .await?,
            languages: self
                .store
                .distinct(DistinctField::Language, &filter)
                .await?,
            rates: self.store.distinct(DistinctField::Rate, &filter).await?,
        })
    }
}
