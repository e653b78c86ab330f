//! Two-partition page assembly.
//!
//! A page is the normal partition (promoted first, then rank) followed by
//! the pinned partition (rank order), sliced to a fixed window. Counts and
//! range reads are separate store calls with no snapshot isolation; under
//! concurrent admin writes a page pair may transiently overlap or skip an
//! item, which self-heals on the next read.

use kinodex_model::CatalogItem;

use crate::error::Result;
use crate::store::{CatalogStore, ItemFilter, ItemSort};

/// One assembled page plus listing totals.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    pub items: Vec<CatalogItem>,
    pub page: u64,
    pub total_pages: u64,
    pub total_count: u64,
}

pub struct ListingAssembler<'a> {
    store: &'a dyn CatalogStore,
    page_size: u64,
}

impl<'a> ListingAssembler<'a> {
    pub fn new(store: &'a dyn CatalogStore, page_size: u64) -> Self {
        debug_assert!(page_size > 0);
        Self { store, page_size }
    }

    /// Assemble page `page` (1-based) under `filter`.
    ///
    /// Out-of-range pages return an empty item list with correct totals.
    pub async fn assemble(
        &self,
        filter: &ItemFilter,
        page: u64,
    ) -> Result<ListingPage> {
        let page = page.max(1);
        let normal = filter.clone().with_pinned(false);
        let pinned = filter.clone().with_pinned(true);

        let count_normal = self.store.count(&normal).await?;
        let count_pinned = self.store.count(&pinned).await?;
        let total = count_normal + count_pinned;

        let limit = self.page_size;
        // Saturate: an absurd page number is just out of range, never a
        // wrapped offset back inside the catalog.
        let skip = (page - 1).saturating_mul(limit);

        let items = if skip < count_normal {
            let mut items =
                self.store.find(&normal, ItemSort::Curated, skip, limit).await?;
            let shortfall = limit - items.len() as u64;
            if shortfall > 0 {
                items.extend(
                    self.store
                        .find(&pinned, ItemSort::Rank, 0, shortfall)
                        .await?,
                );
            }
            items
        } else {
            self.store
                .find(&pinned, ItemSort::Rank, skip - count_normal, limit)
                .await?
        };

        Ok(ListingPage {
            items,
            page,
            total_pages: total.div_ceil(limit),
            total_count: total,
        })
    }

    /// The items currently occupying page `page`, in display order.
    pub async fn page_slice(
        &self,
        filter: &ItemFilter,
        page: u64,
    ) -> Result<Vec<CatalogItem>> {
        Ok(self.assemble(filter, page).await?.items)
    }

    /// The whole catalog under `filter` in display order: normal partition
    /// first, pinned appended.
    pub async fn load_global_order(
        &self,
        filter: &ItemFilter,
    ) -> Result<Vec<CatalogItem>> {
        let normal = filter.clone().with_pinned(false);
        let pinned = filter.clone().with_pinned(true);
        let mut all = self
            .store
            .find(&normal, ItemSort::Curated, 0, u64::MAX)
            .await?;
        all.extend(
            self.store.find(&pinned, ItemSort::Rank, 0, u64::MAX).await?,
        );
        Ok(all)
    }
}
