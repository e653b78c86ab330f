//! In-page reorders and cross-page moves.
//!
//! Reordering is a local permutation of the rank values already occupying
//! one page, so frequent admin edits never touch items outside the visible
//! slice. Moving items across pages is the one operation allowed to
//! renumber the whole catalog; it is an explicit, rare admin action.

use std::collections::HashSet;

use kinodex_model::{ItemID, Placement};
use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::store::{CatalogStore, ItemFilter, ItemPatch, WriteOp};

use super::listing::ListingAssembler;
use super::order::OrderIndexer;

const REORDER_MISMATCH: &str =
    "orderedIds must contain exactly the IDs of this page";

pub struct PageReorderer<'a> {
    store: &'a dyn CatalogStore,
    page_size: u64,
}

impl<'a> PageReorderer<'a> {
    pub fn new(store: &'a dyn CatalogStore, page_size: u64) -> Self {
        Self { store, page_size }
    }

    /// Permute the rank values of exactly the items shown on `page` under
    /// `filter` so they display in `ordered_ids` order.
    ///
    /// Validation failures apply zero writes; a passed validation results
    /// in exactly one bulk write.
    pub async fn reorder(
        &self,
        filter: &ItemFilter,
        page: u64,
        ordered_ids: &[ItemID],
    ) -> Result<u64> {
        let assembler = ListingAssembler::new(self.store, self.page_size);
        let indexer = OrderIndexer::new(self.store);

        let mut slice = assembler.page_slice(filter, page).await?;
        if slice.is_empty() {
            return Err(CatalogError::PageRange(format!(
                "page {page} is out of range"
            )));
        }
        // Legacy items without a rank have no slot value to permute; run
        // the repair pass once and recompute the slice.
        if slice.iter().any(|item| item.order_index.is_none()) {
            indexer.repair(self.page_size).await?;
            slice = assembler.page_slice(filter, page).await?;
        }

        let unique: HashSet<&ItemID> = ordered_ids.iter().collect();
        if unique.len() != ordered_ids.len() {
            return Err(CatalogError::Validation(
                "orderedIds contains duplicate IDs".into(),
            ));
        }
        if ordered_ids.len() != slice.len() {
            return Err(CatalogError::Validation(REORDER_MISMATCH.into()));
        }
        let occupants: HashSet<&ItemID> =
            slice.iter().map(|item| &item.id).collect();
        if unique != occupants {
            return Err(CatalogError::Validation(REORDER_MISMATCH.into()));
        }

        // The slots are the rank values this page already occupies. Assign
        // them, ascending, to the caller's ordering.
        let mut slots: Vec<i64> = slice
            .iter()
            .map(|item| item.order_index.unwrap_or_default())
            .collect();
        slots.sort_unstable();

        // Write every slot, identity permutations included, so the page's
        // ordering is restamped atomically in a single bulk write.
        let ops: Vec<WriteOp> = ordered_ids
            .iter()
            .zip(slots.iter())
            .map(|(id, slot)| WriteOp::Update {
                id: *id,
                patch: ItemPatch::order(*slot),
            })
            .collect();

        debug!(page, slots = ops.len(), "applying page reorder");
        self.store.bulk_write(ops).await?;
        Ok(ordered_ids.len() as u64)
    }
}

/// Result of a cross-page move.
#[derive(Debug, Clone, Copy)]
pub struct MoveOutcome {
    pub total: u64,
    pub target_page: u64,
    pub moved_count: u64,
}

pub struct PagesMover<'a> {
    store: &'a dyn CatalogStore,
    page_size: u64,
}

impl<'a> PagesMover<'a> {
    pub fn new(store: &'a dyn CatalogStore, page_size: u64) -> Self {
        Self { store, page_size }
    }

    /// Relocate `ids` (drawn from anywhere in the catalog) to `target_page`
    /// and renumber the whole catalog 1..=n in one bulk write.
    ///
    /// Moving to page 1 forces the moved items to `Promoted` so they
    /// surface at the top of the normal partition instead of being absorbed
    /// into the pinned tail.
    pub async fn move_to_page(
        &self,
        target_page: u64,
        ids: &[ItemID],
    ) -> Result<MoveOutcome> {
        let assembler = ListingAssembler::new(self.store, self.page_size);
        let all = assembler
            .load_global_order(&ItemFilter::default())
            .await?;

        let wanted: HashSet<&ItemID> = ids.iter().collect();
        let (moved, remaining): (Vec<_>, Vec<_>) = all
            .into_iter()
            .partition(|item| wanted.contains(&item.id));
        if moved.is_empty() {
            return Err(CatalogError::NotFound(
                "none of the provided item IDs exist".into(),
            ));
        }

        let total = (moved.len() + remaining.len()) as u64;
        let total_pages = total.div_ceil(self.page_size).max(1);
        let target_page = target_page.clamp(1, total_pages);
        let promote = target_page == 1;

        let offset = usize::try_from((target_page - 1) * self.page_size)
            .unwrap_or(usize::MAX)
            .min(remaining.len());

        let moved_ids: HashSet<ItemID> =
            moved.iter().map(|item| item.id).collect();
        let mut sequence = remaining;
        sequence.splice(offset..offset, moved);

        let ops: Vec<WriteOp> = sequence
            .iter()
            .enumerate()
            .map(|(pos, item)| {
                let mut patch = ItemPatch::order(pos as i64 + 1);
                if promote && moved_ids.contains(&item.id) {
                    patch.placement = Some(Placement::Promoted);
                }
                WriteOp::Update {
                    id: item.id,
                    patch,
                }
            })
            .collect();

        debug!(
            target_page,
            moved = moved_ids.len(),
            total,
            "renumbering catalog for cross-page move"
        );
        self.store.bulk_write(ops).await?;

        Ok(MoveOutcome {
            total,
            target_page,
            moved_count: moved_ids.len() as u64,
        })
    }
}
