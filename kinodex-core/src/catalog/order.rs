//! Rank assignment and the order repair pass.

use kinodex_model::Placement;
use tracing::info;

use crate::error::Result;
use crate::store::{
    CatalogStore, ItemFilter, ItemPatch, ItemSort, WriteOp,
};

use super::listing::ListingAssembler;

pub struct OrderIndexer<'a> {
    store: &'a dyn CatalogStore,
}

impl<'a> OrderIndexer<'a> {
    pub fn new(store: &'a dyn CatalogStore) -> Self {
        Self { store }
    }

    /// Rank for a freshly created item: current tail of its partition + 1.
    pub async fn next_rank(&self, placement: Placement) -> Result<i64> {
        let filter = ItemFilter {
            pinned: Some(placement.is_pinned()),
            ..Default::default()
        };
        let tail =
            self.store.find(&filter, ItemSort::RankDesc, 0, 1).await?;
        Ok(tail
            .first()
            .and_then(|item| item.order_index)
            .unwrap_or(0)
            + 1)
    }

    /// Whether any item still lacks a rank.
    pub async fn has_unranked(&self) -> Result<bool> {
        let filter = ItemFilter {
            missing_order: true,
            ..Default::default()
        };
        Ok(self.store.count(&filter).await? > 0)
    }

    /// Resynthesize a gap-free total order from current flags and
    /// timestamps: walk the catalog in display order (unranked items sort
    /// to their partition's tail by creation time) and assign 1..=n.
    ///
    /// This is the recovery path for legacy items without a rank and for a
    /// bulk write that crashed mid-batch. Only items whose rank actually
    /// changes are written, in one bulk call.
    pub async fn repair(&self, page_size: u64) -> Result<u64> {
        let assembler = ListingAssembler::new(self.store, page_size);
        let all = assembler
            .load_global_order(&ItemFilter::default())
            .await?;
        let ops: Vec<WriteOp> = all
            .iter()
            .enumerate()
            .filter(|(pos, item)| item.order_index != Some(*pos as i64 + 1))
            .map(|(pos, item)| WriteOp::Update {
                id: item.id,
                patch: ItemPatch::order(pos as i64 + 1),
            })
            .collect();
        if ops.is_empty() {
            return Ok(0);
        }
        let repaired = self.store.bulk_write(ops).await?;
        info!(repaired, "order repair pass renumbered catalog");
        Ok(repaired)
    }
}
