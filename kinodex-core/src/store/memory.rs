//! In-memory store implementation.
//!
//! Backs the integration tests and the server's standalone mode. All bulk
//! operations run under one write lock, matching the atomic-but-not-
//! transactional contract of the port.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use kinodex_model::{CatalogItem, ItemID};

use crate::error::{CatalogError, Result};

use super::{CatalogStore, DistinctField, ItemFilter, ItemSort, WriteOp};

#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    items: RwLock<HashMap<ItemID, CatalogItem>>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store, bypassing the write path. Test helper.
    pub fn with_items(items: Vec<CatalogItem>) -> Self {
        let store = Self::new();
        {
            let mut guard = store.items.write().expect("store lock");
            for item in items {
                guard.insert(item.id, item);
            }
        }
        store
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<ItemID, CatalogItem>>>
    {
        self.items
            .read()
            .map_err(|_| CatalogError::Store("store lock poisoned".into()))
    }

    fn filtered_sorted(
        &self,
        filter: &ItemFilter,
        sort: ItemSort,
    ) -> Result<Vec<CatalogItem>> {
        let guard = self.read()?;
        let mut items: Vec<CatalogItem> = guard
            .values()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();
        items.sort_by(|a, b| sort.cmp(a, b));
        Ok(items)
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn count(&self, filter: &ItemFilter) -> Result<u64> {
        let guard = self.read()?;
        Ok(guard.values().filter(|item| filter.matches(item)).count() as u64)
    }

    async fn find(
        &self,
        filter: &ItemFilter,
        sort: ItemSort,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<CatalogItem>> {
        let items = self.filtered_sorted(filter, sort)?;
        Ok(items
            .into_iter()
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect())
    }

    async fn get(&self, id: &ItemID) -> Result<Option<CatalogItem>> {
        let guard = self.read()?;
        Ok(guard.get(id).cloned())
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<CatalogItem>> {
        let guard = self.read()?;
        Ok(guard
            .values()
            .find(|item| item.slug.as_deref() == Some(slug))
            .cloned())
    }

    async fn bulk_write(&self, ops: Vec<WriteOp>) -> Result<u64> {
        let mut guard = self
            .items
            .write()
            .map_err(|_| CatalogError::Store("store lock poisoned".into()))?;
        let now = Utc::now();
        let mut matched = 0u64;
        for op in ops {
            match op {
                WriteOp::Insert(item) => {
                    guard.insert(item.id, *item);
                    matched += 1;
                }
                WriteOp::Update { id, patch } => {
                    if let Some(item) = guard.get_mut(&id) {
                        patch.apply(item, now);
                        matched += 1;
                    }
                }
                WriteOp::Delete(id) => {
                    if guard.remove(&id).is_some() {
                        matched += 1;
                    }
                }
            }
        }
        Ok(matched)
    }

    async fn distinct(
        &self,
        field: DistinctField,
        filter: &ItemFilter,
    ) -> Result<Vec<String>> {
        let guard = self.read()?;
        let mut values: Vec<String> = guard
            .values()
            .filter(|item| filter.matches(item))
            .flat_map(|item| match field {
                DistinctField::Category => item.categories.clone(),
                DistinctField::Language => {
                    item.language.clone().into_iter().collect()
                }
                DistinctField::Rate => item.rate.clone().into_iter().collect(),
            })
            .collect();
        values.sort();
        values.dedup();
        Ok(values)
    }
}
