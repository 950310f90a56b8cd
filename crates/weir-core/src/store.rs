//! Pluggable item storage with per-identity optimistic concurrency.
//!
//! The core does not own durability; callers plug in whatever store they
//! have. [`MemoryStore`] is the reference implementation and the one the
//! service facade uses.
//!
//! # Write discipline
//!
//! Writers to the same identity are serialized optimistically: an update
//! carries the `updated_at` the writer last read, and the store rejects the
//! write with [`StoreError::ConcurrencyConflict`] when the stored value has
//! moved on. Unrelated identities never contend. Passing `None` skips the
//! check (single-writer embeddings).
//!
//! Items are never destructively deleted; a released item simply stays in
//! the store for audit.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

use crate::model::item::{ItemId, WorkItem};

/// Storage failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("item {0} not found")]
    NotFound(ItemId),
    #[error("item {0} already exists")]
    AlreadyExists(ItemId),
    #[error("stale write to {id}: expected version {expected}, store has {actual}")]
    ConcurrencyConflict {
        id: ItemId,
        expected: DateTime<Utc>,
        actual: DateTime<Utc>,
    },
}

/// The durable store contract the core assumes but does not own.
pub trait ItemStore: Send + Sync {
    /// Fetch a snapshot of one item.
    fn get(&self, id: &ItemId) -> Option<WorkItem>;

    /// Insert a brand-new item.
    ///
    /// # Errors
    ///
    /// [`StoreError::AlreadyExists`] when the identity is taken.
    fn insert(&self, item: WorkItem) -> Result<(), StoreError>;

    /// Replace an existing item.
    ///
    /// `expected_updated_at` is the version the writer read; `None` skips
    /// the optimistic check.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] or [`StoreError::ConcurrencyConflict`].
    fn update(
        &self,
        item: WorkItem,
        expected_updated_at: Option<DateTime<Utc>>,
    ) -> Result<(), StoreError>;

    /// Snapshot every stored item, unordered.
    fn list(&self) -> Vec<WorkItem>;
}

/// In-memory reference store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<ItemId, WorkItem>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ItemStore for MemoryStore {
    fn get(&self, id: &ItemId) -> Option<WorkItem> {
        self.items
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(id)
            .cloned()
    }

    fn insert(&self, item: WorkItem) -> Result<(), StoreError> {
        let mut items = self.items.write().unwrap_or_else(|e| e.into_inner());
        if items.contains_key(&item.id) {
            return Err(StoreError::AlreadyExists(item.id));
        }
        debug!(item = %item.id, "item inserted");
        items.insert(item.id.clone(), item);
        Ok(())
    }

    fn update(
        &self,
        item: WorkItem,
        expected_updated_at: Option<DateTime<Utc>>,
    ) -> Result<(), StoreError> {
        let mut items = self.items.write().unwrap_or_else(|e| e.into_inner());
        let current = items
            .get(&item.id)
            .ok_or_else(|| StoreError::NotFound(item.id.clone()))?;

        if let Some(expected) = expected_updated_at {
            if current.updated_at != expected {
                return Err(StoreError::ConcurrencyConflict {
                    id: item.id.clone(),
                    expected,
                    actual: current.updated_at,
                });
            }
        }

        debug!(item = %item.id, "item updated");
        items.insert(item.id.clone(), item);
        Ok(())
    }

    fn list(&self) -> Vec<WorkItem> {
        self.items
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect()
    }
}
