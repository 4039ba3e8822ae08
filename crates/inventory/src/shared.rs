//! Single-writer handle over an [`InventoryStore`].
//!
//! Every consumer gets a clone of the same handle. Mutations take the write
//! lock, run to completion, and announce themselves on the change feed before
//! the lock is released, so a reader never observes a half-applied merge and
//! subscribers see events in the order the mutations happened.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use gearlog_core::{CategoryId, ItemId};

use crate::category::{Category, CategoryPatch};
use crate::event::{ChangeFeed, InventoryEvent, Subscription};
use crate::item::{Item, ItemPatch};
use crate::store::{InventorySnapshot, InventoryStore, MergeOutcome};

#[derive(Debug, Clone, Default)]
pub struct SharedInventory {
    store: Arc<RwLock<InventoryStore>>,
    feed: Arc<ChangeFeed<InventoryEvent>>,
}

impl SharedInventory {
    pub fn new(store: InventoryStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            feed: Arc::new(ChangeFeed::new()),
        }
    }

    pub fn subscribe(&self) -> Subscription<InventoryEvent> {
        self.feed.subscribe()
    }

    pub fn snapshot(&self) -> InventorySnapshot {
        self.read().snapshot()
    }

    /// Run `f` against the store under the read lock.
    pub fn with_store<R>(&self, f: impl FnOnce(&InventoryStore) -> R) -> R {
        f(&*self.read())
    }

    pub fn add_item(&self, item: Item) {
        self.transact(|tx| tx.add_item(item))
    }

    pub fn delete_item(&self, id: &ItemId) -> bool {
        self.transact(|tx| tx.delete_item(id))
    }

    pub fn edit_item(&self, id: &ItemId, patch: &ItemPatch) -> bool {
        self.transact(|tx| tx.edit_item(id, patch))
    }

    pub fn add_category(&self, category: Category) {
        self.transact(|tx| tx.add_category(category))
    }

    pub fn edit_category(&self, id: &CategoryId, patch: &CategoryPatch) -> bool {
        self.transact(|tx| tx.edit_category(id, patch))
    }

    pub fn merge_categories(&self, source: &CategoryId, target: &CategoryId) -> MergeOutcome {
        self.transact(|tx| tx.merge_categories(source, target))
    }

    /// Run `f` under the write lock and publish whatever it changed.
    ///
    /// Use for read-check-write sequences (duplicate-name checks, bulk deletes)
    /// that must not interleave with other writers.
    pub fn transact<R>(&self, f: impl FnOnce(&mut Transaction<'_>) -> R) -> R {
        let mut guard = self.write();
        let mut tx = Transaction {
            store: &mut *guard,
            events: Vec::new(),
        };
        let result = f(&mut tx);
        // Publishing only sends on channels, so holding the store lock here
        // cannot deadlock and keeps feed order equal to mutation order.
        for event in tx.events {
            self.feed.publish(event);
        }
        result
    }

    // The store has no partially-applied states, so a poisoned lock still
    // guards consistent data.
    fn read(&self) -> RwLockReadGuard<'_, InventoryStore> {
        self.store.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, InventoryStore> {
        self.store.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Exclusive access to the store for the duration of
/// [`SharedInventory::transact`]. Mutations are recorded and published when
/// the closure returns, before the lock is released. Empty patches change
/// nothing and are not announced.
#[derive(Debug)]
pub struct Transaction<'a> {
    store: &'a mut InventoryStore,
    events: Vec<InventoryEvent>,
}

impl Transaction<'_> {
    pub fn store(&self) -> &InventoryStore {
        &*self.store
    }

    pub fn add_item(&mut self, item: Item) {
        self.events.push(InventoryEvent::ItemAdded {
            item_id: item.id.clone(),
            category_id: item.category_id.clone(),
            occurred_at: Utc::now(),
        });
        self.store.add_item(item);
    }

    pub fn delete_item(&mut self, id: &ItemId) -> bool {
        let removed = self.store.delete_item(id);
        if removed {
            self.events.push(InventoryEvent::ItemDeleted {
                item_id: id.clone(),
                occurred_at: Utc::now(),
            });
        }
        removed
    }

    pub fn edit_item(&mut self, id: &ItemId, patch: &ItemPatch) -> bool {
        let edited = self.store.edit_item(id, patch);
        if edited && !patch.is_empty() {
            self.events.push(InventoryEvent::ItemEdited {
                item_id: id.clone(),
                occurred_at: Utc::now(),
            });
        }
        edited
    }

    pub fn add_category(&mut self, category: Category) {
        self.events.push(InventoryEvent::CategoryAdded {
            category_id: category.id.clone(),
            occurred_at: Utc::now(),
        });
        self.store.add_category(category);
    }

    pub fn edit_category(&mut self, id: &CategoryId, patch: &CategoryPatch) -> bool {
        let edited = self.store.edit_category(id, patch);
        if edited && !patch.is_empty() {
            self.events.push(InventoryEvent::CategoryEdited {
                category_id: id.clone(),
                renamed: patch.name.is_some(),
                occurred_at: Utc::now(),
            });
        }
        edited
    }

    pub fn merge_categories(&mut self, source: &CategoryId, target: &CategoryId) -> MergeOutcome {
        let outcome = self.store.merge_categories(source, target);
        if outcome.changed_anything() {
            self.events.push(InventoryEvent::CategoriesMerged {
                source: source.clone(),
                target: target.clone(),
                moved_items: outcome.moved_items,
                occurred_at: Utc::now(),
            });
        }
        outcome
    }
}
