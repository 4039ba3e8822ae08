//! In-memory item/category store.
//!
//! The store is a plain owned value: every operation is total and runs to
//! completion. Edits and deletes on unknown ids are silent no-ops. Nothing here
//! validates input; that is the job of [`crate::catalog::Catalog`].

use serde::{Deserialize, Serialize};

use gearlog_core::{CategoryId, Entity, ItemId};

use crate::category::{Category, CategoryPatch};
use crate::item::{Item, ItemPatch};

/// Result of [`InventoryStore::merge_categories`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeOutcome {
    /// Items whose category was rewritten from source to target.
    pub moved_items: usize,
    /// Whether a source category record existed and was removed.
    pub source_removed: bool,
}

impl MergeOutcome {
    pub fn changed_anything(&self) -> bool {
        self.moved_items > 0 || self.source_removed
    }
}

/// Owned copy of the store contents, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub categories: Vec<Category>,
    pub items: Vec<Item>,
}

/// Ordered collections of categories and items (insertion order = display order).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryStore {
    categories: Vec<Category>,
    items: Vec<Item>,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(categories: Vec<Category>, items: Vec<Item>) -> Self {
        Self { categories, items }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.has_id(id))
    }

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.has_id(id))
    }

    pub fn items_in_category<'a>(
        &'a self,
        category_id: &'a CategoryId,
    ) -> impl Iterator<Item = &'a Item> + 'a {
        self.items
            .iter()
            .filter(move |i| &i.category_id == category_id)
    }

    /// First category whose name matches `name` case-insensitively, skipping
    /// the category `excluding` (if any).
    pub fn find_category_by_name(
        &self,
        name: &str,
        excluding: Option<&CategoryId>,
    ) -> Option<&Category> {
        self.categories
            .iter()
            .filter(|c| excluding != Some(&c.id))
            .find(|c| c.is_named(name))
    }

    pub fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            categories: self.categories.clone(),
            items: self.items.clone(),
        }
    }

    /// Append an item. Id uniqueness is the caller's responsibility.
    pub fn add_item(&mut self, item: Item) {
        tracing::debug!(item_id = %item.id, category_id = %item.category_id, "item added");
        self.items.push(item);
    }

    /// Remove the item with the given id. Returns `false` if there was none.
    pub fn delete_item(&mut self, id: &ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| !i.has_id(id));
        let removed = self.items.len() != before;
        tracing::debug!(item_id = %id, removed, "delete item");
        removed
    }

    /// Merge `patch` into every item with the given id. Returns `false` if
    /// there was none.
    pub fn edit_item(&mut self, id: &ItemId, patch: &ItemPatch) -> bool {
        let mut edited = 0;
        for item in self.items.iter_mut().filter(|i| i.has_id(id)) {
            item.apply(patch);
            edited += 1;
        }
        tracing::debug!(item_id = %id, edited, "edit item");
        edited > 0
    }

    /// Append a category. Name uniqueness is the caller's responsibility.
    pub fn add_category(&mut self, category: Category) {
        tracing::debug!(category_id = %category.id, name = %category.name, "category added");
        self.categories.push(category);
    }

    /// Merge `patch` into every category with the given id. Returns `false`
    /// if there was none.
    ///
    /// A rename only changes the category record: items point at the category
    /// by id, and the id never changes, so no item needs rewriting.
    pub fn edit_category(&mut self, id: &CategoryId, patch: &CategoryPatch) -> bool {
        let mut edited = 0;
        for category in self.categories.iter_mut().filter(|c| c.has_id(id)) {
            category.apply(patch);
            edited += 1;
        }
        if edited == 0 {
            tracing::debug!(category_id = %id, "edit category: no such category");
            return false;
        }

        if patch.name.is_some() {
            let referencing = self.items_in_category(id).count();
            tracing::debug!(
                category_id = %id,
                edited,
                referencing,
                "category renamed; item references unchanged"
            );
        }
        true
    }

    /// Move every item of `source` into `target`, then drop `source`.
    ///
    /// The target record is left as is; its existence is not checked.
    pub fn merge_categories(&mut self, source: &CategoryId, target: &CategoryId) -> MergeOutcome {
        let mut moved_items = 0;
        for item in self.items.iter_mut().filter(|i| &i.category_id == source) {
            item.category_id = target.clone();
            moved_items += 1;
        }

        let before = self.categories.len();
        self.categories.retain(|c| !c.has_id(source));
        let source_removed = self.categories.len() != before;

        tracing::debug!(%source, %target, moved_items, source_removed, "categories merged");
        MergeOutcome {
            moved_items,
            source_removed,
        }
    }
}

impl From<InventorySnapshot> for InventoryStore {
    fn from(snapshot: InventorySnapshot) -> Self {
        Self::from_parts(snapshot.categories, snapshot.items)
    }
}
