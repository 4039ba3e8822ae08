//! Catalog service: the validation gate in front of the shared store.
//!
//! Store operations are total and never check anything. The catalog is where
//! required fields, duplicate category names and device capability refusals
//! are turned into [`DomainError`]s before any state is touched. It also owns
//! id generation and the read views the screens render (category summaries,
//! the inventory log).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gearlog_core::{CategoryId, DomainError, DomainResult, IdGenerator, ItemId};

use crate::capability::{DatePicker, ImagePicker};
use crate::category::{Category, CategoryPatch};
use crate::item::{Item, ItemPatch};
use crate::shared::{SharedInventory, Transaction};
use crate::validation::{check_purchase_price, require_non_blank};

/// Presentation fallbacks for the read views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSettings {
    /// Image shown for categories without one and for orphaned items.
    pub placeholder_image: String,
    /// Category name shown for items whose category no longer exists.
    pub unknown_category_label: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            placeholder_image: "https://via.placeholder.com/150".to_string(),
            unknown_category_label: "Unknown Category".to_string(),
        }
    }
}

/// What [`Catalog::rename_category`] ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// The new name equals the current one; at most the image changed.
    Unchanged,
    /// The category record now carries the new name.
    Renamed,
    /// Another category already had the name; the edited category was folded
    /// into it and no longer exists.
    MergedInto(CategoryId),
}

/// Category for a new item: pick an existing one or create one on the spot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryChoice {
    Existing(CategoryId),
    New { name: String, image: Option<String> },
}

/// Form contents for a new item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub category: CategoryChoice,
    pub item_name: String,
    pub serial_no: String,
    pub owner: String,
    pub is_servicable: bool,
    pub is_deployed: bool,
    pub date_of_purchase: DateTime<Utc>,
    pub purchase_price: String,
    pub purchase_from: String,
    pub mac_address: String,
    pub ip_address: String,
    pub remarks: String,
}

impl ItemDraft {
    pub fn new(
        category: CategoryChoice,
        item_name: impl Into<String>,
        date_of_purchase: DateTime<Utc>,
    ) -> Self {
        Self {
            category,
            item_name: item_name.into(),
            serial_no: String::new(),
            owner: String::new(),
            is_servicable: true,
            is_deployed: true,
            date_of_purchase,
            purchase_price: String::new(),
            purchase_from: String::new(),
            mac_address: String::new(),
            ip_address: String::new(),
            remarks: String::new(),
        }
    }

    fn into_item(self, id: ItemId, category_id: CategoryId, item_name: String) -> Item {
        Item {
            id,
            category_id,
            item_name,
            serial_no: self.serial_no,
            owner: self.owner,
            is_servicable: self.is_servicable,
            is_deployed: self.is_deployed,
            date_of_purchase: self.date_of_purchase,
            purchase_price: self.purchase_price,
            purchase_from: self.purchase_from,
            mac_address: self.mac_address,
            ip_address: self.ip_address,
            remarks: self.remarks,
        }
    }
}

/// One row of the items tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub id: CategoryId,
    pub name: String,
    pub image: String,
    pub item_count: usize,
}

/// One row of the inventory log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub item_id: ItemId,
    pub item_name: String,
    pub owner: String,
    pub date_of_purchase: DateTime<Utc>,
    pub category_name: String,
    pub image: String,
}

#[derive(Clone)]
pub struct Catalog {
    inventory: SharedInventory,
    ids: Arc<dyn IdGenerator>,
    settings: CatalogSettings,
}

impl core::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Catalog")
            .field("inventory", &self.inventory)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Catalog {
    pub fn new(
        inventory: SharedInventory,
        ids: Arc<dyn IdGenerator>,
        settings: CatalogSettings,
    ) -> Self {
        Self {
            inventory,
            ids,
            settings,
        }
    }

    pub fn inventory(&self) -> &SharedInventory {
        &self.inventory
    }

    pub fn settings(&self) -> &CatalogSettings {
        &self.settings
    }

    /// Create a brand-new category. A name already in use (ignoring case) is
    /// rejected rather than merged.
    pub fn create_category(&self, name: &str, image: Option<String>) -> DomainResult<CategoryId> {
        let name = require_non_blank("category name", name)?;
        self.inventory.transact(|tx| self.insert_category(tx, name, image))
    }

    /// Rename a category, folding it into an existing category when the new
    /// name is already taken.
    ///
    /// `image` is a newly picked image; `None` keeps what is there. On a merge
    /// the picked image is applied to the surviving category.
    pub fn rename_category(
        &self,
        id: &CategoryId,
        new_name: &str,
        image: Option<String>,
    ) -> DomainResult<RenameOutcome> {
        let new_name = require_non_blank("category name", new_name)?;

        self.inventory.transact(|tx| {
            let current = tx.store().category(id).ok_or_else(DomainError::not_found)?;

            if current.name == new_name {
                if image.is_some() && image != current.image {
                    tx.edit_category(id, &CategoryPatch::image(image));
                }
                return Ok(RenameOutcome::Unchanged);
            }

            if let Some(existing) = tx.store().find_category_by_name(new_name, Some(id)) {
                let target = existing.id.clone();
                let outcome = tx.merge_categories(id, &target);
                if image.is_some() {
                    tx.edit_category(&target, &CategoryPatch::image(image));
                }
                tracing::info!(
                    source = %id,
                    %target,
                    moved_items = outcome.moved_items,
                    "category name already taken; merged"
                );
                return Ok(RenameOutcome::MergedInto(target));
            }

            let mut patch = CategoryPatch::name(new_name);
            if image.is_some() {
                patch = patch.with_image(image);
            }
            tx.edit_category(id, &patch);
            Ok(RenameOutcome::Renamed)
        })
    }

    /// Validate a new item and append it, creating its category first if the
    /// draft asks for a new one.
    pub fn record_item(&self, draft: ItemDraft) -> DomainResult<ItemId> {
        let item_name = require_non_blank("item name", &draft.item_name)?.to_string();
        check_purchase_price(&draft.purchase_price)?;

        self.inventory.transact(|tx| {
            let category_id = match &draft.category {
                CategoryChoice::Existing(id) => {
                    if tx.store().category(id).is_none() {
                        tracing::warn!(category_id = %id, "record item: unknown category");
                        return Err(DomainError::not_found());
                    }
                    id.clone()
                }
                CategoryChoice::New { name, image } => {
                    let name = require_non_blank("category name", name)?;
                    self.insert_category(tx, name, image.clone())?
                }
            };

            let id = ItemId::generate(self.ids.as_ref());
            tx.add_item(draft.into_item(id.clone(), category_id, item_name));
            Ok(id)
        })
    }

    /// Apply a partial update to an existing item.
    pub fn update_item(&self, id: &ItemId, patch: &ItemPatch) -> DomainResult<()> {
        if let Some(name) = &patch.item_name {
            require_non_blank("item name", name)?;
        }
        if let Some(price) = &patch.purchase_price {
            check_purchase_price(price)?;
        }

        self.inventory.transact(|tx| {
            if tx.store().item(id).is_none() {
                return Err(DomainError::not_found());
            }
            if let Some(category_id) = &patch.category_id {
                if tx.store().category(category_id).is_none() {
                    tracing::warn!(item_id = %id, %category_id, "update item: unknown category");
                    return Err(DomainError::not_found());
                }
            }
            tx.edit_item(id, patch);
            Ok(())
        })
    }

    /// Delete an item. Unknown ids are ignored.
    pub fn remove_item(&self, id: &ItemId) -> bool {
        self.inventory.delete_item(id)
    }

    /// Delete every item of a category, leaving the category itself in place.
    pub fn clear_category(&self, id: &CategoryId) -> usize {
        self.inventory.transact(|tx| {
            let doomed: Vec<ItemId> = tx
                .store()
                .items_in_category(id)
                .map(|item| item.id.clone())
                .collect();
            let removed = doomed.iter().filter(|item_id| tx.delete_item(item_id)).count();
            tracing::info!(category_id = %id, removed, "category cleared");
            removed
        })
    }

    /// Ask the image picker for a new category image.
    ///
    /// Returns `Ok(false)` when the user cancels. A refused permission aborts
    /// without touching the store.
    pub fn replace_category_image(
        &self,
        id: &CategoryId,
        picker: &dyn ImagePicker,
    ) -> DomainResult<bool> {
        if self.inventory.with_store(|s| s.category(id).is_none()) {
            return Err(DomainError::not_found());
        }

        let picked = picker.pick_image().inspect_err(|err| {
            tracing::warn!(category_id = %id, error = %err, "image pick failed");
        })?;

        match picked {
            Some(uri) => Ok(self
                .inventory
                .edit_category(id, &CategoryPatch::image(Some(uri)))),
            None => Ok(false),
        }
    }

    /// Ask the date picker for a new purchase date, starting from the item's
    /// current one.
    ///
    /// Returns `Ok(false)` when the picker is dismissed or hands back the same
    /// date.
    pub fn change_purchase_date(&self, id: &ItemId, picker: &dyn DatePicker) -> DomainResult<bool> {
        let current = self
            .inventory
            .with_store(|s| s.item(id).map(|item| item.date_of_purchase))
            .ok_or_else(DomainError::not_found)?;

        match picker.pick_date(current) {
            Some(date) if date != current => {
                let patch = ItemPatch {
                    date_of_purchase: Some(date),
                    ..ItemPatch::default()
                };
                Ok(self.inventory.edit_item(id, &patch))
            }
            _ => Ok(false),
        }
    }

    /// Item counts per category, in display order.
    pub fn category_summaries(&self) -> Vec<CategorySummary> {
        self.inventory.with_store(|store| {
            store
                .categories()
                .iter()
                .map(|category| CategorySummary {
                    id: category.id.clone(),
                    name: category.name.clone(),
                    image: self.image_or_placeholder(category.image.as_deref()),
                    item_count: store.items_in_category(&category.id).count(),
                })
                .collect()
        })
    }

    /// Every item joined with its category, in display order.
    pub fn inventory_log(&self) -> Vec<LogEntry> {
        self.inventory.with_store(|store| {
            store
                .items()
                .iter()
                .map(|item| {
                    let category = store.category(&item.category_id);
                    LogEntry {
                        item_id: item.id.clone(),
                        item_name: item.item_name.clone(),
                        owner: item.owner.clone(),
                        date_of_purchase: item.date_of_purchase,
                        category_name: category
                            .map(|c| c.name.clone())
                            .unwrap_or_else(|| self.settings.unknown_category_label.clone()),
                        image: self.image_or_placeholder(category.and_then(|c| c.image.as_deref())),
                    }
                })
                .collect()
        })
    }

    fn insert_category(
        &self,
        tx: &mut Transaction<'_>,
        name: &str,
        image: Option<String>,
    ) -> DomainResult<CategoryId> {
        if let Some(existing) = tx.store().find_category_by_name(name, None) {
            tracing::warn!(name, existing = %existing.id, "category already exists");
            return Err(DomainError::conflict("category already exists"));
        }

        let id = CategoryId::generate(self.ids.as_ref());
        let mut category = Category::new(id.clone(), name);
        category.image = image;
        tx.add_category(category);
        tracing::info!(category_id = %id, name, "category created");
        Ok(id)
    }

    fn image_or_placeholder(&self, image: Option<&str>) -> String {
        image
            .filter(|uri| !uri.trim().is_empty())
            .unwrap_or(self.settings.placeholder_image.as_str())
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, InventoryEvent};
    use crate::store::InventoryStore;
    use chrono::TimeZone;
    use gearlog_core::SequentialIdGenerator;

    fn catalog() -> Catalog {
        let store = InventoryStore::from_parts(
            vec![
                Category::new("1", "Laptops").with_image("laptop.png"),
                Category::new("2", "Keyboards"),
            ],
            vec![
                Item::new("10", "1", "Laptop 1", Utc::now()),
                Item::new("11", "2", "Keyboard 1", Utc::now()),
            ],
        );
        Catalog::new(
            SharedInventory::new(store),
            Arc::new(SequentialIdGenerator::starting_at(100)),
            CatalogSettings::default(),
        )
    }

    struct Picker(DomainResult<Option<String>>);

    impl ImagePicker for Picker {
        fn pick_image(&self) -> DomainResult<Option<String>> {
            self.0.clone()
        }
    }

    struct Calendar(Option<DateTime<Utc>>);

    impl DatePicker for Calendar {
        fn pick_date(&self, _current: DateTime<Utc>) -> Option<DateTime<Utc>> {
            self.0
        }
    }

    #[test]
    fn create_category_assigns_generated_id() {
        let catalog = catalog();
        let id = catalog.create_category("Monitors", None).unwrap();
        assert_eq!(id.as_str(), "100");
        let snapshot = catalog.inventory().snapshot();
        assert_eq!(snapshot.categories.last().unwrap().name, "Monitors");
    }

    #[test]
    fn create_category_rejects_duplicate_name() {
        let catalog = catalog();
        let err = catalog.create_category("  laptops ", None).unwrap_err();
        assert_eq!(err, DomainError::conflict("category already exists"));
        assert_eq!(catalog.inventory().snapshot().categories.len(), 2);
    }

    #[test]
    fn create_category_rejects_blank_name() {
        let catalog = catalog();
        match catalog.create_category("   ", None) {
            Err(DomainError::Validation(_)) => {}
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn rename_to_same_name_is_a_no_op() {
        let catalog = catalog();
        let sub = catalog.inventory().subscribe();
        let outcome = catalog
            .rename_category(&CategoryId::from("1"), "Laptops", None)
            .unwrap();
        assert_eq!(outcome, RenameOutcome::Unchanged);
        assert!(sub.drain().is_empty());
    }

    #[test]
    fn same_name_with_new_image_only_replaces_the_image() {
        let catalog = catalog();
        let sub = catalog.inventory().subscribe();

        let outcome = catalog
            .rename_category(&CategoryId::from("1"), "Laptops", Some("new.png".to_string()))
            .unwrap();

        assert_eq!(outcome, RenameOutcome::Unchanged);
        let snapshot = catalog.inventory().snapshot();
        assert_eq!(snapshot.categories[0].name, "Laptops");
        assert_eq!(snapshot.categories[0].image.as_deref(), Some("new.png"));
        assert_eq!(snapshot.items.len(), 2);

        let events = sub.drain();
        assert_eq!(events.len(), 1);
        match &events[0] {
            InventoryEvent::CategoryEdited {
                category_id,
                renamed,
                ..
            } => {
                assert_eq!(category_id.as_str(), "1");
                assert!(!renamed);
            }
            other => panic!("Expected CategoryEdited, got {other:?}"),
        }
    }

    #[test]
    fn case_only_rename_is_a_plain_rename() {
        let catalog = catalog();

        let outcome = catalog
            .rename_category(&CategoryId::from("1"), "laptops", None)
            .unwrap();

        assert_eq!(outcome, RenameOutcome::Renamed);
        let snapshot = catalog.inventory().snapshot();
        assert_eq!(snapshot.categories.len(), 2);
        assert_eq!(snapshot.categories[0].name, "laptops");
        assert_eq!(snapshot.items[0].category_id.as_str(), "1");
    }

    #[test]
    fn rename_to_free_name_renames() {
        let catalog = catalog();
        let outcome = catalog
            .rename_category(&CategoryId::from("1"), "Notebooks", None)
            .unwrap();
        assert_eq!(outcome, RenameOutcome::Renamed);
        let snapshot = catalog.inventory().snapshot();
        assert_eq!(snapshot.categories[0].name, "Notebooks");
        assert_eq!(snapshot.categories[0].image.as_deref(), Some("laptop.png"));
    }

    #[test]
    fn rename_to_taken_name_merges_into_existing() {
        let catalog = catalog();
        let outcome = catalog
            .rename_category(&CategoryId::from("1"), "KEYBOARDS", Some("kb.png".to_string()))
            .unwrap();

        assert_eq!(outcome, RenameOutcome::MergedInto(CategoryId::from("2")));
        let snapshot = catalog.inventory().snapshot();
        assert_eq!(snapshot.categories.len(), 1);
        assert_eq!(snapshot.categories[0].name, "Keyboards");
        assert_eq!(snapshot.categories[0].image.as_deref(), Some("kb.png"));
        assert!(snapshot.items.iter().all(|i| i.category_id.as_str() == "2"));
    }

    #[test]
    fn rename_unknown_category_is_not_found() {
        let catalog = catalog();
        let err = catalog
            .rename_category(&CategoryId::from("9"), "Whatever", None)
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn record_item_into_existing_category() {
        let catalog = catalog();
        let mut draft = ItemDraft::new(
            CategoryChoice::Existing(CategoryId::from("2")),
            "Keyboard 2",
            Utc::now(),
        );
        draft.owner = "Jane Doe".to_string();
        draft.purchase_price = "100".to_string();

        let id = catalog.record_item(draft).unwrap();

        let snapshot = catalog.inventory().snapshot();
        let item = snapshot.items.last().unwrap();
        assert_eq!(item.id, id);
        assert_eq!(item.category_id.as_str(), "2");
        assert_eq!(item.owner, "Jane Doe");
    }

    #[test]
    fn record_item_with_new_category_creates_it() {
        let catalog = catalog();
        let draft = ItemDraft::new(
            CategoryChoice::New {
                name: "Mouse".to_string(),
                image: Some("mouse.png".to_string()),
            },
            "Mouse 1",
            Utc::now(),
        );

        let item_id = catalog.record_item(draft).unwrap();

        let snapshot = catalog.inventory().snapshot();
        let category = snapshot.categories.last().unwrap();
        assert_eq!(category.name, "Mouse");
        assert_eq!(category.id.as_str(), "100");
        assert_eq!(item_id.as_str(), "101");
        assert_eq!(snapshot.items.last().unwrap().category_id, category.id);
    }

    #[test]
    fn record_item_with_duplicate_new_category_changes_nothing() {
        let catalog = catalog();
        let before = catalog.inventory().snapshot();
        let draft = ItemDraft::new(
            CategoryChoice::New {
                name: "laptops".to_string(),
                image: None,
            },
            "Laptop 3",
            Utc::now(),
        );

        let err = catalog.record_item(draft).unwrap_err();

        assert_eq!(err, DomainError::conflict("category already exists"));
        assert_eq!(catalog.inventory().snapshot(), before);
    }

    #[test]
    fn record_item_requires_name_and_known_category() {
        let catalog = catalog();
        let laptops = CategoryChoice::Existing(CategoryId::from("1"));
        let blank = ItemDraft::new(laptops, " ", Utc::now());
        assert!(matches!(catalog.record_item(blank), Err(DomainError::Validation(_))));

        let missing = CategoryChoice::Existing(CategoryId::from("9"));
        let orphan = ItemDraft::new(missing, "X", Utc::now());
        assert_eq!(catalog.record_item(orphan), Err(DomainError::NotFound));
    }

    #[test]
    fn update_item_validates_before_touching_state() {
        let catalog = catalog();
        let before = catalog.inventory().snapshot();
        let id = ItemId::from("10");

        let blank_name = ItemPatch {
            item_name: Some(String::new()),
            ..ItemPatch::default()
        };
        assert!(matches!(catalog.update_item(&id, &blank_name), Err(DomainError::Validation(_))));
        assert_eq!(
            catalog.update_item(&id, &ItemPatch::category("9")),
            Err(DomainError::NotFound)
        );
        assert_eq!(
            catalog.update_item(&ItemId::from("999"), &ItemPatch::owner("Alice")),
            Err(DomainError::NotFound)
        );
        assert_eq!(catalog.inventory().snapshot(), before);

        catalog.update_item(&id, &ItemPatch::owner("Alice")).unwrap();
        assert_eq!(catalog.inventory().snapshot().items[0].owner, "Alice");
    }

    #[test]
    fn clear_category_removes_only_its_items() {
        let catalog = catalog();
        assert_eq!(catalog.clear_category(&CategoryId::from("1")), 1);
        let snapshot = catalog.inventory().snapshot();
        assert_eq!(snapshot.categories.len(), 2);
        assert_eq!(snapshot.items.len(), 1);
        assert_eq!(snapshot.items[0].id.as_str(), "11");
    }

    #[test]
    fn refused_image_permission_leaves_state_untouched() {
        let catalog = catalog();
        let before = catalog.inventory().snapshot();
        let picker = Picker(Err(DomainError::permission_denied(
            "gallery access is required",
        )));

        let err = catalog
            .replace_category_image(&CategoryId::from("2"), &picker)
            .unwrap_err();

        assert!(matches!(err, DomainError::PermissionDenied(_)));
        assert_eq!(catalog.inventory().snapshot(), before);
    }

    #[test]
    fn picked_image_replaces_category_image() {
        let catalog = catalog();
        let cancelled = Picker(Ok(None));
        assert_eq!(
            catalog.replace_category_image(&CategoryId::from("2"), &cancelled),
            Ok(false)
        );

        let picked = Picker(Ok(Some("file:///kb.jpg".to_string())));
        assert_eq!(
            catalog.replace_category_image(&CategoryId::from("2"), &picked),
            Ok(true)
        );
        let snapshot = catalog.inventory().snapshot();
        assert_eq!(snapshot.categories[1].image.as_deref(), Some("file:///kb.jpg"));
    }

    #[test]
    fn picked_purchase_date_replaces_the_old_one() {
        let catalog = catalog();
        let id = ItemId::from("10");
        let sub = catalog.inventory().subscribe();
        let picked = Utc.with_ymd_and_hms(2023, 2, 14, 0, 0, 0).unwrap();

        assert_eq!(catalog.change_purchase_date(&id, &Calendar(None)), Ok(false));
        assert!(sub.drain().is_empty());

        assert_eq!(catalog.change_purchase_date(&id, &Calendar(Some(picked))), Ok(true));
        let snapshot = catalog.inventory().snapshot();
        assert_eq!(snapshot.items[0].date_of_purchase, picked);
        assert_eq!(
            sub.drain().iter().map(|e| e.event_type()).collect::<Vec<_>>(),
            vec!["inventory.item.edited"]
        );

        assert_eq!(catalog.change_purchase_date(&id, &Calendar(Some(picked))), Ok(false));
    }

    #[test]
    fn purchase_date_of_unknown_item_is_not_found() {
        let catalog = catalog();
        let picked = Utc.with_ymd_and_hms(2023, 2, 14, 0, 0, 0).unwrap();
        assert_eq!(
            catalog.change_purchase_date(&ItemId::from("999"), &Calendar(Some(picked))),
            Err(DomainError::NotFound)
        );
    }

    #[test]
    fn summaries_count_items_per_category() {
        let catalog = catalog();
        catalog.inventory().add_item(Item::new("12", "1", "Laptop 2", Utc::now()));

        let summaries = catalog.category_summaries();

        let rows: Vec<(&str, usize)> = summaries
            .iter()
            .map(|s| (s.name.as_str(), s.item_count))
            .collect();
        assert_eq!(rows, vec![("Laptops", 2), ("Keyboards", 1)]);
        assert_eq!(summaries[1].image, CatalogSettings::default().placeholder_image);
    }

    #[test]
    fn log_falls_back_for_orphaned_items() {
        let catalog = catalog();
        catalog.inventory().add_item(Item::new("12", "gone", "Stray", Utc::now()));

        let log = catalog.inventory_log();

        assert_eq!(log.len(), 3);
        assert_eq!(log[0].category_name, "Laptops");
        assert_eq!(log[0].image, "laptop.png");
        assert_eq!(log[2].category_name, "Unknown Category");
        assert_eq!(log[2].image, "https://via.placeholder.com/150");
    }
}
