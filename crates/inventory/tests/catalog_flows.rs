//! End-to-end flows through the public API: seed, edit, merge, render.

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};

use gearlog_core::{CategoryId, DomainError, ItemId, SequentialIdGenerator};
use gearlog_inventory::seed::demo_inventory;
use gearlog_inventory::{
    Catalog, CatalogSettings, Category, CategoryChoice, Event, InventoryStore, Item, ItemDraft,
    ItemPatch, RenameOutcome, SharedInventory,
};

fn demo_catalog() -> Catalog {
    let purchased = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    Catalog::new(
        SharedInventory::new(demo_inventory(purchased)),
        Arc::new(SequentialIdGenerator::starting_at(1000)),
        CatalogSettings::default(),
    )
}

#[test]
fn merging_laptops_into_keyboards() {
    let now = Utc::now();
    let inventory = SharedInventory::new(InventoryStore::from_parts(
        vec![Category::new("1", "Laptops"), Category::new("2", "Keyboards")],
        vec![Item::new("10", "1", "Laptop", now), Item::new("11", "2", "Keyboard", now)],
    ));

    inventory.merge_categories(&CategoryId::from("1"), &CategoryId::from("2"));

    let snapshot = inventory.snapshot();
    assert_eq!(snapshot.categories, vec![Category::new("2", "Keyboards")]);
    let refs: Vec<(&str, &str)> = snapshot
        .items
        .iter()
        .map(|i| (i.id.as_str(), i.category_id.as_str()))
        .collect();
    assert_eq!(refs, vec![("10", "2"), ("11", "2")]);
}

#[test]
fn editing_owner_of_present_and_absent_items() {
    let now = Utc::now();
    let mut bob = Item::new("10", "1", "Laptop", now);
    bob.owner = "Bob".to_string();
    let inventory = SharedInventory::new(InventoryStore::from_parts(
        vec![Category::new("1", "Laptops")],
        vec![bob.clone()],
    ));

    assert!(inventory.edit_item(&ItemId::from("10"), &ItemPatch::owner("Alice")));
    let after = inventory.snapshot();
    assert_eq!(after.items[0], Item { owner: "Alice".to_string(), ..bob });

    assert!(!inventory.edit_item(&ItemId::from("999"), &ItemPatch::owner("Alice")));
    assert_eq!(inventory.snapshot(), after);
}

#[test]
fn renaming_into_an_existing_name_folds_the_category() {
    let catalog = demo_catalog();
    let sub = catalog.inventory().subscribe();

    let outcome = catalog
        .rename_category(&CategoryId::from("3"), "laptops", None)
        .unwrap();

    assert_eq!(outcome, RenameOutcome::MergedInto(CategoryId::from("1")));
    let names: Vec<String> = catalog
        .category_summaries()
        .into_iter()
        .map(|s| s.name)
        .collect();
    assert_eq!(names, vec!["Laptops", "Keyboards", "Mouse"]);

    let event = sub.recv_timeout(Duration::from_secs(1)).unwrap();
    assert_eq!(event.event_type(), "inventory.category.merged");
}

#[test]
fn creating_an_existing_category_is_rejected() {
    let catalog = demo_catalog();
    let err = catalog.create_category("MONITORS", None).unwrap_err();
    assert_eq!(err, DomainError::conflict("category already exists"));
}

#[test]
fn recorded_items_show_up_in_summaries_and_log() {
    let catalog = demo_catalog();
    let mut draft = ItemDraft::new(
        CategoryChoice::Existing(CategoryId::from("3")),
        "Monitor 1",
        Utc.with_ymd_and_hms(2024, 5, 20, 0, 0, 0).unwrap(),
    );
    draft.owner = "Alice".to_string();
    draft.purchase_price = "250".to_string();

    let id = catalog.record_item(draft).unwrap();
    assert_eq!(id.as_str(), "1000");

    let monitors = catalog
        .category_summaries()
        .into_iter()
        .find(|s| s.name == "Monitors")
        .unwrap();
    assert_eq!(monitors.item_count, 1);

    let log = catalog.inventory_log();
    let entry = log.last().unwrap();
    assert_eq!(entry.item_id, id);
    assert_eq!(entry.category_name, "Monitors");
    assert_eq!(entry.owner, "Alice");
}

#[test]
fn clearing_then_merging_leaves_no_dangling_items() {
    let catalog = demo_catalog();

    assert_eq!(catalog.clear_category(&CategoryId::from("1")), 2);
    catalog
        .inventory()
        .merge_categories(&CategoryId::from("2"), &CategoryId::from("4"));

    let snapshot = catalog.inventory().snapshot();
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.items[0].category_id.as_str(), "4");
    assert!(catalog
        .inventory_log()
        .iter()
        .all(|entry| entry.category_name != "Unknown Category"));
}
