//! Inventory domain module.
//!
//! Equipment items grouped into categories, held in memory. The
//! [`InventoryStore`] is the mutation contract (add / edit / delete / merge),
//! [`SharedInventory`] is the single-writer handle every consumer shares, and
//! [`Catalog`] is the validating service the screens call.

pub mod capability;
pub mod catalog;
pub mod category;
pub mod event;
pub mod item;
pub mod seed;
pub mod shared;
pub mod store;
pub mod validation;

pub use capability::{DatePicker, ImagePicker};
pub use catalog::{
    Catalog, CatalogSettings, CategoryChoice, CategorySummary, ItemDraft, LogEntry, RenameOutcome,
};
pub use category::{Category, CategoryPatch};
pub use event::{ChangeFeed, Event, InventoryEvent, Subscription};
pub use item::{Item, ItemPatch};
pub use shared::{SharedInventory, Transaction};
pub use store::{InventorySnapshot, InventoryStore, MergeOutcome};
