//! Inventory item records and their partial updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gearlog_core::{CategoryId, Entity, ItemId};

/// A single tracked physical asset.
///
/// `category_id` should resolve to an existing category, but nothing enforces
/// it on write: an item can be orphaned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub category_id: CategoryId,
    pub item_name: String,
    pub serial_no: String,
    pub owner: String,
    pub is_servicable: bool,
    pub is_deployed: bool,
    pub date_of_purchase: DateTime<Utc>,
    /// Numeric value kept as entered.
    pub purchase_price: String,
    pub purchase_from: String,
    pub mac_address: String,
    pub ip_address: String,
    pub remarks: String,
}

impl Item {
    /// An item with empty descriptive fields, servicable and deployed.
    pub fn new(
        id: impl Into<ItemId>,
        category_id: impl Into<CategoryId>,
        item_name: impl Into<String>,
        date_of_purchase: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            category_id: category_id.into(),
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

    /// Merge the fields present in `patch` into this record.
    pub fn apply(&mut self, patch: &ItemPatch) {
        fn set<T: Clone>(field: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *field = v.clone();
            }
        }

        set(&mut self.category_id, &patch.category_id);
        set(&mut self.item_name, &patch.item_name);
        set(&mut self.serial_no, &patch.serial_no);
        set(&mut self.owner, &patch.owner);
        set(&mut self.is_servicable, &patch.is_servicable);
        set(&mut self.is_deployed, &patch.is_deployed);
        set(&mut self.date_of_purchase, &patch.date_of_purchase);
        set(&mut self.purchase_price, &patch.purchase_price);
        set(&mut self.purchase_from, &patch.purchase_from);
        set(&mut self.mac_address, &patch.mac_address);
        set(&mut self.ip_address, &patch.ip_address);
        set(&mut self.remarks, &patch.remarks);
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Partial update for an [`Item`]. Every field is optional; the id is not
/// patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    pub category_id: Option<CategoryId>,
    pub item_name: Option<String>,
    pub serial_no: Option<String>,
    pub owner: Option<String>,
    pub is_servicable: Option<bool>,
    pub is_deployed: Option<bool>,
    pub date_of_purchase: Option<DateTime<Utc>>,
    pub purchase_price: Option<String>,
    pub purchase_from: Option<String>,
    pub mac_address: Option<String>,
    pub ip_address: Option<String>,
    pub remarks: Option<String>,
}

impl ItemPatch {
    pub fn owner(owner: impl Into<String>) -> Self {
        Self {
            owner: Some(owner.into()),
            ..Self::default()
        }
    }

    pub fn category(category_id: impl Into<CategoryId>) -> Self {
        Self {
            category_id: Some(category_id.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
