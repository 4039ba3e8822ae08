//! Demo inventory loaded on first start.

use chrono::{DateTime, Utc};

use crate::category::Category;
use crate::item::Item;
use crate::store::InventoryStore;

const LAPTOPS_IMAGE: &str =
    "https://png.pngtree.com/png-clipart/20191122/original/pngtree-laptop-icon-png-image_5184713.jpg";
const KEYBOARDS_IMAGE: &str = "https://png.pngtree.com/png-clipart/20220916/original/pngtree-3d-keyboard-with-wire-color-black-text-white-png-image_8620523.png";
const MONITORS_IMAGE: &str =
    "https://png.pngtree.com/png-clipart/20190611/original/pngtree-vector-computer-monitor-png-image_2330278.jpg";
const MOUSE_IMAGE: &str = "https://png.pngtree.com/png-clipart/20190629/original/pngtree-black-computer-mouse-scroll-internet-png-image_4074897.jpg";

/// Four categories and three items, all purchased at `purchased_at`.
pub fn demo_inventory(purchased_at: DateTime<Utc>) -> InventoryStore {
    let categories = vec![
        Category::new("1", "Laptops").with_image(LAPTOPS_IMAGE),
        Category::new("2", "Keyboards").with_image(KEYBOARDS_IMAGE),
        Category::new("3", "Monitors").with_image(MONITORS_IMAGE),
        Category::new("4", "Mouse").with_image(MOUSE_IMAGE),
    ];

    let items = vec![
        demo_item(
            DemoItem {
                id: "1",
                category_id: "1",
                name: "Laptop 1",
                serial_no: "ABC123",
                owner: "John Doe",
                is_deployed: false,
                price: "1000",
                mac: "00:0a:95:9d:68:16",
                ip: "192.168.1.1",
            },
            purchased_at,
        ),
        demo_item(
            DemoItem {
                id: "2",
                category_id: "1",
                name: "Laptop 2",
                serial_no: "DEF456",
                owner: "Jane Doe",
                is_deployed: true,
                price: "1200",
                mac: "00:0a:95:9d:68:17",
                ip: "192.168.1.2",
            },
            purchased_at,
        ),
        demo_item(
            DemoItem {
                id: "3",
                category_id: "2",
                name: "Keyboard 1",
                serial_no: "GHI789",
                owner: "John Smith",
                is_deployed: true,
                price: "100",
                mac: "00:0a:95:9d:68:18",
                ip: "192.168.1.3",
            },
            purchased_at,
        ),
    ];

    InventoryStore::from_parts(categories, items)
}

struct DemoItem {
    id: &'static str,
    category_id: &'static str,
    name: &'static str,
    serial_no: &'static str,
    owner: &'static str,
    is_deployed: bool,
    price: &'static str,
    mac: &'static str,
    ip: &'static str,
}

fn demo_item(d: DemoItem, purchased_at: DateTime<Utc>) -> Item {
    Item {
        serial_no: d.serial_no.to_string(),
        owner: d.owner.to_string(),
        is_deployed: d.is_deployed,
        purchase_price: d.price.to_string(),
        purchase_from: "Company".to_string(),
        mac_address: d.mac.to_string(),
        ip_address: d.ip.to_string(),
        ..Item::new(d.id, d.category_id, d.name, purchased_at)
    }
}
