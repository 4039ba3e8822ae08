//! Change notifications for inventory mutations.
//!
//! Views re-render from a fresh snapshot whenever the store changes. Each
//! effective mutation is announced as an [`InventoryEvent`] on a [`ChangeFeed`];
//! mutations that turned out to be no-ops announce nothing.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use gearlog_core::{CategoryId, ItemId};

/// A fact about something that happened to the inventory.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name (e.g. "inventory.item.added").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the mutation happened.
    fn occurred_at(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InventoryEvent {
    ItemAdded {
        item_id: ItemId,
        category_id: CategoryId,
        occurred_at: DateTime<Utc>,
    },
    ItemEdited {
        item_id: ItemId,
        occurred_at: DateTime<Utc>,
    },
    ItemDeleted {
        item_id: ItemId,
        occurred_at: DateTime<Utc>,
    },
    CategoryAdded {
        category_id: CategoryId,
        occurred_at: DateTime<Utc>,
    },
    CategoryEdited {
        category_id: CategoryId,
        renamed: bool,
        occurred_at: DateTime<Utc>,
    },
    CategoriesMerged {
        source: CategoryId,
        target: CategoryId,
        moved_items: usize,
        occurred_at: DateTime<Utc>,
    },
}

impl Event for InventoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::ItemAdded { .. } => "inventory.item.added",
            InventoryEvent::ItemEdited { .. } => "inventory.item.edited",
            InventoryEvent::ItemDeleted { .. } => "inventory.item.deleted",
            InventoryEvent::CategoryAdded { .. } => "inventory.category.added",
            InventoryEvent::CategoryEdited { .. } => "inventory.category.edited",
            InventoryEvent::CategoriesMerged { .. } => "inventory.category.merged",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InventoryEvent::ItemAdded { occurred_at, .. }
            | InventoryEvent::ItemEdited { occurred_at, .. }
            | InventoryEvent::ItemDeleted { occurred_at, .. }
            | InventoryEvent::CategoryAdded { occurred_at, .. }
            | InventoryEvent::CategoryEdited { occurred_at, .. }
            | InventoryEvent::CategoriesMerged { occurred_at, .. } => *occurred_at,
        }
    }
}

/// Receiving end of a [`ChangeFeed`]. Each subscription sees every event
/// published after it was created, in publish order.
#[derive(Debug)]
pub struct Subscription<E> {
    receiver: Receiver<E>,
}

impl<E> Subscription<E> {
    /// Try to receive an event without blocking.
    pub fn try_recv(&self) -> Result<E, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for an event.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<E, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Everything published so far that has not been received yet.
    pub fn drain(&self) -> Vec<E> {
        self.receiver.try_iter().collect()
    }
}

/// In-process fan-out of events to any number of subscribers.
///
/// Publishing never fails: subscribers whose receiver was dropped are pruned.
#[derive(Debug)]
pub struct ChangeFeed<E> {
    subscribers: Mutex<Vec<mpsc::Sender<E>>>,
}

impl<E> Default for ChangeFeed<E> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<E: Event> ChangeFeed<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, event: E) {
        let mut subs = self
            .subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        tracing::trace!(event_type = event.event_type(), subscribers = subs.len(), "publish");
        subs.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscribe(&self) -> Subscription<E> {
        let (tx, rx) = mpsc::channel();
        self.subscribers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(tx);
        Subscription { receiver: rx }
    }
}
