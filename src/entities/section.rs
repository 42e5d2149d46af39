//! Section - a named, independently addressable stretch of a sequence
//! ("Warm Up", "Standing Flow", "Cool Down").

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::item::Item;

/// Named ordered run of poses and groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Stable identifier, never reused after creation
    pub uuid: Uuid,

    /// Human-readable name
    pub name: String,

    /// Items played in order
    pub items: Vec<Item>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// Builder-style item list for sequence authoring code
    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }

    pub fn add_item(&mut self, item: impl Into<Item>) {
        self.items.push(item.into());
    }

    /// Get item by uuid (cloned value, copy-on-write editing)
    pub fn get_item(&self, uuid: Uuid) -> Option<Item> {
        self.items.iter().find(|i| i.uuid() == uuid).cloned()
    }

    /// Replace the item carrying the same uuid with `item`.
    /// Returns false if no item matches.
    pub fn update_item(&mut self, item: Item) -> bool {
        let uuid = item.uuid();
        match self.items.iter_mut().find(|i| i.uuid() == uuid) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    pub fn remove_item(&mut self, uuid: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.uuid() != uuid);
        self.items.len() != before
    }

    /// Total duration in seconds
    pub fn duration_secs(&self) -> u64 {
        self.items.iter().map(|i| i.duration_secs()).sum()
    }
}
