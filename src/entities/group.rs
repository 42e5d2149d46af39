//! GroupBlock - "repeat this sub-sequence N times", with per-round extras
//! and per-round item swaps.
//!
//! Rounds are numbered 1..=sets. Two per-round mechanisms exist:
//! - `RoundOverride`: extra items appended after the base items of one round
//! - `ItemSubstitute`: replaces the base item at one index for one round
//!
//! Overrides are unique per round, substitutes unique per (round, index).
//! Both are enforced by the replace-on-insert setters below; stale entries
//! left behind by a `sets` shrink are dropped by `prune_stale_rounds()`.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::item::Item;

/// Extra items appended after one round's base items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundOverride {
    /// Round this override fires on (1-based, must lie in 1..=sets)
    pub round: u32,

    /// Repeat count for the override body itself (None = once)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,

    /// Items appended after the round's base items
    pub items: Vec<Item>,
}

impl RoundOverride {
    pub fn new(round: u32, items: Vec<Item>) -> Self {
        Self { round, sets: None, items }
    }

    /// How many times the override body is emitted
    pub fn repeats(&self) -> u32 {
        self.sets.unwrap_or(1)
    }
}

/// In-place replacement of one base item for one round.
///
/// Does not change the round's length or item positions. An `item_index`
/// past the end of the base items is inert at flattening time, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemSubstitute {
    /// Round this substitute fires on (1-based)
    pub round: u32,

    /// Position within the owning group's base `items`
    pub item_index: usize,

    /// Replacement item for that slot
    pub item: Item,
}

impl ItemSubstitute {
    pub fn new(round: u32, item_index: usize, item: Item) -> Self {
        Self { round, item_index, item }
    }
}

/// Repeated grouping of pose steps and nested groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupBlock {
    /// Stable identifier, never reused after creation
    pub uuid: Uuid,

    /// Number of rounds (always >= 1)
    pub sets: u32,

    /// Base items, played in order every round
    pub items: Vec<Item>,

    /// Per-round appended extras, unique by round
    #[serde(default)]
    pub round_overrides: Vec<RoundOverride>,

    /// Per-round in-place swaps, unique by (round, item_index)
    #[serde(default)]
    pub item_substitutes: Vec<ItemSubstitute>,
}

impl GroupBlock {
    pub fn new(sets: u32) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            sets: sets.max(1),
            items: Vec::new(),
            round_overrides: Vec::new(),
            item_substitutes: Vec::new(),
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

    /// Replace the base item at `index` (whole-value update).
    /// Returns false if the index is out of range.
    pub fn replace_item(&mut self, index: usize, item: impl Into<Item>) -> bool {
        match self.items.get_mut(index) {
            Some(slot) => {
                *slot = item.into();
                true
            }
            None => false,
        }
    }

    pub fn remove_item(&mut self, index: usize) -> Option<Item> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Change the round count. Shrinking drops overrides and substitutes
    /// whose round fell out of range.
    pub fn set_sets(&mut self, sets: u32) {
        self.sets = sets.max(1);
        self.prune_stale_rounds();
    }

    /// Install or replace the override for its round.
    /// Rejects rounds outside 1..=sets.
    pub fn set_round_override(&mut self, ovr: RoundOverride) -> bool {
        if ovr.round < 1 || ovr.round > self.sets {
            warn!(
                "Group {}: override round {} outside 1..={}, ignored",
                self.uuid, ovr.round, self.sets
            );
            return false;
        }
        if let Some(existing) = self.round_overrides.iter_mut().find(|o| o.round == ovr.round) {
            *existing = ovr;
        } else {
            self.round_overrides.push(ovr);
        }
        true
    }

    pub fn remove_round_override(&mut self, round: u32) -> bool {
        let before = self.round_overrides.len();
        self.round_overrides.retain(|o| o.round != round);
        self.round_overrides.len() != before
    }

    /// Override for one round, if any
    pub fn round_override(&self, round: u32) -> Option<&RoundOverride> {
        self.round_overrides.iter().find(|o| o.round == round)
    }

    /// Install or replace the substitute for its (round, item_index) slot.
    /// Rejects rounds outside 1..=sets; the index is left unvalidated
    /// (out-of-range substitutes are inert at flattening time).
    pub fn set_item_substitute(&mut self, sub: ItemSubstitute) -> bool {
        if sub.round < 1 || sub.round > self.sets {
            warn!(
                "Group {}: substitute round {} outside 1..={}, ignored",
                self.uuid, sub.round, self.sets
            );
            return false;
        }
        if let Some(existing) = self
            .item_substitutes
            .iter_mut()
            .find(|s| s.round == sub.round && s.item_index == sub.item_index)
        {
            *existing = sub;
        } else {
            self.item_substitutes.push(sub);
        }
        true
    }

    pub fn remove_item_substitute(&mut self, round: u32, item_index: usize) -> bool {
        let before = self.item_substitutes.len();
        self.item_substitutes
            .retain(|s| !(s.round == round && s.item_index == item_index));
        self.item_substitutes.len() != before
    }

    /// Substitute item for one (round, index) slot, if any
    pub fn substitute_for(&self, round: u32, item_index: usize) -> Option<&Item> {
        self.item_substitutes
            .iter()
            .find(|s| s.round == round && s.item_index == item_index)
            .map(|s| &s.item)
    }

    /// Drop overrides and substitutes whose round exceeds `sets`
    pub fn prune_stale_rounds(&mut self) {
        let sets = self.sets;
        let before = self.round_overrides.len() + self.item_substitutes.len();
        self.round_overrides.retain(|o| o.round >= 1 && o.round <= sets);
        self.item_substitutes.retain(|s| s.round >= 1 && s.round <= sets);
        let dropped = before - (self.round_overrides.len() + self.item_substitutes.len());
        if dropped > 0 {
            debug!("Group {}: pruned {} stale round entries", self.uuid, dropped);
        }
    }

    /// Base items for one round with that round's substitutes applied.
    /// Substitutes pointing past the end of the base items are skipped.
    pub fn effective_items(&self, round: u32) -> Vec<&Item> {
        self.items
            .iter()
            .enumerate()
            .map(|(idx, base)| self.substitute_for(round, idx).unwrap_or(base))
            .collect()
    }

    /// Total duration in seconds.
    ///
    /// Base items count `sets` times; override bodies add on top. Item
    /// substitutes do NOT participate: the displayed total always uses the
    /// base items, even when a substitute's duration differs (the flattener
    /// schedules the substitute's actual duration).
    pub fn duration_secs(&self) -> u64 {
        let base: u64 = self.items.iter().map(|i| i.duration_secs()).sum();
        let overrides: u64 = self
            .round_overrides
            .iter()
            .map(|o| {
                let body: u64 = o.items.iter().map(|i| i.duration_secs()).sum();
                body * o.repeats() as u64
            })
            .sum();
        base * self.sets as u64 + overrides
    }
}
