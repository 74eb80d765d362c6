//! The result of a roll session.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entry::DropEntry;

/// Everything a roll session produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropOutcome {
    /// Dropped items in first-seen order, guaranteed units first.
    pub drops: Vec<DropEntry>,
    /// Trials performed, including a granted gift.
    pub trials: u64,
    /// Trials that produced a drop, including a granted gift.
    pub successes: u64,
    /// The item gifted by the pity roll, if any.
    pub gifted: Option<String>,
    /// Whether the trial cap stopped the session early.
    pub capped: bool,
}

impl DropOutcome {
    /// Quantity of `id` dropped this session (0 if absent).
    pub fn quantity_of(&self, id: &str) -> u64 {
        self.drops
            .iter()
            .find(|d| d.id == id)
            .map(|d| d.quantity)
            .unwrap_or(0)
    }

    /// Sum of every dropped quantity.
    pub fn total_quantity(&self) -> u64 {
        self.drops.iter().map(|d| d.quantity).fold(0, u64::saturating_add)
    }

    /// Returns true if nothing dropped.
    pub fn is_empty(&self) -> bool {
        self.drops.is_empty()
    }

    /// Consume the outcome, keeping only the drop list.
    pub fn into_drops(self) -> Vec<DropEntry> {
        self.drops
    }
}

/// Ordered id -> quantity accumulator.
#[derive(Debug, Default)]
pub(crate) struct Tally {
    entries: Vec<DropEntry>,
    index: HashMap<String, usize>,
}

impl Tally {
    /// Add `quantity` units of `id`, merging with an existing entry.
    /// Quantities saturate at `u64::MAX`.
    pub(crate) fn add(&mut self, id: &str, quantity: u64) {
        match self.index.get(id) {
            Some(&i) => {
                let entry = &mut self.entries[i];
                entry.quantity = entry.quantity.saturating_add(quantity);
            }
            None => {
                self.index.insert(id.to_string(), self.entries.len());
                self.entries.push(DropEntry::new(id, quantity));
            }
        }
    }

    pub(crate) fn into_entries(self) -> Vec<DropEntry> {
        self.entries
    }
}
