//! Item/quantity pairs used for history and results.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coerce;
use crate::error::LootError;

/// A quantity of one item, either dropped this session or recorded in
/// the caller's history.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DropEntry {
    /// The item identifier.
    pub id: String,
    /// How many units.
    pub quantity: u64,
}

impl DropEntry {
    /// Create an entry.
    pub fn new(id: impl Into<String>, quantity: u64) -> Self {
        Self {
            id: id.into(),
            quantity,
        }
    }

    /// Build an entry from a loosely typed `{ "id": .., "quantity": .. }`
    /// value. The quantity is rounded and floored at zero.
    pub fn from_value(value: &Value) -> Self {
        let quantity = coerce::number(coerce::field(value, "quantity")).round().max(0.0);
        Self::new(coerce::string(coerce::field(value, "id")), quantity as u64)
    }
}

impl std::fmt::Display for DropEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} x{}", self.id, self.quantity)
    }
}

impl FromStr for DropEntry {
    type Err = LootError;

    /// Parse `id` (one unit) or `id:quantity`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LootError::InvalidEntry(s.to_string());
        let (id, quantity) = match s.split_once(':') {
            Some((id, qty)) => (id.trim(), qty.trim().parse::<u64>().map_err(|_| invalid())?),
            None => (s.trim(), 1),
        };
        if id.is_empty() {
            return Err(invalid());
        }
        Ok(Self::new(id, quantity))
    }
}

/// Coerce an array-like value into a history list. Anything that is not
/// an array yields an empty history.
pub fn history_from_value(value: &Value) -> Vec<DropEntry> {
    coerce::array(value)
        .iter()
        .map(DropEntry::from_value)
        .collect()
}
