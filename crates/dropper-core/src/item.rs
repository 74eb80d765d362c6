//! The per-item chance model.
//!
//! Chances are percentages: `1.0` is a 1% chance, `0.01` a 1-in-10 000
//! chance. Every full 100 is a guaranteed unit, so `120.0` always drops
//! one unit and has a 20% chance of a second.

use std::str::FromStr;

use rand::Rng;
use serde::Serialize;
use serde_json::Value;

use crate::algorithm::Algorithm;
use crate::coerce;
use crate::error::LootError;

/// A droppable item and its raw chance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropItem {
    id: String,
    chances: f64,
}

impl DropItem {
    /// Create an item. Negative, NaN and infinite chances become `0`.
    pub fn new(id: impl Into<String>, chances: f64) -> Self {
        let chances = if chances.is_finite() {
            chances.max(0.0)
        } else {
            0.0
        };
        Self {
            id: id.into(),
            chances,
        }
    }

    /// Build an item from a loosely typed `{ "id": .., "chances": .. }`
    /// value. Missing or mistyped fields fall back to `""` and `0`.
    pub fn from_value(value: &Value) -> Self {
        Self::new(
            coerce::string(coerce::field(value, "id")),
            coerce::number(coerce::field(value, "chances")),
        )
    }

    /// The item identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The raw chance in percent; may exceed 100.
    pub fn chances(&self) -> f64 {
        self.chances
    }

    /// Whether the item can take part in a roll at all.
    pub fn is_eligible(&self) -> bool {
        !self.id.is_empty() && self.chances > 0.0
    }

    /// Number of units that always drop: `floor(chances / 100)`.
    pub fn always_drop(&self) -> u64 {
        (self.chances / 100.0).floor() as u64
    }

    /// The residual chance rolled per trial, in `[0, 100)`.
    pub fn effective_chances(&self) -> f64 {
        (self.chances - (self.chances / 100.0).floor() * 100.0).max(0.0)
    }

    /// The effective chance remapped onto the gentle curve, in `[0, 100]`.
    ///
    /// Below 1% the chance is roughly tripled plus 0.05, between 1% and 5%
    /// (both inclusive) it gains a flat 2 points, and above 5% it gets a
    /// 10% relative boost.
    pub fn gentle_chances(&self) -> f64 {
        let x = self.effective_chances();
        if x <= 0.0 {
            return 0.0;
        }

        let chances = if x < 1.0 {
            x * (1.0 + 2500.0 / x / 500.0 / 100.0) + x.powi(2) * 200.0 / x / 100.0
        } else if x <= 5.0 {
            x * (1.0 + 200.0 / x / 100.0)
        } else {
            x * 1.1
        };

        chances.clamp(0.0, 100.0)
    }

    /// The per-trial chance for the given algorithm, in percent.
    pub fn chance_for(&self, algorithm: Algorithm) -> f64 {
        match algorithm {
            Algorithm::Normal => self.effective_chances(),
            Algorithm::Gentle => self.gentle_chances(),
        }
    }

    /// Run a single trial. Returns the item id on success.
    ///
    /// Draws a fresh uniform value in `[0, 1)` on every call and succeeds
    /// when it falls strictly below `chance_for(algorithm) / 100`, so a
    /// zero residual chance never succeeds, even on a draw of exactly 0.
    pub fn roll_once<R: Rng + ?Sized>(&self, algorithm: Algorithm, rng: &mut R) -> Option<&str> {
        let draw: f64 = rng.random();
        if draw < self.chance_for(algorithm) / 100.0 {
            Some(self.id.as_str())
        } else {
            None
        }
    }
}

impl FromStr for DropItem {
    type Err = LootError;

    /// Parse `id=chances`, e.g. `gold=150`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, chances) = s
            .split_once('=')
            .ok_or_else(|| LootError::InvalidItem(s.to_string()))?;
        let id = id.trim();
        let chances: f64 = chances
            .trim()
            .parse()
            .map_err(|_| LootError::InvalidItem(s.to_string()))?;
        if id.is_empty() {
            return Err(LootError::InvalidItem(s.to_string()));
        }
        Ok(Self::new(id, chances))
    }
}
