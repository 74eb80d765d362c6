//! Settings for a single roll session.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::algorithm::Algorithm;
use crate::coerce;
use crate::error::LootResult;

/// Default safety cap on trials per session.
pub const DEFAULT_MAX_TRIALS: u64 = 100_000;

/// Configuration for a roll session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollConfig {
    /// Chance curve used for trials and the pity roll.
    pub algorithm: Algorithm,
    /// Minimum number of successful draws, not counting guaranteed units.
    pub required: u32,
    /// Minimum number of trials. Negative values have no effect.
    pub max: i64,
    /// History length needed before the rarest item can be gifted.
    /// 0 disables gifts.
    pub gift: u32,
    /// Hard stop on trials per session. 0 = unlimited.
    pub max_trials: u64,
}

impl Default for RollConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Normal,
            required: 1,
            max: 0,
            gift: 0,
            max_trials: DEFAULT_MAX_TRIALS,
        }
    }
}

impl RollConfig {
    /// Parse a JSON object. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> LootResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a configuration from a loosely typed value, coercing every
    /// field. Counts are rounded; `required` and `gift` are floored at zero
    /// and an unrecognised algorithm falls back to NORMAL.
    pub fn from_value(value: &Value) -> Self {
        let defaults = Self::default();
        let read = |key: &str, fallback: f64| match value.get(key) {
            Some(v) => coerce::number(v).round(),
            None => fallback,
        };

        Self {
            algorithm: coerce::string(coerce::field(value, "algorithm"))
                .parse()
                .unwrap_or_default(),
            required: read("required", f64::from(defaults.required)).max(0.0) as u32,
            max: read("max", defaults.max as f64) as i64,
            gift: read("gift", f64::from(defaults.gift)).max(0.0) as u32,
            max_trials: read("max_trials", defaults.max_trials as f64).max(0.0) as u64,
        }
    }

    /// Set the chance curve.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the minimum number of successful draws.
    pub fn with_required(mut self, required: u32) -> Self {
        self.required = required;
        self
    }

    /// Set the minimum number of trials.
    pub fn with_max(mut self, max: i64) -> Self {
        self.max = max;
        self
    }

    /// Set the pity threshold (0 disables gifts).
    pub fn with_gift(mut self, gift: u32) -> Self {
        self.gift = gift;
        self
    }

    /// Set the trial cap (0 = unlimited).
    pub fn with_max_trials(mut self, max_trials: u64) -> Self {
        self.max_trials = max_trials;
        self
    }

    /// The number of trials the session must reach: `max(0, required, max)`.
    pub fn trial_floor(&self) -> u64 {
        self.max.max(i64::from(self.required)).max(0) as u64
    }
}
