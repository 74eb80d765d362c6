//! Chance curve selection.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LootError;

/// Which chance curve a roll uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Algorithm {
    /// Roll the exact effective chance.
    #[default]
    Normal,
    /// Roll the smoothed gentle chance, which favours very rare and very
    /// common items.
    Gentle,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Gentle => write!(f, "GENTLE"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = LootError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "gentle" => Ok(Self::Gentle),
            _ => Err(LootError::UnknownAlgorithm(s.to_string())),
        }
    }
}
