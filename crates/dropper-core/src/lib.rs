//! Probabilistic loot drop engine.
//!
//! A [`DropTable`] owns a set of [`DropItem`]s, each with a percentage
//! chance to drop. Chances above 100 guarantee whole units, the remainder
//! is rolled. A roll session resolves guaranteed drops, an optional pity
//! gift for the rarest item, and a series of single-winner trials until
//! the requested draw counts are met.

pub mod algorithm;
pub mod coerce;
pub mod config;
pub mod entry;
pub mod error;
pub mod item;
pub mod outcome;
pub mod table;

pub use algorithm::Algorithm;
pub use config::RollConfig;
pub use entry::{DropEntry, history_from_value};
pub use error::{LootError, LootResult};
pub use item::DropItem;
pub use outcome::DropOutcome;
pub use table::DropTable;
