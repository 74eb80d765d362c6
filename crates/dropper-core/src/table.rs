//! The drop table: aggregates items and runs roll sessions.
//!
//! Items are kept sorted by ascending effective chance. A trial walks that
//! order and stops at the first item whose roll succeeds, so rare items
//! get the first opportunity and are not masked by common ones.

use rand::Rng;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::algorithm::Algorithm;
use crate::coerce;
use crate::config::RollConfig;
use crate::entry::DropEntry;
use crate::error::LootResult;
use crate::item::DropItem;
use crate::outcome::{DropOutcome, Tally};

/// Raw chance at or below which the rarest item can be gifted.
pub const GIFT_MAX_CHANCES: f64 = 5.0;

/// Multiplier applied to the rarest item's chance for the pity roll.
pub const GIFT_MULTIPLIER: f64 = 5.0;

/// An immutable, sorted set of droppable items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DropTable {
    items: Vec<DropItem>,
}

impl DropTable {
    /// Build a table, discarding items with an empty id or no chance.
    pub fn new(items: impl IntoIterator<Item = DropItem>) -> Self {
        let mut items: Vec<DropItem> = items.into_iter().filter(DropItem::is_eligible).collect();
        items.sort_by(|a, b| a.effective_chances().total_cmp(&b.effective_chances()));
        debug!(items = items.len(), "built drop table");
        Self { items }
    }

    /// Build a table from a loosely typed array of `{ id, chances }`.
    /// A non-array value yields an empty table.
    pub fn from_value(value: &Value) -> Self {
        Self::new(coerce::array(value).iter().map(DropItem::from_value))
    }

    /// Parse JSON text and build a table leniently from it.
    pub fn from_json(json: &str) -> LootResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(&value))
    }

    /// Items in roll order (ascending effective chance).
    pub fn items(&self) -> &[DropItem] {
        &self.items
    }

    /// Number of eligible items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if no item can drop.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The item with the lowest effective chance.
    pub fn rarest_item(&self) -> Option<&DropItem> {
        self.items.first()
    }

    /// Guaranteed units for every item whose chance reaches 100.
    pub fn mandatory(&self) -> Vec<DropEntry> {
        self.items
            .iter()
            .filter(|item| item.always_drop() >= 1)
            .map(|item| DropEntry::new(item.id(), item.always_drop()))
            .collect()
    }

    /// Pity roll for the rarest item.
    ///
    /// Requires `threshold > 0`, at least `threshold` history entries, a
    /// rarest item with a raw chance of at most 5, and no history entry
    /// already holding that item. The roll then succeeds when a uniform
    /// draw falls below five times the item's chance.
    ///
    /// The chance is compared in percent without dividing by 100, unlike
    /// [`DropItem::roll_once`]; any chance of 0.2% or more therefore
    /// gifts unconditionally.
    pub fn check_gift<R: Rng + ?Sized>(
        &self,
        algorithm: Algorithm,
        history: &[DropEntry],
        threshold: u32,
        rng: &mut R,
    ) -> Option<&DropItem> {
        if threshold == 0 || history.len() < threshold as usize {
            return None;
        }

        let rarest = self.rarest_item()?;
        if rarest.chances() > GIFT_MAX_CHANCES {
            return None;
        }

        let already_owned = history
            .iter()
            .any(|h| h.id == rarest.id() && h.quantity >= 1);
        if already_owned {
            return None;
        }

        let draw: f64 = rng.random();
        if draw < rarest.chance_for(algorithm) * GIFT_MULTIPLIER {
            trace!(id = rarest.id(), "pity gift granted");
            Some(rarest)
        } else {
            None
        }
    }

    /// Run a roll session with the process-wide thread-local generator.
    pub fn roll(&self, config: &RollConfig, history: &[DropEntry]) -> DropOutcome {
        self.resolve(config, history, &mut rand::rng())
    }

    /// Run a roll session.
    ///
    /// Starts from the guaranteed units, applies the pity gift when
    /// enabled, then runs trials while no trial has happened yet, fewer
    /// than `required` draws succeeded, or fewer than `max(required, max)`
    /// trials ran. Each trial yields at most one item: the first in table
    /// order whose roll succeeds. A non-zero `max_trials` stops the
    /// session early and marks the outcome as capped.
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        config: &RollConfig,
        history: &[DropEntry],
        rng: &mut R,
    ) -> DropOutcome {
        if self.is_empty() {
            return DropOutcome::default();
        }

        let required = u64::from(config.required);
        let floor = config.trial_floor();

        let mut tally = Tally::default();
        for entry in self.mandatory() {
            tally.add(&entry.id, entry.quantity);
        }

        let mut trials = 0u64;
        let mut successes = 0u64;
        let mut capped = false;

        let gifted = if config.gift > 0 {
            self.check_gift(config.algorithm, history, config.gift, rng)
                .map(|item| item.id().to_string())
        } else {
            None
        };
        if let Some(id) = &gifted {
            tally.add(id, 1);
            successes += 1;
            trials += 1;
        }

        while trials == 0 || successes < required || trials < floor {
            if config.max_trials > 0 && trials >= config.max_trials {
                warn!(trials, successes, required, "trial cap reached, stopping roll session early");
                capped = true;
                break;
            }

            let winner = self
                .items
                .iter()
                .find_map(|item| item.roll_once(config.algorithm, rng));
            if let Some(id) = winner {
                trace!(id, trial = trials, "trial won");
                tally.add(id, 1);
                successes += 1;
            }
            trials += 1;
        }

        debug!(
            algorithm = %config.algorithm,
            trials,
            successes,
            gifted = gifted.as_deref(),
            "roll session finished"
        );

        DropOutcome {
            drops: tally.into_entries(),
            trials,
            successes,
            gifted,
            capped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ConstRng;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;

    fn table(items: &[(&str, f64)]) -> DropTable {
        DropTable::new(items.iter().map(|(id, c)| DropItem::new(*id, *c)))
    }

    fn history(ids: &[&str]) -> Vec<DropEntry> {
        ids.iter().map(|id| DropEntry::new(*id, 1)).collect()
    }

    #[test]
    fn filters_and_sorts() {
        let t = table(&[("common", 80.0), ("", 10.0), ("none", 0.0), ("rare", 0.5), ("gold", 230.0)]);
        let ids: Vec<&str> = t.items().iter().map(DropItem::id).collect();
        assert_eq!(ids, vec!["rare", "gold", "common"]);
        assert_eq!(t.rarest_item().map(DropItem::id), Some("rare"));
    }

    #[test]
    fn construction_is_repeatable() {
        let items = [("a", 30.0), ("b", 3.0), ("c", 130.0), ("d", 3.0)];
        assert_eq!(table(&items), table(&items));
        let t = table(&items);
        let ids: Vec<&str> = t.items().iter().map(DropItem::id).collect();
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn mandatory_units() {
        let t = table(&[("gold", 250.0), ("gem", 2.0), ("coin", 100.0)]);
        assert_eq!(
            t.mandatory(),
            vec![DropEntry::new("coin", 1), DropEntry::new("gold", 2)]
        );
    }

    #[test]
    fn empty_table_yields_nothing() {
        let t = table(&[("", 50.0), ("gem", -1.0)]);
        assert!(t.is_empty());
        assert!(t.rarest_item().is_none());
        let cfg = RollConfig::default().with_required(5).with_max(10).with_gift(1);
        let outcome = t.resolve(&cfg, &history(&["x", "y"]), &mut ConstRng::min());
        assert_eq!(outcome, DropOutcome::default());
    }

    #[test]
    fn at_least_one_trial() {
        let t = table(&[("gem", 50.0)]);
        let cfg = RollConfig::default().with_required(0).with_max(0);
        let outcome = t.resolve(&cfg, &[], &mut ConstRng::max());
        assert_eq!(outcome.trials, 1);
        assert_eq!(outcome.successes, 0);
        assert!(outcome.is_empty());
    }

    #[test]
    fn rarest_wins_every_contested_trial() {
        let t = table(&[("common", 90.0), ("rare", 1.0)]);
        let cfg = RollConfig::default().with_required(3);
        let outcome = t.resolve(&cfg, &[], &mut ConstRng::min());
        assert_eq!(outcome.drops, vec![DropEntry::new("rare", 3)]);
        assert_eq!(outcome.trials, 3);
        assert_eq!(outcome.successes, 3);
    }

    #[test]
    fn max_sets_trial_floor() {
        let t = table(&[("gem", 10.0)]);
        let cfg = RollConfig::default().with_required(0).with_max(7);
        let outcome = t.resolve(&cfg, &[], &mut ConstRng::max());
        assert_eq!(outcome.trials, 7);

        let outcome = t.resolve(&cfg, &[], &mut ConstRng::min());
        assert_eq!(outcome.trials, 7);
        assert_eq!(outcome.quantity_of("gem"), 7);
    }

    #[test]
    fn negative_max_is_ignored() {
        let t = table(&[("gem", 10.0)]);
        let cfg = RollConfig::default().with_required(2).with_max(-5);
        let outcome = t.resolve(&cfg, &[], &mut ConstRng::min());
        assert_eq!(outcome.trials, 2);
        assert_eq!(outcome.successes, 2);
    }

    #[test]
    fn mandatory_and_rolled_units_merge() {
        let t = table(&[("gold", 150.0)]);
        let cfg = RollConfig::default().with_required(2);
        let outcome = t.resolve(&cfg, &[], &mut ConstRng::min());
        assert_eq!(outcome.drops, vec![DropEntry::new("gold", 3)]);
    }

    #[test]
    fn duplicate_huge_items_do_not_overflow() {
        let t = table(&[("gold", 1e21), ("gold", 1e21)]);
        let cfg = RollConfig::default().with_required(0);
        let outcome = t.resolve(&cfg, &[], &mut ConstRng::max());
        assert_eq!(outcome.drops, vec![DropEntry::new("gold", u64::MAX)]);
        assert_eq!(outcome.total_quantity(), u64::MAX);
    }

    #[test]
    fn trial_cap_stops_hopeless_session() {
        let t = table(&[("dust", 0.0001)]);
        let cfg = RollConfig::default().with_required(1).with_max_trials(50);
        let outcome = t.resolve(&cfg, &[], &mut ConstRng::max());
        assert!(outcome.capped);
        assert_eq!(outcome.trials, 50);
        assert_eq!(outcome.successes, 0);
        assert!(outcome.is_empty());
    }

    #[test]
    fn cap_does_not_touch_normal_sessions() {
        let t = table(&[("gem", 10.0)]);
        let cfg = RollConfig::default().with_required(3).with_max_trials(50);
        let outcome = t.resolve(&cfg, &[], &mut ConstRng::min());
        assert!(!outcome.capped);
    }

    #[test]
    fn gold_and_gem_end_to_end() {
        let t = table(&[("gold", 150.0), ("gem", 2.0)]);
        let cfg = RollConfig::default().with_required(1).with_max(0);
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome = t.resolve(&cfg, &[], &mut rng);
            assert!(outcome.quantity_of("gold") >= 1);
            assert_eq!(outcome.drops[0].id, "gold");
            assert!(outcome.trials >= 1);
            assert!(outcome.successes >= 1);
        }
    }

    #[test]
    fn seeded_sessions_are_deterministic() {
        let t = table(&[("gold", 150.0), ("gem", 2.0), ("herb", 35.0)]);
        let cfg = RollConfig::default().with_required(2).with_max(6);
        let a = t.resolve(&cfg, &[], &mut StdRng::seed_from_u64(7));
        let b = t.resolve(&cfg, &[], &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn gift_granted_after_enough_history() {
        let t = table(&[("gem", 2.0), ("herb", 50.0)]);
        let cfg = RollConfig::default().with_gift(5);
        let past = history(&["herb", "herb", "herb", "herb", "herb"]);
        let outcome = t.resolve(&cfg, &past, &mut ConstRng::min());
        assert_eq!(outcome.gifted.as_deref(), Some("gem"));
        assert!(outcome.quantity_of("gem") >= 1);
        // The gift counts as the one required draw and the one trial.
        assert_eq!(outcome.trials, 1);
        assert_eq!(outcome.successes, 1);
    }

    #[test]
    fn gift_needs_threshold_history() {
        let t = table(&[("gem", 2.0)]);
        let past = history(&["herb", "herb", "herb", "herb"]);
        assert!(t.check_gift(Algorithm::Normal, &past, 5, &mut ConstRng::min()).is_none());
        assert!(t.check_gift(Algorithm::Normal, &past, 0, &mut ConstRng::min()).is_none());
        assert!(t.check_gift(Algorithm::Normal, &past, 4, &mut ConstRng::min()).is_some());
    }

    #[test]
    fn gift_suppressed_when_already_owned() {
        let t = table(&[("gem", 2.0), ("herb", 50.0)]);
        let past = history(&["herb", "gem", "herb", "herb", "herb"]);
        assert!(t.check_gift(Algorithm::Normal, &past, 5, &mut ConstRng::min()).is_none());

        let cfg = RollConfig::default().with_gift(5);
        let outcome = t.resolve(&cfg, &past, &mut ConstRng::min());
        assert!(outcome.gifted.is_none());
    }

    #[test]
    fn gift_ignores_zero_quantity_history() {
        let t = table(&[("gem", 2.0)]);
        let mut past = history(&["herb", "herb", "herb", "herb"]);
        past.push(DropEntry::new("gem", 0));
        assert!(t.check_gift(Algorithm::Normal, &past, 5, &mut ConstRng::min()).is_some());
    }

    #[test]
    fn gift_only_for_rare_items() {
        let t = table(&[("herb", 5.5)]);
        let past = history(&["x"; 5]);
        assert!(t.check_gift(Algorithm::Normal, &past, 5, &mut ConstRng::min()).is_none());

        let t = table(&[("herb", 5.0)]);
        assert!(t.check_gift(Algorithm::Normal, &past, 5, &mut ConstRng::min()).is_some());
    }

    #[test]
    fn gift_compares_against_unscaled_chance() {
        let past = history(&["x"; 5]);

        // 1% * 5 = 5, above any draw in [0, 1).
        let t = table(&[("gem", 1.0)]);
        assert!(t.check_gift(Algorithm::Normal, &past, 5, &mut ConstRng::max()).is_some());

        // 0.1% * 5 = 0.5, below the maximum draw.
        let t = table(&[("gem", 0.1)]);
        assert!(t.check_gift(Algorithm::Normal, &past, 5, &mut ConstRng::max()).is_none());
        // Gentle lifts 0.1 to 0.35, times 5 = 1.75.
        assert!(t.check_gift(Algorithm::Gentle, &past, 5, &mut ConstRng::max()).is_some());
    }

    #[test]
    fn gift_disabled_by_zero_threshold() {
        let t = table(&[("gem", 2.0), ("herb", 50.0)]);
        let cfg = RollConfig::default().with_gift(0);
        let outcome = t.resolve(&cfg, &history(&["herb"; 10]), &mut ConstRng::max());
        assert!(outcome.gifted.is_none());
    }

    #[test]
    fn from_json_is_lenient() {
        let t = DropTable::from_json(
            r#"[{"id": "gold", "chances": 150}, {"id": 3, "chances": 5}, {"chances": 9}, "junk"]"#,
        )
        .unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.items()[0].id(), "gold");

        assert!(DropTable::from_value(&json!({"id": "gold"})).is_empty());
        assert!(DropTable::from_json("[").is_err());
    }

    #[test]
    fn roll_uses_thread_rng() {
        let t = table(&[("gold", 200.0)]);
        let outcome = t.roll(&RollConfig::default().with_required(0), &[]);
        assert_eq!(outcome.quantity_of("gold"), 2);
        assert_eq!(outcome.trials, 1);
    }

    #[test]
    fn table_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DropTable>();
    }
}
