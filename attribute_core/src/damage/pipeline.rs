//! Damage pipeline - turning a snapshot + hit context into a DamageResult

use super::{DamageContext, RollSource};
use crate::attribute::AttributeSnapshot;
use crate::config::DamageConstants;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Resolved magnitude of one hit, before armor/health mitigation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageResult {
    pub magnitude: f64,
    pub is_critical: bool,
    pub is_lucky: bool,
    /// Successful lucky rolls; the lucky multiplier is `1 + lucky_stacks`
    pub lucky_stacks: u32,
}

impl DamageResult {
    /// Result of a hit with no positive base magnitude
    pub fn none() -> Self {
        DamageResult {
            magnitude: 0.0,
            is_critical: false,
            is_lucky: false,
            lucky_stacks: 0,
        }
    }
}

/// Pure damage computation. Never reads or writes Armor/Health.
#[derive(Debug, Clone, Default)]
pub struct DamagePipeline {
    constants: DamageConstants,
}

impl DamagePipeline {
    pub fn new(constants: DamageConstants) -> Self {
        DamagePipeline { constants }
    }

    pub fn constants(&self) -> &DamageConstants {
        &self.constants
    }

    /// Resolve a hit. Order matters and is fixed:
    /// 1. Base magnitude from `InDamage` (non-positive short-circuits, no rolls)
    /// 2. Critical roll (forced on headshots), only if the multiplier exceeds 1
    /// 3. Lucky rolls, one extra multiplier stack per success
    pub fn resolve(
        &self,
        snapshot: &AttributeSnapshot,
        context: &DamageContext,
        rolls: &mut impl RollSource,
    ) -> DamageResult {
        // NaN falls through here too
        if !(snapshot.in_damage > 0.0) {
            return DamageResult::none();
        }
        let mut magnitude = snapshot.in_damage;

        let mut critical_chance = snapshot.critical_chance;
        if context.is_headshot(&self.constants.crit) {
            critical_chance = 100.0;
        }

        let mut is_critical = false;
        if snapshot.critical_multiplier > 1.0 {
            is_critical = rolls.roll() <= critical_chance;
            if is_critical {
                magnitude *= snapshot.critical_multiplier;
            }
        }

        let stack_cost = self.constants.lucky.stack_cost();
        let max_stacks = self.constants.lucky.max_stacks;
        let mut lucky_chance = snapshot.lucky_chance;
        let mut lucky_stacks = 0u32;
        while lucky_chance > 0.0 && lucky_stacks < max_stacks {
            if rolls.roll() > lucky_chance {
                break;
            }
            lucky_chance -= stack_cost;
            lucky_stacks += 1;
        }

        let is_lucky = lucky_stacks > 0;
        if is_lucky {
            magnitude *= 1.0 + f64::from(lucky_stacks);
        }

        // Huge inputs can overflow; keep the result writable
        magnitude = magnitude.min(f64::MAX);

        debug!(
            base = snapshot.in_damage,
            magnitude, is_critical, lucky_stacks, "damage after modification"
        );

        DamageResult {
            magnitude,
            is_critical,
            is_lucky,
            lucky_stacks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::damage::ScriptedRolls;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn snapshot(in_damage: f64) -> AttributeSnapshot {
        AttributeSnapshot {
            in_damage,
            critical_chance: 0.0,
            critical_multiplier: 3.0,
            lucky_chance: 0.0,
        }
    }

    #[test]
    fn test_plain_hit() {
        let pipeline = DamagePipeline::default();
        // Crit roll fails against 0% chance
        let mut rolls = ScriptedRolls::new([50.0]);
        let result = pipeline.resolve(&snapshot(30.0), &DamageContext::new(), &mut rolls);

        assert_eq!(result.magnitude, 30.0);
        assert!(!result.is_critical);
        assert!(!result.is_lucky);
        assert_eq!(rolls.drawn(), 1);
    }

    #[test]
    fn test_zero_and_negative_short_circuit() {
        let pipeline = DamagePipeline::default();
        for base in [0.0, -12.0, f64::NAN] {
            let mut rolls = ScriptedRolls::new([0.01, 0.01]);
            let mut snap = snapshot(base);
            snap.critical_chance = 100.0;
            snap.lucky_chance = 100.0;

            let result = pipeline.resolve(&snap, &DamageContext::new(), &mut rolls);
            assert_eq!(result, DamageResult::none());
            assert_eq!(rolls.drawn(), 0);
        }
    }

    #[test]
    fn test_critical_hit() {
        let pipeline = DamagePipeline::default();
        let mut snap = snapshot(10.0);
        snap.critical_chance = 25.0;

        let result = pipeline.resolve(&snap, &DamageContext::new(), &mut ScriptedRolls::new([25.0]));
        assert!(result.is_critical);
        assert_eq!(result.magnitude, 30.0);

        let result = pipeline.resolve(&snap, &DamageContext::new(), &mut ScriptedRolls::new([25.01]));
        assert!(!result.is_critical);
        assert_eq!(result.magnitude, 10.0);
    }

    #[test]
    fn test_headshot_always_crits() {
        let pipeline = DamagePipeline::default();
        let ctx = DamageContext::new().at_location("head");
        let mut snap = snapshot(10.0);
        snap.critical_multiplier = 2.5;

        // The highest possible roll still succeeds against the forced 100%
        let result = pipeline.resolve(&snap, &ctx, &mut ScriptedRolls::new([100.0]));
        assert!(result.is_critical);
        assert_eq!(result.magnitude, 25.0);

        let mut rng = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..100 {
            assert!(pipeline.resolve(&snap, &ctx, &mut rng).is_critical);
        }
    }

    #[test]
    fn test_no_crit_roll_without_multiplier() {
        let pipeline = DamagePipeline::default();
        let ctx = DamageContext::new().at_location("head");
        let mut snap = snapshot(10.0);
        snap.critical_multiplier = 1.0;

        let mut rolls = ScriptedRolls::new([0.01]);
        let result = pipeline.resolve(&snap, &ctx, &mut rolls);
        assert!(!result.is_critical);
        assert_eq!(result.magnitude, 10.0);
        assert_eq!(rolls.drawn(), 0);
    }

    #[test]
    fn test_lucky_stacking() {
        let pipeline = DamagePipeline::default();
        let mut snap = snapshot(10.0);
        snap.critical_multiplier = 1.0;
        snap.lucky_chance = 150.0;

        // Both rolls succeed: 150 -> 50 -> -50, multiplier 3
        let mut rolls = ScriptedRolls::new([99.0, 40.0]);
        let result = pipeline.resolve(&snap, &DamageContext::new(), &mut rolls);
        assert!(result.is_lucky);
        assert_eq!(result.lucky_stacks, 2);
        assert_eq!(result.magnitude, 30.0);
        assert_eq!(rolls.drawn(), 2);

        // Second roll misses the remaining 50: multiplier 2
        let mut rolls = ScriptedRolls::new([99.0, 60.0]);
        let result = pipeline.resolve(&snap, &DamageContext::new(), &mut rolls);
        assert_eq!(result.lucky_stacks, 1);
        assert_eq!(result.magnitude, 20.0);
        assert_eq!(rolls.drawn(), 2);
    }

    #[test]
    fn test_guaranteed_lucky_stacks() {
        let pipeline = DamagePipeline::default();
        let mut snap = snapshot(1.0);
        snap.critical_multiplier = 1.0;
        snap.lucky_chance = 250.0;

        // 250 and 150 always succeed; the third roll decides against 50
        let result = pipeline.resolve(
            &snap,
            &DamageContext::new(),
            &mut ScriptedRolls::new([100.0, 100.0, 75.0]),
        );
        assert_eq!(result.lucky_stacks, 2);
        assert_eq!(result.magnitude, 3.0);
    }

    #[test]
    fn test_huge_lucky_chance_is_capped() {
        let pipeline = DamagePipeline::default();
        let mut snap = snapshot(1.0);
        snap.critical_multiplier = 1.0;
        snap.lucky_chance = 1.0e20;

        // Subtracting 100 no longer changes 1e20, so only the cap stops the loop
        let mut rolls = ScriptedRolls::default();
        let result = pipeline.resolve(&snap, &DamageContext::new(), &mut rolls);
        assert_eq!(result.lucky_stacks, 1000);
        assert_eq!(result.magnitude, 1001.0);
        assert_eq!(rolls.drawn(), 1000);
    }

    #[test]
    fn test_overflowing_magnitude_stays_finite() {
        let pipeline = DamagePipeline::default();
        let mut snap = snapshot(1.0e308);
        snap.critical_chance = 100.0;

        let result = pipeline.resolve(&snap, &DamageContext::new(), &mut ScriptedRolls::new([1.0]));
        assert!(result.is_critical);
        assert_eq!(result.magnitude, f64::MAX);
    }

    #[test]
    fn test_crit_then_lucky_order() {
        let pipeline = DamagePipeline::default();
        let mut snap = snapshot(10.0);
        snap.critical_chance = 100.0;
        snap.critical_multiplier = 2.0;
        snap.lucky_chance = 5.0;

        let result = pipeline.resolve(
            &snap,
            &DamageContext::new(),
            &mut ScriptedRolls::new([1.0, 5.0]),
        );
        assert!(result.is_critical);
        assert!(result.is_lucky);
        // 10 * 2 (crit) * 2 (one lucky stack)
        assert_eq!(result.magnitude, 40.0);
    }
}
