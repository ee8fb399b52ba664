//! Damage application - consume InDamage, resolve it, and mitigate through armor then health

use super::report::AppliedDamageReport;
use crate::attribute::{AttributeError, AttributeStore};
use crate::config::DamageConstants;
use crate::damage::{DamageContext, DamagePipeline, RollSource};
use crate::events::DamageTakenEvent;
use crate::types::AttributeKind;
use tracing::debug;

/// Attributes `apply` reads or writes; all must be registered before anything is consumed
const REQUIRED: [AttributeKind; 6] = [
    AttributeKind::InDamage,
    AttributeKind::CriticalChance,
    AttributeKind::CriticalMultiplier,
    AttributeKind::LuckyChance,
    AttributeKind::Armor,
    AttributeKind::Health,
];

/// Orchestrates one hit against one store
#[derive(Debug, Clone, Default)]
pub struct DamageApplier {
    pipeline: DamagePipeline,
}

impl DamageApplier {
    pub fn new(constants: DamageConstants) -> Self {
        DamageApplier {
            pipeline: DamagePipeline::new(constants),
        }
    }

    pub fn pipeline(&self) -> &DamagePipeline {
        &self.pipeline
    }

    /// Add `amount` to the store's InDamage and apply it
    pub fn apply_damage(
        &self,
        store: &mut AttributeStore,
        amount: f64,
        context: &DamageContext,
        rolls: &mut impl RollSource,
    ) -> Result<AppliedDamageReport, AttributeError> {
        store.modify(AttributeKind::InDamage, amount)?;
        self.apply(store, context, rolls)
    }

    /// Apply whatever damage is pending in the store's InDamage slot
    ///
    /// 1. Take InDamage (reset to 0)
    /// 2. Non-positive damage returns an empty report
    /// 3. Run the pipeline (crit, lucky)
    /// 4. Armor absorbs first; acid scales the damage dealt to armor
    /// 5. The unscaled remainder goes to health; fire scales it
    /// 6. Broadcast DamageTaken
    pub fn apply(
        &self,
        store: &mut AttributeStore,
        context: &DamageContext,
        rolls: &mut impl RollSource,
    ) -> Result<AppliedDamageReport, AttributeError> {
        for kind in REQUIRED {
            store.attribute(kind)?;
        }

        let incoming = store.take(AttributeKind::InDamage)?;

        let mut report = AppliedDamageReport::new();
        report.incoming = incoming;
        report.armor_before = store.get(AttributeKind::Armor)?;
        report.armor_after = report.armor_before;
        report.health_before = store.get(AttributeKind::Health)?;
        report.health_after = report.health_before;

        if !(incoming > 0.0) {
            return Ok(report);
        }

        let snapshot = store.snapshot()?.with_in_damage(incoming);
        // Positive input only ever grows through the pipeline's multipliers
        let result = self.pipeline.resolve(&snapshot, context, rolls);
        report.magnitude = result.magnitude;
        report.is_critical = result.is_critical;
        report.is_lucky = result.is_lucky;
        report.lucky_stacks = result.lucky_stacks;

        let elements = &self.pipeline.constants().elements;
        let source = &context.source;
        let mut remaining = result.magnitude;

        // Armor absorbs scaled units; the remainder carried on is unscaled
        if report.armor_before > 0.0 {
            let mut to_armor = result.magnitude;
            if context.source_tags.has_exact(&elements.acid_tag) {
                to_armor = (to_armor * elements.acid_armor_multiplier).min(f64::MAX);
            }
            let absorbed = report.armor_before.min(to_armor);
            remaining -= absorbed;

            let was_depleted = store.is_out_of_armor();
            report.armor_after = store.set_with_source(
                AttributeKind::Armor,
                report.armor_before - absorbed,
                source,
                result.magnitude,
            )?;
            report.armor_absorbed = absorbed;
            report.armor_depleted = !was_depleted && store.is_out_of_armor();
        }

        if remaining > 0.0 {
            let mut to_health = remaining;
            if context.source_tags.has_exact(&elements.fire_tag) {
                to_health = (to_health * elements.fire_health_multiplier).min(f64::MAX);
            }

            let was_depleted = store.is_out_of_health();
            report.health_after = store.set_with_source(
                AttributeKind::Health,
                report.health_before - to_health,
                source,
                result.magnitude,
            )?;
            report.health_damage = to_health;
            report.is_killing_blow = !was_depleted && store.is_out_of_health();
        }

        debug!(
            incoming,
            magnitude = result.magnitude,
            armor_absorbed = report.armor_absorbed,
            health_damage = report.health_damage,
            "damage applied"
        );

        store.events().damage_taken.emit(&DamageTakenEvent {
            source: source.clone(),
            tags: context.source_tags.clone(),
            magnitude: result.magnitude,
            is_critical: result.is_critical,
            is_lucky: result.is_lucky,
        });

        Ok(report)
    }
}
