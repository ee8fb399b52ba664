//! Scenario execution - spawn stores, wire event logging, resolve hits

use crate::scenario::Scenario;
use anyhow::Result;
use attribute_core::{
    AppliedDamageReport, AttributeKind, AttributeStore, DamageApplier, EntityId, Roster,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// One resolved hit, in scenario order
#[derive(Debug, Clone)]
pub struct HitOutcome {
    pub target: EntityId,
    pub report: AppliedDamageReport,
}

pub struct Runner {
    roster: Roster,
    seed: u64,
}

impl Runner {
    pub fn new(scenario: &Scenario, seed: u64) -> Result<Self> {
        let mut roster = Roster::new(DamageApplier::new(scenario.constants.clone()));
        for entity in &scenario.entities {
            let mut store = AttributeStore::new(&entity.attributes);
            attach_logging(&entity.id, &mut store);
            roster.insert(entity.id.clone(), store)?;
        }
        Ok(Runner { roster, seed })
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Resolve every hit in order from one seeded stream
    pub fn run(&self, scenario: &Scenario) -> Result<Vec<HitOutcome>> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut outcomes = Vec::with_capacity(scenario.hits.len());
        for hit in &scenario.hits {
            let report = self
                .roster
                .deal_damage(&hit.target, hit.amount, &hit.context(), &mut rng)?;
            outcomes.push(HitOutcome {
                target: hit.target.clone(),
                report,
            });
        }
        Ok(outcomes)
    }

    /// Resolve hits per target in parallel. Each target draws from its own
    /// stream of the seed, so results do not depend on thread scheduling.
    pub fn run_parallel(&self, scenario: &Scenario) -> Result<Vec<HitOutcome>> {
        let streams: HashMap<&EntityId, u64> = scenario
            .entities
            .iter()
            .enumerate()
            .map(|(i, entity)| (&entity.id, i as u64))
            .collect();
        let seed = self.seed;

        let hits = scenario.hits.iter().map(|hit| hit.to_hit()).collect();
        let results = self.roster.deal_damage_batch(hits, |target| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.set_stream(streams.get(target).copied().unwrap_or_default());
            rng
        });

        let mut outcomes = Vec::new();
        for (target, reports) in results {
            for report in reports? {
                outcomes.push(HitOutcome {
                    target: target.clone(),
                    report,
                });
            }
        }
        Ok(outcomes)
    }

    /// `(health, armor)` of every entity, sorted by id
    pub fn final_state(&self) -> Result<Vec<(EntityId, f64, f64)>> {
        let mut ids: Vec<EntityId> = self.roster.ids().cloned().collect();
        ids.sort();

        let mut rows = Vec::with_capacity(ids.len());
        for id in ids {
            let (health, armor) = self.roster.with_store(&id, |store| {
                Ok::<_, attribute_core::AttributeError>((
                    store.get(AttributeKind::Health)?,
                    store.get(AttributeKind::Armor)?,
                ))
            })??;
            rows.push((id, health, armor));
        }
        Ok(rows)
    }

    /// Replication state of every entity as JSON lines
    pub fn replication_dump(&self) -> Result<Vec<(EntityId, String)>> {
        let mut ids: Vec<EntityId> = self.roster.ids().cloned().collect();
        ids.sort();

        let mut dump = Vec::with_capacity(ids.len());
        for id in ids {
            let json = self.roster.with_store(&id, |store| store.replication_json())??;
            dump.push((id, json));
        }
        Ok(dump)
    }
}

/// Route a store's events into the log
fn attach_logging(id: &EntityId, store: &mut AttributeStore) {
    let events = store.events_mut();

    let entity = id.clone();
    events.attribute_changed.subscribe(move |change| {
        debug!(
            entity = %entity,
            attribute = %change.attribute,
            old = change.old,
            new = change.new,
            version = change.version,
            "attribute changed"
        );
    });

    let entity = id.clone();
    events.out_of_armor.subscribe(move |event| {
        info!(entity = %entity, magnitude = event.magnitude, "armor broken");
    });

    let entity = id.clone();
    events.out_of_health.subscribe(move |event| {
        let killer = event
            .source
            .instigator
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        warn!(entity = %entity, killer = %killer, magnitude = event.magnitude, "out of health");
    });

    let entity = id.clone();
    events.damage_taken.subscribe(move |event| {
        info!(
            entity = %entity,
            magnitude = event.magnitude,
            tags = %event.tags,
            critical = event.is_critical,
            lucky = event.is_lucky,
            "damage taken"
        );
    });
}
