//! AttributeStore - the authoritative attribute container for one entity
//!
//! Every write goes through [`AttributeStore::set_with_source`]:
//! 1. Reject non-finite values
//! 2. Clamp against the attribute's [`ClampRule`]
//! 3. Commit and bump the version
//! 4. Notify `attribute_changed` subscribers with the post-clamp value
//! 5. Feed Health/Armor through their [`ThresholdLatch`] and emit the
//!    one-shot depletion event on the Alive -> Depleted edge
//! 6. If a maximum was written, re-clamp its paired current value

mod latch;
mod snapshot;
mod value;

pub use latch::{LatchState, LatchTransition, ThresholdLatch};
pub use snapshot::{AttributeSnapshot, ReplicatedAttribute};
pub use value::{Attribute, ClampRule, CHILL_CAP};

use crate::config::AttributeDefaults;
use crate::damage::DamageSource;
use crate::events::{AttributeChange, AttributeEvents, DepletionEvent};
use crate::types::AttributeKind;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::{info, trace};

/// Attribute access error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AttributeError {
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),
    #[error("Non-finite value {value} for attribute {attribute}")]
    NonFinite { attribute: AttributeKind, value: f64 },
}

/// All attributes owned by one entity, plus its latches and event buses
#[derive(Debug, Default)]
pub struct AttributeStore {
    attributes: BTreeMap<AttributeKind, Attribute>,
    health_latch: ThresholdLatch,
    armor_latch: ThresholdLatch,
    events: AttributeEvents,
}

impl AttributeStore {
    /// Create a store with every attribute registered at its default
    pub fn new(defaults: &AttributeDefaults) -> Self {
        let mut store = Self::empty();
        for kind in AttributeKind::all() {
            store
                .attributes
                .insert(*kind, Attribute::new(defaults.value(*kind), ClampRule::for_kind(*kind)));
        }
        // Defaults are clamped once every maximum is in place
        for kind in AttributeKind::all() {
            let max = store.paired_max_value(*kind);
            if let Some(attribute) = store.attributes.get_mut(kind) {
                attribute.value = attribute.clamp.apply(attribute.value, max);
            }
        }
        store
    }

    /// Create a store with no attributes registered
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register an attribute with an initial value. The value is clamped against
    /// the paired maximum if that maximum is already registered. Registration is
    /// not a write: no version bump, no events.
    pub fn register(&mut self, kind: AttributeKind, value: f64) -> Result<(), AttributeError> {
        if !value.is_finite() {
            return Err(AttributeError::NonFinite { attribute: kind, value });
        }
        let clamp = ClampRule::for_kind(kind);
        let value = clamp.apply(value, self.paired_max_value(kind));
        self.attributes.insert(kind, Attribute::new(value, clamp));
        Ok(())
    }

    pub fn is_registered(&self, kind: AttributeKind) -> bool {
        self.attributes.contains_key(&kind)
    }

    /// Current committed value
    pub fn get(&self, kind: AttributeKind) -> Result<f64, AttributeError> {
        self.attribute(kind).map(|a| a.value)
    }

    /// Committed attribute state, including its clamp rule and version
    pub fn attribute(&self, kind: AttributeKind) -> Result<&Attribute, AttributeError> {
        self.attributes
            .get(&kind)
            .ok_or_else(|| AttributeError::UnknownAttribute(kind.name().to_string()))
    }

    pub fn get_by_name(&self, name: &str) -> Result<f64, AttributeError> {
        self.get(name.parse()?)
    }

    pub fn set_by_name(&mut self, name: &str, value: f64) -> Result<f64, AttributeError> {
        self.set(name.parse()?, value)
    }

    /// Write a value with no damage source attached. Returns the committed value.
    pub fn set(&mut self, kind: AttributeKind, value: f64) -> Result<f64, AttributeError> {
        self.set_with_source(kind, value, &DamageSource::default(), 0.0)
    }

    /// Write a value; `source` and `magnitude` are forwarded to any depletion
    /// event the write triggers. Returns the committed value.
    pub fn set_with_source(
        &mut self,
        kind: AttributeKind,
        value: f64,
        source: &DamageSource,
        magnitude: f64,
    ) -> Result<f64, AttributeError> {
        if !value.is_finite() {
            return Err(AttributeError::NonFinite { attribute: kind, value });
        }
        let max = self.paired_max_value(kind);
        let attribute = self
            .attributes
            .get_mut(&kind)
            .ok_or_else(|| AttributeError::UnknownAttribute(kind.name().to_string()))?;

        let old = attribute.value;
        let new = attribute.clamp.apply(value, max);
        attribute.value = new;
        attribute.version += 1;
        let version = attribute.version;
        trace!(attribute = %kind, old, new, version, "attribute committed");

        self.events.attribute_changed.emit(&AttributeChange {
            attribute: kind,
            old,
            new,
            version,
        });
        self.observe_threshold(kind, new, source, magnitude);

        // Lowering a maximum drags its current value down with it
        if let Some(current_kind) = kind.paired_current() {
            if let Some(current) = self.attributes.get(&current_kind).map(|a| a.value) {
                if current > new.max(0.0) {
                    self.set_with_source(current_kind, current, source, magnitude)?;
                }
            }
        }

        Ok(new)
    }

    /// Add `delta` to the current value (healing, ammo use, ...)
    pub fn modify(&mut self, kind: AttributeKind, delta: f64) -> Result<f64, AttributeError> {
        let current = self.get(kind)?;
        self.set(kind, current + delta)
    }

    /// Read a value and reset it to 0. A value that is already 0 is not rewritten.
    pub fn take(&mut self, kind: AttributeKind) -> Result<f64, AttributeError> {
        let value = self.get(kind)?;
        if value != 0.0 {
            self.set(kind, 0.0)?;
        }
        Ok(value)
    }

    /// Values the damage pipeline reads
    pub fn snapshot(&self) -> Result<AttributeSnapshot, AttributeError> {
        Ok(AttributeSnapshot {
            in_damage: self.get(AttributeKind::InDamage)?,
            critical_chance: self.get(AttributeKind::CriticalChance)?,
            critical_multiplier: self.get(AttributeKind::CriticalMultiplier)?,
            lucky_chance: self.get(AttributeKind::LuckyChance)?,
        })
    }

    // === State Sync ===

    pub fn replicated(&self, kind: AttributeKind) -> Result<ReplicatedAttribute, AttributeError> {
        let attribute = self.attribute(kind)?;
        Ok(ReplicatedAttribute {
            attribute: kind,
            value: attribute.value,
            version: attribute.version,
        })
    }

    /// `(value, version)` of every registered attribute
    pub fn replication_state(&self) -> Vec<ReplicatedAttribute> {
        self.attributes
            .iter()
            .map(|(kind, attribute)| ReplicatedAttribute {
                attribute: *kind,
                value: attribute.value,
                version: attribute.version,
            })
            .collect()
    }

    /// Attributes written since the versions in `seen`. Missing entries count as version 0.
    pub fn changed_since(&self, seen: &HashMap<AttributeKind, u64>) -> Vec<ReplicatedAttribute> {
        self.replication_state()
            .into_iter()
            .filter(|r| r.version > seen.get(&r.attribute).copied().unwrap_or(0))
            .collect()
    }

    pub fn replication_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.replication_state())
    }

    // === State Queries ===

    pub fn is_alive(&self) -> bool {
        self.get(AttributeKind::Health).map(|h| h > 0.0).unwrap_or(false)
    }

    pub fn health_latch(&self) -> LatchState {
        self.health_latch.state()
    }

    pub fn armor_latch(&self) -> LatchState {
        self.armor_latch.state()
    }

    pub fn is_out_of_health(&self) -> bool {
        self.health_latch.is_depleted()
    }

    pub fn is_out_of_armor(&self) -> bool {
        self.armor_latch.is_depleted()
    }

    // === Events ===

    pub fn events(&self) -> &AttributeEvents {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut AttributeEvents {
        &mut self.events
    }

    fn paired_max_value(&self, kind: AttributeKind) -> Option<f64> {
        kind.paired_max()
            .and_then(|max| self.attributes.get(&max))
            .map(|a| a.value)
    }

    fn observe_threshold(
        &mut self,
        kind: AttributeKind,
        value: f64,
        source: &DamageSource,
        magnitude: f64,
    ) {
        let (latch, bus) = match kind {
            AttributeKind::Health => (&mut self.health_latch, &self.events.out_of_health),
            AttributeKind::Armor => (&mut self.armor_latch, &self.events.out_of_armor),
            _ => return,
        };
        match latch.observe(value) {
            Some(LatchTransition::Depleted) => {
                info!(attribute = %kind, magnitude, "attribute depleted");
                bus.emit(&DepletionEvent {
                    attribute: kind,
                    source: source.clone(),
                    magnitude,
                });
            }
            Some(LatchTransition::Rearmed) => {
                trace!(attribute = %kind, "depletion latch re-armed");
            }
            None => {}
        }
    }
}
