//! Read-only views of an attribute store

use crate::types::AttributeKind;
use serde::{Deserialize, Serialize};

/// The attribute values the damage pipeline reads
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttributeSnapshot {
    pub in_damage: f64,
    /// Percent, 0-100 (values above 100 always crit)
    pub critical_chance: f64,
    pub critical_multiplier: f64,
    /// Percent; every full 100 is a guaranteed extra multiplier stack
    pub lucky_chance: f64,
}

impl AttributeSnapshot {
    /// Replace the incoming damage, keeping the modifiers
    pub fn with_in_damage(mut self, in_damage: f64) -> Self {
        self.in_damage = in_damage;
        self
    }
}

impl Default for AttributeSnapshot {
    fn default() -> Self {
        AttributeSnapshot {
            in_damage: 0.0,
            critical_chance: 0.0,
            critical_multiplier: 1.0,
            lucky_chance: 0.0,
        }
    }
}

/// The `(value, version)` pair a state-sync layer propagates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplicatedAttribute {
    pub attribute: AttributeKind,
    pub value: f64,
    pub version: u64,
}
