//! Initial attribute values for a freshly spawned entity

use super::ConfigError;
use crate::types::AttributeKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Starting values for every attribute. Missing TOML keys fall back to the
/// stock values below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDefaults {
    #[serde(default = "default_health")]
    pub health: f64,
    #[serde(default = "default_max")]
    pub health_max: f64,
    #[serde(default = "default_armor")]
    pub armor: f64,
    #[serde(default = "default_max")]
    pub armor_max: f64,
    #[serde(default)]
    pub critical_chance: f64,
    #[serde(default = "default_critical_multiplier")]
    pub critical_multiplier: f64,
    #[serde(default = "default_lucky_chance")]
    pub lucky_chance: f64,
    #[serde(default)]
    pub damage_add: f64,
    #[serde(default = "default_damage_multi")]
    pub damage_multi: f64,
    #[serde(default = "default_ammo")]
    pub ammo: f64,
    #[serde(default)]
    pub chilled: f64,
    #[serde(default = "default_de_chill")]
    pub de_chill: f64,
}

impl Default for AttributeDefaults {
    fn default() -> Self {
        AttributeDefaults {
            health: default_health(),
            health_max: default_max(),
            armor: default_armor(),
            armor_max: default_max(),
            critical_chance: 0.0,
            critical_multiplier: default_critical_multiplier(),
            lucky_chance: default_lucky_chance(),
            damage_add: 0.0,
            damage_multi: default_damage_multi(),
            ammo: default_ammo(),
            chilled: 0.0,
            de_chill: default_de_chill(),
        }
    }
}

fn default_health() -> f64 {
    65.0
}
fn default_max() -> f64 {
    100.0
}
fn default_armor() -> f64 {
    20.0
}
fn default_critical_multiplier() -> f64 {
    3.0
}
fn default_lucky_chance() -> f64 {
    5.0
}
fn default_damage_multi() -> f64 {
    1.0
}
fn default_ammo() -> f64 {
    100.0
}
fn default_de_chill() -> f64 {
    10.0
}

impl AttributeDefaults {
    /// Starting value for one attribute. `InDamage` always starts empty.
    pub fn value(&self, kind: AttributeKind) -> f64 {
        match kind {
            AttributeKind::Health => self.health,
            AttributeKind::HealthMax => self.health_max,
            AttributeKind::Armor => self.armor,
            AttributeKind::ArmorMax => self.armor_max,
            AttributeKind::InDamage => 0.0,
            AttributeKind::CriticalChance => self.critical_chance,
            AttributeKind::CriticalMultiplier => self.critical_multiplier,
            AttributeKind::LuckyChance => self.lucky_chance,
            AttributeKind::DamageAdd => self.damage_add,
            AttributeKind::DamageMulti => self.damage_multi,
            AttributeKind::Ammo => self.ammo,
            AttributeKind::Chilled => self.chilled,
            AttributeKind::DeChill => self.de_chill,
        }
    }

    /// Reject non-finite values and maxima below zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in AttributeKind::all() {
            let value = self.value(*kind);
            if !value.is_finite() {
                return Err(ConfigError::ValidationError(format!(
                    "{kind} default must be finite, got {value}"
                )));
            }
        }
        for (kind, max) in [
            (AttributeKind::HealthMax, self.health_max),
            (AttributeKind::ArmorMax, self.armor_max),
        ] {
            if max < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "{kind} must not be negative, got {max}"
                )));
            }
        }
        Ok(())
    }
}

/// Load and validate attribute defaults from a TOML file
pub fn load_attribute_defaults(path: &Path) -> Result<AttributeDefaults, ConfigError> {
    let defaults: AttributeDefaults = super::load_toml(path)?;
    defaults.validate()?;
    Ok(defaults)
}

/// Parse and validate attribute defaults from a TOML string
pub fn parse_attribute_defaults(content: &str) -> Result<AttributeDefaults, ConfigError> {
    let defaults: AttributeDefaults = super::parse_toml(content)?;
    defaults.validate()?;
    Ok(defaults)
}
