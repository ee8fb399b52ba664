//! Damage pipeline constants

use super::ConfigError;
use crate::tags::GameplayTag;
use serde::{Deserialize, Serialize};

/// Tunable damage constants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageConstants {
    #[serde(default)]
    pub crit: CritConstants,
    #[serde(default)]
    pub lucky: LuckyConstants,
    #[serde(default)]
    pub elements: ElementConstants,
}

impl DamageConstants {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lucky.chance_per_stack <= 0.0 || !self.lucky.chance_per_stack.is_finite() {
            return Err(ConfigError::ValidationError(format!(
                "lucky.chance_per_stack must be positive, got {}",
                self.lucky.chance_per_stack
            )));
        }
        for (name, multiplier) in [
            ("acid_armor_multiplier", self.elements.acid_armor_multiplier),
            ("fire_health_multiplier", self.elements.fire_health_multiplier),
        ] {
            if multiplier < 0.0 || !multiplier.is_finite() {
                return Err(ConfigError::ValidationError(format!(
                    "elements.{name} must be a non-negative number, got {multiplier}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CritConstants {
    /// Hit location that forces a critical hit
    #[serde(default = "default_headshot_location")]
    pub headshot_location: String,
}

impl Default for CritConstants {
    fn default() -> Self {
        CritConstants {
            headshot_location: default_headshot_location(),
        }
    }
}

fn default_headshot_location() -> String {
    "head".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LuckyConstants {
    /// Chance consumed by each successful lucky roll (100 = one full stack)
    #[serde(default = "default_chance_per_stack")]
    pub chance_per_stack: f64,
    /// Upper bound on extra multiplier stacks from one hit
    #[serde(default = "default_max_stacks")]
    pub max_stacks: u32,
}

impl Default for LuckyConstants {
    fn default() -> Self {
        LuckyConstants {
            chance_per_stack: default_chance_per_stack(),
            max_stacks: default_max_stacks(),
        }
    }
}

impl LuckyConstants {
    /// Chance consumed per stack; falls back to the stock 100 when misconfigured
    /// so the lucky loop always terminates
    pub fn stack_cost(&self) -> f64 {
        if self.chance_per_stack > 0.0 && self.chance_per_stack.is_finite() {
            self.chance_per_stack
        } else {
            default_chance_per_stack()
        }
    }
}

fn default_chance_per_stack() -> f64 {
    100.0
}
fn default_max_stacks() -> u32 {
    1000
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementConstants {
    #[serde(default = "default_acid_tag")]
    pub acid_tag: GameplayTag,
    /// Applied to damage dealt to armor when the acid tag is present
    #[serde(default = "default_elemental_multiplier")]
    pub acid_armor_multiplier: f64,
    #[serde(default = "default_fire_tag")]
    pub fire_tag: GameplayTag,
    /// Applied to damage dealt to health when the fire tag is present
    #[serde(default = "default_elemental_multiplier")]
    pub fire_health_multiplier: f64,
}

impl Default for ElementConstants {
    fn default() -> Self {
        ElementConstants {
            acid_tag: default_acid_tag(),
            acid_armor_multiplier: default_elemental_multiplier(),
            fire_tag: default_fire_tag(),
            fire_health_multiplier: default_elemental_multiplier(),
        }
    }
}

fn default_acid_tag() -> GameplayTag {
    GameplayTag::from("Damage.Type.Acid")
}
fn default_fire_tag() -> GameplayTag {
    GameplayTag::from("Damage.Type.Fire")
}
fn default_elemental_multiplier() -> f64 {
    1.5
}
