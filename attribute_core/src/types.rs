//! Core identifiers shared across the attribute and damage modules

use crate::attribute::AttributeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier for an entity that owns an attribute store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub String);

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId(s.to_string())
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        EntityId(s)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Every attribute an entity can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    // Vitality
    Health,
    HealthMax,
    Armor,
    ArmorMax,
    // Transient damage input
    InDamage,
    // Critical hit system
    CriticalChance,
    CriticalMultiplier,
    LuckyChance,
    // Reserved damage modifiers
    DamageAdd,
    DamageMulti,
    // Ammo count
    Ammo,
    // Freeze/thaw
    Chilled,
    DeChill,
}

impl AttributeKind {
    /// Get all attribute kinds, in registration order
    pub fn all() -> &'static [AttributeKind] {
        &[
            AttributeKind::Health,
            AttributeKind::HealthMax,
            AttributeKind::Armor,
            AttributeKind::ArmorMax,
            AttributeKind::InDamage,
            AttributeKind::CriticalChance,
            AttributeKind::CriticalMultiplier,
            AttributeKind::LuckyChance,
            AttributeKind::DamageAdd,
            AttributeKind::DamageMulti,
            AttributeKind::Ammo,
            AttributeKind::Chilled,
            AttributeKind::DeChill,
        ]
    }

    /// Display name of the attribute
    pub fn name(self) -> &'static str {
        match self {
            AttributeKind::Health => "Health",
            AttributeKind::HealthMax => "HealthMax",
            AttributeKind::Armor => "Armor",
            AttributeKind::ArmorMax => "ArmorMax",
            AttributeKind::InDamage => "InDamage",
            AttributeKind::CriticalChance => "CriticalChance",
            AttributeKind::CriticalMultiplier => "CriticalMultiplier",
            AttributeKind::LuckyChance => "LuckyChance",
            AttributeKind::DamageAdd => "DamageAdd",
            AttributeKind::DamageMulti => "DamageMulti",
            AttributeKind::Ammo => "Ammo",
            AttributeKind::Chilled => "Chilled",
            AttributeKind::DeChill => "DeChill",
        }
    }

    /// The maximum attribute this one is clamped against, if any
    pub fn paired_max(self) -> Option<AttributeKind> {
        match self {
            AttributeKind::Health => Some(AttributeKind::HealthMax),
            AttributeKind::Armor => Some(AttributeKind::ArmorMax),
            _ => None,
        }
    }

    /// The current-value attribute clamped against this one, if this is a maximum
    pub fn paired_current(self) -> Option<AttributeKind> {
        match self {
            AttributeKind::HealthMax => Some(AttributeKind::Health),
            AttributeKind::ArmorMax => Some(AttributeKind::Armor),
            _ => None,
        }
    }

    fn snake_name(self) -> &'static str {
        match self {
            AttributeKind::Health => "health",
            AttributeKind::HealthMax => "health_max",
            AttributeKind::Armor => "armor",
            AttributeKind::ArmorMax => "armor_max",
            AttributeKind::InDamage => "in_damage",
            AttributeKind::CriticalChance => "critical_chance",
            AttributeKind::CriticalMultiplier => "critical_multiplier",
            AttributeKind::LuckyChance => "lucky_chance",
            AttributeKind::DamageAdd => "damage_add",
            AttributeKind::DamageMulti => "damage_multi",
            AttributeKind::Ammo => "ammo",
            AttributeKind::Chilled => "chilled",
            AttributeKind::DeChill => "de_chill",
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AttributeKind {
    type Err = AttributeError;

    /// Accepts either the display name (`HealthMax`) or the snake_case form (`health_max`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttributeKind::all()
            .iter()
            .copied()
            .find(|kind| kind.name() == s || kind.snake_name() == s)
            .ok_or_else(|| AttributeError::UnknownAttribute(s.to_string()))
    }
}
