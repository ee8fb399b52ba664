//! DamageContext - immutable description of one incoming hit

use crate::config::CritConstants;
use crate::tags::{GameplayTag, TagSet};
use crate::types::EntityId;
use serde::{Deserialize, Serialize};

/// Who is responsible for a hit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageSource {
    /// The entity that started the effect
    pub instigator: Option<EntityId>,
    /// The object that delivered it (projectile, weapon, hazard)
    pub causer: Option<EntityId>,
}

impl DamageSource {
    pub fn new(instigator: impl Into<EntityId>, causer: impl Into<EntityId>) -> Self {
        DamageSource {
            instigator: Some(instigator.into()),
            causer: Some(causer.into()),
        }
    }

    pub fn instigated_by(instigator: impl Into<EntityId>) -> Self {
        DamageSource {
            instigator: Some(instigator.into()),
            causer: None,
        }
    }
}

/// Per-hit input to the damage pipeline and applier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageContext {
    #[serde(default)]
    pub source: DamageSource,
    /// Tags of the effect/attacker; elemental types are detected here
    #[serde(default)]
    pub source_tags: TagSet,
    #[serde(default)]
    pub target_tags: TagSet,
    /// Bone or region that was hit
    #[serde(default)]
    pub hit_location: Option<String>,
}

impl DamageContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: DamageSource) -> Self {
        self.source = source;
        self
    }

    pub fn with_source_tag(mut self, tag: impl Into<GameplayTag>) -> Self {
        self.source_tags.insert(tag);
        self
    }

    pub fn with_target_tag(mut self, tag: impl Into<GameplayTag>) -> Self {
        self.target_tags.insert(tag);
        self
    }

    pub fn at_location(mut self, location: impl Into<String>) -> Self {
        self.hit_location = Some(location.into());
        self
    }

    /// Whether the hit landed on the configured headshot location
    pub fn is_headshot(&self, crit: &CritConstants) -> bool {
        self.hit_location.as_deref() == Some(crit.headshot_location.as_str())
    }
}
