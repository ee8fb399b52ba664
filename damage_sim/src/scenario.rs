//! Scenario files - entities to spawn and the hits to throw at them
//!
//! ```toml
//! seed = 7
//!
//! [[entities]]
//! id = "grunt"
//! [entities.attributes]
//! health = 80.0
//!
//! [[hits]]
//! target = "grunt"
//! amount = 30.0
//! tags = ["Damage.Type.Fire"]
//! instigator = "player"
//! ```

use anyhow::{bail, Context, Result};
use attribute_core::config::{self, AttributeDefaults, DamageConstants};
use attribute_core::{DamageContext, DamageSource, EntityId, Hit};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Used when no `--seed` is given on the command line
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub constants: DamageConstants,
    #[serde(default)]
    pub entities: Vec<EntityDef>,
    #[serde(default)]
    pub hits: Vec<HitDef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EntityDef {
    pub id: EntityId,
    /// Overrides on top of the stock attribute defaults
    #[serde(default)]
    pub attributes: AttributeDefaults,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HitDef {
    pub target: EntityId,
    pub amount: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub hit_location: Option<String>,
    #[serde(default)]
    pub instigator: Option<EntityId>,
    #[serde(default)]
    pub causer: Option<EntityId>,
}

impl HitDef {
    pub fn context(&self) -> DamageContext {
        let mut context = DamageContext::new().with_source(DamageSource {
            instigator: self.instigator.clone(),
            causer: self.causer.clone(),
        });
        for tag in &self.tags {
            context = context.with_source_tag(tag.as_str());
        }
        if let Some(location) = &self.hit_location {
            context = context.at_location(location.as_str());
        }
        context
    }

    pub fn to_hit(&self) -> Hit {
        Hit {
            target: self.target.clone(),
            amount: self.amount,
            context: self.context(),
        }
    }
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let scenario: Scenario = config::load_toml(path)
            .with_context(|| format!("failed to load scenario {}", path.display()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let scenario: Scenario = config::parse_toml(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Constants and defaults must validate, ids must be unique and every hit
    /// must target a declared entity
    pub fn validate(&self) -> Result<()> {
        self.constants.validate()?;

        let mut ids = HashSet::new();
        for entity in &self.entities {
            entity
                .attributes
                .validate()
                .with_context(|| format!("invalid attributes for {}", entity.id))?;
            if !ids.insert(&entity.id) {
                bail!("entity {} declared twice", entity.id);
            }
        }

        for (i, hit) in self.hits.iter().enumerate() {
            if !ids.contains(&hit.target) {
                bail!("hit #{} targets undeclared entity {}", i + 1, hit.target);
            }
            if !hit.amount.is_finite() {
                bail!("hit #{} has a non-finite amount", i + 1);
            }
        }
        Ok(())
    }
}
