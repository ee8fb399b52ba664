//! attribute_core - Authoritative per-entity attributes and damage resolution
//!
//! This library provides:
//! - AttributeStore: Clamped attributes with version markers, depletion latches and change events
//! - DamagePipeline: Pure critical/lucky resolution of an incoming hit
//! - DamageApplier: Armor-then-health mitigation with elemental modifiers
//! - EventBus: Ordered observer registration used by the store and applier
//! - Roster: Per-entity single-writer access for many stores

pub mod attribute;
pub mod combat;
pub mod config;
pub mod damage;
pub mod events;
pub mod prelude;
pub mod roster;
pub mod tags;
pub mod types;

// Re-export core types for convenience
pub use attribute::{AttributeError, AttributeSnapshot, AttributeStore, LatchState, ReplicatedAttribute};
pub use combat::{resolve_damage, AppliedDamageReport, DamageApplier};
pub use config::{AttributeDefaults, ConfigError, DamageConstants};
pub use damage::{DamageContext, DamagePipeline, DamageResult, DamageSource, RollSource, ScriptedRolls};
pub use events::{AttributeChange, DamageTakenEvent, DepletionEvent, EventBus, SubscriptionId};
pub use roster::{Hit, Roster, RosterError};
pub use tags::{GameplayTag, TagSet};
pub use types::{AttributeKind, EntityId};
