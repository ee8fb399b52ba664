//! Prelude module for convenient imports
//!
//! ```rust
//! use attribute_core::prelude::*;
//! ```

// Store
pub use crate::attribute::{AttributeError, AttributeStore, LatchState};
pub use crate::types::{AttributeKind, EntityId};

// Damage
pub use crate::combat::{AppliedDamageReport, DamageApplier};
pub use crate::damage::{DamageContext, DamageSource, RollSource, ScriptedRolls};

// Events
pub use crate::events::{AttributeChange, DamageTakenEvent, DepletionEvent};

// Config
pub use crate::config::{AttributeDefaults, DamageConstants};
