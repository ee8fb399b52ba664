//! Damage system - hit context, injected rolls and the resolution pipeline

mod context;
mod pipeline;
mod roll;

pub use context::{DamageContext, DamageSource};
pub use pipeline::{DamagePipeline, DamageResult};
pub use roll::{RollSource, ScriptedRolls, ROLL_MAX, ROLL_MIN};
