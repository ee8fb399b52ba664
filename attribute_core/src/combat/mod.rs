//! Combat resolution - Apply pending damage to attribute stores

mod applier;
mod report;

pub use applier::DamageApplier;
pub use report::AppliedDamageReport;

use crate::attribute::{AttributeError, AttributeStore};
use crate::damage::DamageContext;

/// Apply pending InDamage with stock constants and thread-local randomness
pub fn resolve_damage(
    store: &mut AttributeStore,
    context: &DamageContext,
) -> Result<AppliedDamageReport, AttributeError> {
    let mut rng = rand::thread_rng();
    DamageApplier::default().apply(store, context, &mut rng)
}
