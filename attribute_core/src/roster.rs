//! Roster - many entities' stores, one writer at a time per entity
//!
//! Each store sits behind its own mutex, so a deposit + apply on one entity is
//! atomic with respect to every other write on that entity while hits against
//! different entities resolve in parallel.

use crate::attribute::{AttributeError, AttributeStore};
use crate::combat::{AppliedDamageReport, DamageApplier};
use crate::config::AttributeDefaults;
use crate::damage::{DamageContext, RollSource};
use crate::types::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Unknown entity: {0}")]
    UnknownEntity(EntityId),
    #[error("Entity already spawned: {0}")]
    DuplicateEntity(EntityId),
    #[error("Attribute store for {0} was poisoned by a panicking writer")]
    Poisoned(EntityId),
    #[error(transparent)]
    Attribute(#[from] AttributeError),
}

/// One pending hit against one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub target: EntityId,
    pub amount: f64,
    #[serde(default)]
    pub context: DamageContext,
}

/// Results of a batch, per target, in hit order
pub type BatchReports = BTreeMap<EntityId, Result<Vec<AppliedDamageReport>, RosterError>>;

#[derive(Debug, Default)]
pub struct Roster {
    stores: HashMap<EntityId, Mutex<AttributeStore>>,
    applier: DamageApplier,
}

impl Roster {
    pub fn new(applier: DamageApplier) -> Self {
        Roster {
            stores: HashMap::new(),
            applier,
        }
    }

    pub fn applier(&self) -> &DamageApplier {
        &self.applier
    }

    /// Create a store for a newly spawned entity
    pub fn spawn(
        &mut self,
        id: impl Into<EntityId>,
        defaults: &AttributeDefaults,
    ) -> Result<(), RosterError> {
        self.insert(id, AttributeStore::new(defaults))
    }

    /// Take ownership of an existing store (e.g. one with subscribers already attached)
    pub fn insert(&mut self, id: impl Into<EntityId>, store: AttributeStore) -> Result<(), RosterError> {
        let id = id.into();
        if self.stores.contains_key(&id) {
            return Err(RosterError::DuplicateEntity(id));
        }
        debug!(entity = %id, "store spawned");
        self.stores.insert(id, Mutex::new(store));
        Ok(())
    }

    /// Drop an entity, handing back its store
    pub fn despawn(&mut self, id: &EntityId) -> Option<AttributeStore> {
        self.stores
            .remove(id)
            .map(|store| store.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner()))
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.stores.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.stores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &EntityId> {
        self.stores.keys()
    }

    /// Run `f` with exclusive access to one entity's store
    pub fn with_store<T>(
        &self,
        id: &EntityId,
        f: impl FnOnce(&mut AttributeStore) -> T,
    ) -> Result<T, RosterError> {
        let mut store = self.lock(id)?;
        Ok(f(&mut store))
    }

    /// Deposit `amount` into the target's InDamage and apply it under one lock
    pub fn deal_damage(
        &self,
        target: &EntityId,
        amount: f64,
        context: &DamageContext,
        rolls: &mut impl RollSource,
    ) -> Result<AppliedDamageReport, RosterError> {
        let mut store = self.lock(target)?;
        Ok(self.applier.apply_damage(&mut store, amount, context, rolls)?)
    }

    /// Resolve a batch of hits. Hits on the same target are applied in order on
    /// one thread; distinct targets run on separate scoped threads. `rolls_for`
    /// builds the roll source used for each target.
    ///
    /// A failing hit stops the remaining hits for that target only.
    pub fn deal_damage_batch<F, R>(&self, hits: Vec<Hit>, rolls_for: F) -> BatchReports
    where
        F: Fn(&EntityId) -> R + Sync,
        R: RollSource,
    {
        let mut by_target: BTreeMap<EntityId, Vec<Hit>> = BTreeMap::new();
        for hit in hits {
            by_target.entry(hit.target.clone()).or_default().push(hit);
        }

        let rolls_for = &rolls_for;
        thread::scope(|scope| {
            let handles: Vec<_> = by_target
                .into_iter()
                .map(|(target, hits)| {
                    let worker_target = target.clone();
                    let handle = scope.spawn(move || {
                        let mut rolls = rolls_for(&worker_target);
                        hits.iter()
                            .map(|hit| {
                                self.deal_damage(&worker_target, hit.amount, &hit.context, &mut rolls)
                            })
                            .collect::<Result<Vec<_>, _>>()
                    });
                    (target, handle)
                })
                .collect();

            handles
                .into_iter()
                .map(|(target, handle)| {
                    let result = handle.join().unwrap_or_else(|_| {
                        warn!(entity = %target, "damage worker panicked");
                        Err(RosterError::Poisoned(target.clone()))
                    });
                    (target, result)
                })
                .collect()
        })
    }

    fn lock(&self, id: &EntityId) -> Result<MutexGuard<'_, AttributeStore>, RosterError> {
        self.stores
            .get(id)
            .ok_or_else(|| RosterError::UnknownEntity(id.clone()))?
            .lock()
            .map_err(|_| {
                warn!(entity = %id, "attribute store poisoned");
                RosterError::Poisoned(id.clone())
            })
    }
}
