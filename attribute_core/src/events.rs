//! Observer registration - ordered multi-subscriber event buses

use crate::damage::DamageSource;
use crate::tags::TagSet;
use crate::types::AttributeKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Callback type for event handlers
pub type EventHandler<E> = Box<dyn Fn(&E) + Send + Sync>;

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Synchronous event bus; handlers run in subscription order
pub struct EventBus<E> {
    handlers: Vec<(SubscriptionId, EventHandler<E>)>,
    next_id: u64,
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        EventBus {
            handlers: Vec::new(),
            next_id: 0,
        }
    }

    /// Register a handler; it will be invoked after every handler registered before it
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Remove a handler. Returns false if the handle was already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
        self.handlers.len() != before
    }

    pub fn emit(&self, event: &E) {
        for (_, handler) in &self.handlers {
            handler(event);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.handlers.len())
            .finish()
    }
}

/// A committed attribute write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeChange {
    pub attribute: AttributeKind,
    pub old: f64,
    /// Post-clamp value
    pub new: f64,
    pub version: u64,
}

/// One-shot notification that Health or Armor reached zero
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepletionEvent {
    pub attribute: AttributeKind,
    pub source: DamageSource,
    /// Magnitude of the effect that caused the crossing
    pub magnitude: f64,
}

/// Broadcast once per resolved hit with a positive magnitude
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageTakenEvent {
    pub source: DamageSource,
    pub tags: TagSet,
    pub magnitude: f64,
    pub is_critical: bool,
    pub is_lucky: bool,
}

/// All event buses owned by one attribute store
#[derive(Debug, Default)]
pub struct AttributeEvents {
    pub attribute_changed: EventBus<AttributeChange>,
    pub out_of_health: EventBus<DepletionEvent>,
    pub out_of_armor: EventBus<DepletionEvent>,
    pub damage_taken: EventBus<DamageTakenEvent>,
}

impl AttributeEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to changes of a single attribute (OnHealthChanged, OnArmorChanged, ...)
    ///
    /// The handler receives `(old, new)`.
    pub fn on_attribute_changed<F>(&mut self, attribute: AttributeKind, handler: F) -> SubscriptionId
    where
        F: Fn(f64, f64) + Send + Sync + 'static,
    {
        self.attribute_changed.subscribe(move |change| {
            if change.attribute == attribute {
                handler(change.old, change.new);
            }
        })
    }

    /// Bus for the depletion event of `attribute`, if it has one
    pub fn depletion_bus(&self, attribute: AttributeKind) -> Option<&EventBus<DepletionEvent>> {
        match attribute {
            AttributeKind::Health => Some(&self.out_of_health),
            AttributeKind::Armor => Some(&self.out_of_armor),
            _ => None,
        }
    }
}
