//! Attribute - a named scalar with a clamp rule and a version marker

use crate::types::AttributeKind;
use serde::{Deserialize, Serialize};

/// Upper bound for the freeze/thaw attributes
pub const CHILL_CAP: f64 = 100.0;

/// How an attribute's committed value is bounded
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ClampRule {
    Unclamped,
    /// `[0, current value of the paired maximum]`
    PairedMax { max: AttributeKind },
    /// Fixed `[min, max]`
    Range { min: f64, max: f64 },
}

impl ClampRule {
    /// The clamp rule every attribute kind is registered with
    pub fn for_kind(kind: AttributeKind) -> Self {
        match kind {
            AttributeKind::Chilled | AttributeKind::DeChill => ClampRule::Range {
                min: 0.0,
                max: CHILL_CAP,
            },
            _ => match kind.paired_max() {
                Some(max) => ClampRule::PairedMax { max },
                None => ClampRule::Unclamped,
            },
        }
    }

    /// Clamp a proposed value. `paired_max` is the current value of the paired
    /// maximum; it is ignored by every rule except `PairedMax`.
    ///
    /// A missing maximum only enforces the lower bound; a negative one pins the value to 0.
    pub fn apply(&self, value: f64, paired_max: Option<f64>) -> f64 {
        match *self {
            ClampRule::Unclamped => value,
            ClampRule::PairedMax { .. } => match paired_max {
                Some(max) => value.min(max.max(0.0)).max(0.0),
                None => value.max(0.0),
            },
            ClampRule::Range { min, max } => value.min(max).max(min),
        }
    }

    pub fn paired_max(&self) -> Option<AttributeKind> {
        match *self {
            ClampRule::PairedMax { max } => Some(max),
            _ => None,
        }
    }
}

/// Committed state of one attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub value: f64,
    pub clamp: ClampRule,
    /// Incremented on every committed write
    pub version: u64,
}

impl Attribute {
    pub fn new(value: f64, clamp: ClampRule) -> Self {
        Attribute {
            value,
            clamp,
            version: 0,
        }
    }
}
