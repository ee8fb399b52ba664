//! Threshold latch - one-shot depletion detection for Health and Armor

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LatchState {
    /// Value above zero; the next crossing will fire
    #[default]
    Alive,
    /// Value at or below zero; further writes stay silent until re-armed
    Depleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatchTransition {
    /// Alive -> Depleted. The owner emits its depletion event.
    Depleted,
    /// Depleted -> Alive. Silent.
    Rearmed,
}

/// Two-state machine that reports each zero crossing exactly once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdLatch {
    state: LatchState,
}

impl ThresholdLatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> LatchState {
        self.state
    }

    pub fn is_depleted(&self) -> bool {
        self.state == LatchState::Depleted
    }

    /// Feed a committed value through the latch
    pub fn observe(&mut self, value: f64) -> Option<LatchTransition> {
        match (self.state, value <= 0.0) {
            (LatchState::Alive, true) => {
                self.state = LatchState::Depleted;
                Some(LatchTransition::Depleted)
            }
            (LatchState::Depleted, false) => {
                self.state = LatchState::Alive;
                Some(LatchTransition::Rearmed)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_per_crossing() {
        let mut latch = ThresholdLatch::new();
        let fired: Vec<_> = [10.0, 0.0, -3.0, 0.0, 0.0]
            .iter()
            .filter_map(|v| latch.observe(*v))
            .collect();
        assert_eq!(fired, vec![LatchTransition::Depleted]);
        assert!(latch.is_depleted());
    }

    #[test]
    fn test_rearms_after_recovery() {
        let mut latch = ThresholdLatch::new();
        assert_eq!(latch.observe(0.0), Some(LatchTransition::Depleted));
        assert_eq!(latch.observe(5.0), Some(LatchTransition::Rearmed));
        assert_eq!(latch.observe(8.0), None);
        assert_eq!(latch.observe(-1.0), Some(LatchTransition::Depleted));
    }
}
