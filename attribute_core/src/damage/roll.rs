//! Injected randomness for critical and lucky rolls

use rand::Rng;
use std::collections::VecDeque;

/// Lowest value a roll can produce
pub const ROLL_MIN: f64 = 0.01;
/// Highest value a roll can produce
pub const ROLL_MAX: f64 = 100.0;

/// Source of percentage rolls in `[ROLL_MIN, ROLL_MAX]`
///
/// A roll succeeds against a chance when `roll <= chance`.
pub trait RollSource {
    fn roll(&mut self) -> f64;
}

impl<R: Rng> RollSource for R {
    fn roll(&mut self) -> f64 {
        self.gen_range(ROLL_MIN..=ROLL_MAX)
    }
}

/// Replays a fixed sequence of rolls (tests, recorded fights)
///
/// Once the sequence runs out every roll returns `ROLL_MAX`, which fails any
/// chance below 100.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    rolls: VecDeque<f64>,
    drawn: usize,
}

impl ScriptedRolls {
    pub fn new(rolls: impl IntoIterator<Item = f64>) -> Self {
        ScriptedRolls {
            rolls: rolls.into_iter().collect(),
            drawn: 0,
        }
    }

    /// Number of rolls consumed so far
    pub fn drawn(&self) -> usize {
        self.drawn
    }

    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl RollSource for ScriptedRolls {
    fn roll(&mut self) -> f64 {
        self.drawn += 1;
        self.rolls.pop_front().unwrap_or(ROLL_MAX)
    }
}
