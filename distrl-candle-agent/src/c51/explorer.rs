//! Epsilon-greedy exploration with a linear schedule.
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Epsilon-greedy explorer.
///
/// Epsilon starts at `max_epsilon` and decreases by `(max_epsilon - min_epsilon) * epsilon_decay`
/// at every call of [`EpsilonGreedy::decay`], down to `min_epsilon`.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonGreedy {
    epsilon: f64,
    max_epsilon: f64,
    min_epsilon: f64,
    epsilon_decay: f64,
}

impl EpsilonGreedy {
    /// Constructs epsilon-greedy explorer.
    pub fn new(max_epsilon: f64, min_epsilon: f64, epsilon_decay: f64) -> Self {
        Self {
            epsilon: max_epsilon,
            max_epsilon,
            min_epsilon,
            epsilon_decay,
        }
    }

    /// The current epsilon.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Returns `true` with probability epsilon, meaning that a random action should be taken.
    pub fn explore(&self, rng: &mut impl Rng) -> bool {
        self.epsilon > rng.gen::<f64>()
    }

    /// Applies one step of the linear schedule.
    pub fn decay(&mut self) {
        let step = (self.max_epsilon - self.min_epsilon) * self.epsilon_decay;
        self.epsilon = (self.epsilon - step).max(self.min_epsilon);
    }
}
