//! Core functionalities.
mod agent;
mod env;
mod policy;
mod replay_buffer;
mod step;
pub use agent::{Agent, Mode};
pub use env::Env;
pub use policy::{Configurable, Policy};
pub use replay_buffer::{ExperienceBufferBase, ReplayBufferBase};
use std::fmt::Debug;
pub use step::{Info, Step, StepProcessor};

/// An observation of an environment.
///
/// Observations are fixed-length real vectors. The length is given by
/// [`Env::obs_dim`] and does not change during the lifetime of the environment.
pub trait Obs: Clone + Debug {
    /// Returns the observation as a slice of length [`Env::obs_dim`].
    fn as_slice(&self) -> &[f32];
}

impl Obs for Vec<f32> {
    fn as_slice(&self) -> &[f32] {
        self
    }
}

/// A discrete action of an environment.
///
/// Actions are identified by their index in `0..n_actions`.
pub trait Act: Clone + Debug {
    /// Constructs the action with the given index.
    fn from_index(ix: usize) -> Self;

    /// Returns the index of the action.
    fn index(&self) -> usize;
}

impl Act for usize {
    fn from_index(ix: usize) -> Self {
        ix
    }

    fn index(&self) -> usize {
        *self
    }
}
