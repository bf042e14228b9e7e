//! Agent.
use super::{Env, Policy, ReplayBufferBase};
use crate::record::Record;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Operating mode of an [`Agent`].
///
/// The mode is switched only by the caller, never by the agent itself.
/// Transitions are stored into the replay buffer only in [`Mode::Train`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Mode {
    /// Exploring actions are taken and transitions are stored.
    Train,

    /// Greedy actions are taken and nothing is stored.
    Eval,
}

impl Mode {
    /// Returns `true` if transitions observed in this mode go into the replay buffer.
    pub fn stores_transitions(&self) -> bool {
        matches!(self, Self::Train)
    }
}

/// Represents a trainable policy on an environment.
pub trait Agent<E: Env, R: ReplayBufferBase>: Policy<E> {
    /// Returns the current mode.
    fn mode(&self) -> Mode;

    /// Switches the mode.
    fn set_mode(&mut self, mode: Mode);

    /// Set the policy to training mode.
    fn train(&mut self) {
        self.set_mode(Mode::Train);
    }

    /// Set the policy to evaluation mode.
    fn eval(&mut self) {
        self.set_mode(Mode::Eval);
    }

    /// Return if it is in training mode.
    fn is_train(&self) -> bool {
        self.mode() == Mode::Train
    }

    /// Checks that the agent can be trained with the given buffer.
    ///
    /// Called once by [`Trainer`](crate::Trainer) after the buffer is built and
    /// before the first environment step.
    fn check_buffer(&self, _buffer: &R) -> Result<()> {
        Ok(())
    }

    /// Performs an optimization step.
    ///
    /// Returns `false` if the step was skipped, for example while the replay buffer holds
    /// fewer transitions than a batch.
    fn opt(&mut self, buffer: &mut R) -> Result<bool> {
        Ok(self.opt_with_record(buffer)?.is_some())
    }

    /// Performs an optimization step and returns some information.
    ///
    /// `buffer` is a replay buffer from which transitions will be taken
    /// for updating model parameters. Returns `None` if the step was skipped.
    fn opt_with_record(&mut self, buffer: &mut R) -> Result<Option<Record>>;

    /// Save the parameters of the agent in the given directory.
    ///
    /// This method commonly creates a number of files consisting the agent
    /// in the directory. For example, the C51 agent in `distrl_candle_agent` saves
    /// both the online and the target networks.
    fn save_params(&self, path: &Path) -> Result<()>;

    /// Load the parameters of the agent from the given directory.
    fn load_params(&mut self, path: &Path) -> Result<()>;
}
