//! Configuration of C51 agent.
use super::C51ModelConfig;
use crate::{util::OutDim, Device};
use anyhow::Result;
use distrl_core::error::DistrlError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`C51`](super::C51) agent.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct C51Config<Q>
where
    Q: OutDim,
{
    /// Configuration of the online and target models.
    pub model_config: C51ModelConfig<Q>,

    /// Number of discrete actions of the environment.
    pub n_actions: usize,

    /// Number of transitions in a batch.
    pub batch_size: usize,

    /// Period of hard target synchronization in updates.
    pub target_update: usize,

    /// Fraction of `max_epsilon - min_epsilon` subtracted from epsilon at every update.
    pub epsilon_decay: f64,

    /// Initial epsilon.
    pub max_epsilon: f64,

    /// Lower bound of epsilon.
    pub min_epsilon: f64,

    /// Discount factor.
    pub gamma: f32,

    /// The smallest atom of the support.
    pub v_min: f32,

    /// The largest atom of the support.
    pub v_max: f32,

    /// Number of atoms.
    pub atom_size: usize,

    /// Device on which the models run.
    pub device: Device,

    /// Seed of the random number generator used for exploration.
    pub seed: u64,
}

impl<Q> Default for C51Config<Q>
where
    Q: OutDim,
{
    fn default() -> Self {
        Self {
            model_config: Default::default(),
            n_actions: 2,
            batch_size: 32,
            target_update: 100,
            epsilon_decay: 1.0 / 2000.0,
            max_epsilon: 1.0,
            min_epsilon: 0.1,
            gamma: 0.99,
            v_min: 0.0,
            v_max: 200.0,
            atom_size: 51,
            device: Device::Cpu,
            seed: 42,
        }
    }
}

impl<Q> C51Config<Q>
where
    Q: DeserializeOwned + Serialize + OutDim,
{
    /// Sets the configuration of the models.
    pub fn model_config(mut self, model_config: C51ModelConfig<Q>) -> Self {
        self.model_config = model_config;
        self
    }

    /// Sets the number of actions.
    pub fn n_actions(mut self, v: usize) -> Self {
        self.n_actions = v;
        self
    }

    /// Sets the batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the period of target synchronization in updates.
    pub fn target_update(mut self, v: usize) -> Self {
        self.target_update = v;
        self
    }

    /// Sets the decay rate of epsilon.
    pub fn epsilon_decay(mut self, v: f64) -> Self {
        self.epsilon_decay = v;
        self
    }

    /// Sets the initial epsilon.
    pub fn max_epsilon(mut self, v: f64) -> Self {
        self.max_epsilon = v;
        self
    }

    /// Sets the lower bound of epsilon.
    pub fn min_epsilon(mut self, v: f64) -> Self {
        self.min_epsilon = v;
        self
    }

    /// Sets the discount factor.
    pub fn gamma(mut self, v: f32) -> Self {
        self.gamma = v;
        self
    }

    /// Sets the range of the support.
    pub fn v_range(mut self, v_min: f32, v_max: f32) -> Self {
        self.v_min = v_min;
        self.v_max = v_max;
        self
    }

    /// Sets the number of atoms.
    pub fn atom_size(mut self, v: usize) -> Self {
        self.atom_size = v;
        self
    }

    /// Sets the device.
    pub fn device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Checks the parameters which do not depend on other objects.
    ///
    /// The support parameters are checked by [`Support::new`](super::Support::new), and
    /// `batch_size <= memory_size` when the replay buffer is given to the agent.
    pub fn validate(&self) -> Result<()> {
        let err = |msg: String| -> Result<()> { Err(DistrlError::config(msg).into()) };

        if self.n_actions == 0 {
            return err("n_actions must be positive".into());
        }
        if self.batch_size == 0 {
            return err("batch_size must be positive".into());
        }
        if self.target_update == 0 {
            return err("target_update must be positive".into());
        }
        if !(0.0..=1.0).contains(&self.epsilon_decay) {
            return err(format!(
                "epsilon_decay must be in [0, 1], got {}",
                self.epsilon_decay
            ));
        }
        if !(0.0 <= self.min_epsilon && self.min_epsilon <= self.max_epsilon && self.max_epsilon <= 1.0)
        {
            return err(format!(
                "epsilon bounds must satisfy 0 <= min_epsilon <= max_epsilon <= 1, got {} and {}",
                self.min_epsilon, self.max_epsilon
            ));
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return err(format!("gamma must be in [0, 1], got {}", self.gamma));
        }

        Ok(())
    }

    /// Constructs [`C51Config`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`C51Config`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
