#![warn(missing_docs)]
//! Core components of distrl, a distributional reinforcement learning library.
//!
//! This crate does not depend on any tensor backend. It provides
//!
//! * the environment contract ([`Env`]) together with [`Obs`], [`Act`] and [`Step`],
//! * policies and trainable agents ([`Policy`], [`Agent`], [`Mode`]),
//! * a fixed-capacity circular replay buffer ([`replay_buffer::ReplayBuffer`]),
//! * the training loop ([`Trainer`]) and evaluation ([`Evaluator`]),
//! * records used to observe training progress ([`record`]).
//!
//! Agents with neural network function approximators live in backend crates
//! such as `distrl-candle-agent`.
pub mod error;
pub mod record;
pub mod replay_buffer;

mod base;
pub use base::{
    Act, Agent, Configurable, Env, ExperienceBufferBase, Info, Mode, Obs, Policy,
    ReplayBufferBase, Step, StepProcessor,
};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};

mod trainer;
pub use trainer::{Sampler, Trainer, TrainerConfig};

#[cfg(test)]
pub(crate) mod dummy;
