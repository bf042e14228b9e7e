#![warn(missing_docs)]
//! Classic control environments for distrl.
//!
//! The environments implement [`distrl_core::Env`] with `Vec<f32>` observations and
//! `usize` actions, so they can be plugged into [`distrl_core::Trainer`] directly.
mod cartpole;
pub use cartpole::{CartPoleConfig, CartPoleEnv};
