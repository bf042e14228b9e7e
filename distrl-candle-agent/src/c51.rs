//! Categorical distributional agent (C51).
//!
//! The agent learns, for every action, a categorical distribution of returns over a
//! fixed [`Support`]. Targets are built by [`CategoricalProjector`] from the target
//! network's distribution at the next state, and the online network is trained with the
//! cross-entropy between the projected target and its own prediction.
mod base;
mod config;
mod explorer;
mod model;
mod projection;
mod support;
pub use base::C51;
pub use config::C51Config;
pub use explorer::EpsilonGreedy;
pub use model::{C51Model, C51ModelConfig, PROB_FLOOR};
pub use projection::CategoricalProjector;
pub use support::Support;
