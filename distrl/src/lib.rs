//! Categorical distributional reinforcement learning in Rust.
//!
//! distrl consists of the following crates:
//!
//! * [`distrl_core`] provides the traits of environments and agents, a
//!   fixed-capacity replay buffer, the training loop and records. It does not depend
//!   on any tensor backend.
//! * [`distrl_candle_agent`] implements the categorical distributional
//!   agent C51 with [candle](https://crates.io/crates/candle-core).
//! * [`distrl_classic_env`] has classic control environments implemented in
//!   Rust, such as cart-pole.
//!
//! This crate re-exports them and hosts runnable examples. The training loop of the
//! `c51_cartpole` example is wired as follows:
//!
//! ```no_run
//! use distrl::{
//!     distrl_candle_agent::{
//!         c51::{C51Config, C51ModelConfig, C51},
//!         mlp::{Mlp, MlpConfig},
//!     },
//!     distrl_classic_env::{CartPoleConfig, CartPoleEnv},
//!     distrl_core::{
//!         record::LogRecorder,
//!         replay_buffer::{ReplayBuffer, ReplayBufferConfig, SimpleStepProcessor},
//!         Configurable, DefaultEvaluator, Trainer, TrainerConfig,
//!     },
//! };
//!
//! # fn main() -> anyhow::Result<()> {
//! type Agent = C51<CartPoleEnv, Mlp, ReplayBuffer>;
//!
//! let env_config = CartPoleConfig::default();
//! let model_config = C51ModelConfig::default().q_config(MlpConfig::new(4, vec![128, 128], 0));
//! let mut agent = Agent::build(C51Config::default().model_config(model_config))?;
//! let mut trainer = Trainer::<CartPoleEnv, SimpleStepProcessor<CartPoleEnv>, ReplayBuffer>::build(
//!     TrainerConfig::default().num_frames(10000),
//!     env_config.clone(),
//!     Default::default(),
//!     ReplayBufferConfig::default().capacity(2000),
//! )?;
//! let mut evaluator = DefaultEvaluator::<CartPoleEnv>::new(&env_config, 0, 5)?;
//! trainer.train(&mut agent, &mut LogRecorder::new(), &mut evaluator)?;
//! # Ok(())
//! # }
//! ```
pub use distrl_candle_agent;
pub use distrl_classic_env;
pub use distrl_core;
