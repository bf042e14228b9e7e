//! A fixed-capacity circular replay buffer.
//!
//! [`ReplayBuffer`] stores [`Transition`]s in a ring of `capacity` slots. Once the ring
//! is full, every new transition overwrites the oldest one. Batches are drawn uniformly
//! at random without replacement and returned as parallel arrays in a
//! [`TransitionBatch`].
//!
//! ```rust
//! use distrl_core::{
//!     replay_buffer::{ReplayBuffer, ReplayBufferConfig, Transition},
//!     ReplayBufferBase,
//! };
//!
//! let config = ReplayBufferConfig::default().capacity(3).seed(1);
//! let mut buffer = ReplayBuffer::build(&config).unwrap();
//!
//! for i in 0..5 {
//!     let tr = Transition::new(vec![i as f32], 0, 1.0, vec![i as f32 + 1.0], false);
//!     buffer.store(tr);
//! }
//! assert_eq!(buffer.len(), 3);
//!
//! let batch = buffer.sample_batch(2).unwrap();
//! assert_eq!(batch.len(), 2);
//! ```
mod base;
mod batch;
mod config;
mod step_proc;
pub use base::ReplayBuffer;
pub use batch::{Transition, TransitionBatch};
pub use config::ReplayBufferConfig;
pub use step_proc::{SimpleStepProcessor, SimpleStepProcessorConfig};
