//! Types and traits for recording training progress.
//!
//! Training and evaluation report what they observe as [`Record`]s, key-value maps
//! whose values are [`RecordValue`]s. The [`Trainer`](crate::Trainer) stores records
//! in an [`AggregateRecorder`] after every environment step and flushes the aggregated
//! values periodically.
//!
//! Keys emitted by this workspace include
//!
//! * `episode_return`, `episode_length`: at the end of each training episode,
//! * `loss`, `epsilon`, `update_count`: after each update of an agent,
//! * `eval_episode_return`: after each evaluation,
//! * `fps`, `opt_steps_per_sec`: computational cost.
//!
//! ```rust
//! use distrl_core::record::{Record, RecordValue};
//!
//! let mut record = Record::from_scalar("loss", 0.5);
//! record.insert("epsilon", RecordValue::Scalar(0.9));
//!
//! assert_eq!(record.get_scalar("loss").unwrap(), 0.5);
//! assert!(record.get_scalar("update_count").is_err());
//! ```
mod base;
mod buffered_recorder;
mod log_recorder;
mod null_recorder;
mod recorder;
mod storage;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use log_recorder::LogRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::{AggregateRecorder, Recorder};
pub use storage::RecordStorage;
