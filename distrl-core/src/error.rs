//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
///
/// Functions in this workspace return [`anyhow::Result`]; the variants below can be
/// recovered from an [`anyhow::Error`] with `downcast_ref::<DistrlError>()`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DistrlError {
    /// Invalid configuration detected at construction.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A batch larger than the number of stored transitions was requested.
    #[error("Insufficient data: requested {requested} transitions, but only {available} are stored")]
    InsufficientData {
        /// Requested batch size.
        requested: usize,

        /// Number of transitions in the buffer.
        available: usize,
    },

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKey(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueType(String),
}

impl DistrlError {
    /// Shorthand for [`DistrlError::Configuration`].
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}
