//! Replay buffer interface.
//!
//! Replay buffers store transitions collected from environments and generate
//! batches of them for training agents.
use anyhow::Result;

/// Interface for buffers that store experiences from environments.
///
/// # Examples
///
/// ```ignore
/// struct SimpleBuffer<T> {
///     items: Vec<T>,
/// }
///
/// impl<T> ExperienceBufferBase for SimpleBuffer<T> {
///     type Item = T;
///
///     fn push(&mut self, tr: T) -> Result<()> {
///         self.items.push(tr);
///         Ok(())
///     }
///
///     fn len(&self) -> usize {
///         self.items.len()
///     }
/// }
/// ```
pub trait ExperienceBufferBase {
    /// The type of items stored in the buffer.
    type Item;

    /// Pushes a new experience into the buffer.
    fn push(&mut self, tr: Self::Item) -> Result<()>;

    /// Returns the current number of experiences in the buffer.
    fn len(&self) -> usize;

    /// Returns `true` if no experience is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Interface for replay buffers that generate batches for training.
///
/// This trait is independent of [`ExperienceBufferBase`] and focuses on the
/// batch generation process.
pub trait ReplayBufferBase {
    /// Configuration parameters for the replay buffer.
    type Config: Clone;

    /// The type of batch generated for training.
    type Batch;

    /// Builds a new replay buffer from the given configuration.
    fn build(config: &Self::Config) -> Result<Self>
    where
        Self: Sized;

    /// Maximum number of experiences held by the buffer.
    fn capacity(&self) -> usize;

    /// Constructs a batch of `size` experiences for training.
    ///
    /// Fails with [`DistrlError::InsufficientData`] if fewer than `size` experiences
    /// are stored.
    ///
    /// [`DistrlError::InsufficientData`]: crate::error::DistrlError::InsufficientData
    fn batch(&mut self, size: usize) -> Result<Self::Batch>;
}
