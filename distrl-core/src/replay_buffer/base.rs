//! Circular replay buffer.
use super::{ReplayBufferConfig, Transition, TransitionBatch};
use crate::{error::DistrlError, ExperienceBufferBase, ReplayBufferBase};
use anyhow::Result;
use rand::{rngs::StdRng, seq::index, SeedableRng};

/// A fixed-capacity circular store of [`Transition`]s.
///
/// `ptr` always points to the next slot to overwrite and wraps modulo the capacity.
/// `size` grows by one per stored transition until it reaches the capacity and stays
/// there; from then on the oldest transition is evicted first.
pub struct ReplayBuffer {
    /// Maximum number of transitions that can be stored.
    capacity: usize,

    /// Next slot to write.
    ptr: usize,

    /// Current number of stored transitions.
    size: usize,

    /// Transition slots. Grows up to `capacity`, then slots are overwritten in place.
    slots: Vec<Transition>,

    /// Random number generator for sampling.
    rng: StdRng,
}

impl ReplayBuffer {
    /// Writes a transition into the slot at `ptr` and advances `ptr`.
    ///
    /// Never fails. Once the buffer is full the oldest transition is overwritten.
    pub fn store(&mut self, tr: Transition) {
        debug_assert!(
            self.slots.is_empty() || self.slots[0].obs.len() == tr.obs.len(),
            "observation dimension changed"
        );

        if self.slots.len() < self.capacity {
            self.slots.push(tr);
        } else {
            self.slots[self.ptr] = tr;
        }
        self.ptr = (self.ptr + 1) % self.capacity;
        self.size = (self.size + 1).min(self.capacity);
    }

    /// Draws `batch_size` distinct transitions uniformly at random.
    ///
    /// The transitions are returned in the order of the random draw.
    /// Fails with [`DistrlError::InsufficientData`] if `batch_size > self.len()`.
    pub fn sample_batch(&mut self, batch_size: usize) -> Result<TransitionBatch> {
        if batch_size > self.size {
            return Err(DistrlError::InsufficientData {
                requested: batch_size,
                available: self.size,
            }
            .into());
        }

        let ixs = index::sample(&mut self.rng, self.size, batch_size).into_vec();
        let obs_dim = self.slots.first().map_or(0, |tr| tr.obs.len());
        let slots = &self.slots;

        Ok(TransitionBatch::from_transitions(
            obs_dim,
            ixs.clone(),
            ixs.iter().map(|&ix| &slots[ix]),
        ))
    }

    /// Number of stored transitions.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if no transition is stored.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Maximum number of transitions.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates over the stored transitions from the oldest to the newest.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        // Before wrapping, `ptr == size` and the tail is empty.
        let (newer, older) = self.slots.split_at(self.ptr);
        older.iter().chain(newer.iter())
    }
}

impl ExperienceBufferBase for ReplayBuffer {
    type Item = Transition;

    fn push(&mut self, tr: Self::Item) -> Result<()> {
        self.store(tr);
        Ok(())
    }

    fn len(&self) -> usize {
        self.size
    }
}

impl ReplayBufferBase for ReplayBuffer {
    type Config = ReplayBufferConfig;
    type Batch = TransitionBatch;

    fn build(config: &Self::Config) -> Result<Self> {
        if config.capacity == 0 {
            return Err(DistrlError::config("capacity of the replay buffer must be positive").into());
        }

        Ok(Self {
            capacity: config.capacity,
            ptr: 0,
            size: 0,
            slots: Vec::with_capacity(config.capacity),
            rng: StdRng::seed_from_u64(config.seed),
        })
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn batch(&mut self, size: usize) -> Result<Self::Batch> {
        self.sample_batch(size)
    }
}
