//! Transitions and batches of transitions.

/// A single transition `(o_t, a_t, r_t, o_t+1, done_t)`.
///
/// Immutable once stored in a [`ReplayBuffer`](super::ReplayBuffer).
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    /// Observation `o_t`.
    pub obs: Vec<f32>,

    /// Index of the action `a_t`.
    pub act: usize,

    /// Reward `r_t`.
    pub reward: f32,

    /// Next observation `o_t+1`.
    pub next_obs: Vec<f32>,

    /// `true` if the episode ended with this transition.
    pub is_done: bool,
}

impl Transition {
    /// Constructs a transition.
    pub fn new(obs: Vec<f32>, act: usize, reward: f32, next_obs: Vec<f32>, is_done: bool) -> Self {
        Self {
            obs,
            act,
            reward,
            next_obs,
            is_done,
        }
    }
}

/// A batch of transitions stored as parallel arrays.
///
/// Observations are flattened row-major, i.e., `obs[i * obs_dim..(i + 1) * obs_dim]`
/// is the observation of the `i`-th transition.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionBatch {
    /// Dimension of an observation.
    pub obs_dim: usize,

    /// Observations, `[batch, obs_dim]`.
    pub obs: Vec<f32>,

    /// Action indices, `[batch]`.
    pub act: Vec<usize>,

    /// Rewards, `[batch]`.
    pub reward: Vec<f32>,

    /// Next observations, `[batch, obs_dim]`.
    pub next_obs: Vec<f32>,

    /// Done flags, `[batch]`.
    pub is_done: Vec<bool>,

    /// Indices of the sampled slots in the replay buffer, in the order drawn.
    pub ix_sample: Vec<usize>,
}

impl TransitionBatch {
    /// Number of transitions in the batch.
    pub fn len(&self) -> usize {
        self.act.len()
    }

    /// Returns `true` if the batch has no transitions.
    pub fn is_empty(&self) -> bool {
        self.act.is_empty()
    }

    pub(super) fn from_transitions<'a>(
        obs_dim: usize,
        ixs: Vec<usize>,
        transitions: impl Iterator<Item = &'a Transition>,
    ) -> Self {
        let n = ixs.len();
        let mut batch = Self {
            obs_dim,
            obs: Vec::with_capacity(n * obs_dim),
            act: Vec::with_capacity(n),
            reward: Vec::with_capacity(n),
            next_obs: Vec::with_capacity(n * obs_dim),
            is_done: Vec::with_capacity(n),
            ix_sample: ixs,
        };

        for tr in transitions {
            batch.obs.extend_from_slice(&tr.obs);
            batch.act.push(tr.act);
            batch.reward.push(tr.reward);
            batch.next_obs.extend_from_slice(&tr.next_obs);
            batch.is_done.push(tr.is_done);
        }

        batch
    }
}
