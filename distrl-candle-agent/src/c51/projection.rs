//! Projection of the distributional Bellman target onto a [`Support`].
use super::Support;
use anyhow::{bail, Result};

/// Builds target distributions for the categorical loss.
///
/// For each batch row with reward `r`, done flag `d` and next-state distribution `p`
/// over the support `z`, every atom is moved to
/// `tz_i = clamp(r + (1 - d) * gamma * z_i, v_min, v_max)` and its mass `p_i` is split
/// between the two nearest atoms by linear interpolation. Each row has its own
/// accumulator, so mass never leaks between rows.
#[derive(Debug, Clone)]
pub struct CategoricalProjector {
    support: Support,
}

impl CategoricalProjector {
    /// Constructs a projector onto the given support.
    pub fn new(support: Support) -> Self {
        Self { support }
    }

    /// The support onto which distributions are projected.
    pub fn support(&self) -> &Support {
        &self.support
    }

    /// Projects a batch of next-state distributions.
    ///
    /// `next_dist` is a row-major `[batch, atom_size]` array, where `batch` is
    /// `reward.len()`. Returns the projected distributions in the same layout.
    /// Rows summing to 1 are projected onto rows summing to 1.
    pub fn project(
        &self,
        next_dist: &[f32],
        reward: &[f32],
        is_done: &[bool],
        gamma: f32,
    ) -> Result<Vec<f32>> {
        let n_atoms = self.support.len();
        let batch_size = reward.len();
        if is_done.len() != batch_size {
            bail!(
                "Lengths of reward and is_done differ: {} and {}",
                batch_size,
                is_done.len()
            );
        }
        if next_dist.len() != batch_size * n_atoms {
            bail!(
                "next_dist must have {} x {} elements, got {}",
                batch_size,
                n_atoms,
                next_dist.len()
            );
        }

        let mut proj = vec![0f32; batch_size * n_atoms];
        let rows = next_dist
            .chunks_exact(n_atoms)
            .zip(proj.chunks_exact_mut(n_atoms));

        for (ix, (p, acc)) in rows.enumerate() {
            let not_done = if is_done[ix] { 0f32 } else { 1f32 };
            self.project_row(p, reward[ix], not_done * gamma, acc);
        }

        Ok(proj)
    }

    /// Accumulates the projection of one row into `acc`.
    fn project_row(&self, p: &[f32], reward: f32, discount: f32, acc: &mut [f32]) {
        let v_min = self.support.v_min();
        let v_max = self.support.v_max();
        let delta_z = self.support.delta_z();
        let last = (acc.len() - 1) as f32;

        for (&z, &p) in self.support.as_slice().iter().zip(p.iter()) {
            let tz = (reward + discount * z).clamp(v_min, v_max);
            let b = ((tz - v_min) / delta_z).clamp(0.0, last);
            let mut l = b.floor() as usize;
            let mut u = b.ceil() as usize;

            // When b is on an atom, widen the interval so that the weights sum to 1
            if l == u {
                if l > 0 {
                    l -= 1;
                } else {
                    u += 1;
                }
            }

            acc[l] += p * (u as f32 - b);
            acc[u] += p * (b - l as f32);
        }
    }
}
