//! Fixed atom grid of categorical return distributions.
use anyhow::Result;
use candle_core::{Device, Tensor};
use distrl_core::error::DistrlError;

/// Atoms linearly spaced from `v_min` to `v_max`, both inclusive.
///
/// `support[i] = v_min + i * delta_z` with `delta_z = (v_max - v_min) / (atom_size - 1)`.
/// Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Support {
    v_min: f32,
    v_max: f32,
    delta_z: f32,
    atoms: Vec<f32>,
}

impl Support {
    /// Constructs the support.
    ///
    /// Fails with [`DistrlError::Configuration`] if `atom_size < 2`, `v_min >= v_max`
    /// or either bound is not finite.
    pub fn new(v_min: f32, v_max: f32, atom_size: usize) -> Result<Self> {
        if atom_size < 2 {
            return Err(DistrlError::config(format!(
                "atom_size must be at least 2, got {}",
                atom_size
            ))
            .into());
        }
        if !v_min.is_finite() || !v_max.is_finite() {
            return Err(DistrlError::config("v_min and v_max must be finite").into());
        }
        if v_min >= v_max {
            return Err(DistrlError::config(format!(
                "v_min must be less than v_max, got v_min={} and v_max={}",
                v_min, v_max
            ))
            .into());
        }

        let delta_z = ((v_max as f64 - v_min as f64) / (atom_size - 1) as f64) as f32;
        let atoms = (0..atom_size)
            .map(|i| {
                if i == atom_size - 1 {
                    v_max
                } else {
                    v_min + i as f32 * delta_z
                }
            })
            .collect();

        Ok(Self {
            v_min,
            v_max,
            delta_z,
            atoms,
        })
    }

    /// Number of atoms.
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    /// Always `false`, a support has at least two atoms.
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Distance between consecutive atoms.
    pub fn delta_z(&self) -> f32 {
        self.delta_z
    }

    /// The smallest atom.
    pub fn v_min(&self) -> f32 {
        self.v_min
    }

    /// The largest atom.
    pub fn v_max(&self) -> f32 {
        self.v_max
    }

    /// The atoms in ascending order.
    pub fn as_slice(&self) -> &[f32] {
        &self.atoms
    }

    /// The atoms as a tensor of shape `[atom_size]`.
    pub fn to_tensor(&self, device: &Device) -> Result<Tensor> {
        Ok(Tensor::from_slice(&self.atoms, (self.atoms.len(),), device)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_spacing() -> Result<()> {
        for &(v_min, v_max, atom_size) in
            [(0.0, 200.0, 51), (-10.0, 10.0, 21), (-1.0, 3.5, 2), (0.1, 0.7, 7)].iter()
        {
            let support = Support::new(v_min, v_max, atom_size)?;
            let atoms = support.as_slice();
            assert_eq!(support.len(), atom_size);
            assert_eq!(atoms[0], v_min);
            assert_eq!(atoms[atom_size - 1], v_max);

            let delta_z = (v_max - v_min) / (atom_size - 1) as f32;
            for w in atoms.windows(2) {
                assert!((w[1] - w[0] - delta_z).abs() < 1e-5);
            }
        }

        Ok(())
    }

    #[test]
    fn test_default_grid() -> Result<()> {
        let support = Support::new(0.0, 200.0, 51)?;
        assert_eq!(support.delta_z(), 4.0);
        assert_eq!(support.as_slice()[10], 40.0);

        let t = support.to_tensor(&Device::Cpu)?;
        assert_eq!(t.to_vec1::<f32>()?, support.as_slice());

        Ok(())
    }

    #[test]
    fn test_invalid_configurations() {
        for &(v_min, v_max, atom_size) in [
            (0.0, 200.0, 1),
            (0.0, 200.0, 0),
            (10.0, 10.0, 51),
            (10.0, -10.0, 51),
            (f32::NEG_INFINITY, 0.0, 51),
        ]
        .iter()
        {
            let err = Support::new(v_min, v_max, atom_size).unwrap_err();
            assert!(matches!(
                err.downcast_ref::<DistrlError>(),
                Some(DistrlError::Configuration(_))
            ));
        }
    }
}
