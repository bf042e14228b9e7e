use super::Support;
use crate::{
    model::SubModel1,
    opt::{Optimizer, OptimizerConfig},
    util::{hard_update, OutDim},
};
use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor, D};
use candle_nn::{ops::softmax, VarBuilder, VarMap};
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Lower bound of probabilities in a distribution, keeping the logarithm in the loss finite.
pub const PROB_FLOOR: f32 = 1e-3;

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`C51Model`].
pub struct C51ModelConfig<Q>
where
    Q: OutDim,
{
    pub(super) q_config: Option<Q>,
    pub(super) opt_config: OptimizerConfig,
}

impl<Q> Default for C51ModelConfig<Q>
where
    Q: OutDim,
{
    fn default() -> Self {
        Self {
            q_config: None,
            opt_config: OptimizerConfig::default(),
        }
    }
}

impl<Q> C51ModelConfig<Q>
where
    Q: DeserializeOwned + Serialize + OutDim,
{
    /// Sets the configuration of the function approximator.
    ///
    /// Its output dimension is overwritten with `n_actions * atom_size` when the
    /// model is built.
    pub fn q_config(mut self, v: Q) -> Self {
        self.q_config = Some(v);
        self
    }

    /// Sets optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    /// Constructs [`C51ModelConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`C51ModelConfig`] to as a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Maps observations to categorical return distributions, one per action.
///
/// The function approximator `Q` outputs raw scores of shape
/// `[batch, n_actions * atom_size]`. [`C51Model::distribution`] turns them into
/// probabilities of shape `[batch, n_actions, atom_size]`.
///
/// The model owns its parameters in a [`VarMap`] together with an optimizer.
pub struct C51Model<Q>
where
    Q: SubModel1<Input = Tensor, Output = Tensor>,
{
    device: Device,
    varmap: VarMap,
    n_actions: usize,
    atom_size: usize,

    /// Atoms of shape `[1, 1, atom_size]`.
    support: Tensor,

    q: Q,
    opt: Optimizer,
}

impl<Q> C51Model<Q>
where
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    Q::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    /// Constructs [`C51Model`].
    pub fn build(
        config: C51ModelConfig<Q::Config>,
        support: &Support,
        n_actions: usize,
        device: Device,
    ) -> Result<Self> {
        let atom_size = support.len();
        let mut q_config = config.q_config.context("q_config is not set.")?;
        q_config.set_out_dim(n_actions * atom_size);

        let varmap = VarMap::new();
        let q = {
            let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
            Q::build(vb, q_config)?
        };
        let opt = config.opt_config.build(varmap.all_vars())?;
        let support = support.to_tensor(&device)?.reshape((1, 1, atom_size))?;

        Ok(Self {
            device,
            varmap,
            n_actions,
            atom_size,
            support,
            q,
            opt,
        })
    }

    /// Raw scores of shape `[batch, n_actions * atom_size]`.
    pub fn forward_raw(&self, obs: &Tensor) -> Result<Tensor> {
        self.q.forward(obs)
    }

    /// Probabilities of shape `[batch, n_actions, atom_size]`.
    ///
    /// Each `[b, a, :]` slice is normalized with softmax, then every entry is raised to
    /// at least [`PROB_FLOOR`]. The floor breaks exact normalization slightly.
    pub fn distribution(&self, obs: &Tensor) -> Result<Tensor> {
        let xs = self.forward_raw(obs)?;
        let batch_size = xs.dims()[0];
        let xs = xs.reshape((batch_size, self.n_actions, self.atom_size))?;
        Ok(softmax(&xs, D::Minus1)?.maximum(PROB_FLOOR)?)
    }

    /// Expected values of shape `[batch, n_actions]` for a given distribution.
    pub fn expected_values(&self, dist: &Tensor) -> Result<Tensor> {
        Ok(dist.broadcast_mul(&self.support)?.sum(D::Minus1)?)
    }

    /// Action values of shape `[batch, n_actions]`, the inner product of
    /// [`C51Model::distribution`] and the support.
    pub fn action_values(&self, obs: &Tensor) -> Result<Tensor> {
        self.expected_values(&self.distribution(obs)?)
    }

    /// Updates parameters by one optimization step minimizing `loss`.
    pub fn backward_step(&mut self, loss: &Tensor) -> Result<()> {
        self.opt.backward_step(loss)
    }

    /// Replaces all parameters with those of `src`.
    pub fn hard_sync(&mut self, src: &Self) -> Result<()> {
        hard_update(&self.varmap, &src.varmap)
    }

    /// The device on which the model runs.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Number of actions.
    pub fn n_actions(&self) -> usize {
        self.n_actions
    }

    /// Saves the parameters in a safetensors file.
    pub fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        self.varmap.save(&path)?;
        info!("Save c51 model to {:?}", path.as_ref());
        Ok(())
    }

    /// Loads the parameters from a safetensors file.
    pub fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.varmap.load(&path)?;
        info!("Load c51 model from {:?}", path.as_ref());
        Ok(())
    }
}

/// Picks the distributions of the given actions.
///
/// `dist` has shape `[batch, n_actions, atom_size]` and `act` has shape `[batch]` with
/// dtype `u32`. Returns a tensor of shape `[batch, atom_size]`.
pub(super) fn gather_actions(dist: &Tensor, act: &Tensor) -> Result<Tensor> {
    let (batch_size, _, atom_size) = dist.dims3()?;
    let ix = act
        .reshape((batch_size, 1, 1))?
        .broadcast_as((batch_size, 1, atom_size))?
        .contiguous()?;
    Ok(dist.gather(&ix, 1)?.squeeze(1)?)
}
