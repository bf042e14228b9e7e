//! C51 agent implemented with candle.
use super::{
    config::C51Config, explorer::EpsilonGreedy, model::gather_actions, C51Model,
    CategoricalProjector, Support,
};
use crate::{model::SubModel1, util::OutDim};
use anyhow::Result;
use candle_core::{Device, Tensor, D};
use distrl_core::{
    error::DistrlError,
    record::{Record, RecordValue},
    replay_buffer::TransitionBatch,
    Act, Agent, Configurable, Env, ExperienceBufferBase, Mode, Obs, Policy, ReplayBufferBase,
};
use log::{debug, info};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{de::DeserializeOwned, Serialize};
use std::{fs, marker::PhantomData, path::Path};

/// C51 agent implemented with candle.
///
/// * In [`Mode::Train`], actions are epsilon-greedy. In [`Mode::Eval`], actions are
///   greedy with respect to the action values of the online network.
/// * An update is performed only when the buffer holds at least `batch_size`
///   transitions. After each update epsilon decays, and the target network is
///   synchronized with the online network every `target_update` updates.
/// * The target network selects the greedy next action and provides its distribution.
pub struct C51<E, Q, R>
where
    E: Env,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase<Batch = TransitionBatch> + ExperienceBufferBase,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
{
    qnet: C51Model<Q>,
    qnet_tgt: C51Model<Q>,
    projector: CategoricalProjector,
    explorer: EpsilonGreedy,
    n_actions: usize,
    batch_size: usize,
    target_update: usize,
    gamma: f32,
    mode: Mode,
    update_count: usize,
    device: Device,
    rng: SmallRng,
    phantom: PhantomData<(E, R)>,
}

impl<E, Q, R> C51<E, Q, R>
where
    E: Env,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase<Batch = TransitionBatch> + ExperienceBufferBase,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
{
    /// Computes the loss on a batch and updates the online network.
    fn update(&mut self, batch: TransitionBatch) -> Result<f32> {
        let batch_size = batch.len();
        let obs_dim = batch.obs_dim;
        let n_atoms = self.projector.support().len();

        let obs = Tensor::from_vec(batch.obs, (batch_size, obs_dim), &self.device)?;
        let next_obs = Tensor::from_vec(batch.next_obs, (batch_size, obs_dim), &self.device)?;
        let act = {
            let act = batch.act.iter().map(|&a| a as u32).collect::<Vec<_>>();
            Tensor::from_vec(act, (batch_size,), &self.device)?
        };

        // Target distribution, no gradient flows into the target network
        let proj_dist = {
            let dist = self.qnet_tgt.distribution(&next_obs)?.detach();
            let next_act = self.qnet_tgt.expected_values(&dist)?.argmax(D::Minus1)?;
            let next_dist = gather_actions(&dist, &next_act)?
                .flatten_all()?
                .to_vec1::<f32>()?;
            let proj = self
                .projector
                .project(&next_dist, &batch.reward, &batch.is_done, self.gamma)?;
            Tensor::from_vec(proj, (batch_size, n_atoms), &self.device)?
        };

        let log_p = {
            let dist = self.qnet.distribution(&obs)?;
            gather_actions(&dist, &act)?.log()?
        };
        let loss = (proj_dist * log_p)?.sum(D::Minus1)?.mean_all()?.neg()?;
        self.qnet.backward_step(&loss)?;

        Ok(loss.to_scalar::<f32>()?)
    }

    /// Copies the parameters of the online network into the target network.
    pub fn hard_sync(&mut self) -> Result<()> {
        self.qnet_tgt.hard_sync(&self.qnet)
    }

    /// The current epsilon.
    pub fn epsilon(&self) -> f64 {
        self.explorer.epsilon()
    }

    /// Number of updates performed so far.
    pub fn update_count(&self) -> usize {
        self.update_count
    }

    /// The support of the return distributions.
    pub fn support(&self) -> &Support {
        self.projector.support()
    }

    /// Action values of the online and the target networks for a batch of observations.
    pub fn action_values(&self, obs: &Tensor) -> Result<(Tensor, Tensor)> {
        Ok((
            self.qnet.action_values(obs)?,
            self.qnet_tgt.action_values(obs)?,
        ))
    }

    fn greedy_action(&self, obs: &E::Obs) -> Result<usize> {
        let obs = obs.as_slice();
        let obs = Tensor::from_slice(obs, (1, obs.len()), &self.device)?;
        let act = self
            .qnet
            .action_values(&obs)?
            .argmax(D::Minus1)?
            .to_vec1::<u32>()?;
        Ok(act[0] as usize)
    }
}

impl<E, Q, R> Policy<E> for C51<E, Q, R>
where
    E: Env,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase<Batch = TransitionBatch> + ExperienceBufferBase,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
{
    fn sample(&mut self, obs: &E::Obs) -> Result<E::Act> {
        let ix = match self.mode {
            Mode::Train if self.explorer.explore(&mut self.rng) => {
                self.rng.gen_range(0..self.n_actions)
            }
            _ => self.greedy_action(obs)?,
        };
        Ok(E::Act::from_index(ix))
    }
}

impl<E, Q, R> Configurable<E> for C51<E, Q, R>
where
    E: Env,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase<Batch = TransitionBatch> + ExperienceBufferBase,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
{
    type Config = C51Config<Q::Config>;

    /// Constructs C51 agent.
    ///
    /// The target network starts as a copy of the online network.
    fn build(config: Self::Config) -> Result<Self> {
        config.validate()?;
        let support = Support::new(config.v_min, config.v_max, config.atom_size)?;
        let device: Device = config.device.try_into()?;
        let qnet = C51Model::build(
            config.model_config.clone(),
            &support,
            config.n_actions,
            device.clone(),
        )?;
        let mut qnet_tgt =
            C51Model::build(config.model_config, &support, config.n_actions, device.clone())?;
        qnet_tgt.hard_sync(&qnet)?;

        Ok(C51 {
            qnet,
            qnet_tgt,
            projector: CategoricalProjector::new(support),
            explorer: EpsilonGreedy::new(
                config.max_epsilon,
                config.min_epsilon,
                config.epsilon_decay,
            ),
            n_actions: config.n_actions,
            batch_size: config.batch_size,
            target_update: config.target_update,
            gamma: config.gamma,
            mode: Mode::Train,
            update_count: 0,
            device,
            rng: SmallRng::seed_from_u64(config.seed),
            phantom: PhantomData,
        })
    }
}

impl<E, Q, R> Agent<E, R> for C51<E, Q, R>
where
    E: Env,
    Q: SubModel1<Input = Tensor, Output = Tensor>,
    R: ReplayBufferBase<Batch = TransitionBatch> + ExperienceBufferBase,
    Q::Config: DeserializeOwned + Serialize + OutDim + std::fmt::Debug + PartialEq + Clone,
{
    fn mode(&self) -> Mode {
        self.mode
    }

    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    fn check_buffer(&self, buffer: &R) -> Result<()> {
        let capacity = ReplayBufferBase::capacity(buffer);
        if self.batch_size > capacity {
            return Err(DistrlError::config(format!(
                "batch_size ({}) must not exceed the capacity of the replay buffer ({})",
                self.batch_size, capacity
            ))
            .into());
        }
        Ok(())
    }

    fn opt_with_record(&mut self, buffer: &mut R) -> Result<Option<Record>> {
        if ExperienceBufferBase::len(buffer) < self.batch_size {
            return Ok(None);
        }

        let batch = buffer.batch(self.batch_size)?;
        let loss = self.update(batch)?;
        self.explorer.decay();
        self.update_count += 1;
        debug!(
            "update {}: loss = {}, epsilon = {}",
            self.update_count,
            loss,
            self.explorer.epsilon()
        );

        if self.update_count % self.target_update == 0 {
            self.hard_sync()?;
            info!("Synchronized the target network at update {}", self.update_count);
        }

        Ok(Some(Record::from_slice(&[
            ("loss", RecordValue::Scalar(loss)),
            ("epsilon", RecordValue::Scalar(self.explorer.epsilon() as f32)),
            ("update_count", RecordValue::Scalar(self.update_count as f32)),
        ])))
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        self.qnet.save(path.join("c51.safetensors"))?;
        self.qnet_tgt.save(path.join("c51_tgt.safetensors"))?;
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        self.qnet.load(path.join("c51.safetensors"))?;
        self.qnet_tgt.load(path.join("c51_tgt.safetensors"))?;
        Ok(())
    }
}
