//! Train [`Agent`].
mod config;
mod sampler;
use crate::{
    error::DistrlError,
    record::{AggregateRecorder, Record, RecordValue::Scalar},
    Agent, Env, Evaluator, ExperienceBufferBase, ReplayBufferBase, StepProcessor,
};
use anyhow::Result;
pub use config::TrainerConfig;
use log::{info, warn};
pub use sampler::Sampler;
use std::{
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages training loop and related objects.
///
/// # Training loop
///
/// The loop runs a fixed number of environment steps, `num_frames`. All intervals
/// in [`TrainerConfig`] are counted in environment steps.
///
/// 0. Given an agent implementing [`Agent`], a recorder implementing
///    [`AggregateRecorder`] and an evaluator implementing [`Evaluator`].
/// 1. Build [`Env`], [`StepProcessor`] and the replay buffer, then check the buffer
///    against the agent with [`Agent::check_buffer`]. Invalid combinations, such as a
///    batch larger than the buffer capacity, fail here before any environment step.
/// 2. Do an environment step and push a transition to the replay buffer with [`Sampler`].
///    `env_steps += 1`.
/// 3. If `env_steps % opt_interval == 0`, do an optimization step. The agent may skip
///    it, for example while the buffer holds fewer transitions than a batch.
/// 4. If `env_steps % record_compute_cost_interval == 0`, record `fps` and
///    `opt_steps_per_sec`.
/// 5. If `env_steps % eval_interval == 0`, evaluate the agent in [`Mode::Eval`] and
///    record the result as `eval_episode_return`. If it is the best so far, the
///    parameters are saved in `(model_dir)/best`.
/// 6. If `env_steps % save_interval == 0`, the parameters are saved in
///    `(model_dir)/(env_steps)`.
/// 7. Store the record of this step. If `env_steps % flush_record_interval == 0`,
///    flush the recorder.
/// 8. Back to step 2 until `env_steps == num_frames`, then flush and close the
///    environment.
///
/// # Interaction of objects
///
/// ```mermaid
/// graph LR
///     A[Agent]-->|Env::Act|B[Env]
///     B -->|Env::Obs|A
///     B -->|"Step&lt;E: Env&gt;"|C[StepProcessor]
///     C -->|Transition|D[ReplayBuffer]
///     D -->|TransitionBatch|A
/// ```
///
/// * [`Agent`] emits an [`Env::Act`] `a_t` based on [`Env::Obs`] `o_t`. Given `a_t`,
///   [`Env`] changes its state and emits the next observation `o_t+1` in a [`Step`].
/// * [`StepProcessor`] turns the [`Step`] into a transition `(o_t, a_t, r_t, o_t+1, done_t)`,
///   keeping `o_t` from the previous step.
/// * Transitions pushed into the replay buffer are sampled as batches in
///   optimization steps.
///
/// [`Mode::Eval`]: crate::Mode::Eval
/// [`Step`]: crate::Step
pub struct Trainer<E, P, R>
where
    E: Env,
    P: StepProcessor<E>,
    R: ExperienceBufferBase<Item = P::Output> + ReplayBufferBase,
{
    /// Configuration of the environment for training.
    env_config_train: E::Config,

    /// Configuration of the transition producer.
    step_proc_config: P::Config,

    /// Configuration of the replay buffer.
    replay_buffer_config: R::Config,

    /// Where to save the trained model.
    model_dir: Option<PathBuf>,

    /// Random seed of the training environment.
    seed: i64,

    /// The number of environment steps.
    num_frames: usize,

    opt_interval: usize,
    record_compute_cost_interval: usize,
    flush_records_interval: usize,
    eval_interval: usize,
    save_interval: usize,

    /// Optimization steps for computing optimization steps per second.
    opt_steps_for_ops: usize,

    /// Timer for computing optimization steps per second.
    timer_for_ops: Duration,
}

impl<E, P, R> Trainer<E, P, R>
where
    E: Env,
    P: StepProcessor<E>,
    R: ExperienceBufferBase<Item = P::Output> + ReplayBufferBase,
{
    /// Constructs a trainer.
    ///
    /// Fails if any interval in `config` is zero.
    pub fn build(
        config: TrainerConfig,
        env_config_train: E::Config,
        step_proc_config: P::Config,
        replay_buffer_config: R::Config,
    ) -> Result<Self> {
        let intervals = [
            ("opt_interval", config.opt_interval),
            ("eval_interval", config.eval_interval),
            ("flush_record_interval", config.flush_record_interval),
            ("record_compute_cost_interval", config.record_compute_cost_interval),
            ("save_interval", config.save_interval),
        ];
        for (name, v) in intervals.iter() {
            if *v == 0 {
                return Err(DistrlError::config(format!("{} must be positive", name)).into());
            }
        }

        Ok(Self {
            env_config_train,
            step_proc_config,
            replay_buffer_config,
            model_dir: config.model_dir.map(PathBuf::from),
            seed: config.seed,
            num_frames: config.num_frames,
            opt_interval: config.opt_interval,
            record_compute_cost_interval: config.record_compute_cost_interval,
            flush_records_interval: config.flush_record_interval,
            eval_interval: config.eval_interval,
            save_interval: config.save_interval,
            opt_steps_for_ops: 0,
            timer_for_ops: Duration::new(0, 0),
        })
    }

    fn save_model<A: Agent<E, R>>(agent: &A, model_dir: &Path) {
        match agent.save_params(model_dir) {
            Ok(()) => info!("Saved the model in {:?}.", model_dir),
            Err(e) => warn!("Failed to save model in {:?}: {}", model_dir, e),
        }
    }

    /// Returns optimization steps per second, then reset the internal counter.
    fn opt_steps_per_sec(&mut self) -> f32 {
        let secs = self.timer_for_ops.as_secs_f32();
        let osps = if secs > 0.0 {
            self.opt_steps_for_ops as f32 / secs
        } else {
            0.0
        };
        self.opt_steps_for_ops = 0;
        self.timer_for_ops = Duration::new(0, 0);
        osps
    }

    /// Performs a training step.
    ///
    /// First, it performes an environment step once and pushes a transition
    /// into the given buffer with [`Sampler`]. Then, if the number of environment steps
    /// reaches the optimization interval `opt_interval`, performes an optimization
    /// step.
    ///
    /// The second return value in the tuple is if an optimization step is done (`true`).
    pub fn train_step<A>(
        &mut self,
        agent: &mut A,
        buffer: &mut R,
        sampler: &mut Sampler<E, P>,
        env_steps: &mut usize,
        opt_steps: &mut usize,
    ) -> Result<(Record, bool)>
    where
        A: Agent<E, R>,
    {
        let mut record = sampler.sample_and_push(agent, buffer)?;
        *env_steps += 1;

        if *env_steps % self.opt_interval != 0 {
            return Ok((record, false));
        }

        let timer = SystemTime::now();
        let record_agent = agent.opt_with_record(buffer)?;
        match record_agent {
            Some(record_agent) => {
                *opt_steps += 1;
                self.timer_for_ops += timer.elapsed()?;
                self.opt_steps_for_ops += 1;
                record.merge_inplace(record_agent);
                Ok((record, true))
            }
            None => Ok((record, false)),
        }
    }

    /// Train the agent.
    pub fn train<A, D>(
        &mut self,
        agent: &mut A,
        recorder: &mut dyn AggregateRecorder,
        evaluator: &mut D,
    ) -> Result<()>
    where
        A: Agent<E, R>,
        D: Evaluator<E>,
    {
        let env = E::build(&self.env_config_train, self.seed)?;
        let producer = P::build(&self.step_proc_config);
        let mut buffer = R::build(&self.replay_buffer_config)?;
        agent.check_buffer(&buffer)?;

        let mut sampler = Sampler::new(env, producer);
        let mut max_eval_reward = f32::MIN;
        let mut env_steps: usize = 0;
        let mut opt_steps: usize = 0;
        sampler.reset_fps_counter();
        agent.train();
        info!("Starts training for {} frames", self.num_frames);

        while env_steps < self.num_frames {
            let (mut record, _) = self.train_step(
                agent,
                &mut buffer,
                &mut sampler,
                &mut env_steps,
                &mut opt_steps,
            )?;

            // Add stats wrt computation cost
            if env_steps % self.record_compute_cost_interval == 0 {
                record.insert("fps", Scalar(sampler.fps()));
                record.insert("opt_steps_per_sec", Scalar(self.opt_steps_per_sec()));
                sampler.reset_fps_counter();
            }

            // Evaluation
            if env_steps % self.eval_interval == 0 {
                info!("Starts evaluation of the trained model");
                agent.eval();
                let eval_record = evaluator.evaluate(agent);
                agent.train();
                let eval_reward = eval_record?.get_scalar("episode_return")?;
                record.insert("eval_episode_return", Scalar(eval_reward));

                // Save the best model up to the current iteration
                if eval_reward > max_eval_reward {
                    max_eval_reward = eval_reward;
                    if let Some(model_dir) = self.model_dir.as_ref() {
                        Self::save_model(agent, &model_dir.join("best"));
                    }
                }
            }

            // Save the current model
            if env_steps % self.save_interval == 0 {
                if let Some(model_dir) = self.model_dir.as_ref() {
                    Self::save_model(agent, &model_dir.join(env_steps.to_string()));
                }
            }

            if !record.is_empty() {
                recorder.store(record);
            }

            if env_steps % self.flush_records_interval == 0 {
                recorder.flush(env_steps as _);
            }
        }

        if env_steps % self.flush_records_interval != 0 {
            recorder.flush(env_steps as _);
        }
        info!(
            "Finished training: {} frames, {} optimization steps, {} episodes",
            env_steps,
            opt_steps,
            sampler.n_episodes()
        );

        sampler.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        dummy::{DummyAgent, DummyEnv, DummyEnvConfig},
        record::BufferedRecorder,
        replay_buffer::{ReplayBuffer, ReplayBufferConfig, SimpleStepProcessor},
        DefaultEvaluator, Mode,
    };
    use tempdir::TempDir;

    type DummyTrainer = Trainer<DummyEnv, SimpleStepProcessor<DummyEnv>, ReplayBuffer>;

    fn trainer(config: TrainerConfig, capacity: usize) -> Result<DummyTrainer> {
        Trainer::build(
            config,
            DummyEnvConfig::default().episode_length(4),
            Default::default(),
            ReplayBufferConfig::default().capacity(capacity),
        )
    }

    #[test]
    fn test_runs_num_frames() -> Result<()> {
        let config = TrainerConfig::default()
            .num_frames(20)
            .opt_interval(2)
            .flush_record_interval(10);
        let mut trainer = trainer(config, 100)?;
        let mut agent = DummyAgent::default();
        let mut recorder = BufferedRecorder::new();
        let mut evaluator = DefaultEvaluator::<DummyEnv>::new(&DummyEnvConfig::default(), 0, 1)?;

        trainer.train(&mut agent, &mut recorder, &mut evaluator)?;

        // updates at frames 2, 4, ..., 20; the buffer holds 2 transitions at frame 2
        assert_eq!(agent.n_opts, 10);
        assert_eq!(agent.mode, Mode::Train);

        let flushed = recorder.flushed();
        assert_eq!(flushed.len(), 2);
        assert_eq!(flushed[0].0, 10);
        assert_eq!(flushed[1].0, 20);

        // two episodes of length 4 end within the first 10 frames
        assert_eq!(flushed[0].1.get_scalar("episode_return_mean")?, 4.0);

        Ok(())
    }

    #[test]
    fn test_check_buffer_before_first_step() -> Result<()> {
        let mut trainer = trainer(TrainerConfig::default().num_frames(10), 1)?;
        let mut agent = DummyAgent::default();
        let mut recorder = BufferedRecorder::new();
        let mut evaluator = DefaultEvaluator::<DummyEnv>::new(&DummyEnvConfig::default(), 0, 1)?;

        assert!(trainer
            .train(&mut agent, &mut recorder, &mut evaluator)
            .is_err());
        assert_eq!(agent.n_opts, 0);

        Ok(())
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = TrainerConfig::default().opt_interval(0);
        assert!(trainer(config, 100).is_err());
    }

    #[test]
    fn test_eval_and_save() -> Result<()> {
        let dir = TempDir::new("trainer")?;
        let config = TrainerConfig::default()
            .num_frames(12)
            .eval_interval(6)
            .save_interval(12)
            .model_dir(dir.path().to_string_lossy());
        let mut trainer = trainer(config, 100)?;
        let mut agent = DummyAgent::default();
        let mut recorder = BufferedRecorder::new();
        let mut evaluator = DefaultEvaluator::<DummyEnv>::new(&DummyEnvConfig::default(), 0, 2)?;

        trainer.train(&mut agent, &mut recorder, &mut evaluator)?;

        assert!(dir.path().join("best").join("dummy.txt").exists());
        assert!(dir.path().join("12").join("dummy.txt").exists());
        assert_eq!(agent.mode, Mode::Train);

        let flushed = recorder.flushed();
        assert_eq!(flushed.len(), 1);
        assert_eq!(flushed[0].1.get_scalar("eval_episode_return_mean")?, 3.0);

        Ok(())
    }
}
