//! Samples transitions from an environment and pushes them into a replay buffer.
use crate::{
    record::{Record, RecordValue::Scalar},
    Agent, Env, ExperienceBufferBase, ReplayBufferBase, StepProcessor,
};
use anyhow::Result;
use std::time::{Duration, SystemTime};

/// Runs environment steps for an agent.
///
/// Each call of [`Sampler::sample_and_push`] performs one environment step. The
/// resulting transition goes into the replay buffer if the agent is in
/// [`Mode::Train`](crate::Mode::Train). Episode boundaries are handled with
/// [`Env::step_with_reset`]; at each boundary `episode_return` and `episode_length`
/// are added to the returned record.
pub struct Sampler<E, P>
where
    E: Env,
    P: StepProcessor<E>,
{
    env: E,
    prev_obs: Option<E::Obs>,
    step_processor: P,

    /// Return of the current episode.
    episode_return: f32,

    /// Number of steps of the current episode.
    episode_length: usize,

    /// Number of finished episodes.
    n_episodes: usize,

    /// Number of environment steps since the last call of `reset_fps_counter`.
    n_frames: usize,

    /// Time spent in environment steps since the last call of `reset_fps_counter`.
    time: Duration,
}

impl<E, P> Sampler<E, P>
where
    E: Env,
    P: StepProcessor<E>,
{
    /// Creates a new sampler with the given environment and step processor.
    pub fn new(env: E, step_processor: P) -> Self {
        Self {
            env,
            prev_obs: None,
            step_processor,
            episode_return: 0.0,
            episode_length: 0,
            n_episodes: 0,
            n_frames: 0,
            time: Duration::new(0, 0),
        }
    }

    /// Samples an action, applies it to the environment and pushes the transition.
    ///
    /// Errors from the environment or the agent are propagated unmodified.
    pub fn sample_and_push<A, R>(&mut self, agent: &mut A, buffer: &mut R) -> Result<Record>
    where
        A: Agent<E, R>,
        R: ExperienceBufferBase<Item = P::Output> + ReplayBufferBase,
    {
        let timer = SystemTime::now();

        // Reset the environment at the very first step
        let obs = match self.prev_obs.take() {
            Some(obs) => obs,
            None => {
                let obs = self.env.reset()?;
                self.step_processor.reset(obs.clone());
                obs
            }
        };

        let act = agent.sample(&obs)?;
        let (step, mut record) = self.env.step_with_reset(&act)?;
        let is_done = step.is_done();
        self.episode_return += step.reward;
        self.episode_length += 1;

        let next_obs = match is_done {
            true => step.init_obs.clone(),
            false => Some(step.obs.clone()),
        };

        // Produce and push the transition
        if let Some(transition) = self.step_processor.process(step) {
            if agent.mode().stores_transitions() {
                buffer.push(transition)?;
            }
        }

        if is_done {
            record.insert("episode_return", Scalar(self.episode_return));
            record.insert("episode_length", Scalar(self.episode_length as f32));
            self.n_episodes += 1;
            self.episode_return = 0.0;
            self.episode_length = 0;
        }

        // When `init_obs` is missing, the environment is reset at the next call
        self.prev_obs = next_obs;

        self.n_frames += 1;
        self.time += timer.elapsed()?;

        Ok(record)
    }

    /// Number of finished episodes.
    pub fn n_episodes(&self) -> usize {
        self.n_episodes
    }

    /// Frames per second since the last call of [`Sampler::reset_fps_counter`].
    pub fn fps(&self) -> f32 {
        let secs = self.time.as_secs_f32();
        if secs > 0.0 {
            self.n_frames as f32 / secs
        } else {
            0.0
        }
    }

    /// Resets the counters used in [`Sampler::fps`].
    pub fn reset_fps_counter(&mut self) {
        self.n_frames = 0;
        self.time = Duration::new(0, 0);
    }

    /// Closes the environment.
    pub fn close(&mut self) -> Result<()> {
        self.env.close()
    }

    /// Returns a reference to the environment.
    pub fn env(&self) -> &E {
        &self.env
    }
}
