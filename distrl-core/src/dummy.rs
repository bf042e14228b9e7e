//! Deterministic environment and agent used in tests.
use crate::{
    record::Record, replay_buffer::ReplayBuffer, Agent, Env, ExperienceBufferBase, Mode, Policy,
    ReplayBufferBase, Step,
};
use anyhow::Result;
use std::{fs::File, io::Write, path::Path};

/// Configuration of [`DummyEnv`].
#[derive(Clone, Debug)]
pub struct DummyEnvConfig {
    pub episode_length: usize,
}

impl Default for DummyEnvConfig {
    fn default() -> Self {
        Self { episode_length: 3 }
    }
}

impl DummyEnvConfig {
    pub fn episode_length(mut self, v: usize) -> Self {
        self.episode_length = v;
        self
    }
}

/// Emits `[t]` as the observation and a reward of 1 at every step. An episode
/// terminates after `episode_length` steps.
pub struct DummyEnv {
    episode_length: usize,
    t: usize,
    pub n_resets: usize,
    pub is_closed: bool,
}

impl Env for DummyEnv {
    type Config = DummyEnvConfig;
    type Obs = Vec<f32>;
    type Act = usize;
    type Info = ();

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self {
            episode_length: config.episode_length,
            t: 0,
            n_resets: 0,
            is_closed: false,
        })
    }

    fn obs_dim(&self) -> usize {
        1
    }

    fn n_actions(&self) -> usize {
        2
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        self.t += 1;
        let is_terminated = self.t >= self.episode_length;
        let step = Step::new(vec![self.t as f32], *a, 1.0, is_terminated, false, (), None);
        Ok((step, Record::empty()))
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.t = 0;
        self.n_resets += 1;
        Ok(vec![0.0])
    }

    fn reset_with_index(&mut self, _ix: usize) -> Result<Self::Obs> {
        self.reset()
    }

    fn close(&mut self) -> Result<()> {
        self.is_closed = true;
        Ok(())
    }
}

/// Always takes action 0. An update succeeds once the buffer holds two transitions.
pub struct DummyAgent {
    pub mode: Mode,
    pub n_opts: usize,
    pub min_buffer_len: usize,
}

impl Default for DummyAgent {
    fn default() -> Self {
        Self {
            mode: Mode::Train,
            n_opts: 0,
            min_buffer_len: 2,
        }
    }
}

impl Policy<DummyEnv> for DummyAgent {
    fn sample(&mut self, _obs: &Vec<f32>) -> Result<usize> {
        Ok(0)
    }
}

impl Agent<DummyEnv, ReplayBuffer> for DummyAgent {
    fn mode(&self) -> Mode {
        self.mode
    }

    fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    fn check_buffer(&self, buffer: &ReplayBuffer) -> Result<()> {
        if ReplayBufferBase::capacity(buffer) < self.min_buffer_len {
            return Err(crate::error::DistrlError::config("buffer too small").into());
        }
        Ok(())
    }

    fn opt_with_record(&mut self, buffer: &mut ReplayBuffer) -> Result<Option<Record>> {
        if ExperienceBufferBase::len(buffer) < self.min_buffer_len {
            return Ok(None);
        }
        let _batch = buffer.batch(self.min_buffer_len)?;
        self.n_opts += 1;
        Ok(Some(Record::from_scalar("loss", self.n_opts as f32)))
    }

    fn save_params(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)?;
        let mut file = File::create(path.join("dummy.txt"))?;
        file.write_all(format!("{}", self.n_opts).as_bytes())?;
        Ok(())
    }

    fn load_params(&mut self, path: &Path) -> Result<()> {
        self.n_opts = std::fs::read_to_string(path.join("dummy.txt"))?.parse()?;
        Ok(())
    }
}
