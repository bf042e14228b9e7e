//! Converts [`Step`]s into [`Transition`]s.
use super::Transition;
use crate::{Act, Env, Obs, Step, StepProcessor};
use std::{default::Default, marker::PhantomData};

/// Configuration of [`SimpleStepProcessor`].
#[derive(Clone, Debug, Default)]
pub struct SimpleStepProcessorConfig {}

/// Builds 1-step transitions `(o_t, a_t, r_t, o_t+1, done_t)` from [`Step`]s.
///
/// The processor remembers the last observation. When an episode ends,
/// it is replaced with [`Step::init_obs`], the first observation of the next episode.
pub struct SimpleStepProcessor<E> {
    prev_obs: Option<Vec<f32>>,
    phantom: PhantomData<E>,
}

impl<E: Env> StepProcessor<E> for SimpleStepProcessor<E> {
    type Config = SimpleStepProcessorConfig;
    type Output = Transition;

    fn build(_config: &Self::Config) -> Self {
        Self {
            prev_obs: None,
            phantom: PhantomData,
        }
    }

    fn reset(&mut self, init_obs: E::Obs) {
        self.prev_obs = Some(init_obs.as_slice().to_vec());
    }

    fn process(&mut self, step: Step<E>) -> Option<Self::Output> {
        let next_obs = step.obs.as_slice().to_vec();
        let obs = self.prev_obs.replace(next_obs.clone())?;
        let is_done = step.is_done();

        if is_done {
            self.prev_obs = step.init_obs.as_ref().map(|o| o.as_slice().to_vec());
        }

        Some(Transition::new(
            obs,
            step.act.index(),
            step.reward,
            next_obs,
            is_done,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::DummyEnv;

    fn step(obs: f32, act: usize, reward: f32, done: bool) -> Step<DummyEnv> {
        let init_obs = if done { Some(vec![100.0]) } else { None };
        Step::new(vec![obs], act, reward, done, false, (), init_obs)
    }

    #[test]
    fn test_requires_reset() {
        let mut proc = SimpleStepProcessor::<DummyEnv>::build(&Default::default());
        assert!(proc.process(step(1.0, 0, 0.0, false)).is_none());
    }

    #[test]
    fn test_chains_observations_across_episodes() {
        let mut proc = SimpleStepProcessor::<DummyEnv>::build(&Default::default());
        proc.reset(vec![0.0]);

        let tr = proc.process(step(1.0, 1, 0.5, false)).unwrap();
        assert_eq!(tr, Transition::new(vec![0.0], 1, 0.5, vec![1.0], false));

        let tr = proc.process(step(2.0, 0, 1.0, true)).unwrap();
        assert_eq!(tr, Transition::new(vec![1.0], 0, 1.0, vec![2.0], true));

        // the next episode starts from init_obs
        let tr = proc.process(step(3.0, 1, 0.0, false)).unwrap();
        assert_eq!(tr.obs, vec![100.0]);
    }
}
