//! Runs a fixed number of episodes and reports the average return.
use super::Evaluator;
use crate::{record::Record, Env, Policy};
use anyhow::Result;
use log::info;

/// Runs `n_episodes` episodes on its own environment and reports the average return
/// as `episode_return`.
///
/// Episode `ix` starts from [`Env::reset_with_index`]`(ix)`, so repeated evaluations
/// of the same policy see the same initial states.
///
/// ```ignore
/// let mut evaluator = DefaultEvaluator::<CartPoleEnv>::new(&CartPoleConfig::default(), 42, 10)?;
/// agent.eval();
/// let record = evaluator.evaluate(&mut agent)?;
/// println!("Average return: {}", record.get_scalar("episode_return")?);
/// ```
pub struct DefaultEvaluator<E: Env> {
    n_episodes: usize,
    env: E,
}

impl<E: Env> Evaluator<E> for DefaultEvaluator<E> {
    fn evaluate<P: Policy<E>>(&mut self, policy: &mut P) -> Result<Record> {
        let mut r_total = 0f32;

        for ix in 0..self.n_episodes {
            let mut prev_obs = self.env.reset_with_index(ix)?;

            loop {
                let act = policy.sample(&prev_obs)?;
                let (step, _) = self.env.step(&act)?;
                r_total += step.reward;
                if step.is_done() {
                    break;
                }
                prev_obs = step.obs;
            }
        }

        let episode_return = r_total / self.n_episodes as f32;
        info!(
            "Evaluated {} episodes, average return {}",
            self.n_episodes, episode_return
        );

        Ok(Record::from_scalar("episode_return", episode_return))
    }
}

impl<E: Env> DefaultEvaluator<E> {
    /// Constructs a new [`DefaultEvaluator`].
    ///
    /// Fails if `n_episodes` is zero or the environment cannot be built.
    pub fn new(config: &E::Config, seed: i64, n_episodes: usize) -> Result<Self> {
        if n_episodes == 0 {
            return Err(
                crate::error::DistrlError::config("n_episodes of an evaluator must be positive")
                    .into(),
            );
        }

        Ok(Self {
            n_episodes,
            env: E::build(config, seed)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dummy::{DummyAgent, DummyEnv, DummyEnvConfig};

    #[test]
    fn test_average_return() -> Result<()> {
        let config = DummyEnvConfig::default().episode_length(5);
        let mut evaluator = DefaultEvaluator::<DummyEnv>::new(&config, 0, 3)?;
        let mut agent = DummyAgent::default();

        let record = evaluator.evaluate(&mut agent)?;
        assert_eq!(record.get_scalar("episode_return")?, 5.0);

        Ok(())
    }

    #[test]
    fn test_zero_episodes_rejected() {
        let config = DummyEnvConfig::default();
        assert!(DefaultEvaluator::<DummyEnv>::new(&config, 0, 0).is_err());
    }
}
