//! Cart-pole balancing task.
//!
//! A pole is attached by an unactuated joint to a cart moving along a frictionless
//! track. The agent pushes the cart to the left (action 0) or to the right (action 1)
//! and receives a reward of 1 for every step. An episode terminates when the pole
//! leans more than 12 degrees or the cart leaves `[-2.4, 2.4]`, and is truncated after
//! [`CartPoleConfig::max_steps`] steps.
//!
//! The observation is `[x, x_dot, theta, theta_dot]`.
mod config;
use anyhow::{bail, Result};
pub use config::CartPoleConfig;
use distrl_core::{error::DistrlError, record::Record, Env, Step};
use log::trace;
use rand::{rngs::StdRng, Rng, SeedableRng};

const GRAVITY: f32 = 9.8;
const CART_MASS: f32 = 1.0;
const POLE_MASS: f32 = 0.1;
const TOTAL_MASS: f32 = CART_MASS + POLE_MASS;
// half of the pole length
const POLE_LENGTH: f32 = 0.5;
const POLE_MASS_LENGTH: f32 = POLE_MASS * POLE_LENGTH;
const FORCE_MAG: f32 = 10.0;
const TAU: f32 = 0.02;
const X_THRESHOLD: f32 = 2.4;
const THETA_THRESHOLD: f32 = 12.0 * 2.0 * std::f32::consts::PI / 360.0;

/// Cart-pole environment integrated with the explicit Euler method.
pub struct CartPoleEnv {
    max_steps: usize,
    init_range: f32,
    seed: i64,
    rng: StdRng,
    state: [f32; 4],
    t: usize,
}

impl CartPoleEnv {
    /// The current state `[x, x_dot, theta, theta_dot]`.
    pub fn state(&self) -> [f32; 4] {
        self.state
    }

    fn sample_state(&mut self) -> [f32; 4] {
        let r = self.init_range;
        let mut state = [0f32; 4];
        for s in state.iter_mut() {
            *s = self.rng.gen_range(-r..=r);
        }
        state
    }

    fn integrate(&mut self, force: f32) {
        let [x, x_dot, theta, theta_dot] = self.state;
        let (sin_theta, cos_theta) = theta.sin_cos();

        let temp = (force + POLE_MASS_LENGTH * theta_dot * theta_dot * sin_theta) / TOTAL_MASS;
        let theta_acc = (GRAVITY * sin_theta - cos_theta * temp)
            / (POLE_LENGTH * (4.0 / 3.0 - POLE_MASS * cos_theta * cos_theta / TOTAL_MASS));
        let x_acc = temp - POLE_MASS_LENGTH * theta_acc * cos_theta / TOTAL_MASS;

        self.state = [
            x + TAU * x_dot,
            x_dot + TAU * x_acc,
            theta + TAU * theta_dot,
            theta_dot + TAU * theta_acc,
        ];
    }
}

impl Env for CartPoleEnv {
    type Config = CartPoleConfig;
    type Obs = Vec<f32>;
    type Act = usize;
    type Info = ();

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        if config.max_steps == 0 {
            return Err(DistrlError::config("max_steps must be positive").into());
        }
        if config.init_range.is_nan() || config.init_range < 0.0 {
            return Err(DistrlError::config(format!(
                "init_range must be non-negative, got {}",
                config.init_range
            ))
            .into());
        }

        Ok(Self {
            max_steps: config.max_steps,
            init_range: config.init_range,
            seed,
            rng: StdRng::seed_from_u64(seed as u64),
            state: [0.0; 4],
            t: 0,
        })
    }

    fn obs_dim(&self) -> usize {
        4
    }

    fn n_actions(&self) -> usize {
        2
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        let force = match *a {
            0 => -FORCE_MAG,
            1 => FORCE_MAG,
            a => bail!("action must be 0 or 1 in cartpole, got {}", a),
        };

        self.integrate(force);
        self.t += 1;

        let [x, _, theta, _] = self.state;
        let is_terminated = x.abs() > X_THRESHOLD || theta.abs() > THETA_THRESHOLD;
        let is_truncated = !is_terminated && self.t >= self.max_steps;
        trace!("t = {}, state = {:?}", self.t, self.state);

        let step = Step::new(
            self.state.to_vec(),
            *a,
            1.0,
            is_terminated,
            is_truncated,
            (),
            None,
        );
        Ok((step, Record::empty()))
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        self.state = self.sample_state();
        self.t = 0;
        Ok(self.state.to_vec())
    }

    /// Resets the environment with the random number generator reseeded by
    /// `seed + ix`, so evaluation episodes are reproducible.
    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs> {
        self.rng = StdRng::seed_from_u64(self.seed.wrapping_add(ix as i64) as u64);
        self.reset()
    }

    fn seed(&mut self, seed: i64) -> Result<()> {
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed as u64);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(max_steps: usize) -> Result<CartPoleEnv> {
        CartPoleEnv::build(&CartPoleConfig::default().max_steps(max_steps), 0)
    }

    #[test]
    fn test_reset() -> Result<()> {
        let mut env = env(500)?;
        let obs = env.reset()?;
        assert_eq!(obs.len(), env.obs_dim());
        assert!(obs.iter().all(|v| v.abs() <= 0.05));
        Ok(())
    }

    #[test]
    fn test_reset_with_index_is_reproducible() -> Result<()> {
        let mut env1 = env(500)?;
        let mut env2 = env(500)?;
        env2.reset()?;

        assert_eq!(env1.reset_with_index(3)?, env2.reset_with_index(3)?);
        assert_ne!(env1.reset_with_index(3)?, env1.reset_with_index(4)?);
        Ok(())
    }

    #[test]
    fn test_push_moves_cart() -> Result<()> {
        let mut env = CartPoleEnv::build(&CartPoleConfig::default().init_range(0.0), 0)?;
        env.reset()?;
        for _ in 0..5 {
            env.step(&1)?;
        }
        let [x, x_dot, theta, _] = env.state();
        assert!(x > 0.0 && x_dot > 0.0);
        // the pole falls against the direction of the push
        assert!(theta < 0.0);
        Ok(())
    }

    #[test]
    fn test_terminates_when_pole_falls() -> Result<()> {
        let mut env = env(500)?;
        env.reset()?;
        let mut n_steps = 0;
        loop {
            let (step, _) = env.step(&0)?;
            n_steps += 1;
            assert_eq!(step.reward, 1.0);
            if step.is_done() {
                assert!(step.is_terminated);
                assert!(!step.is_truncated);
                break;
            }
        }
        assert!(n_steps < 100);
        Ok(())
    }

    #[test]
    fn test_truncation() -> Result<()> {
        let mut env = env(3)?;
        env.reset()?;
        let (step, _) = env.step(&0)?;
        assert!(!step.is_done());
        let (step, _) = env.step(&1)?;
        assert!(!step.is_done());
        let (step, _) = env.step(&0)?;
        assert!(step.is_truncated);
        Ok(())
    }

    #[test]
    fn test_invalid_action() -> Result<()> {
        let mut env = env(500)?;
        env.reset()?;
        let err = env.step(&2).err().expect("invalid action");
        assert!(err.downcast_ref::<DistrlError>().is_none());
        assert!(err.to_string().contains("got 2"));
        Ok(())
    }

    #[test]
    fn test_invalid_config() {
        assert!(CartPoleEnv::build(&CartPoleConfig::default().max_steps(0), 0).is_err());
        assert!(CartPoleEnv::build(&CartPoleConfig::default().init_range(-1.0), 0).is_err());
    }
}
