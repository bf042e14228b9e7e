use anyhow::Result;
use clap::Parser;
use distrl_candle_agent::{
    c51::{C51Config, C51ModelConfig, C51},
    mlp::{Mlp, MlpConfig},
    opt::OptimizerConfig,
    Device,
};
use distrl_classic_env::{CartPoleConfig, CartPoleEnv};
use distrl_core::{
    record::LogRecorder,
    replay_buffer::{ReplayBuffer, ReplayBufferConfig, SimpleStepProcessor},
    Agent, Configurable, DefaultEvaluator, Evaluator as _, Trainer, TrainerConfig,
};
use log::info;
use serde::Serialize;
use std::path::Path;

const DIM_OBS: usize = 4;
const N_ACTIONS: usize = 2;
const LR: f64 = 0.001;
const GAMMA: f32 = 0.99;
const BATCH_SIZE: usize = 32;
const MEMORY_SIZE: usize = 2000;
const TARGET_UPDATE: usize = 100;
const EPSILON_DECAY: f64 = 1.0 / 2000.0;
const V_MIN: f32 = 0.0;
const V_MAX: f32 = 200.0;
const ATOM_SIZE: usize = 51;
const NUM_FRAMES: usize = 10000;
const EVAL_INTERVAL: usize = 1000;
const N_EPISODES_PER_EVAL: usize = 5;
const SEED: i64 = 777;
const MODEL_DIR: &str = "./distrl/examples/model/c51_cartpole";

type Env = CartPoleEnv;
type StepProc = SimpleStepProcessor<Env>;
type C51Agent = C51<Env, Mlp, ReplayBuffer>;
type Evaluator = DefaultEvaluator<Env>;

mod config {
    use super::*;

    #[derive(Serialize)]
    pub struct C51CartpoleConfig {
        pub env_config: CartPoleConfig,
        pub agent_config: C51Config<MlpConfig>,
        pub trainer_config: TrainerConfig,
        pub replay_buffer_config: ReplayBufferConfig,
    }

    impl C51CartpoleConfig {
        pub fn new(num_frames: usize, model_dir: &str, eval_interval: usize) -> Self {
            let trainer_config = TrainerConfig::default()
                .num_frames(num_frames)
                .opt_interval(1)
                .eval_interval(eval_interval)
                .record_compute_cost_interval(eval_interval)
                .flush_record_interval(eval_interval)
                .save_interval(eval_interval)
                .model_dir(model_dir)
                .seed(SEED);
            Self {
                env_config: create_env_config(),
                agent_config: create_agent_config(),
                trainer_config,
                replay_buffer_config: ReplayBufferConfig::default()
                    .capacity(MEMORY_SIZE)
                    .seed(SEED as u64),
            }
        }
    }

    pub fn create_env_config() -> CartPoleConfig {
        CartPoleConfig::default()
    }

    pub fn create_agent_config() -> C51Config<MlpConfig> {
        let device = if cfg!(feature = "cuda") {
            Device::Cuda(0)
        } else {
            Device::Cpu
        };
        let model_config = C51ModelConfig::default()
            .q_config(MlpConfig::new(DIM_OBS, vec![128, 128], 0))
            .opt_config(OptimizerConfig::Adam { lr: LR });
        C51Config::default()
            .model_config(model_config)
            .n_actions(N_ACTIONS)
            .batch_size(BATCH_SIZE)
            .target_update(TARGET_UPDATE)
            .epsilon_decay(EPSILON_DECAY)
            .gamma(GAMMA)
            .v_range(V_MIN, V_MAX)
            .atom_size(ATOM_SIZE)
            .device(device)
            .seed(SEED as u64)
    }
}

use config::{create_agent_config, create_env_config, C51CartpoleConfig};

/// Train/eval C51 agent in cartpole environment
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Train C51 agent, not evaluate
    #[arg(short, long, default_value_t = false)]
    train: bool,

    /// Evaluate C51 agent, not train
    #[arg(short, long, default_value_t = false)]
    eval: bool,

    /// Number of environment steps for training
    #[arg(long, default_value_t = NUM_FRAMES)]
    num_frames: usize,
}

fn train(num_frames: usize, model_dir: &str, eval_interval: usize) -> Result<()> {
    let config = C51CartpoleConfig::new(num_frames, model_dir, eval_interval);
    info!("Configuration:\n{}", serde_yaml::to_string(&config)?);

    let mut trainer = Trainer::<Env, StepProc, ReplayBuffer>::build(
        config.trainer_config,
        config.env_config.clone(),
        Default::default(),
        config.replay_buffer_config,
    )?;
    let mut agent = C51Agent::build(config.agent_config)?;
    let mut recorder = LogRecorder::new();
    let mut evaluator = Evaluator::new(&config.env_config, SEED, N_EPISODES_PER_EVAL)?;

    trainer.train(&mut agent, &mut recorder, &mut evaluator)
}

fn eval(model_dir: &Path) -> Result<f32> {
    let mut agent = C51Agent::build(create_agent_config())?;
    agent.load_params(model_dir)?;
    agent.eval();

    let mut evaluator = Evaluator::new(&create_env_config(), SEED, N_EPISODES_PER_EVAL)?;
    let episode_return = evaluator.evaluate(&mut agent)?.get_scalar("episode_return")?;
    info!(
        "Average return over {} episodes: {}",
        N_EPISODES_PER_EVAL, episode_return
    );

    Ok(episode_return)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let best = Path::new(MODEL_DIR).join("best");

    if args.train {
        train(args.num_frames, MODEL_DIR, EVAL_INTERVAL)?;
    } else if args.eval {
        eval(&best)?;
    } else {
        train(args.num_frames, MODEL_DIR, EVAL_INTERVAL)?;
        eval(&best)?;
    }

    Ok(())
}
