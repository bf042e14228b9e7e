use anyhow::Result;
use distrl::{
    distrl_candle_agent::{
        c51::{C51Config, C51ModelConfig, C51},
        mlp::{Mlp, MlpConfig},
    },
    distrl_classic_env::{CartPoleConfig, CartPoleEnv},
    distrl_core::{
        record::BufferedRecorder,
        replay_buffer::{ReplayBuffer, ReplayBufferConfig, SimpleStepProcessor},
        Configurable, DefaultEvaluator, Trainer, TrainerConfig,
    },
};
use tempdir::TempDir;

type Agent = C51<CartPoleEnv, Mlp, ReplayBuffer>;

fn agent_config() -> C51Config<MlpConfig> {
    let model_config = C51ModelConfig::default().q_config(MlpConfig::new(4, vec![32], 0));
    C51Config::default()
        .model_config(model_config)
        .batch_size(16)
        .target_update(20)
        .v_range(0.0, 50.0)
        .atom_size(21)
        .seed(0)
}

#[test]
fn test_train_c51_on_cartpole() -> Result<()> {
    let dir = TempDir::new("c51_cartpole")?;
    let env_config = CartPoleConfig::default().max_steps(50);
    let trainer_config = TrainerConfig::default()
        .num_frames(300)
        .eval_interval(150)
        .flush_record_interval(100)
        .save_interval(300)
        .model_dir(dir.path().to_string_lossy())
        .seed(1);

    let mut trainer = Trainer::<CartPoleEnv, SimpleStepProcessor<CartPoleEnv>, ReplayBuffer>::build(
        trainer_config,
        env_config.clone(),
        Default::default(),
        ReplayBufferConfig::default().capacity(200).seed(2),
    )?;
    let mut agent = Agent::build(agent_config())?;
    let mut recorder = BufferedRecorder::new();
    let mut evaluator = DefaultEvaluator::<CartPoleEnv>::new(&env_config, 3, 2)?;

    trainer.train(&mut agent, &mut recorder, &mut evaluator)?;

    // one update per frame once 16 transitions are stored
    assert_eq!(agent.update_count(), 300 - 15);
    assert!((agent.epsilon() - (1.0 - 285.0 * 0.9 / 2000.0)).abs() < 1e-9);

    let flushed = recorder.flushed();
    let steps = flushed.iter().map(|(s, _)| *s).collect::<Vec<_>>();
    assert_eq!(steps, vec![100, 200, 300]);

    let last = &flushed[2].1;
    assert!(last.get_scalar("loss_mean")?.is_finite());
    assert!(last.get_scalar("eval_episode_return")? >= 1.0);

    assert!(dir.path().join("best").join("c51.safetensors").exists());
    assert!(dir.path().join("300").join("c51_tgt.safetensors").exists());

    Ok(())
}
