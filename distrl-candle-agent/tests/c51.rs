use anyhow::Result;
use candle_core::{Device, Tensor};
use distrl_candle_agent::{
    c51::{C51Config, C51ModelConfig, C51},
    mlp::{Mlp, MlpConfig},
    opt::OptimizerConfig,
};
use distrl_core::{
    error::DistrlError,
    record::Record,
    replay_buffer::{ReplayBuffer, ReplayBufferConfig, Transition},
    Agent, Configurable, Env, Mode, Policy, ReplayBufferBase, Step,
};
use tempdir::TempDir;

/// One-step bandit: action 0 pays 1, action 1 pays 0, and every episode ends at once.
struct Bandit;

impl Env for Bandit {
    type Config = ();
    type Obs = Vec<f32>;
    type Act = usize;
    type Info = ();

    fn build(_config: &Self::Config, _seed: i64) -> Result<Self> {
        Ok(Self)
    }

    fn obs_dim(&self) -> usize {
        2
    }

    fn n_actions(&self) -> usize {
        2
    }

    fn step(&mut self, a: &usize) -> Result<(Step<Self>, Record)> {
        let reward = if *a == 0 { 1.0 } else { 0.0 };
        Ok((
            Step::new(vec![0.0, 0.0], *a, reward, true, false, (), None),
            Record::empty(),
        ))
    }

    fn reset(&mut self) -> Result<Vec<f32>> {
        Ok(vec![1.0, -1.0])
    }

    fn reset_with_index(&mut self, _ix: usize) -> Result<Vec<f32>> {
        self.reset()
    }
}

type Agent_ = C51<Bandit, Mlp, ReplayBuffer>;

fn config() -> C51Config<MlpConfig> {
    let model_config = C51ModelConfig::default()
        .q_config(MlpConfig::new(2, vec![32], 0))
        .opt_config(OptimizerConfig::Adam { lr: 1e-2 });
    C51Config::default()
        .model_config(model_config)
        .n_actions(2)
        .batch_size(8)
        .target_update(3)
        .epsilon_decay(0.1)
        .v_range(0.0, 1.0)
        .atom_size(11)
        .seed(0)
}

fn buffer(capacity: usize) -> Result<ReplayBuffer> {
    ReplayBuffer::build(&ReplayBufferConfig::default().capacity(capacity).seed(1))
}

fn fill(buffer: &mut ReplayBuffer, n: usize) {
    for i in 0..n {
        let act = i % 2;
        let reward = if act == 0 { 1.0 } else { 0.0 };
        buffer.store(Transition::new(
            vec![1.0, -1.0],
            act,
            reward,
            vec![0.0, 0.0],
            true,
        ));
    }
}

fn obs() -> Result<Tensor> {
    Ok(Tensor::from_slice(&[1f32, -1.0], (1, 2), &Device::Cpu)?)
}

fn max_abs_diff(agent: &Agent_) -> Result<f32> {
    let (q, q_tgt) = agent.action_values(&obs()?)?;
    Ok((q - q_tgt)?.abs()?.max_keepdim(1)?.flatten_all()?.to_vec1::<f32>()?[0])
}

#[test]
fn test_no_update_before_batch_is_available() -> Result<()> {
    let mut agent = Agent_::build(config())?;
    let mut buffer = buffer(100)?;
    fill(&mut buffer, 7);

    assert!(agent.opt_with_record(&mut buffer)?.is_none());
    assert!(!agent.opt(&mut buffer)?);
    assert_eq!(agent.update_count(), 0);
    assert_eq!(agent.epsilon(), 1.0);

    fill(&mut buffer, 1);
    let record = agent.opt_with_record(&mut buffer)?.expect("update");
    assert_eq!(agent.update_count(), 1);
    assert!(record.get_scalar("loss")?.is_finite());
    assert_eq!(record.get_scalar("update_count")?, 1.0);
    assert!((record.get_scalar("epsilon")? - 0.91).abs() < 1e-6);

    Ok(())
}

#[test]
fn test_epsilon_schedule() -> Result<()> {
    let mut agent = Agent_::build(config())?;
    let mut buffer = buffer(100)?;
    fill(&mut buffer, 16);

    let mut prev = agent.epsilon();
    for _ in 0..15 {
        agent.opt(&mut buffer)?;
        assert!(agent.epsilon() <= prev);
        assert!(agent.epsilon() >= 0.1);
        prev = agent.epsilon();
    }
    assert!((agent.epsilon() - 0.1).abs() < 1e-12);

    Ok(())
}

#[test]
fn test_target_sync_period() -> Result<()> {
    let mut agent = Agent_::build(config())?;
    let mut buffer = buffer(100)?;
    fill(&mut buffer, 16);

    // the target starts as a copy of the online network
    assert!(max_abs_diff(&agent)? < 1e-6);

    agent.opt(&mut buffer)?;
    agent.opt(&mut buffer)?;
    assert!(max_abs_diff(&agent)? > 1e-6);

    // the third update triggers synchronization
    agent.opt(&mut buffer)?;
    assert!(max_abs_diff(&agent)? < 1e-6);

    Ok(())
}

#[test]
fn test_target_is_not_trained() -> Result<()> {
    let mut agent = Agent_::build(config())?;
    let mut buffer = buffer(100)?;
    fill(&mut buffer, 16);
    let (q_before, q_tgt_before) = agent.action_values(&obs()?)?;

    // target_update is 3
    agent.opt(&mut buffer)?;
    agent.opt(&mut buffer)?;

    let (q_after, q_tgt_after) = agent.action_values(&obs()?)?;
    assert_eq!(q_tgt_before.to_vec2::<f32>()?, q_tgt_after.to_vec2::<f32>()?);
    assert_ne!(q_before.to_vec2::<f32>()?, q_after.to_vec2::<f32>()?);

    Ok(())
}

#[test]
fn test_learns_better_action() -> Result<()> {
    let mut agent = Agent_::build(config().target_update(10))?;
    let mut buffer = buffer(100)?;
    fill(&mut buffer, 64);

    for _ in 0..300 {
        agent.opt(&mut buffer)?;
    }

    let (q, _) = agent.action_values(&obs()?)?;
    let q = q.to_vec2::<f32>()?;
    assert!(q[0][0] > q[0][1] + 0.5);

    agent.set_mode(Mode::Eval);
    let mut env = Bandit::build(&(), 0)?;
    let obs = env.reset()?;
    for _ in 0..10 {
        assert_eq!(agent.sample(&obs)?, 0);
    }

    Ok(())
}

#[test]
fn test_train_mode_explores() -> Result<()> {
    // epsilon stays at 1 without updates
    let mut agent = Agent_::build(config())?;
    let obs = vec![1.0, -1.0];
    let actions = (0..100)
        .map(|_| agent.sample(&obs))
        .collect::<Result<Vec<_>>>()?;
    assert!(actions.contains(&0) && actions.contains(&1));

    // evaluation is deterministic
    agent.eval();
    let a = agent.sample(&obs)?;
    assert!((0..20).all(|_| agent.sample(&obs).ok() == Some(a)));

    Ok(())
}

#[test]
fn test_check_buffer() -> Result<()> {
    let agent = Agent_::build(config().batch_size(32))?;

    let err = agent.check_buffer(&buffer(16)?).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DistrlError>(),
        Some(DistrlError::Configuration(_))
    ));
    assert!(agent.check_buffer(&buffer(32)?).is_ok());

    Ok(())
}

#[test]
fn test_invalid_support() {
    assert!(Agent_::build(config().atom_size(1)).is_err());
    assert!(Agent_::build(config().v_range(1.0, 1.0)).is_err());
    assert!(Agent_::build(config().v_range(2.0, 1.0)).is_err());
}

#[test]
fn test_save_and_load() -> Result<()> {
    let dir = TempDir::new("c51")?;
    let mut agent = Agent_::build(config())?;
    let mut buffer = buffer(100)?;
    fill(&mut buffer, 16);
    for _ in 0..4 {
        agent.opt(&mut buffer)?;
    }

    agent.save_params(dir.path())?;
    assert!(dir.path().join("c51.safetensors").exists());
    assert!(dir.path().join("c51_tgt.safetensors").exists());

    let mut agent_ = Agent_::build(config().seed(123))?;
    agent_.load_params(dir.path())?;

    let (q, q_tgt) = agent.action_values(&obs()?)?;
    let (q_, q_tgt_) = agent_.action_values(&obs()?)?;
    assert_eq!(q.to_vec2::<f32>()?, q_.to_vec2::<f32>()?);
    assert_eq!(q_tgt.to_vec2::<f32>()?, q_tgt_.to_vec2::<f32>()?);

    Ok(())
}

#[test]
fn test_build_from_path() -> Result<()> {
    let dir = TempDir::new("c51_config")?;
    let path = dir.path().join("c51.yaml");
    config().save(&path)?;

    let agent = Agent_::build_from_path(&path)?;
    assert_eq!(agent.support().len(), 11);
    assert_eq!(agent.mode(), Mode::Train);

    Ok(())
}
