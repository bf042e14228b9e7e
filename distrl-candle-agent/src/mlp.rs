//! Multilayer perceptron.
mod base;
mod config;
use anyhow::Result;
pub use base::Mlp;
use candle_core::Tensor;
use candle_nn::{Linear, Module};
pub use config::MlpConfig;

/// ReLU on all hidden layers, no activation on the output layer.
fn mlp_forward(xs: Tensor, layers: &[Linear]) -> Result<Tensor> {
    let (last, hidden) = match layers.split_last() {
        Some(v) => v,
        None => return Ok(xs),
    };
    let mut xs = xs;

    for layer in hidden.iter() {
        xs = layer.forward(&xs)?.relu()?;
    }

    Ok(last.forward(&xs)?)
}
