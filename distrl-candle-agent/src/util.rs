//! Utilities.
use anyhow::{anyhow, Result};
use candle_nn::VarMap;
use log::trace;

/// Copies all variables of `src` into `dest`.
///
/// Variables are identified by their names. Every variable of `dest` is replaced
/// wholesale with the current value of the variable of the same name in `src`,
/// so `dest` is a deep, detached snapshot of `src` after the call.
///
/// Fails if a variable of `dest` has no counterpart in `src` or the shapes differ.
/// `dest` and `src` must be distinct maps.
pub fn hard_update(dest: &VarMap, src: &VarMap) -> Result<()> {
    trace!("Lock dest");
    let dest = dest
        .data()
        .lock()
        .map_err(|_| anyhow!("Failed to lock the destination variables"))?;
    trace!("Lock src");
    let src = src
        .data()
        .lock()
        .map_err(|_| anyhow!("Failed to lock the source variables"))?;

    for (k_dest, v_dest) in dest.iter() {
        let v_src = src
            .get(k_dest)
            .ok_or_else(|| anyhow!("Variable {} is not found in the source", k_dest))?;
        v_dest.set(v_src.as_tensor())?;
    }

    Ok(())
}

/// Interface for handling output dimensions.
pub trait OutDim {
    /// Returns the output dimension.
    fn get_out_dim(&self) -> usize;

    /// Sets the output dimension.
    fn set_out_dim(&mut self, v: usize);
}
