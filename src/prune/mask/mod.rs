//! Binary weight masks.
//!
//! A mask has one entry per weight element: `1.0` keeps the weight live,
//! `0.0` prunes it. Committed masks only ever hold those two values.
//!
//! - [`MaskUpdater`] recomputes a mask for a target sparsity
//! - [`MaskFiller`] produces the initial mask at setup

mod filler;
mod updater;

#[cfg(test)]
mod proptests;
#[cfg(test)]
mod tests;

pub use filler::MaskFiller;
pub use updater::{clamp_sparsity, MaskUpdater, RankKey};

use ndarray::ArrayView1;

use crate::error::{PruneError, Result};

/// Check that every value is exactly `0.0` or `1.0`.
pub fn validate_binary(values: &[f32]) -> Result<()> {
    match values.iter().position(|&v| v != 0.0 && v != 1.0) {
        None => Ok(()),
        Some(idx) => Err(PruneError::InvalidMask(format!(
            "entry {idx} is {}, expected 0.0 or 1.0",
            values[idx]
        ))),
    }
}

/// Number of pruned (zero) entries.
pub fn count_pruned(mask: ArrayView1<'_, f32>) -> usize {
    mask.iter().filter(|&&v| v == 0.0).count()
}

/// Fraction of pruned entries; `0.0` for an empty mask.
pub fn sparsity(mask: ArrayView1<'_, f32>) -> f32 {
    if mask.is_empty() {
        return 0.0;
    }
    count_pruned(mask) as f32 / mask.len() as f32
}
