//! Mask recomputation for a target sparsity.

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{PruneError, Result};

/// Key used to rank entries before the lowest ones are pruned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RankKey {
    /// Rank by the absolute value of the mask after it is reset to ones.
    ///
    /// Every key is equal, so selection falls back to ascending index: the
    /// first `floor(N * s)` elements are pruned regardless of weight values.
    #[default]
    Mask,
    /// Rank by `|weight[i]|`, ties broken by ascending index.
    WeightMagnitude,
}

impl RankKey {
    pub fn display_name(&self) -> &'static str {
        match self {
            RankKey::Mask => "mask",
            RankKey::WeightMagnitude => "weight magnitude",
        }
    }
}

/// Clamp a target sparsity into `[0, 1]`. NaN maps to `0.0`.
pub fn clamp_sparsity(sparsity: f32) -> f32 {
    if sparsity.is_nan() {
        0.0
    } else {
        sparsity.clamp(0.0, 1.0)
    }
}

/// Recomputes a binary mask from scratch for a target sparsity.
///
/// Each call replaces the whole mask: it does not only add zeros to the
/// previous one. The result is deterministic for a given length, target and
/// ranking input.
///
/// # Example
///
/// ```
/// use ndarray::Array1;
/// use podar::prune::MaskUpdater;
///
/// let weight = Array1::from_iter((1..=10).map(|v| v as f32));
/// let mut mask = Array1::<f32>::ones(10);
/// let pruned = MaskUpdater::default().update(&mut mask, weight.view(), 0.3).unwrap();
/// assert_eq!(pruned, 3);
/// assert_eq!(mask.to_vec(), vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaskUpdater {
    rank_key: RankKey,
}

impl MaskUpdater {
    pub fn new(rank_key: RankKey) -> Self {
        Self { rank_key }
    }

    pub fn rank_key(&self) -> RankKey {
        self.rank_key
    }

    /// Number of entries pruned out of `len` for `sparsity`.
    ///
    /// `floor(len * s)` with `s` clamped to `[0, 1]`. The product is taken
    /// in `f32`, the element type, so `10 * 0.7` prunes 7 and not 6.
    pub fn prune_count(len: usize, sparsity: f32) -> usize {
        let target = clamp_sparsity(sparsity);
        ((len as f32 * target).floor() as usize).min(len)
    }

    /// Recompute `mask` in place and return how many entries were pruned.
    ///
    /// `weight` is only read when ranking by [`RankKey::WeightMagnitude`],
    /// but its length is always checked against the mask. The new mask is
    /// built in a separate buffer and committed in one assignment.
    ///
    /// # Errors
    ///
    /// Returns [`PruneError::ShapeMismatch`] if `weight` and `mask` differ in
    /// length.
    pub fn update(
        &self,
        mask: &mut Array1<f32>,
        weight: ArrayView1<'_, f32>,
        sparsity: f32,
    ) -> Result<usize> {
        PruneError::check_len("weight", mask.len(), weight.len())?;

        let num_prune = Self::prune_count(mask.len(), sparsity);
        let mut next = Array1::<f32>::ones(mask.len());

        let mut ranked: Vec<(f32, usize)> = match self.rank_key {
            RankKey::Mask => next.iter().enumerate().map(|(i, &v)| (v.abs(), i)).collect(),
            RankKey::WeightMagnitude => {
                weight.iter().enumerate().map(|(i, &w)| (w.abs(), i)).collect()
            }
        };
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        for &(_, idx) in ranked.iter().take(num_prune) {
            next[idx] = 0.0;
        }

        mask.assign(&next);
        Ok(num_prune)
    }
}
