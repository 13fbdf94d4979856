//! Masked weight pruner state and per-iteration operations.

use ndarray::{Array1, ArrayView1, ArrayViewMut1};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::error::{PruneError, Result};
use crate::prune::checkpoint::PrunerCheckpoint;
use crate::prune::compute::{apply_mask, mask_gradient};
use crate::prune::config::PrunerConfig;
use crate::prune::mask::{self, clamp_sparsity, MaskFiller, MaskUpdater};
use crate::prune::schedule::PruningSchedule;
use crate::prune::Phase;

/// Record of a committed mask update.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaskUpdate {
    /// Iteration at which the mask was recomputed.
    pub iteration: usize,
    /// Raw schedule output, before clamping.
    pub target_sparsity: f32,
    /// Number of entries set to zero.
    pub pruned: usize,
}

/// Result of a forward step.
#[derive(Debug)]
pub struct ForwardPass<'a> {
    /// `mask * weight`, to be fed to the convolution in place of the weight.
    pub effective_weight: ArrayView1<'a, f32>,
    /// Mask committed for this iteration.
    pub mask: ArrayView1<'a, f32>,
    /// Present when this step recomputed the mask.
    pub update: Option<MaskUpdate>,
}

/// Dynamic mask pruner for one weight tensor.
///
/// Owns the mask and the effective-weight scratch buffer; the weight and
/// its gradient stay with the caller and are passed in on each call.
///
/// # Example
///
/// ```
/// use ndarray::Array1;
/// use podar::prune::{MaskedWeightPruner, Phase, PrunerConfig, PruningSchedule};
///
/// let config = PrunerConfig::new()
///     .with_schedule(PruningSchedule::new(0.5, 1000, 100).unwrap());
/// let mut pruner = MaskedWeightPruner::new(&[2, 5], config).unwrap();
///
/// let weight = Array1::from_iter((1..=10).map(|v| v as f32));
/// let pass = pruner.forward(weight.view(), 0, Phase::Train).unwrap();
/// assert_eq!(pass.update.map(|u| u.pruned), Some(1));
/// assert_eq!(pass.effective_weight[0], 0.0);
///
/// let mut grad = Array1::<f32>::ones(10);
/// pruner.backward(grad.view_mut()).unwrap();
/// assert_eq!(grad[0], 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct MaskedWeightPruner {
    config: PrunerConfig,
    shape: Vec<usize>,
    updater: MaskUpdater,
    mask: Array1<f32>,
    effective: Array1<f32>,
    /// Iteration of the last forward; the scratch buffer is stale before it.
    last_forward: Option<usize>,
    last_update: Option<MaskUpdate>,
}

impl MaskedWeightPruner {
    /// Validate `config` and fill the initial mask for a weight of `weight_shape`.
    ///
    /// # Errors
    ///
    /// Invalid schedule or filler, or a provided fill whose length does not
    /// match the weight.
    pub fn new(weight_shape: &[usize], config: PrunerConfig) -> Result<Self> {
        config.validate()?;
        let len = weight_shape.iter().product();
        let mask = config.filler().fill(len)?;

        info!(
            elements = len,
            upper_bound = config.schedule().upper_bound(),
            iter_stop = config.schedule().iter_stop(),
            update_period = config.schedule().update_period(),
            filler = config.filler().display_name(),
            rank_key = config.rank_key().display_name(),
            "initialized masked weight pruner"
        );
        if config.schedule().overshoots() {
            warn!(
                upper_bound = config.schedule().upper_bound(),
                final_sparsity = config.schedule().final_sparsity(),
                "schedule overshoots its upper bound on the last update"
            );
        }

        Ok(Self {
            updater: MaskUpdater::new(config.rank_key()),
            shape: weight_shape.to_vec(),
            effective: Array1::zeros(len),
            mask,
            config,
            last_forward: None,
            last_update: None,
        })
    }

    /// Setup entry point taking the three parts separately.
    pub fn initialize(
        weight_shape: &[usize],
        filler: MaskFiller,
        schedule: PruningSchedule,
    ) -> Result<Self> {
        Self::new(weight_shape, PrunerConfig::new().with_schedule(schedule).with_filler(filler))
    }

    /// Rebuild a pruner from a checkpoint, keeping its saved mask.
    ///
    /// # Errors
    ///
    /// Invalid configuration, a mask length that does not match the shape,
    /// or non-binary mask values.
    pub fn from_checkpoint(checkpoint: PrunerCheckpoint) -> Result<Self> {
        let PrunerCheckpoint { shape, config, mask, last_update } = checkpoint;
        config.validate()?;
        let len: usize = shape.iter().product();
        PruneError::check_len("mask", len, mask.len())?;
        mask::validate_binary(&mask)?;

        let pruned = mask.iter().filter(|&&v| v == 0.0).count();
        info!(elements = len, pruned, "restored pruner");

        Ok(Self {
            updater: MaskUpdater::new(config.rank_key()),
            effective: Array1::zeros(len),
            mask: Array1::from_vec(mask),
            shape,
            config,
            last_forward: None,
            last_update,
        })
    }

    /// Snapshot the state that must survive a restart.
    pub fn checkpoint(&self) -> PrunerCheckpoint {
        PrunerCheckpoint {
            shape: self.shape.clone(),
            config: self.config.clone(),
            mask: self.mask.to_vec(),
            last_update: self.last_update,
        }
    }

    /// Run the schedule and, when due, recompute the mask.
    ///
    /// Returns the update record when the mask was recomputed.
    pub fn update_mask(
        &mut self,
        weight: ArrayView1<'_, f32>,
        iteration: usize,
        phase: Phase,
    ) -> Result<Option<MaskUpdate>> {
        PruneError::check_len("weight", self.len(), weight.len())?;

        let Some(target) = self.config.schedule().evaluate(iteration, phase) else {
            trace!(iteration, %phase, "no mask update due");
            return Ok(None);
        };

        let clamped = clamp_sparsity(target);
        if clamped != target {
            warn!(iteration, target, clamped, "target sparsity outside [0, 1], clamping");
        }

        let pruned = self.updater.update(&mut self.mask, weight, target)?;
        let update = MaskUpdate { iteration, target_sparsity: target, pruned };
        debug!(iteration, target, pruned, elements = self.len(), "mask updated");

        self.last_update = Some(update);
        Ok(Some(update))
    }

    /// Forward step: schedule, optional mask update, then `mask * weight`.
    ///
    /// Inference never touches the mask.
    ///
    /// # Errors
    ///
    /// [`PruneError::ShapeMismatch`] if `weight` has the wrong length.
    pub fn forward(
        &mut self,
        weight: ArrayView1<'_, f32>,
        iteration: usize,
        phase: Phase,
    ) -> Result<ForwardPass<'_>> {
        let update = self.update_mask(weight, iteration, phase)?;
        apply_mask(self.mask.view(), weight, &mut self.effective)?;
        self.last_forward = Some(iteration);

        Ok(ForwardPass { effective_weight: self.effective.view(), mask: self.mask.view(), update })
    }

    /// Backward step: zero the gradient of every pruned weight, in place.
    ///
    /// # Errors
    ///
    /// [`PruneError::ShapeMismatch`] if the gradient has the wrong length.
    pub fn backward(&self, weight_grad: ArrayViewMut1<'_, f32>) -> Result<()> {
        mask_gradient(self.mask.view(), weight_grad)
    }

    /// Effective weight from the most recent forward, if any.
    pub fn effective_weight(&self) -> Option<ArrayView1<'_, f32>> {
        self.last_forward.map(|_| self.effective.view())
    }

    pub fn mask(&self) -> ArrayView1<'_, f32> {
        self.mask.view()
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of weight elements.
    pub fn len(&self) -> usize {
        self.mask.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }

    /// Fraction of pruned weights in the committed mask.
    pub fn sparsity(&self) -> f32 {
        mask::sparsity(self.mask.view())
    }

    pub fn num_pruned(&self) -> usize {
        mask::count_pruned(self.mask.view())
    }

    pub fn config(&self) -> &PrunerConfig {
        &self.config
    }

    pub fn schedule(&self) -> &PruningSchedule {
        self.config.schedule()
    }

    pub fn last_update(&self) -> Option<MaskUpdate> {
        self.last_update
    }

    pub fn last_forward_iteration(&self) -> Option<usize> {
        self.last_forward
    }
}
