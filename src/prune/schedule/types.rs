//! Type definitions for the pruning schedule.

use serde::{Deserialize, Serialize};

use crate::error::{PruneError, Result};

/// Logarithmic sparsity schedule.
///
/// The mask is re-evaluated every `update_period` iterations until
/// `iter_stop`, with the target sparsity
///
/// ```text
/// s(t) = bound_weight * ln(2 + t / update_period)
/// bound_weight = upper_bound / ln(iter_stop / update_period)
/// ```
///
/// Sparsity grows quickly at first and flattens out as `t` approaches
/// `iter_stop`, after which the mask is frozen.
///
/// # Example
///
/// ```
/// use podar::prune::{Phase, PruningSchedule};
///
/// let schedule = PruningSchedule::new(0.5, 1000, 100).unwrap();
/// assert!(schedule.is_update_due(0, Phase::Train));
/// assert!(!schedule.is_update_due(50, Phase::Train));
/// assert!(!schedule.is_update_due(0, Phase::Inference));
/// assert!(!schedule.is_update_due(1000, Phase::Train));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PruningSchedule {
    /// Final sparsity cap, in `[0, 1)`.
    pub(super) upper_bound: f32,
    /// Iteration at which the mask freezes.
    pub(super) iter_stop: usize,
    /// Iterations between mask re-evaluations.
    pub(super) update_period: usize,
}

impl PruningSchedule {
    /// Create a validated schedule.
    pub fn new(upper_bound: f32, iter_stop: usize, update_period: usize) -> Result<Self> {
        let schedule = Self { upper_bound, iter_stop, update_period };
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn upper_bound(&self) -> f32 {
        self.upper_bound
    }

    pub fn iter_stop(&self) -> usize {
        self.iter_stop
    }

    pub fn update_period(&self) -> usize {
        self.update_period
    }

    /// Check that the parameters describe a usable schedule.
    ///
    /// # Errors
    ///
    /// Returns [`PruneError::InvalidSchedule`] when `update_period` or
    /// `iter_stop` is zero, or `upper_bound` is outside `[0, 1)`.
    pub fn validate(&self) -> Result<()> {
        if self.update_period == 0 {
            return Err(PruneError::InvalidSchedule(
                "update_period must be at least 1".to_string(),
            ));
        }
        if self.iter_stop == 0 {
            return Err(PruneError::InvalidSchedule("iter_stop must be positive".to_string()));
        }
        if !(0.0..1.0).contains(&self.upper_bound) {
            return Err(PruneError::InvalidSchedule(format!(
                "upper_bound ({}) must be in [0.0, 1.0)",
                self.upper_bound
            )));
        }
        Ok(())
    }
}

impl Default for PruningSchedule {
    fn default() -> Self {
        Self { upper_bound: 0.5, iter_stop: 1000, update_period: 100 }
    }
}
