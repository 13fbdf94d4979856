//! Pruning schedule evaluation
//!
//! Decides, for a given iteration and phase, whether the mask should be
//! recomputed and which sparsity it should reach. The schedule is a pure
//! function of the iteration and its three parameters, so resuming from a
//! checkpoint only needs the same parameters back.

mod types;

#[cfg(test)]
mod proptests;

pub use types::PruningSchedule;

use super::Phase;

impl PruningSchedule {
    /// Scale factor applied to the logarithmic growth curve.
    ///
    /// When `iter_stop <= update_period` the denominator is `ln(x)` with
    /// `x <= 1`, giving an infinite or negative weight. Such schedules are
    /// allowed; the mask updater clamps whatever sparsity results.
    pub fn bound_weight(&self) -> f64 {
        let ratio = self.iter_stop as f64 / self.update_period as f64;
        f64::from(self.upper_bound) / ratio.ln()
    }

    /// Whether a mask update is due at `iteration`.
    ///
    /// True only in the train phase, on multiples of `update_period`, and
    /// strictly before `iter_stop`.
    pub fn is_update_due(&self, iteration: usize, phase: Phase) -> bool {
        phase.is_train()
            && self.update_period > 0
            && iteration.is_multiple_of(self.update_period)
            && iteration < self.iter_stop
    }

    /// Raw target sparsity at `iteration`, not clamped.
    ///
    /// `iteration / update_period` is integer division.
    pub fn sparsity_at_iteration(&self, iteration: usize) -> f32 {
        let period = self.update_period.max(1);
        let steps = (iteration / period) as f64;
        (self.bound_weight() * (2.0 + steps).ln()) as f32
    }

    /// Evaluate the schedule: `Some(target)` when an update is due.
    pub fn evaluate(&self, iteration: usize, phase: Phase) -> Option<f32> {
        if self.is_update_due(iteration, phase) {
            Some(self.sparsity_at_iteration(iteration))
        } else {
            None
        }
    }

    /// Whether the mask is frozen for good at `iteration`.
    pub fn is_frozen(&self, iteration: usize) -> bool {
        iteration >= self.iter_stop
    }

    /// Number of mask updates a full training run performs.
    pub fn num_updates(&self) -> usize {
        if self.update_period == 0 {
            return 0;
        }
        self.iter_stop.div_ceil(self.update_period)
    }

    /// Iterations at which the mask is recomputed, in increasing order.
    pub fn update_iterations(&self) -> impl Iterator<Item = usize> {
        (0..self.iter_stop).step_by(self.update_period.max(1))
    }

    /// Target sparsity of the last scheduled update.
    pub fn final_sparsity(&self) -> f32 {
        match self.update_iterations().last() {
            Some(iteration) => self.sparsity_at_iteration(iteration),
            None => 0.0,
        }
    }

    /// Whether the last scheduled update exceeds `upper_bound`.
    ///
    /// The log curve reaches `upper_bound` at `iteration = iter_stop -
    /// 2 * update_period`, which always lies before the last scheduled update,
    /// so any schedule with a positive `upper_bound` overshoots on its final
    /// step.
    pub fn overshoots(&self) -> bool {
        self.final_sparsity() > self.upper_bound
    }
}
