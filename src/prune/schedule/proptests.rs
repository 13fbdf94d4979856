//! Property-based tests for the pruning schedule.

use super::PruningSchedule;
use crate::prune::Phase;
use proptest::prelude::*;

proptest! {
    /// Target sparsity never decreases across scheduled updates
    #[test]
    fn sparsity_monotonic_across_updates(
        upper in 0.0f32..0.99,
        period in 1usize..200,
        periods in 2usize..60,
    ) {
        let schedule = PruningSchedule::new(upper, period * periods, period).unwrap();

        let mut prev = f32::NEG_INFINITY;
        for iteration in schedule.update_iterations() {
            let sparsity = schedule.evaluate(iteration, Phase::Train);
            prop_assert!(sparsity.is_some());
            let sparsity = sparsity.unwrap();
            prop_assert!(sparsity >= prev);
            prev = sparsity;
        }
    }

    /// No update is ever reported at or after iter_stop
    #[test]
    fn frozen_after_iter_stop(
        upper in 0.0f32..0.99,
        iter_stop in 1usize..5000,
        period in 1usize..500,
        offset in 0usize..10_000,
    ) {
        let schedule = PruningSchedule::new(upper, iter_stop, period).unwrap();
        prop_assert!(!schedule.is_update_due(iter_stop + offset, Phase::Train));
        prop_assert!(schedule.is_frozen(iter_stop + offset));
    }

    /// Inference never triggers an update
    #[test]
    fn inference_never_updates(iteration in 0usize..100_000) {
        let schedule = PruningSchedule::default();
        prop_assert!(schedule.evaluate(iteration, Phase::Inference).is_none());
    }

    /// The number of due iterations matches num_updates
    #[test]
    fn due_count_matches_num_updates(iter_stop in 1usize..2000, period in 1usize..300) {
        let schedule = PruningSchedule::new(0.5, iter_stop, period).unwrap();
        let due = (0..iter_stop + period)
            .filter(|&it| schedule.is_update_due(it, Phase::Train))
            .count();
        prop_assert_eq!(due, schedule.num_updates());
    }
}
