//! Property-based tests for mask recomputation.

use super::*;
use ndarray::Array1;
use proptest::prelude::*;

proptest! {
    /// Exactly floor(N * s) zeros, everything else one
    #[test]
    fn exact_zero_count(n in 0usize..2000, s in 0.0f32..=1.0) {
        let weight = Array1::<f32>::ones(n);
        let mut mask = Array1::<f32>::ones(n);
        let pruned = MaskUpdater::default().update(&mut mask, weight.view(), s).unwrap();

        // floor: pruned <= n*s < pruned + 1
        let product = n as f32 * s;
        prop_assert!(pruned as f32 <= product, "{} > {}", pruned, product);
        prop_assert!(product < (pruned + 1) as f32, "{} + 1 <= {}", pruned, product);
        prop_assert_eq!(count_pruned(mask.view()), pruned);
        prop_assert_eq!(mask.iter().filter(|&&v| v == 1.0).count(), n - pruned);
    }

    /// The as-built rule prunes a prefix of indices
    #[test]
    fn mask_key_prunes_prefix(
        weight in proptest::collection::vec(-10.0f32..10.0, 1..500),
        s in 0.0f32..=1.0,
    ) {
        let weight = Array1::from_vec(weight);
        let mut mask = Array1::<f32>::zeros(weight.len());
        let pruned = MaskUpdater::default().update(&mut mask, weight.view(), s).unwrap();
        for (i, &v) in mask.iter().enumerate() {
            prop_assert_eq!(v, if i < pruned { 0.0 } else { 1.0 });
        }
    }

    /// Magnitude ranking never keeps a smaller weight while pruning a larger one
    #[test]
    fn magnitude_key_respects_order(
        weight in proptest::collection::vec(-10.0f32..10.0, 1..300),
        s in 0.0f32..=1.0,
    ) {
        let weight = Array1::from_vec(weight);
        let mut mask = Array1::<f32>::ones(weight.len());
        MaskUpdater::new(RankKey::WeightMagnitude).update(&mut mask, weight.view(), s).unwrap();

        let max_pruned = weight.iter().zip(mask.iter())
            .filter(|&(_, &m)| m == 0.0)
            .map(|(w, _)| w.abs())
            .fold(f32::NEG_INFINITY, f32::max);
        let min_kept = weight.iter().zip(mask.iter())
            .filter(|&(_, &m)| m == 1.0)
            .map(|(w, _)| w.abs())
            .fold(f32::INFINITY, f32::min);
        prop_assert!(max_pruned <= min_kept);
    }

    /// Repeating an update with the same target changes nothing
    #[test]
    fn idempotent(n in 1usize..1000, s in 0.0f32..=1.0) {
        let weight = Array1::<f32>::ones(n);
        let mut mask = Array1::<f32>::ones(n);
        let updater = MaskUpdater::default();
        updater.update(&mut mask, weight.view(), s).unwrap();
        let first = mask.clone();
        updater.update(&mut mask, weight.view(), s).unwrap();
        prop_assert_eq!(first, mask);
    }
}
