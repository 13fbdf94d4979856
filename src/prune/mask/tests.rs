use super::*;
use crate::error::PruneError;
use ndarray::{array, Array1};

fn weights_1_to_10() -> Array1<f32> {
    Array1::from_iter((1..=10).map(|v| v as f32))
}

// ==========================================================================
// Updater: counts and ordering
// ==========================================================================

#[test]
fn test_update_prunes_leading_indices() {
    let weight = weights_1_to_10();
    let mut mask = Array1::<f32>::ones(10);
    let pruned = MaskUpdater::default().update(&mut mask, weight.view(), 0.3).unwrap();

    assert_eq!(pruned, 3);
    assert_eq!(mask, array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
}

#[test]
fn test_mask_key_ignores_weight_values() {
    // Large weights first: the as-built rule still prunes by index.
    let weight = array![100.0f32, 50.0, 0.1, 0.2, 7.0];
    let mut mask = Array1::<f32>::ones(5);
    MaskUpdater::new(RankKey::Mask).update(&mut mask, weight.view(), 0.4).unwrap();
    assert_eq!(mask, array![0.0, 0.0, 1.0, 1.0, 1.0]);
}

#[test]
fn test_update_replaces_previous_mask() {
    // Zeros from an earlier state are not carried over.
    let weight = weights_1_to_10();
    let mut mask = array![1.0f32, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0];
    MaskUpdater::default().update(&mut mask, weight.view(), 0.2).unwrap();
    assert_eq!(mask, array![0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
}

#[test]
fn test_zero_sparsity_gives_all_ones() {
    let weight = weights_1_to_10();
    let mut mask = Array1::<f32>::zeros(10);
    let pruned = MaskUpdater::default().update(&mut mask, weight.view(), 0.0).unwrap();
    assert_eq!(pruned, 0);
    assert!(mask.iter().all(|&v| v == 1.0));
}

#[test]
fn test_full_sparsity_gives_all_zeros() {
    let weight = weights_1_to_10();
    let mut mask = Array1::<f32>::ones(10);
    let pruned = MaskUpdater::default().update(&mut mask, weight.view(), 1.0).unwrap();
    assert_eq!(pruned, 10);
    assert!(mask.iter().all(|&v| v == 0.0));
}

#[test]
fn test_out_of_range_sparsity_is_clamped() {
    let weight = weights_1_to_10();
    let mut mask = Array1::<f32>::ones(10);
    let updater = MaskUpdater::default();

    assert_eq!(updater.update(&mut mask, weight.view(), 1.7).unwrap(), 10);
    assert_eq!(updater.update(&mut mask, weight.view(), -0.5).unwrap(), 0);
    assert_eq!(updater.update(&mut mask, weight.view(), f32::INFINITY).unwrap(), 10);
    assert_eq!(updater.update(&mut mask, weight.view(), f32::NEG_INFINITY).unwrap(), 0);
    assert_eq!(updater.update(&mut mask, weight.view(), f32::NAN).unwrap(), 0);
}

#[test]
fn test_update_is_idempotent() {
    let weight = weights_1_to_10();
    let updater = MaskUpdater::default();
    let mut first = Array1::<f32>::ones(10);
    updater.update(&mut first, weight.view(), 0.55).unwrap();
    let mut second = first.clone();
    updater.update(&mut second, weight.view(), 0.55).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_update_empty_mask() {
    let weight = Array1::<f32>::zeros(0);
    let mut mask = Array1::<f32>::zeros(0);
    assert_eq!(MaskUpdater::default().update(&mut mask, weight.view(), 0.5).unwrap(), 0);
}

#[test]
fn test_update_rejects_length_mismatch() {
    let weight = Array1::<f32>::ones(4);
    let mut mask = Array1::<f32>::ones(5);
    let err = MaskUpdater::default().update(&mut mask, weight.view(), 0.5).unwrap_err();
    assert!(matches!(err, PruneError::ShapeMismatch { expected: 5, actual: 4, .. }));
    assert_eq!(mask, Array1::<f32>::ones(5), "mask untouched on error");
}

// ==========================================================================
// Updater: weight-magnitude ranking
// ==========================================================================

#[test]
fn test_weight_magnitude_prunes_smallest() {
    let weight = array![0.9f32, -0.1, 0.5, 0.05, -2.0, 0.3];
    let mut mask = Array1::<f32>::ones(6);
    let pruned =
        MaskUpdater::new(RankKey::WeightMagnitude).update(&mut mask, weight.view(), 0.5).unwrap();
    assert_eq!(pruned, 3);
    assert_eq!(mask, array![1.0, 0.0, 1.0, 0.0, 1.0, 0.0]);
}

#[test]
fn test_weight_magnitude_ties_by_index() {
    let weight = array![1.0f32, -1.0, 1.0, 1.0];
    let mut mask = Array1::<f32>::ones(4);
    MaskUpdater::new(RankKey::WeightMagnitude).update(&mut mask, weight.view(), 0.5).unwrap();
    assert_eq!(mask, array![0.0, 0.0, 1.0, 1.0]);
}

// ==========================================================================
// Prune count / helpers
// ==========================================================================

#[test]
fn test_prune_count_floors() {
    assert_eq!(MaskUpdater::prune_count(10, 0.3), 3);
    assert_eq!(MaskUpdater::prune_count(10, 0.39), 3);
    assert_eq!(MaskUpdater::prune_count(7, 0.5), 3);
    assert_eq!(MaskUpdater::prune_count(3, 0.15), 0);
    assert_eq!(MaskUpdater::prune_count(1000, 0.150_515), 150);
}

#[test]
fn test_prune_count_targets_not_exact_in_f32() {
    // 0.7f32 is 0.69999998; widening before the product would give 6.
    assert_eq!(MaskUpdater::prune_count(10, 0.7), 7);
    assert_eq!(MaskUpdater::prune_count(100, 0.29), 29);
    assert_eq!(MaskUpdater::prune_count(1000, 0.57), 570);
    assert_eq!(MaskUpdater::prune_count(10, 1.0), 10);
}

#[test]
fn test_update_prunes_seven_of_ten_at_point_seven() {
    let weight = Array1::from_iter((1..=10).map(|v| v as f32));
    let mut mask = Array1::<f32>::ones(10);
    let pruned = MaskUpdater::default().update(&mut mask, weight.view(), 0.7).unwrap();
    assert_eq!(pruned, 7);
    assert_eq!(count_pruned(mask.view()), 7);
    assert_eq!(mask[6], 0.0);
    assert_eq!(mask[7], 1.0);
}

#[test]
fn test_clamp_sparsity() {
    assert_eq!(clamp_sparsity(0.25), 0.25);
    assert_eq!(clamp_sparsity(2.0), 1.0);
    assert_eq!(clamp_sparsity(-1.0), 0.0);
    assert_eq!(clamp_sparsity(f32::NAN), 0.0);
}

#[test]
fn test_rank_key_serde() {
    assert_eq!(serde_json::to_string(&RankKey::WeightMagnitude).unwrap(), "\"weight_magnitude\"");
    let key: RankKey = serde_yaml::from_str("mask").unwrap();
    assert_eq!(key, RankKey::Mask);
    assert_eq!(RankKey::default(), RankKey::Mask);
}

#[test]
fn test_validate_binary() {
    assert!(validate_binary(&[0.0, 1.0, 1.0]).is_ok());
    let err = validate_binary(&[1.0, 0.5]).unwrap_err();
    assert!(err.to_string().contains("entry 1"));
    assert!(validate_binary(&[f32::NAN]).is_err());
}

#[test]
fn test_sparsity_helpers() {
    let mask = array![0.0f32, 1.0, 0.0, 1.0];
    assert_eq!(count_pruned(mask.view()), 2);
    assert_eq!(sparsity(mask.view()), 0.5);
    assert_eq!(sparsity(Array1::<f32>::zeros(0).view()), 0.0);
}

// ==========================================================================
// Fillers
// ==========================================================================

#[test]
fn test_default_filler_all_ones() {
    let mask = MaskFiller::default().fill(6).unwrap();
    assert_eq!(mask, Array1::<f32>::ones(6));
}

#[test]
fn test_constant_zero_filler() {
    let mask = MaskFiller::Constant { value: 0.0 }.fill(3).unwrap();
    assert_eq!(mask, Array1::<f32>::zeros(3));
}

#[test]
fn test_constant_filler_rejects_non_binary() {
    let err = MaskFiller::Constant { value: 0.5 }.fill(3).unwrap_err();
    assert!(matches!(err, PruneError::InvalidFiller(_)));
}

#[test]
fn test_uniform_threshold_seeded_is_reproducible() {
    let filler = MaskFiller::UniformThreshold { threshold: 0.3, seed: Some(42) };
    let a = filler.fill(256).unwrap();
    let b = filler.fill(256).unwrap();
    assert_eq!(a, b);
    assert!(validate_binary(a.as_slice().unwrap()).is_ok());
    let pruned = count_pruned(a.view());
    assert!(pruned > 30 && pruned < 130, "expected roughly 30% pruned, got {pruned}");
}

#[test]
fn test_uniform_threshold_extremes() {
    let keep_all = MaskFiller::UniformThreshold { threshold: 0.0, seed: None };
    assert_eq!(count_pruned(keep_all.fill(64).unwrap().view()), 0);
    let prune_all = MaskFiller::UniformThreshold { threshold: 1.0, seed: Some(7) };
    assert_eq!(count_pruned(prune_all.fill(64).unwrap().view()), 64);
}

#[test]
fn test_uniform_threshold_rejects_out_of_range() {
    let filler = MaskFiller::UniformThreshold { threshold: 1.5, seed: None };
    assert!(filler.validate().is_err());
}

#[test]
fn test_provided_filler() {
    let filler = MaskFiller::Provided { values: vec![1.0, 0.0, 1.0] };
    assert_eq!(filler.fill(3).unwrap(), array![1.0, 0.0, 1.0]);

    let err = filler.fill(4).unwrap_err();
    assert!(matches!(err, PruneError::ShapeMismatch { tensor: "provided mask", .. }));

    let bad = MaskFiller::Provided { values: vec![1.0, 2.0] };
    assert!(matches!(bad.fill(2).unwrap_err(), PruneError::InvalidMask(_)));
}

#[test]
fn test_filler_yaml() {
    let yaml = "type: uniform_threshold\nthreshold: 0.25\n";
    let filler: MaskFiller = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(filler, MaskFiller::UniformThreshold { threshold: 0.25, seed: None });
    assert_eq!(filler.display_name(), "uniform threshold");

    let constant: MaskFiller = serde_yaml::from_str("type: constant\nvalue: 1.0\n").unwrap();
    assert_eq!(constant, MaskFiller::default());
}
