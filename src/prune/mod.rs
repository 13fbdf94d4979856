//! Dynamic masked-weight pruning
//!
//! Training-time pruning for a single weight tensor. A binary mask is kept
//! next to the weight and recomputed on a logarithmic schedule; the forward
//! pass sees `mask * weight` and the backward pass silences the gradient of
//! every pruned entry.
//!
//! - **Schedule**: when to recompute the mask and what sparsity to reach
//! - **Mask**: initial fill and the ranking rule used on each update
//! - **Pruner**: per-tensor state driven by the host's forward/backward
//!
//! Masks only change in the training phase. Past `iter_stop` the mask is
//! frozen and the host keeps training the surviving weights.
//!
//! # Example
//!
//! ```
//! use ndarray::Array1;
//! use podar::prune::{MaskedWeightPruner, Phase, PrunerConfig, PruningSchedule};
//!
//! let schedule = PruningSchedule::new(0.5, 1000, 100).unwrap();
//! let mut pruner =
//!     MaskedWeightPruner::new(&[16, 3, 3, 3], PrunerConfig::new().with_schedule(schedule))
//!         .unwrap();
//!
//! let weight = Array1::<f32>::ones(pruner.len());
//! for iteration in 0..1000 {
//!     pruner.forward(weight.view(), iteration, Phase::Train).unwrap();
//! }
//! assert!(pruner.sparsity() > 0.5);
//! ```

mod checkpoint;
mod compute;
mod config;
pub mod mask;
mod phase;
mod pruner;
mod schedule;

pub use checkpoint::PrunerCheckpoint;
pub use compute::{apply_mask, mask_gradient};
pub use config::PrunerConfig;
pub use mask::{clamp_sparsity, MaskFiller, MaskUpdater, RankKey};
pub use phase::Phase;
pub use pruner::{ForwardPass, MaskUpdate, MaskedWeightPruner};
pub use schedule::PruningSchedule;
