//! Masked weight pruner
//!
//! Explicit state for one weight tensor: the schedule, the committed mask
//! and the effective-weight scratch buffer. The host drives it with
//! `forward` before its convolution and `backward` after computing the
//! weight gradient.

mod masked_pruner;


pub use masked_pruner::{ForwardPass, MaskUpdate, MaskedWeightPruner};
