//! Podar: dynamic weight pruning for convolution layers
//!
//! Keeps a binary mask beside a convolution weight and grows its sparsity
//! on a logarithmic schedule while the layer trains. The forward pass sees
//! the masked weight; the backward pass never lets gradient reach a pruned
//! entry.
//!
//! # Modules
//!
//! - [`prune`]: schedule, mask updater, masked compute and the per-tensor pruner
//! - [`conv`]: the convolution seam and a masked 2-D convolution layer
//! - [`cli`]: the `podar` command-line tool
//!
//! # Example
//!
//! ```
//! use ndarray::Array1;
//! use podar::conv::{ConvGeometry, DirectConv2d, MaskedConv2d};
//! use podar::prune::{Phase, PrunerConfig, PruningSchedule};
//!
//! let kernel = DirectConv2d::new(ConvGeometry::new(3, 8, (6, 6), (3, 3)).with_padding(1, 1))?;
//! let config = PrunerConfig::new().with_schedule(PruningSchedule::new(0.5, 200, 20)?);
//! let weight = Array1::from_elem(8 * 3 * 3 * 3, 0.1f32);
//! let mut layer = MaskedConv2d::new(kernel, weight, None, config)?;
//!
//! let input = Array1::<f32>::ones(3 * 6 * 6);
//! for iteration in 0..200 {
//!     let output = layer.forward(input.view(), iteration, Phase::Train)?;
//!     let grads = layer.backward(Array1::ones(output.len()).view(), input.view())?;
//!     layer.weight_mut().scaled_add(-0.01, &grads.weight);
//! }
//! assert!(layer.pruner().sparsity() > 0.4);
//! # Ok::<(), podar::PruneError>(())
//! ```

pub mod cli;
pub mod conv;
pub mod error;
pub mod prune;

pub use error::{PruneError, Result};
