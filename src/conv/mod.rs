//! Convolution plumbing around the pruner
//!
//! The pruner only needs two things from a convolution: a forward pass that
//! takes the effective weight in place of the raw one, and a backward pass
//! that produces a weight gradient it can mask. [`Convolution`] is that
//! seam; [`DirectConv2d`] is a straightforward reference kernel and
//! [`MaskedConv2d`] wires a kernel, a bias and a [`MaskedWeightPruner`]
//! into one trainable layer.
//!
//! All tensors are flat, row-major `f32` buffers. Inputs are
//! `[batch, in_channels, height, width]` and outputs
//! `[batch, out_channels, out_height, out_width]`; the batch size is
//! inferred from the input length.
//!
//! [`MaskedWeightPruner`]: crate::prune::MaskedWeightPruner

mod direct;
mod geometry;
mod layer;


pub use direct::DirectConv2d;
pub use geometry::ConvGeometry;
pub use layer::{LayerGradients, MaskedConv2d};

use ndarray::{Array1, ArrayView1};

use crate::error::{PruneError, Result};

/// Gradients produced by a convolution backward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvGradients {
    /// Gradient with respect to the weight that was passed in, summed over the batch.
    pub weight: Array1<f32>,
    /// Gradient with respect to the input.
    pub input: Array1<f32>,
}

/// A convolution kernel the pruner can drive.
pub trait Convolution {
    /// Logical weight shape.
    fn weight_shape(&self) -> Vec<usize>;

    /// Elements in one input sample.
    fn input_len(&self) -> usize;

    fn out_channels(&self) -> usize;

    /// Spatial elements per output channel.
    fn output_spatial_len(&self) -> usize;

    /// Elements in one output sample.
    fn output_len(&self) -> usize {
        self.out_channels() * self.output_spatial_len()
    }

    fn weight_len(&self) -> usize {
        self.weight_shape().iter().product()
    }

    /// Convolve a batch of inputs with `weight`.
    fn forward(&self, input: ArrayView1<'_, f32>, weight: ArrayView1<'_, f32>)
        -> Result<Array1<f32>>;

    /// Gradients of the loss with respect to `weight` and `input`.
    fn backward(
        &self,
        output_grad: ArrayView1<'_, f32>,
        input: ArrayView1<'_, f32>,
        weight: ArrayView1<'_, f32>,
    ) -> Result<ConvGradients>;
}

/// Number of samples in a flat batch of `total` elements.
///
/// # Errors
///
/// [`PruneError::ShapeMismatch`] if the batch is empty or `total` is not a
/// whole number of samples.
pub(crate) fn batch_size(tensor: &'static str, total: usize, per_sample: usize) -> Result<usize> {
    if per_sample == 0 || total == 0 || !total.is_multiple_of(per_sample) {
        let expected = per_sample * (total / per_sample.max(1)).max(1);
        return Err(PruneError::ShapeMismatch { tensor, expected, actual: total });
    }
    Ok(total / per_sample)
}
