//! Convolution layer with a dynamically pruned weight.

use ndarray::{Array1, ArrayView1};
use tracing::debug;

use super::{batch_size, ConvGradients, Convolution, DirectConv2d};
use crate::error::{PruneError, Result};
use crate::prune::{MaskedWeightPruner, Phase, PrunerConfig};

/// Gradients returned by [`MaskedConv2d::backward`].
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGradients {
    /// Weight gradient with every pruned entry forced to zero.
    pub weight: Array1<f32>,
    /// Per-output-channel bias gradient, unmasked.
    pub bias: Option<Array1<f32>>,
    /// Input gradient, computed through the effective weight.
    pub input: Array1<f32>,
}

/// A convolution whose weight is pruned on a schedule while it trains.
///
/// The layer owns the raw weight and the optional bias. The host applies its
/// optimizer step through [`weight_mut`](Self::weight_mut); pruned entries
/// keep whatever raw value they had, but receive no gradient and contribute
/// nothing to the output.
///
/// # Example
///
/// ```
/// use ndarray::Array1;
/// use podar::conv::{ConvGeometry, DirectConv2d, MaskedConv2d};
/// use podar::prune::{Phase, PrunerConfig};
///
/// let kernel = DirectConv2d::new(ConvGeometry::new(1, 2, (4, 4), (3, 3))).unwrap();
/// let weight = Array1::<f32>::ones(18);
/// let mut layer = MaskedConv2d::new(kernel, weight, None, PrunerConfig::default()).unwrap();
///
/// let input = Array1::<f32>::ones(16);
/// let output = layer.forward(input.view(), 0, Phase::Train).unwrap();
/// assert_eq!(output.len(), 2 * 2 * 2);
/// ```
#[derive(Debug, Clone)]
pub struct MaskedConv2d<C = DirectConv2d> {
    kernel: C,
    weight: Array1<f32>,
    bias: Option<Array1<f32>>,
    pruner: MaskedWeightPruner,
}

impl<C: Convolution> MaskedConv2d<C> {
    /// # Errors
    ///
    /// [`PruneError::ShapeMismatch`] if the weight or bias does not match
    /// the kernel, or any configuration error from the pruner.
    pub fn new(
        kernel: C,
        weight: Array1<f32>,
        bias: Option<Array1<f32>>,
        config: PrunerConfig,
    ) -> Result<Self> {
        PruneError::check_len("weight", kernel.weight_len(), weight.len())?;
        if let Some(bias) = &bias {
            PruneError::check_len("bias", kernel.out_channels(), bias.len())?;
        }
        let pruner = MaskedWeightPruner::new(&kernel.weight_shape(), config)?;
        Ok(Self { kernel, weight, bias, pruner })
    }

    /// Forward a batch: update the mask if due, convolve with the effective
    /// weight, then add the bias per output channel.
    ///
    /// # Errors
    ///
    /// [`PruneError::ShapeMismatch`] if `input` is not a whole number of
    /// samples. The input is checked before the pruner runs, so a rejected
    /// batch leaves the mask and the last forward untouched.
    pub fn forward(
        &mut self,
        input: ArrayView1<'_, f32>,
        iteration: usize,
        phase: Phase,
    ) -> Result<Array1<f32>> {
        self.batch_size(input.len())?;
        let pass = self.pruner.forward(self.weight.view(), iteration, phase)?;
        if let Some(update) = pass.update {
            debug!(iteration, pruned = update.pruned, "layer mask refreshed");
        }

        let mut output = self.kernel.forward(input, pass.effective_weight)?;
        if let Some(bias) = &self.bias {
            let spatial = self.kernel.output_spatial_len();
            let channels = self.kernel.out_channels();
            for (i, value) in output.iter_mut().enumerate() {
                *value += bias[(i / spatial) % channels];
            }
        }
        Ok(output)
    }

    /// Backward through the most recent forward.
    ///
    /// `input` must be the batch that forward saw.
    ///
    /// # Errors
    ///
    /// [`PruneError::BackwardBeforeForward`] if forward has never run, or a
    /// shape mismatch from the kernel.
    pub fn backward(
        &self,
        output_grad: ArrayView1<'_, f32>,
        input: ArrayView1<'_, f32>,
    ) -> Result<LayerGradients> {
        let effective = self.pruner.effective_weight().ok_or(PruneError::BackwardBeforeForward)?;
        let ConvGradients { mut weight, input: input_grad } =
            self.kernel.backward(output_grad, input, effective)?;
        self.pruner.backward(weight.view_mut())?;

        let bias = self.bias.as_ref().map(|_| self.bias_gradient(output_grad));
        Ok(LayerGradients { weight, bias, input: input_grad })
    }

    fn bias_gradient(&self, output_grad: ArrayView1<'_, f32>) -> Array1<f32> {
        let spatial = self.kernel.output_spatial_len();
        let channels = self.kernel.out_channels();
        let mut grad = Array1::<f32>::zeros(channels);
        for (i, g) in output_grad.iter().enumerate() {
            grad[(i / spatial) % channels] += g;
        }
        grad
    }

    /// Samples in a flat input of `len` elements.
    pub fn batch_size(&self, len: usize) -> Result<usize> {
        batch_size("input", len, self.kernel.input_len())
    }

    pub fn weight(&self) -> ArrayView1<'_, f32> {
        self.weight.view()
    }

    /// Raw weight, for the optimizer step.
    pub fn weight_mut(&mut self) -> &mut Array1<f32> {
        &mut self.weight
    }

    pub fn bias(&self) -> Option<ArrayView1<'_, f32>> {
        self.bias.as_ref().map(|bias| bias.view())
    }

    pub fn bias_mut(&mut self) -> Option<&mut Array1<f32>> {
        self.bias.as_mut()
    }

    pub fn pruner(&self) -> &MaskedWeightPruner {
        &self.pruner
    }

    /// Replace the pruner, e.g. with one restored from a checkpoint.
    ///
    /// # Errors
    ///
    /// [`PruneError::ShapeMismatch`] if the pruner covers a different number
    /// of elements.
    pub fn set_pruner(&mut self, pruner: MaskedWeightPruner) -> Result<()> {
        PruneError::check_len("mask", self.weight.len(), pruner.len())?;
        self.pruner = pruner;
        Ok(())
    }

    pub fn kernel(&self) -> &C {
        &self.kernel
    }
}
