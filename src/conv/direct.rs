//! Direct (loop-nest) 2-D convolution.

use ndarray::{Array1, ArrayView1};

use super::{batch_size, ConvGeometry, ConvGradients, Convolution};
use crate::error::{PruneError, Result};

/// Reference cross-correlation kernel with stride, padding and dilation.
///
/// No im2col and no SIMD: every output element is an explicit sum over its
/// receptive field, which keeps the gradient code easy to check.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectConv2d {
    geometry: ConvGeometry,
    output: (usize, usize),
}

impl DirectConv2d {
    /// # Errors
    ///
    /// [`PruneError::InvalidGeometry`] if `geometry` does not validate.
    pub fn new(geometry: ConvGeometry) -> Result<Self> {
        geometry.validate()?;
        let output = geometry.output_dims()?;
        Ok(Self { geometry, output })
    }

    pub fn geometry(&self) -> &ConvGeometry {
        &self.geometry
    }

    /// Spatial output `(height, width)`.
    pub fn output_dims(&self) -> (usize, usize) {
        self.output
    }

    fn input_index(&self, n: usize, c: usize, y: usize, x: usize) -> usize {
        let (h, w) = self.geometry.input;
        ((n * self.geometry.in_channels + c) * h + y) * w + x
    }

    fn weight_index(&self, oc: usize, ic: usize, ky: usize, kx: usize) -> usize {
        let (kh, kw) = self.geometry.kernel;
        ((oc * self.geometry.in_channels + ic) * kh + ky) * kw + kx
    }

    fn output_index(&self, n: usize, oc: usize, y: usize, x: usize) -> usize {
        let (h, w) = self.output;
        ((n * self.geometry.out_channels + oc) * h + y) * w + x
    }

    /// Visit every `(input, weight, output)` index triple that contributes
    /// to the convolution of a batch of `batch` samples.
    fn for_each_tap(&self, batch: usize, mut visit: impl FnMut(usize, usize, usize)) {
        let g = &self.geometry;
        let (out_h, out_w) = self.output;
        let (kh, kw) = g.kernel;

        for n in 0..batch {
            for oc in 0..g.out_channels {
                for oy in 0..out_h {
                    for ox in 0..out_w {
                        let out_idx = self.output_index(n, oc, oy, ox);
                        for ic in 0..g.in_channels {
                            for ky in 0..kh {
                                let Some(iy) = g.source_row(oy, ky) else { continue };
                                for kx in 0..kw {
                                    let Some(ix) = g.source_col(ox, kx) else { continue };
                                    visit(
                                        self.input_index(n, ic, iy, ix),
                                        self.weight_index(oc, ic, ky, kx),
                                        out_idx,
                                    );
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

impl Convolution for DirectConv2d {
    fn weight_shape(&self) -> Vec<usize> {
        self.geometry.weight_shape().to_vec()
    }

    fn input_len(&self) -> usize {
        self.geometry.input_len()
    }

    fn out_channels(&self) -> usize {
        self.geometry.out_channels
    }

    fn output_spatial_len(&self) -> usize {
        self.output.0 * self.output.1
    }

    fn forward(
        &self,
        input: ArrayView1<'_, f32>,
        weight: ArrayView1<'_, f32>,
    ) -> Result<Array1<f32>> {
        PruneError::check_len("weight", self.weight_len(), weight.len())?;
        let batch = batch_size("input", input.len(), self.input_len())?;

        let mut output = Array1::<f32>::zeros(batch * self.output_len());
        self.for_each_tap(batch, |i, w, o| output[o] += input[i] * weight[w]);
        Ok(output)
    }

    fn backward(
        &self,
        output_grad: ArrayView1<'_, f32>,
        input: ArrayView1<'_, f32>,
        weight: ArrayView1<'_, f32>,
    ) -> Result<ConvGradients> {
        PruneError::check_len("weight", self.weight_len(), weight.len())?;
        let batch = batch_size("input", input.len(), self.input_len())?;
        PruneError::check_len("output gradient", batch * self.output_len(), output_grad.len())?;

        let mut weight_grad = Array1::<f32>::zeros(weight.len());
        let mut input_grad = Array1::<f32>::zeros(input.len());
        self.for_each_tap(batch, |i, w, o| {
            let g = output_grad[o];
            weight_grad[w] += g * input[i];
            input_grad[i] += g * weight[w];
        });
        Ok(ConvGradients { weight: weight_grad, input: input_grad })
    }
}
