//! Convolution shape bookkeeping.

use serde::{Deserialize, Serialize};

use crate::error::{PruneError, Result};

/// Shape parameters of a 2-D convolution over `[channels, height, width]` samples.
///
/// Weights are laid out `[out_channels, in_channels, kernel_h, kernel_w]`,
/// row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvGeometry {
    pub in_channels: usize,
    pub out_channels: usize,
    /// Input `(height, width)`.
    pub input: (usize, usize),
    /// Kernel `(height, width)`.
    pub kernel: (usize, usize),
    pub stride: (usize, usize),
    pub padding: (usize, usize),
    pub dilation: (usize, usize),
}

impl ConvGeometry {
    /// Stride 1, no padding, no dilation.
    pub fn new(
        in_channels: usize,
        out_channels: usize,
        input: (usize, usize),
        kernel: (usize, usize),
    ) -> Self {
        Self {
            in_channels,
            out_channels,
            input,
            kernel,
            stride: (1, 1),
            padding: (0, 0),
            dilation: (1, 1),
        }
    }

    pub fn with_stride(mut self, height: usize, width: usize) -> Self {
        self.stride = (height, width);
        self
    }

    pub fn with_padding(mut self, height: usize, width: usize) -> Self {
        self.padding = (height, width);
        self
    }

    pub fn with_dilation(mut self, height: usize, width: usize) -> Self {
        self.dilation = (height, width);
        self
    }

    /// Check that every dimension is positive and the dilated kernel fits
    /// inside the padded input.
    ///
    /// # Errors
    ///
    /// Returns [`PruneError::InvalidGeometry`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("in_channels", self.in_channels),
            ("out_channels", self.out_channels),
            ("input height", self.input.0),
            ("input width", self.input.1),
            ("kernel height", self.kernel.0),
            ("kernel width", self.kernel.1),
            ("stride height", self.stride.0),
            ("stride width", self.stride.1),
            ("dilation height", self.dilation.0),
            ("dilation width", self.dilation.1),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, v)| *v == 0) {
            return Err(PruneError::InvalidGeometry(format!("{name} must be positive")));
        }
        self.output_dims().map(|_| ())
    }

    /// Spatial output size `(height, width)`.
    ///
    /// Each axis follows `(in + 2*pad - (dilation*(k-1)+1)) / stride + 1`.
    ///
    /// # Errors
    ///
    /// [`PruneError::InvalidGeometry`] if the dilated kernel is larger than
    /// the padded input or the stride is zero.
    pub fn output_dims(&self) -> Result<(usize, usize)> {
        let height = output_extent(
            "height",
            self.input.0,
            self.kernel.0,
            self.stride.0,
            self.padding.0,
            self.dilation.0,
        )?;
        let width = output_extent(
            "width",
            self.input.1,
            self.kernel.1,
            self.stride.1,
            self.padding.1,
            self.dilation.1,
        )?;
        Ok((height, width))
    }

    /// `[out_channels, in_channels, kernel_h, kernel_w]`
    pub fn weight_shape(&self) -> [usize; 4] {
        [self.out_channels, self.in_channels, self.kernel.0, self.kernel.1]
    }

    pub fn weight_len(&self) -> usize {
        self.weight_shape().iter().product()
    }

    /// Elements in one input sample.
    pub fn input_len(&self) -> usize {
        self.in_channels * self.input.0 * self.input.1
    }

    /// Input row read by output row `out_y` at kernel row `k_y`, or `None`
    /// when the tap lands in the padding.
    pub(crate) fn source_row(&self, out_y: usize, k_y: usize) -> Option<usize> {
        source_index(out_y, k_y, self.stride.0, self.padding.0, self.dilation.0, self.input.0)
    }

    pub(crate) fn source_col(&self, out_x: usize, k_x: usize) -> Option<usize> {
        source_index(out_x, k_x, self.stride.1, self.padding.1, self.dilation.1, self.input.1)
    }
}

fn output_extent(
    axis: &str,
    input: usize,
    kernel: usize,
    stride: usize,
    pad: usize,
    dilation: usize,
) -> Result<usize> {
    if stride == 0 {
        return Err(PruneError::InvalidGeometry(format!("stride {axis} must be positive")));
    }
    let kernel_extent = dilation * kernel.saturating_sub(1) + 1;
    let padded = input + 2 * pad;
    if kernel_extent > padded {
        return Err(PruneError::InvalidGeometry(format!(
            "dilated kernel {axis} ({kernel_extent}) exceeds padded input {axis} ({padded})"
        )));
    }
    Ok((padded - kernel_extent) / stride + 1)
}

fn source_index(
    out: usize,
    k: usize,
    stride: usize,
    pad: usize,
    dilation: usize,
    len: usize,
) -> Option<usize> {
    (out * stride + k * dilation).checked_sub(pad).filter(|&pos| pos < len)
}
