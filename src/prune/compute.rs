//! Masked forward / backward transforms.
//!
//! Forward multiplies the raw weight by the mask into a scratch buffer that
//! replaces the weight in the convolution. Backward multiplies the weight
//! gradient by the mask in place, so pruned entries receive no update.
//! Both are element-wise with no reduction.

use ndarray::{Array1, ArrayView1, ArrayViewMut1, Zip};

use crate::error::{PruneError, Result};

/// `effective[i] = mask[i] * weight[i]`, written into `effective`.
///
/// # Errors
///
/// [`PruneError::ShapeMismatch`] if the three buffers differ in length.
pub fn apply_mask(
    mask: ArrayView1<'_, f32>,
    weight: ArrayView1<'_, f32>,
    effective: &mut Array1<f32>,
) -> Result<()> {
    PruneError::check_len("weight", mask.len(), weight.len())?;
    PruneError::check_len("effective weight", mask.len(), effective.len())?;

    Zip::from(effective).and(&mask).and(&weight).for_each(|e, &m, &w| *e = m * w);
    Ok(())
}

/// `grad[i] *= mask[i]`, in place.
///
/// Pruned entries are set to exactly `0.0`, even when the raw gradient is
/// infinite or NaN.
///
/// # Errors
///
/// [`PruneError::ShapeMismatch`] if `grad` and `mask` differ in length.
pub fn mask_gradient(mask: ArrayView1<'_, f32>, mut grad: ArrayViewMut1<'_, f32>) -> Result<()> {
    PruneError::check_len("gradient", mask.len(), grad.len())?;

    Zip::from(&mut grad).and(&mask).for_each(|g, &m| {
        if m == 0.0 {
            *g = 0.0;
        } else {
            *g *= m;
        }
    });
    Ok(())
}
