//! Initial mask fill strategies.

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::validate_binary;
use crate::error::{PruneError, Result};

/// How the mask is filled before the first iteration.
///
/// # Example
///
/// ```
/// use podar::prune::MaskFiller;
///
/// let mask = MaskFiller::default().fill(4).unwrap();
/// assert_eq!(mask.to_vec(), vec![1.0; 4]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaskFiller {
    /// Every entry set to `value` (0.0 or 1.0).
    Constant {
        /// Fill value.
        value: f32,
    },

    /// Each entry draws `u ~ U[0, 1)` and is kept when `u >= threshold`.
    UniformThreshold {
        /// Probability of an entry starting pruned.
        threshold: f32,
        /// Seed for reproducible fills; OS entropy when absent.
        #[serde(default)]
        seed: Option<u64>,
    },

    /// Externally supplied initial values.
    Provided {
        /// Binary mask values, one per weight element.
        values: Vec<f32>,
    },
}

impl Default for MaskFiller {
    fn default() -> Self {
        MaskFiller::Constant { value: 1.0 }
    }
}

impl MaskFiller {
    /// Check the filler parameters independently of any tensor length.
    pub fn validate(&self) -> Result<()> {
        match self {
            MaskFiller::Constant { value } => {
                if *value != 0.0 && *value != 1.0 {
                    return Err(PruneError::InvalidFiller(format!(
                        "constant value ({value}) must be 0.0 or 1.0"
                    )));
                }
                Ok(())
            }
            MaskFiller::UniformThreshold { threshold, .. } => {
                if !(0.0..=1.0).contains(threshold) {
                    return Err(PruneError::InvalidFiller(format!(
                        "threshold ({threshold}) must be between 0.0 and 1.0"
                    )));
                }
                Ok(())
            }
            MaskFiller::Provided { values } => validate_binary(values),
        }
    }

    /// Produce an initial mask of `len` entries.
    ///
    /// # Errors
    ///
    /// Invalid parameters, or a provided mask whose length differs from `len`.
    pub fn fill(&self, len: usize) -> Result<Array1<f32>> {
        self.validate()?;
        match self {
            MaskFiller::Constant { value } => Ok(Array1::from_elem(len, *value)),
            MaskFiller::UniformThreshold { threshold, seed } => {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(*seed),
                    None => StdRng::from_os_rng(),
                };
                Ok(Array1::from_iter((0..len).map(|_| {
                    if rng.random::<f32>() >= *threshold {
                        1.0
                    } else {
                        0.0
                    }
                })))
            }
            MaskFiller::Provided { values } => {
                PruneError::check_len("provided mask", len, values.len())?;
                Ok(Array1::from_vec(values.clone()))
            }
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MaskFiller::Constant { .. } => "constant",
            MaskFiller::UniformThreshold { .. } => "uniform threshold",
            MaskFiller::Provided { .. } => "provided",
        }
    }
}
