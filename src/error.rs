//! Error types for mask-based pruning.
//!
//! Every variant carries enough context to locate the offending tensor or
//! configuration field without a debugger.

use thiserror::Error;

/// Result type for pruning operations.
pub type Result<T> = std::result::Result<T, PruneError>;

/// Errors raised by the pruning core and its convolution plumbing.
#[derive(Debug, Error)]
pub enum PruneError {
    /// Two tensors that must share an element count do not.
    #[error("Shape mismatch for {tensor}: expected {expected} elements, got {actual}")]
    ShapeMismatch {
        /// Which tensor was checked (weight, mask, gradient, ...)
        tensor: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Invalid mask filler: {0}")]
    InvalidFiller(String),

    /// Mask contains values other than 0.0 and 1.0.
    #[error("Invalid mask: {0}")]
    InvalidMask(String),

    #[error("Invalid convolution geometry: {0}")]
    InvalidGeometry(String),

    /// Backward was requested before any forward pass produced an effective weight.
    #[error("Backward called before forward: no effective weight has been computed")]
    BackwardBeforeForward,

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl PruneError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Check an element count against the expected one.
    pub(crate) fn check_len(tensor: &'static str, expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::ShapeMismatch { tensor, expected, actual })
        }
    }

    /// Whether this error stems from user-supplied configuration.
    ///
    /// Shape mismatches and non-binary masks count: they come from wiring a
    /// layer or restoring a checkpoint, not from a failed computation.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ShapeMismatch { .. }
                | Self::InvalidSchedule(_)
                | Self::InvalidFiller(_)
                | Self::InvalidMask(_)
                | Self::InvalidGeometry(_)
                | Self::Parse(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_message_names_tensor() {
        let err = PruneError::ShapeMismatch { tensor: "gradient", expected: 10, actual: 9 };
        let msg = err.to_string();
        assert!(msg.contains("gradient"));
        assert!(msg.contains("10"));
        assert!(msg.contains('9'));
    }

    #[test]
    fn test_check_len() {
        assert!(PruneError::check_len("mask", 4, 4).is_ok());
        let err = PruneError::check_len("mask", 4, 3).unwrap_err();
        assert!(matches!(
            err,
            PruneError::ShapeMismatch { tensor: "mask", expected: 4, actual: 3 }
        ));
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err = PruneError::io(
            "reading checkpoint",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(err.to_string().contains("reading checkpoint"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_is_config_error() {
        assert!(PruneError::InvalidSchedule("x".into()).is_config_error());
        assert!(PruneError::Parse("x".into()).is_config_error());
        assert!(PruneError::InvalidMask("x".into()).is_config_error());
        assert!(PruneError::check_len("weight", 4, 3).unwrap_err().is_config_error());
        assert!(!PruneError::BackwardBeforeForward.is_config_error());
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert!(!PruneError::io("writing checkpoint", io).is_config_error());
    }
}
