//! Error types for filter construction.
//!
//! Every error here is raised by a constructor. Once a [`Filter`](crate::filters::Filter)
//! exists, processing an image cannot fail.

use thiserror::Error;

/// Configuration errors reported while building kernels, structural elements and filters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Invalid kernel: radius {radius} needs {expected} weights, got {actual}")]
    InvalidKernel {
        radius: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Structural element mask has {len} entries but line x row is {line}x{row}")]
    MaskSizeMismatch { len: usize, line: usize, row: usize },

    #[error("Structural element has no active entries")]
    EmptyMask,

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl FilterError {
    pub(crate) fn parameter(name: &'static str, value: impl ToString, reason: &str) -> Self {
        FilterError::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for filter construction.
pub type Result<T> = std::result::Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = FilterError::MaskSizeMismatch { len: 8, line: 3, row: 3 };
        assert_eq!(
            err.to_string(),
            "Structural element mask has 8 entries but line x row is 3x3"
        );

        let err = FilterError::parameter("sigma", -1.0, "must be positive");
        assert_eq!(err.to_string(), "Invalid parameter: sigma = -1 (must be positive)");
    }
}
