//! Error types for segmentation operations.

use thiserror::Error;

/// Main error type for segmentation operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SegmentationError {
    /// Mask and structuring element have a different number of axes.
    #[error("Dimension mismatch: mask has {mask} axes, structuring element has {kernel}")]
    DimensionMismatch { mask: usize, kernel: usize },

    /// Replacement data does not match the shape of the image it belongs to.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Structuring element without a well-defined centre.
    #[error("Invalid structuring element: {0}")]
    InvalidStructuringElement(String),
}

/// Result type for segmentation operations.
pub type Result<T> = std::result::Result<T, SegmentationError>;

impl SegmentationError {
    /// Create a shape mismatch error.
    pub fn shape_mismatch(expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    /// Create an invalid structuring element error.
    pub fn invalid_structuring_element(msg: impl Into<String>) -> Self {
        Self::InvalidStructuringElement(msg.into())
    }
}
