//! Intensity thresholding.

use ndarray::{Array, ArrayBase, Data, Dimension};

use crate::image::Image;

/// Classify each voxel as foreground iff its value is strictly greater than
/// `threshold`.
///
/// Values are widened to `f64` before comparing, which is exact for every
/// type that converts losslessly (`u8`..`i32`, `f32`, `f64`).
pub fn binary_threshold<S, D, T>(data: &ArrayBase<S, D>, threshold: f64) -> Array<bool, D>
where
    S: Data<Elem = T>,
    D: Dimension,
    T: Copy + Into<f64>,
{
    data.mapv(|v| v.into() > threshold)
}

/// Binary threshold filter.
///
/// Produces a mask over the same grid as the input image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryThresholdFilter {
    threshold: f64,
}

impl BinaryThresholdFilter {
    /// Create a filter with the given lower (exclusive) bound.
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Apply the filter to an image.
    pub fn apply<T: Copy + Into<f64>>(&self, image: &Image<T>) -> Image<bool> {
        Image::new(
            binary_threshold(image.data(), self.threshold),
            *image.affine(),
        )
    }
}
