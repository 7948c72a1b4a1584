//! Bone segmentation pipeline: threshold, then binary closing.

use tracing::debug;

use crate::error::Result;
use crate::filter::{binary_closing, BinaryThresholdFilter, StructuringElement};
use crate::image::Image;

/// Default threshold in Hounsfield units.
pub const DEFAULT_THRESHOLD: i32 = 200;
/// Default radius of the closing ball, in voxels.
pub const DEFAULT_CLOSING_RADIUS: usize = 2;

/// Parameters of the segmentation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentationConfig {
    /// Voxels strictly above this intensity are classified as bone.
    pub threshold: i32,
    /// Radius of the ball structuring element used for closing.
    pub closing_radius: usize,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            closing_radius: DEFAULT_CLOSING_RADIUS,
        }
    }
}

/// Bone segmentation filter.
///
/// Thresholds an intensity volume and closes the result with a ball whose
/// dimensionality matches the volume.
///
/// # Examples
/// ```rust
/// use boneseg_core::{Affine, BoneSegmentationFilter, Image};
/// use ndarray::{ArrayD, IxDyn};
///
/// let data = ArrayD::<f32>::from_elem(IxDyn(&[3, 3, 3]), 400.0);
/// let image = Image::new(data, Affine::identity());
/// let labels = BoneSegmentationFilter::new()
///     .with_closing_radius(0)
///     .apply(&image)
///     .unwrap();
/// assert!(labels.data().iter().all(|&v| v == 1));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoneSegmentationFilter {
    config: SegmentationConfig,
}

impl BoneSegmentationFilter {
    /// Create a filter with the default threshold and closing radius.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a filter from an explicit configuration.
    pub fn from_config(config: SegmentationConfig) -> Self {
        Self { config }
    }

    /// Set the threshold in Hounsfield units.
    pub fn with_threshold(mut self, threshold: i32) -> Self {
        self.config.threshold = threshold;
        self
    }

    /// Set the closing radius in voxels.
    pub fn with_closing_radius(mut self, radius: usize) -> Self {
        self.config.closing_radius = radius;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Threshold the image, without closing.
    pub fn threshold<T: Copy + Into<f64>>(&self, image: &Image<T>) -> Image<bool> {
        BinaryThresholdFilter::new(f64::from(self.config.threshold)).apply(image)
    }

    /// Threshold and close the image, returning the boolean mask.
    pub fn segment<T: Copy + Into<f64>>(&self, image: &Image<T>) -> Result<Image<bool>> {
        let mask = self.threshold(image);
        debug!(
            threshold = self.config.threshold,
            foreground = mask.count_foreground(),
            "Thresholded volume"
        );
        self.close(&mask)
    }

    /// Close an existing mask with a ball of the mask's dimensionality.
    pub fn close(&self, mask: &Image<bool>) -> Result<Image<bool>> {
        let se = StructuringElement::ball(self.config.closing_radius, mask.ndim());
        let closed = binary_closing(mask.data(), &se)?;
        debug!(
            radius = self.config.closing_radius,
            kernel_voxels = se.len(),
            "Closed mask"
        );
        mask.with_data(closed)
    }

    /// Run the full pipeline and cast the mask to 0/1 labels.
    pub fn apply<T: Copy + Into<f64>>(&self, image: &Image<T>) -> Result<Image<u8>> {
        Ok(self.segment(image)?.to_u8())
    }
}
