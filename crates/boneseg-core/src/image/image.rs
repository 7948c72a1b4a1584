//! Image type with physical metadata.
//!
//! An [`Image`] is an N-dimensional `ndarray` array of voxels plus the
//! [`Affine`] that maps voxel indices to physical coordinates. Derived images
//! (masks, casts) are built with [`Image::with_data`] so they always share the
//! source affine and shape.

use ndarray::ArrayD;

use crate::error::{Result, SegmentationError};
use crate::spatial::Affine;

/// Volumetric image with physical metadata.
///
/// # Type Parameters
/// * `T` - The voxel type (`f32` intensities, `bool` masks, `u8` labels)
///
/// # Examples
/// ```rust
/// use boneseg_core::{Affine, Image};
/// use ndarray::{ArrayD, IxDyn};
///
/// let data = ArrayD::<f32>::zeros(IxDyn(&[4, 4, 4]));
/// let image = Image::new(data, Affine::identity());
/// assert_eq!(image.shape(), &[4, 4, 4]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Image<T> {
    /// Voxel data, indexed `[i, j, k, ...]`.
    data: ArrayD<T>,
    /// Voxel-to-world transform.
    affine: Affine,
}

impl<T> Image<T> {
    /// Create a new image with the given data and affine.
    pub fn new(data: ArrayD<T>, affine: Affine) -> Self {
        Self { data, affine }
    }

    /// Get the voxel data.
    pub fn data(&self) -> &ArrayD<T> {
        &self.data
    }

    /// Get the affine transform.
    pub fn affine(&self) -> &Affine {
        &self.affine
    }

    /// Get the image shape.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Total number of voxels.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the image holds no voxels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Build an image over the same physical grid with different voxel data.
    ///
    /// # Errors
    /// Returns [`SegmentationError::ShapeMismatch`] if `data` does not have
    /// exactly this image's shape.
    pub fn with_data<U>(&self, data: ArrayD<U>) -> Result<Image<U>> {
        if data.shape() != self.shape() {
            return Err(SegmentationError::shape_mismatch(self.shape(), data.shape()));
        }
        Ok(Image::new(data, self.affine))
    }

    /// Split into voxel data and affine.
    pub fn into_parts(self) -> (ArrayD<T>, Affine) {
        (self.data, self.affine)
    }
}

impl Image<bool> {
    /// Number of `true` voxels.
    pub fn count_foreground(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }

    /// Cast the mask to 8-bit labels: `true` -> 1, `false` -> 0.
    pub fn to_u8(&self) -> Image<u8> {
        Image::new(self.data.mapv(u8::from), self.affine)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, IxDyn};

    #[test]
    fn test_image_accessors() {
        let data = ArrayD::<f32>::zeros(IxDyn(&[2, 3, 4]));
        let image = Image::new(data, Affine::identity());
        assert_eq!(image.shape(), &[2, 3, 4]);
        assert_eq!(image.ndim(), 3);
        assert_eq!(image.len(), 24);
        assert!(!image.is_empty());
        assert_eq!(image.affine(), &Affine::identity());
    }

    #[test]
    fn test_with_data_keeps_affine() {
        let affine = Affine::from_rows([
            [2.0, 0.0, 0.0, 1.0],
            [0.0, 2.0, 0.0, 2.0],
            [0.0, 0.0, 2.0, 3.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let image = Image::new(ArrayD::<f32>::zeros(IxDyn(&[2, 2])), affine);
        let mask = image
            .with_data(ArrayD::from_elem(IxDyn(&[2, 2]), true))
            .unwrap();
        assert_eq!(mask.affine(), &affine);
        assert_eq!(mask.count_foreground(), 4);
    }

    #[test]
    fn test_with_data_rejects_other_shape() {
        let image = Image::new(ArrayD::<f32>::zeros(IxDyn(&[2, 2])), Affine::identity());
        let err = image
            .with_data(ArrayD::from_elem(IxDyn(&[2, 3]), false))
            .unwrap_err();
        assert_eq!(
            err,
            SegmentationError::ShapeMismatch {
                expected: vec![2, 2],
                actual: vec![2, 3],
            }
        );
    }

    #[test]
    fn test_to_u8() {
        let mask = Image::new(array![[true, false], [false, true]].into_dyn(), Affine::identity());
        let labels = mask.to_u8();
        assert_eq!(labels.data(), &array![[1u8, 0], [0, 1]].into_dyn());
        assert_eq!(labels.affine(), mask.affine());
    }
}
