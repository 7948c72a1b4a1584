//! Structuring elements for binary morphology.
//!
//! A structuring element defines the neighborhood used in morphological
//! operations. The centre voxel of the kernel array is the origin; every
//! `true` element contributes one offset relative to it.

use ndarray::{ArrayD, Dimension, IxDyn};

use crate::error::{Result, SegmentationError};

/// Structuring element with a centred origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuringElement {
    mask: ArrayD<bool>,
    offsets: Vec<Vec<isize>>,
}

impl StructuringElement {
    /// Create a filled N-dimensional ball of the given radius.
    ///
    /// The kernel has shape `(2r+1)` along each of the `ndim` axes, and the
    /// element at offset `d` from the centre is set iff `|d| <= radius`.
    /// Radius 0 yields a single set voxel.
    pub fn ball(radius: usize, ndim: usize) -> Self {
        let side = 2 * radius + 1;
        let r = radius as i64;
        let mask = ArrayD::from_shape_fn(IxDyn(&vec![side; ndim]), |idx| {
            let dist_sq: i64 = idx
                .slice()
                .iter()
                .map(|&i| {
                    let d = i as i64 - r;
                    d * d
                })
                .sum();
            dist_sq <= r * r
        });
        Self::from_mask_unchecked(mask)
    }

    /// Create a structuring element from an arbitrary kernel.
    ///
    /// # Errors
    /// Every axis must have odd length so that the centre is defined.
    pub fn from_mask(mask: ArrayD<bool>) -> Result<Self> {
        if let Some(len) = mask.shape().iter().find(|&&len| len % 2 == 0) {
            return Err(SegmentationError::invalid_structuring_element(format!(
                "axis length {} is not odd (shape {:?})",
                len,
                mask.shape()
            )));
        }
        Ok(Self::from_mask_unchecked(mask))
    }

    fn from_mask_unchecked(mask: ArrayD<bool>) -> Self {
        let centre: Vec<isize> = mask.shape().iter().map(|&len| (len / 2) as isize).collect();
        let offsets = mask
            .indexed_iter()
            .filter(|(_, hit)| **hit)
            .map(|(idx, _)| {
                idx.slice()
                    .iter()
                    .zip(&centre)
                    .map(|(&i, &c)| i as isize - c)
                    .collect()
            })
            .collect();
        Self { mask, offsets }
    }

    /// The kernel array.
    pub fn mask(&self) -> &ArrayD<bool> {
        &self.mask
    }

    /// Number of axes.
    pub fn ndim(&self) -> usize {
        self.mask.ndim()
    }

    /// Offsets of the set elements relative to the centre.
    pub fn offsets(&self) -> &[Vec<isize>] {
        &self.offsets
    }

    /// Number of set elements.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Whether no element is set.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}
