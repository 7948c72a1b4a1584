//! Binary morphological operations
//!
//! Implements dilation, erosion and closing for N-dimensional boolean masks.
//!
//! Each operator works one structuring-element offset at a time: the mask is
//! shifted by the offset and OR-accumulated (dilation) or AND-accumulated
//! (erosion) into the output over the window where the shifted voxel is in
//! bounds. Voxels outside the array read as `false` for both operators, so
//! erosion clears every voxel whose kernel footprint leaves the array.

use ndarray::{Array, ArrayBase, Data, Dimension, Slice, Zip};

use crate::error::{Result, SegmentationError};
use crate::filter::StructuringElement;

/// Dilate a binary mask.
///
/// `out[p]` is set iff `mask[p - o]` is set for some offset `o` of the
/// structuring element.
pub fn binary_dilation<S, D>(mask: &ArrayBase<S, D>, se: &StructuringElement) -> Result<Array<bool, D>>
where
    S: Data<Elem = bool>,
    D: Dimension,
{
    check_ndim(mask.ndim(), se)?;

    let mut out = Array::from_elem(mask.raw_dim(), false);
    for offset in se.offsets() {
        let shift: Vec<isize> = offset.iter().map(|&o| -o).collect();
        let Some((dst, src)) = shifted_window(mask.shape(), &shift) else {
            continue;
        };

        let src_view = mask.slice_each_axis(|ax| src[ax.axis.index()]);
        let mut dst_view = out.slice_each_axis_mut(|ax| dst[ax.axis.index()]);
        Zip::from(&mut dst_view)
            .and(&src_view)
            .for_each(|d, &s| *d |= s);
    }
    Ok(out)
}

/// Erode a binary mask.
///
/// `out[p]` is set iff `mask[p + o]` is set for every offset `o` of the
/// structuring element. Out-of-bounds neighbours count as unset.
pub fn binary_erosion<S, D>(mask: &ArrayBase<S, D>, se: &StructuringElement) -> Result<Array<bool, D>>
where
    S: Data<Elem = bool>,
    D: Dimension,
{
    check_ndim(mask.ndim(), se)?;

    let mut out = Array::from_elem(mask.raw_dim(), true);
    for offset in se.offsets() {
        let Some((dst, src)) = shifted_window(mask.shape(), offset) else {
            // The offset leaves the array from every voxel.
            out.fill(false);
            break;
        };

        let src_view = mask.slice_each_axis(|ax| src[ax.axis.index()]);
        let mut dst_view = out.slice_each_axis_mut(|ax| dst[ax.axis.index()]);
        Zip::from(&mut dst_view)
            .and(&src_view)
            .for_each(|d, &s| *d &= s);

        // Clear the slabs where p + offset falls outside the array.
        for (axis, &shift) in offset.iter().enumerate() {
            let len = mask.shape()[axis] as isize;
            let outside = match shift {
                s if s > 0 => Slice::from(len - s..len),
                s if s < 0 => Slice::from(0..-s),
                _ => continue,
            };
            out.slice_each_axis_mut(|ax| {
                if ax.axis.index() == axis {
                    outside
                } else {
                    Slice::from(..)
                }
            })
            .fill(false);
        }
    }
    Ok(out)
}

/// Close a binary mask
///
/// Closing = Dilation followed by Erosion.
/// Fills small holes and connects nearby structures.
pub fn binary_closing<S, D>(mask: &ArrayBase<S, D>, se: &StructuringElement) -> Result<Array<bool, D>>
where
    S: Data<Elem = bool>,
    D: Dimension,
{
    let dilated = binary_dilation(mask, se)?;
    binary_erosion(&dilated, se)
}

fn check_ndim(ndim: usize, se: &StructuringElement) -> Result<()> {
    if ndim != se.ndim() {
        return Err(SegmentationError::DimensionMismatch {
            mask: ndim,
            kernel: se.ndim(),
        });
    }
    Ok(())
}

/// Per-axis windows pairing `dst[p]` with `src[p + shift]`, restricted to the
/// voxels where both are in bounds. `None` when the window is empty.
fn shifted_window(shape: &[usize], shift: &[isize]) -> Option<(Vec<Slice>, Vec<Slice>)> {
    let mut dst = Vec::with_capacity(shape.len());
    let mut src = Vec::with_capacity(shape.len());
    for (&len, &s) in shape.iter().zip(shift) {
        let len = len as isize;
        let lo = (-s).max(0);
        let hi = len - s.max(0);
        if lo >= hi {
            return None;
        }
        dst.push(Slice::from(lo..hi));
        src.push(Slice::from(lo + s..hi + s));
    }
    Some((dst, src))
}
