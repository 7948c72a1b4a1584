//! Voxel-to-world affine transform.
//!
//! The affine is the 4×4 homogeneous matrix stored (directly or implicitly)
//! in a volumetric image header. It maps a voxel index `(i, j, k)` to a
//! physical point `(x, y, z)`:
//!
//! ```text
//! [x y z 1]^T = A * [i j k 1]^T
//! ```

use nalgebra::Matrix4;

use super::{Point3, Vector3};

/// Voxel-to-world affine transform.
///
/// This is a thin wrapper around nalgebra's `Matrix4` so the matrix can be
/// carried unchanged from an input image to a derived output image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine(pub Matrix4<f64>);

impl Affine {
    /// The identity affine (1 mm isotropic voxels, origin at index 0).
    pub fn identity() -> Self {
        Self(Matrix4::identity())
    }

    /// Create an affine from its four rows.
    pub fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        Self(Matrix4::from_fn(|r, c| rows[r][c]))
    }

    /// Create an affine from the three spatial rows of a header.
    ///
    /// The last row is fixed to `[0, 0, 0, 1]`.
    pub fn from_spatial_rows(x: [f32; 4], y: [f32; 4], z: [f32; 4]) -> Self {
        Self::from_rows([
            x.map(f64::from),
            y.map(f64::from),
            z.map(f64::from),
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// The matrix rows, row-major.
    pub fn rows(&self) -> [[f64; 4]; 4] {
        let mut rows = [[0.0; 4]; 4];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = self.0[(r, c)];
            }
        }
        rows
    }

    /// Get the inner nalgebra matrix.
    pub fn inner(&self) -> &Matrix4<f64> {
        &self.0
    }

    /// Physical distance between adjacent voxels along each index axis.
    ///
    /// This is the norm of each of the first three columns.
    pub fn spacing(&self) -> Vector3 {
        Vector3::from_fn(|axis, _| self.0.fixed_view::<3, 1>(0, axis).norm())
    }

    /// Physical coordinate of voxel index `(0, 0, 0)`.
    pub fn origin(&self) -> Point3 {
        Point3::new(self.0[(0, 3)], self.0[(1, 3)], self.0[(2, 3)])
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::identity()
    }
}
