//! Spatial types describing where voxels live in physical space.
//!
//! All types are based on nalgebra.

pub mod affine;

pub use affine::Affine;

pub type Point3 = nalgebra::Point3<f64>;
pub type Vector3 = nalgebra::Vector3<f64>;
