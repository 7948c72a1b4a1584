//! Image types.
//!
//! This module provides the Image type, which pairs voxel data
//! with the affine that places it in physical space.

pub mod image;

pub use image::Image;
