//! Core types and filters for bone segmentation of CT volumes.
//!
//! The pipeline is `threshold -> binary closing -> u8 cast`, with every
//! step exposed as a pure function over `ndarray` arrays so each can be
//! tested on its own.

pub mod error;
pub mod filter;
pub mod image;
pub mod spatial;

pub use error::{Result, SegmentationError};
pub use filter::{BoneSegmentationFilter, SegmentationConfig, StructuringElement};
pub use image::Image;
pub use spatial::Affine;
