pub mod morphology;
pub mod segmentation;
pub mod structuring;
pub mod threshold;

pub use morphology::{binary_closing, binary_dilation, binary_erosion};
pub use segmentation::{
    BoneSegmentationFilter, SegmentationConfig, DEFAULT_CLOSING_RADIUS, DEFAULT_THRESHOLD,
};
pub use structuring::StructuringElement;
pub use threshold::{binary_threshold, BinaryThresholdFilter};
