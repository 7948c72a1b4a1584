//! Segment bones from non-contrast CT images.
//!
//! `segment_bones` loads a NIfTI volume, thresholds it, closes the mask with a
//! ball and writes the result as a `uint8` NIfTI volume on the input's grid.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use boneseg_core::{BoneSegmentationFilter, SegmentationConfig};
use boneseg_io::{read_nifti, write_nifti};
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "bone_seg")]
#[command(about = "Segment bones from non-contrast CT images.")]
pub struct Cli {
    /// The path to the input image.
    #[arg(long)]
    pub input: PathBuf,

    /// Where to write the output image.
    #[arg(long)]
    pub output: PathBuf,

    /// Threshold value in HU
    #[arg(long, default_value_t = boneseg_core::filter::DEFAULT_THRESHOLD, allow_negative_numbers = true)]
    pub threshold: i32,

    /// Radius of the structuring element for binary closing.
    #[arg(long, default_value_t = boneseg_core::filter::DEFAULT_CLOSING_RADIUS)]
    pub closing_radius: usize,
}

impl Cli {
    /// The pipeline parameters selected on the command line.
    pub fn config(&self) -> SegmentationConfig {
        SegmentationConfig {
            threshold: self.threshold,
            closing_radius: self.closing_radius,
        }
    }
}

/// Outcome of one segmentation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentationSummary {
    /// Shape of the input and output volumes.
    pub shape: Vec<usize>,
    /// Voxels above the threshold, before closing.
    pub thresholded_voxels: usize,
    /// Voxels labelled as bone in the written mask.
    pub bone_voxels: usize,
}

/// Segment the volume at `input` and write the mask to `output`.
pub fn segment_bones(
    input: &Path,
    output: &Path,
    config: &SegmentationConfig,
) -> Result<SegmentationSummary> {
    let volume = read_nifti(input)
        .with_context(|| format!("Failed to load input image {}", input.display()))?;

    let filter = BoneSegmentationFilter::from_config(*config);
    let thresholded = filter.threshold(volume.image());
    let closed = filter
        .close(&thresholded)
        .context("Binary closing failed")?;

    let summary = SegmentationSummary {
        shape: closed.shape().to_vec(),
        thresholded_voxels: thresholded.count_foreground(),
        bone_voxels: closed.count_foreground(),
    };
    info!(
        threshold = config.threshold,
        closing_radius = config.closing_radius,
        thresholded = summary.thresholded_voxels,
        bone = summary.bone_voxels,
        "Segmented {} voxels",
        closed.len()
    );

    write_nifti(output, &closed.to_u8(), Some(volume.header()))
        .with_context(|| format!("Failed to write output image {}", output.display()))?;

    Ok(summary)
}
