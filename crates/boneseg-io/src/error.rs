//! Error types for volume I/O.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or saving a volume.
#[derive(Error, Debug)]
pub enum NiftiIoError {
    /// The input path does not exist.
    #[error("Input not found: {}", .path.display())]
    InputNotFound { path: PathBuf },

    /// The input exists but is not a readable NIfTI volume.
    #[error("Failed to read NIfTI file {}", .path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: nifti::NiftiError,
    },

    /// The voxel data cannot be represented as scalar intensities.
    #[error("Unsupported voxel type: {datatype}")]
    UnsupportedVoxelType {
        datatype: String,
        #[source]
        source: nifti::NiftiError,
    },

    /// The output could not be written.
    #[error("Failed to write NIfTI file {}", .path.display())]
    OutputWriteFailure {
        path: PathBuf,
        #[source]
        source: nifti::NiftiError,
    },
}

/// Result type for volume I/O.
pub type Result<T> = std::result::Result<T, NiftiIoError>;
