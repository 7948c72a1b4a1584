pub mod error;
pub mod nifti_io;

pub use error::{NiftiIoError, Result};
pub use nifti_io::{affine_from_header, read_nifti, write_nifti, NiftiImage};
