//! NIfTI-1 reading and writing.
//!
//! Volumes are loaded as `f64` intensities (with `scl_slope`/`scl_inter`
//! applied) and their affine is decoded with the usual NIfTI precedence:
//! sform, then qform, then plain `pixdim` scaling. Label volumes are written
//! as `uint8` with the reference header's spatial fields kept intact, so the
//! decoded affine of the output is bit-for-bit that of the input.

use std::path::Path;

use boneseg_core::{Affine, Image};
use nifti::writer::WriterOptions;
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};
use tracing::{debug, info};

use crate::error::{NiftiIoError, Result};

/// NIFTI_XFORM_ALIGNED_ANAT, used when an affine has to be written as sform.
const XFORM_ALIGNED_ANAT: i16 = 2;

/// A loaded volume together with the header it came from.
#[derive(Debug, Clone)]
pub struct NiftiImage {
    image: Image<f64>,
    header: NiftiHeader,
}

impl NiftiImage {
    /// The voxel intensities and affine.
    pub fn image(&self) -> &Image<f64> {
        &self.image
    }

    /// The header the volume was read with.
    pub fn header(&self) -> &NiftiHeader {
        &self.header
    }
}

/// Read a NIfTI volume (`.nii`, `.nii.gz` or `.hdr`/`.img`).
pub fn read_nifti<P: AsRef<Path>>(path: P) -> Result<NiftiImage> {
    let path = path.as_ref();
    // Only a definite "does not exist" is reported as missing; stat failures
    // such as permission errors surface as unreadable input.
    match path.try_exists() {
        Ok(true) => {}
        Ok(false) => {
            return Err(NiftiIoError::InputNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => {
            return Err(NiftiIoError::InputUnreadable {
                path: path.to_path_buf(),
                source: nifti::NiftiError::from(e),
            })
        }
    }

    let obj = ReaderOptions::new()
        .read_file(path)
        .map_err(|source| NiftiIoError::InputUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
    let header = obj.header().clone();
    let affine = affine_from_header(&header);
    let datatype = header
        .data_type()
        .map(|t| format!("{:?}", t))
        .unwrap_or_else(|_| format!("code {}", header.datatype));
    debug!(
        datatype = %datatype,
        sform_code = header.sform_code,
        qform_code = header.qform_code,
        "Read NIfTI header"
    );

    let data = obj
        .into_volume()
        .into_ndarray::<f64>()
        .map_err(|source| NiftiIoError::UnsupportedVoxelType { datatype, source })?;

    let spacing = affine.spacing();
    let origin = affine.origin();
    info!(
        "Loaded {} with shape {:?}, spacing [{:.3}, {:.3}, {:.3}], origin [{:.3}, {:.3}, {:.3}]",
        path.display(),
        data.shape(),
        spacing.x,
        spacing.y,
        spacing.z,
        origin.x,
        origin.y,
        origin.z
    );

    Ok(NiftiImage {
        image: Image::new(data, affine),
        header,
    })
}

/// Write a label volume as `uint8`.
///
/// # Arguments
/// * `path` - Destination; a `.gz` suffix enables compression
/// * `image` - The labels and their affine
/// * `reference` - Header of the source volume; its spatial fields are kept
///   unless they encode a different affine than `image`'s
pub fn write_nifti<P: AsRef<Path>>(
    path: P,
    image: &Image<u8>,
    reference: Option<&NiftiHeader>,
) -> Result<()> {
    let path = path.as_ref();
    let header = label_header(image.affine(), reference);

    WriterOptions::new(path)
        .reference_header(&header)
        .write_nifti(image.data())
        .map_err(|source| NiftiIoError::OutputWriteFailure {
            path: path.to_path_buf(),
            source,
        })?;

    info!("Wrote {} with shape {:?}", path.display(), image.shape());
    Ok(())
}

/// Decode the voxel-to-world affine of a header.
pub fn affine_from_header(header: &NiftiHeader) -> Affine {
    if header.sform_code > 0 {
        return Affine::from_spatial_rows(header.srow_x, header.srow_y, header.srow_z);
    }

    if header.qform_code > 0 {
        let b = header.quatern_b;
        let c = header.quatern_c;
        let d = header.quatern_d;
        let a = (1.0 - (b * b + c * c + d * d).min(1.0)).sqrt();

        let qfac = if header.pixdim[0] < 0.0 { -1.0 } else { 1.0 };
        let dx = header.pixdim[1];
        let dy = header.pixdim[2];
        let dz = header.pixdim[3] * qfac;

        let r11 = a * a + b * b - c * c - d * d;
        let r12 = 2.0 * b * c - 2.0 * a * d;
        let r13 = 2.0 * b * d + 2.0 * a * c;
        let r21 = 2.0 * b * c + 2.0 * a * d;
        let r22 = a * a + c * c - b * b - d * d;
        let r23 = 2.0 * c * d - 2.0 * a * b;
        let r31 = 2.0 * b * d - 2.0 * a * c;
        let r32 = 2.0 * c * d + 2.0 * a * b;
        let r33 = a * a + d * d - c * c - b * b;

        return Affine::from_spatial_rows(
            [r11 * dx, r12 * dy, r13 * dz, header.quatern_x],
            [r21 * dx, r22 * dy, r23 * dz, header.quatern_y],
            [r31 * dx, r32 * dy, r33 * dz, header.quatern_z],
        );
    }

    // No orientation information: scale by pixdim only.
    Affine::from_spatial_rows(
        [header.pixdim[1], 0.0, 0.0, 0.0],
        [0.0, header.pixdim[2], 0.0, 0.0],
        [0.0, 0.0, header.pixdim[3], 0.0],
    )
}

/// Header for a 0/1 label volume on the grid of `affine`.
fn label_header(affine: &Affine, reference: Option<&NiftiHeader>) -> NiftiHeader {
    let mut header = reference.cloned().unwrap_or_default();
    // Labels are stored verbatim.
    header.scl_slope = 1.0;
    header.scl_inter = 0.0;
    header.cal_min = 0.0;
    header.cal_max = 1.0;

    if affine_from_header(&header) != *affine {
        let rows = affine.rows();
        let row = |r: usize| rows[r].map(|v| v as f32);
        header.sform_code = XFORM_ALIGNED_ANAT;
        header.srow_x = row(0);
        header.srow_y = row(1);
        header.srow_z = row(2);
    }
    header
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array3, IxDyn};
    use tempfile::tempdir;

    #[test]
    fn test_affine_from_sform() {
        let header = NiftiHeader {
            sform_code: 1,
            qform_code: 1,
            srow_x: [0.5, 0.0, 0.0, -10.0],
            srow_y: [0.0, 0.6, 0.0, 20.0],
            srow_z: [0.0, 0.0, 2.0, 30.0],
            ..NiftiHeader::default()
        };
        let affine = affine_from_header(&header);
        assert_eq!(
            affine.rows(),
            [
                [0.5, 0.0, 0.0, -10.0],
                [0.0, 0.6f32 as f64, 0.0, 20.0],
                [0.0, 0.0, 2.0, 30.0],
                [0.0, 0.0, 0.0, 1.0],
            ]
        );
    }

    #[test]
    fn test_affine_from_qform() {
        // b = c = d = 0 is the identity rotation; qfac = -1 flips z.
        let header = NiftiHeader {
            sform_code: 0,
            qform_code: 1,
            pixdim: [-1.0, 2.0, 3.0, 4.0, 1.0, 1.0, 1.0, 1.0],
            quatern_x: 1.0,
            quatern_y: 2.0,
            quatern_z: 3.0,
            ..NiftiHeader::default()
        };
        let affine = affine_from_header(&header);
        assert_eq!(
            affine.rows(),
            [
                [2.0, 0.0, 0.0, 1.0],
                [0.0, 3.0, 0.0, 2.0],
                [0.0, 0.0, -4.0, 3.0],
                [0.0, 0.0, 0.0, 1.0],
            ]
        );
    }

    #[test]
    fn test_affine_from_pixdim() {
        let header = NiftiHeader {
            sform_code: 0,
            qform_code: 0,
            pixdim: [1.0, 0.5, 0.5, 1.5, 1.0, 1.0, 1.0, 1.0],
            ..NiftiHeader::default()
        };
        let spacing = affine_from_header(&header).spacing();
        assert_eq!((spacing.x, spacing.y, spacing.z), (0.5, 0.5, 1.5));
    }

    #[test]
    fn test_label_header_keeps_matching_spatial_fields() {
        let reference = NiftiHeader {
            sform_code: 0,
            qform_code: 1,
            pixdim: [1.0, 0.8, 0.8, 2.0, 1.0, 1.0, 1.0, 1.0],
            quatern_d: 1.0,
            scl_slope: 2.0,
            scl_inter: -1024.0,
            ..NiftiHeader::default()
        };
        let affine = affine_from_header(&reference);
        let header = label_header(&affine, Some(&reference));
        assert_eq!(header.sform_code, 0);
        assert_eq!(header.qform_code, 1);
        assert_eq!(header.scl_slope, 1.0);
        assert_eq!(header.scl_inter, 0.0);
        assert_eq!(affine_from_header(&header), affine);
    }

    #[test]
    fn test_label_header_writes_sform_for_new_affine() {
        let affine = Affine::from_rows([
            [1.0, 0.0, 0.0, 5.0],
            [0.0, 1.0, 0.0, 6.0],
            [0.0, 0.0, 1.0, 7.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let header = label_header(&affine, None);
        assert_eq!(header.sform_code, XFORM_ALIGNED_ANAT);
        assert_eq!(header.srow_x, [1.0, 0.0, 0.0, 5.0]);
        assert_eq!(affine_from_header(&header), affine);
    }

    #[test]
    fn test_read_nifti_basic() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("test.nii");

        let data: Vec<f32> = (0..3 * 4 * 5).map(|x| x as f32).collect();
        let array = Array3::from_shape_vec((3, 4, 5), data)?;
        WriterOptions::new(&file_path).write_nifti(&array)?;

        let volume = read_nifti(&file_path)?;
        let image = volume.image();
        assert_eq!(image.shape(), &[3, 4, 5]);
        assert_eq!(image.data()[IxDyn(&[0, 0, 0])], 0.0);
        assert_eq!(image.data()[IxDyn(&[2, 3, 4])], 59.0);
        assert_eq!(image.data()[IxDyn(&[1, 2, 3])], f64::from(array[[1, 2, 3]]));
        Ok(())
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let err = read_nifti(dir.path().join("missing.nii")).unwrap_err();
        assert!(matches!(err, NiftiIoError::InputNotFound { .. }));
    }

    #[test]
    fn test_read_garbage_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("garbage.nii");
        std::fs::write(&file_path, b"not a nifti file").unwrap();
        let err = read_nifti(&file_path).unwrap_err();
        assert!(matches!(err, NiftiIoError::InputUnreadable { .. }));
    }

    #[test]
    fn test_existing_but_unreadable_path_is_not_missing() {
        // A directory exists but cannot be read as a volume.
        let dir = tempdir().unwrap();
        let err = read_nifti(dir.path()).unwrap_err();
        assert!(matches!(err, NiftiIoError::InputUnreadable { .. }));
    }

    #[test]
    fn test_read_keeps_double_precision() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("ct64.nii");
        let array = Array3::<f64>::from_elem((3, 3, 3), 200.000001);
        WriterOptions::new(&file_path).write_nifti(&array)?;

        let volume = read_nifti(&file_path)?;
        assert!(volume.image().data().iter().all(|&v| v == 200.000001));
        Ok(())
    }

    #[test]
    fn test_read_keeps_large_integers() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("ct32.nii");
        let array = Array3::<i32>::from_elem((2, 2, 2), 16_777_217);
        WriterOptions::new(&file_path).write_nifti(&array)?;

        let volume = read_nifti(&file_path)?;
        assert!(volume.image().data().iter().all(|&v| v == 16_777_217.0));
        Ok(())
    }
}
