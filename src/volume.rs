//! Volume loading and the in-memory case representation.

use nalgebra::Matrix3;
use ndarray::{Array3, Ix3};
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};
use std::fs::File;
use std::path::Path;

use crate::common::{Metadata, Modality};
use crate::error::PipelineError;

/// A 3D scalar volume together with the spatial frame of its source file.
///
/// The full nifti header is kept verbatim so that origin, spacing and
/// direction survive bit-exactly onto any output written on the same voxel
/// grid. The accessors below only decompose the affine for inspection; the
/// header itself is what gets handed to the writer.
#[derive(Debug)]
pub struct Volume {
    data: Array3<f64>,
    header: NiftiHeader,
    filename: String,
}

impl Volume {
    pub fn new(data: Array3<f64>, header: NiftiHeader, filename: impl Into<String>) -> Self {
        Self {
            data,
            header,
            filename: filename.into(),
        }
    }

    /// Read a nifti file (`.nii` or `.nii.gz`) into memory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let obj = ReaderOptions::new()
            .read_file(path)
            .map_err(|source| PipelineError::VolumeRead {
                path: path.to_path_buf(),
                source,
            })?;
        let header = obj.header().clone();
        let data = obj
            .into_volume()
            .into_ndarray::<f64>()
            .map_err(|source| PipelineError::VolumeRead {
                path: path.to_path_buf(),
                source,
            })?;
        let ndim = data.ndim();
        let data = data
            .into_dimensionality::<Ix3>()
            .map_err(|_| PipelineError::VolumeShape {
                path: path.to_path_buf(),
                ndim,
            })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            data,
            header,
            filename,
        })
    }

    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }

    pub fn header(&self) -> &NiftiHeader {
        &self.header
    }

    /// Name of the file this volume was read from.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Dimensions of the voxel grid.
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// World coordinates of the first voxel, from the header affine.
    pub fn origin(&self) -> [f64; 3] {
        let affine = self.header.affine::<f64>();
        [affine[(0, 3)], affine[(1, 3)], affine[(2, 3)]]
    }

    /// Voxel edge lengths, the norms of the affine columns.
    pub fn spacing(&self) -> [f64; 3] {
        let affine = self.header.affine::<f64>();
        let mut spacing = [0.0; 3];
        for (j, s) in spacing.iter_mut().enumerate() {
            *s = (affine[(0, j)].powi(2) + affine[(1, j)].powi(2) + affine[(2, j)].powi(2)).sqrt();
        }
        spacing
    }

    /// Direction cosine matrix, the affine columns scaled to unit length.
    pub fn direction(&self) -> Matrix3<f64> {
        let affine = self.header.affine::<f64>();
        let spacing = self.spacing();
        let mut direction = Matrix3::zeros();
        for j in 0..3 {
            if spacing[j] > 0.0 {
                for i in 0..3 {
                    direction[(i, j)] = affine[(i, j)] / spacing[j];
                }
            }
        }
        direction
    }
}

/// One loaded modality: the image volume plus its acquisition metadata.
pub struct ScanInput {
    pub volume: Volume,
    pub metadata: Metadata,
}

/// The complete input of one patient case.
pub struct Case {
    dwi: ScanInput,
    adc: ScanInput,
    flair: ScanInput,
}

impl Case {
    pub fn new(dwi: ScanInput, adc: ScanInput, flair: ScanInput) -> Self {
        Self { dwi, adc, flair }
    }

    pub fn modality(&self, modality: Modality) -> &ScanInput {
        match modality {
            Modality::Dwi => &self.dwi,
            Modality::Adc => &self.adc,
            Modality::Flair => &self.flair,
        }
    }

    /// The reference volume; the output grid, frame and file name track it.
    pub fn dwi(&self) -> &Volume {
        &self.dwi.volume
    }

    /// File name the output volume must carry, inherited from the DWI input.
    pub fn filename(&self) -> &str {
        self.dwi.volume.filename()
    }
}

/// Parse a metadata sidecar into key/value pairs.
///
/// Cases missing the acquisition parameters still ship a JSON file, just
/// with no fields in it; an empty object is therefore valid.
pub fn load_metadata(path: impl AsRef<Path>) -> Result<Metadata, PipelineError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    serde_json::from_reader(file).map_err(|source| PipelineError::MetadataParse {
        path: path.to_path_buf(),
        source,
    })
}
