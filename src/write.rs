//! Output reconstruction and the results manifest.

use ndarray::Array3;
use nifti::writer::WriterOptions;
use nifti::NiftiHeader;
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::ManifestEntry;
use crate::error::PipelineError;

/// Writes segmentation volumes and keeps the running results manifest.
///
/// The manifest is append-only in memory and rewritten to disk in full after
/// every recorded entry, so the file on disk always reflects the latest
/// fully-completed case.
pub struct ResultWriter {
    results_path: PathBuf,
    entries: Vec<ManifestEntry>,
}

impl ResultWriter {
    pub fn new(results_path: impl AsRef<Path>) -> Self {
        Self {
            results_path: results_path.as_ref().to_path_buf(),
            entries: Vec::new(),
        }
    }

    /// Write `mask` to `dir/filename` on the voxel grid of `frame`.
    ///
    /// The reference header carries origin, spacing and direction from the
    /// input scan onto the output, so the two align voxel for voxel. The
    /// destination directory is created as needed. After writing, the file
    /// must exist on disk; if it does not, the named `OutputMissing`
    /// condition is returned and the caller decides whether to continue.
    pub fn write_volume(
        &self,
        frame: &NiftiHeader,
        mask: &Array3<u8>,
        dir: &Path,
        filename: &str,
    ) -> Result<PathBuf, PipelineError> {
        fs::create_dir_all(dir)?;
        let output_path = dir.join(filename);
        WriterOptions::new(&output_path)
            .reference_header(frame)
            .write_nifti(mask)
            .map_err(|source| PipelineError::VolumeWrite {
                path: output_path.clone(),
                source,
            })?;
        if !output_path.exists() {
            return Err(PipelineError::OutputMissing { path: output_path });
        }
        Ok(output_path)
    }

    /// Append one entry and flush the whole manifest to disk.
    /// No deduplication: recording the same case twice leaves two entries.
    pub fn record(&mut self, entry: ManifestEntry) -> Result<(), PipelineError> {
        self.entries.push(entry);
        self.flush()
    }

    /// Serialize every entry recorded so far as one JSON array, replacing
    /// any previous file contents.
    pub fn flush(&self) -> Result<(), PipelineError> {
        let file =
            fs::File::create(&self.results_path).map_err(|source| PipelineError::ManifestWrite {
                path: self.results_path.clone(),
                source: serde_json::Error::io(source),
            })?;
        serde_json::to_writer(file, &self.entries).map_err(|source| {
            PipelineError::ManifestWrite {
                path: self.results_path.clone(),
                source,
            }
        })
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }
}
