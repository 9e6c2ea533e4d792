use nifti::error::NiftiError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while processing a case.
///
/// Resolution, read and parse failures are fatal to the case; nothing is
/// written once one of them fires. `OutputMissing` is the one reportable,
/// non-fatal condition: the write ran but could not be confirmed on disk,
/// and the orchestrator decides whether to carry on.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("expected exactly one file for '{slug}', found {count}")]
    InputResolution { slug: String, count: usize },

    #[error("invalid search pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("could not read volume {}: {source}", .path.display())]
    VolumeRead { path: PathBuf, source: NiftiError },

    #[error("volume {} has {ndim} dimensions, expected 3", .path.display())]
    VolumeShape { path: PathBuf, ndim: usize },

    #[error("could not parse metadata {}: {source}", .path.display())]
    MetadataParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("could not write volume {}: {source}", .path.display())]
    VolumeWrite { path: PathBuf, source: NiftiError },

    #[error("output volume missing after write: {}", .path.display())]
    OutputMissing { path: PathBuf },

    #[error("could not write manifest {}: {source}", .path.display())]
    ManifestWrite {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
