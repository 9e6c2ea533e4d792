//! Resolution of the per-case input artifacts.

use glob::glob;
use std::path::{Path, PathBuf};

use crate::common::MetadataLayout;
use crate::error::PipelineError;

/// The two kinds of artifact a case is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// A volumetric image under `<input>/images/<slug>/`.
    Image,
    /// An acquisition-metadata JSON file, placed per [`MetadataLayout`].
    Metadata,
}

/// Finds the single file backing each required artifact of a case.
pub struct CaseLocator {
    input_root: PathBuf,
    metadata_layout: MetadataLayout,
}

impl CaseLocator {
    pub fn new(input_root: impl AsRef<Path>, metadata_layout: MetadataLayout) -> Self {
        Self {
            input_root: input_root.as_ref().to_path_buf(),
            metadata_layout,
        }
    }

    /// Resolve the one file for `slug`.
    ///
    /// Anything other than exactly one candidate is an error naming the slug
    /// and the number of files found, so a missing and an ambiguous artifact
    /// read differently in the report.
    pub fn locate(&self, slug: &str, kind: ArtifactKind) -> Result<PathBuf, PipelineError> {
        let pattern = match kind {
            ArtifactKind::Image => {
                format!("{}/images/{}/*.nii*", self.input_root.display(), slug)
            }
            ArtifactKind::Metadata => match self.metadata_layout {
                MetadataLayout::Suffix => {
                    format!("{}/*{}.json", self.input_root.display(), slug)
                }
                MetadataLayout::Subdir => {
                    format!("{}/{}/*.json", self.input_root.display(), slug)
                }
            },
        };
        let mut matches: Vec<PathBuf> = glob(&pattern)?.filter_map(Result::ok).collect();
        if matches.len() != 1 {
            return Err(PipelineError::InputResolution {
                slug: slug.to_string(),
                count: matches.len(),
            });
        }
        Ok(matches.remove(0))
    }
}
