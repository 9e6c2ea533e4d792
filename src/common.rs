use serde::{Deserialize, Serialize};
use std::fmt;

/// Acquisition-parameter key/value pairs from a sidecar JSON file.
/// Empty when the scan came without recorded parameters.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Slug of the produced segmentation artifact.
pub const OUTPUT_SLUG: &str = "stroke-lesion-segmentation";

/// Name of the manifest file under the output root.
pub const RESULTS_FILENAME: &str = "results.json";

// set up enums and structs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Dwi,
    Adc,
    Flair,
}

impl Modality {
    pub const ALL: [Modality; 3] = [Modality::Dwi, Modality::Adc, Modality::Flair];

    /// Slug of the image artifact for this modality.
    pub fn image_slug(&self) -> &'static str {
        match self {
            Modality::Dwi => "dwi-brain-mri",
            Modality::Adc => "adc-brain-mri",
            Modality::Flair => "flair-brain-mri",
        }
    }

    /// Slug of the acquisition-metadata artifact for this modality.
    /// The ADC slug has no "acquisition" infix; the strings are fixed by the
    /// challenge and not ours to normalize.
    pub fn metadata_slug(&self) -> &'static str {
        match self {
            Modality::Dwi => "dwi-mri-acquisition-parameters",
            Modality::Adc => "adc-mri-parameters",
            Modality::Flair => "flair-mri-acquisition-parameters",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modality::Dwi => write!(f, "dwi"),
            Modality::Adc => write!(f, "adc"),
            Modality::Flair => write!(f, "flair"),
        }
    }
}

/// Where the metadata JSON files sit relative to the input root.
/// Both conventions exist across challenge deployments, so the choice is a
/// configuration knob rather than a constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetadataLayout {
    /// `<input>/*<slug>.json`
    #[default]
    Suffix,
    /// `<input>/<slug>/*.json`
    Subdir,
}

/// One record of the results manifest consumed by the downstream evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub slug: String,
    pub filename: String,
}

impl ManifestEntry {
    /// Entry describing a written segmentation volume.
    pub fn segmentation(filename: &str) -> Self {
        Self {
            kind: "Image".to_string(),
            slug: OUTPUT_SLUG.to_string(),
            filename: filename.to_string(),
        }
    }
}
