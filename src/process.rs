//! Per-case orchestration: locate, load, infer, write.

use std::path::PathBuf;

use crate::common::{ManifestEntry, MetadataLayout, Modality, OUTPUT_SLUG, RESULTS_FILENAME};
use crate::error::PipelineError;
use crate::locate::{ArtifactKind, CaseLocator};
use crate::model::SegmentationModel;
use crate::volume::{load_metadata, Case, ScanInput, Volume};
use crate::write::ResultWriter;

/// Explicit pipeline configuration; the processor has no built-in paths.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input_root: PathBuf,
    pub output_root: PathBuf,
    pub metadata_layout: MetadataLayout,
}

/// How a case run ended when it did not fail outright.
#[derive(Debug)]
pub enum CaseOutcome {
    /// Output written, verified on disk and recorded in the manifest.
    Segmented { output: PathBuf },
    /// The write could not be confirmed on disk; the manifest was left
    /// untouched for this case.
    Unverified { output: PathBuf },
}

/// Runs the pipeline for a single case.
///
/// One case per `run()`; iterating over many cases is a concern for whatever
/// sits on top, which can keep calling `run()` against fresh configurations
/// while this processor accumulates the shared manifest.
pub struct CaseProcessor {
    locator: CaseLocator,
    writer: ResultWriter,
    output_root: PathBuf,
    model: Box<dyn SegmentationModel>,
}

impl CaseProcessor {
    pub fn new(config: PipelineConfig, model: Box<dyn SegmentationModel>) -> Self {
        let locator = CaseLocator::new(&config.input_root, config.metadata_layout);
        let writer = ResultWriter::new(config.output_root.join(RESULTS_FILENAME));
        Self {
            locator,
            writer,
            output_root: config.output_root,
            model,
        }
    }

    /// Process one case end to end.
    ///
    /// Resolution, read and parse failures abort the case before anything is
    /// written. An unverified output write is not an error at this level: it
    /// comes back as [`CaseOutcome::Unverified`] with the manifest update
    /// skipped, mirroring the challenge's continue-on-missing-output policy.
    pub fn run(&mut self) -> Result<CaseOutcome, PipelineError> {
        let case = self.load_case()?;
        let (nx, ny, nz) = case.dwi().dim();
        println!(
            "Loaded case {} ({}x{}x{} voxels, spacing {:?})",
            case.filename(),
            nx,
            ny,
            nz,
            case.dwi().spacing()
        );

        let mask = self.model.predict(&case);

        let dest = self.output_root.join("images").join(OUTPUT_SLUG);
        let filename = case.filename().to_string();
        match self
            .writer
            .write_volume(case.dwi().header(), &mask, &dest, &filename)
        {
            Ok(output) => {
                self.writer.record(ManifestEntry::segmentation(&filename))?;
                Ok(CaseOutcome::Segmented { output })
            }
            Err(PipelineError::OutputMissing { path }) => {
                Ok(CaseOutcome::Unverified { output: path })
            }
            Err(e) => Err(e),
        }
    }

    fn load_case(&self) -> Result<Case, PipelineError> {
        // resolve all six artifacts before reading any of them
        let dwi = self.resolve(Modality::Dwi)?;
        let adc = self.resolve(Modality::Adc)?;
        let flair = self.resolve(Modality::Flair)?;

        Ok(Case::new(
            load_input(&dwi)?,
            load_input(&adc)?,
            load_input(&flair)?,
        ))
    }

    fn resolve(&self, modality: Modality) -> Result<(PathBuf, PathBuf), PipelineError> {
        let image = self
            .locator
            .locate(modality.image_slug(), ArtifactKind::Image)?;
        let metadata = self
            .locator
            .locate(modality.metadata_slug(), ArtifactKind::Metadata)?;
        println!("Located {} inputs: {}", modality, image.display());
        Ok((image, metadata))
    }
}

fn load_input((image, metadata): &(PathBuf, PathBuf)) -> Result<ScanInput, PipelineError> {
    Ok(ScanInput {
        volume: Volume::from_file(image)?,
        metadata: load_metadata(metadata)?,
    })
}
