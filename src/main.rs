//! Command line entry point for the stroke lesion segmentation pipeline.
//!
//! Resolves the six input artifacts of one case (DWI/ADC/FLAIR images and
//! their acquisition-metadata JSON files), runs the segmentation model and
//! writes the mask plus `results.json` under the output root. The defaults
//! match the challenge container contract (`/input`, `/output`).

use clap::Parser;
use std::path::PathBuf;

use strokeseg::common::MetadataLayout;
use strokeseg::model::PercentileThreshold;
use strokeseg::process::{CaseOutcome, CaseProcessor, PipelineConfig};

// use clap to create commandline interface
#[derive(Parser, Debug)]
#[command(author, about, version)]
struct Args {
    /// the input directory holding the case images and metadata
    #[arg(short, long, default_value = "/input")]
    input: String,

    /// the output directory for the segmentation and results.json
    #[arg(short, long, default_value = "/output")]
    output: String,

    /// metadata file convention: "suffix" -> <input>/*<slug>.json,
    /// "subdir" -> <input>/<slug>/*.json
    #[arg(short, long, default_value = "suffix")]
    metadata_layout: String,
}

fn main() {
    let cli = Args::parse();
    let metadata_layout = match cli.metadata_layout.as_str() {
        "suffix" => MetadataLayout::Suffix,
        "subdir" => MetadataLayout::Subdir,
        other => {
            eprintln!("Error! Unknown metadata layout '{other}'. Use \"suffix\" or \"subdir\".");
            std::process::exit(-2);
        }
    };

    let config = PipelineConfig {
        input_root: PathBuf::from(cli.input),
        output_root: PathBuf::from(cli.output),
        metadata_layout,
    };
    let mut processor = CaseProcessor::new(config, Box::new(PercentileThreshold::default()));

    match processor.run() {
        Ok(CaseOutcome::Segmented { output }) => {
            println!("Segmentation written: {}", output.display());
        }
        Ok(CaseOutcome::Unverified { output }) => {
            eprintln!(
                "Warning! Output could not be confirmed at {}, case left out of results.json.",
                output.display()
            );
        }
        Err(e) => {
            eprintln!("Error! {e}");
            std::process::exit(-2);
        }
    }
}
