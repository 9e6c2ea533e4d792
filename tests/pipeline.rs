//! End-to-end runs of the single-case pipeline against temp directories.

use nalgebra::Matrix4;
use ndarray::Array3;
use nifti::writer::WriterOptions;
use nifti::NiftiHeader;
use std::fs;
use std::path::Path;

use strokeseg::common::{ManifestEntry, MetadataLayout};
use strokeseg::error::PipelineError;
use strokeseg::model::PercentileThreshold;
use strokeseg::process::{CaseOutcome, CaseProcessor, PipelineConfig};
use strokeseg::volume::Volume;

fn reference_frame() -> NiftiHeader {
    let mut header = NiftiHeader::default();
    // f32-exact entries so frame comparisons below can use equality
    header.set_affine(&Matrix4::new(
        2.0, 0.0, 0.0, -24.5, //
        0.0, 2.0, 0.0, 16.0, //
        0.0, 0.0, 2.0, -5.25, //
        0.0, 0.0, 0.0, 1.0,
    ));
    header
}

fn write_image(path: &Path, data: &Array3<f64>) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    WriterOptions::new(path)
        .reference_header(&reference_frame())
        .write_nifti(data)
        .unwrap();
}

/// 5x5x5 DWI: 25 background zeros plus the positives 1..=100. The 99th
/// percentile of the positives is 99.01, so exactly one voxel (value 100)
/// ends up in the mask.
fn dwi_data() -> Array3<f64> {
    let mut values = vec![0.0; 25];
    values.extend((1..=100).map(f64::from));
    Array3::from_shape_vec((5, 5, 5), values).unwrap()
}

fn populate_case(input_root: &Path) {
    write_image(
        &input_root.join("images/dwi-brain-mri/sub-001_dwi.nii"),
        &dwi_data(),
    );
    let zeros = Array3::zeros((5, 5, 5));
    write_image(&input_root.join("images/adc-brain-mri/sub-001_adc.nii"), &zeros);
    write_image(
        &input_root.join("images/flair-brain-mri/sub-001_flair.nii"),
        &zeros,
    );

    fs::write(
        input_root.join("dwi-mri-acquisition-parameters.json"),
        br#"{"RepetitionTime": 5.4, "EchoTime": 0.09}"#,
    )
    .unwrap();
    fs::write(input_root.join("adc-mri-parameters.json"), b"{}").unwrap();
    fs::write(
        input_root.join("flair-mri-acquisition-parameters.json"),
        b"{}",
    )
    .unwrap();
}

fn processor(input_root: &Path, output_root: &Path) -> CaseProcessor {
    let config = PipelineConfig {
        input_root: input_root.to_path_buf(),
        output_root: output_root.to_path_buf(),
        metadata_layout: MetadataLayout::Suffix,
    };
    CaseProcessor::new(config, Box::new(PercentileThreshold::default()))
}

#[test]
fn segments_a_full_case() {
    let dir = tempfile::tempdir().unwrap();
    let input_root = dir.path().join("input");
    let output_root = dir.path().join("output");
    populate_case(&input_root);

    let outcome = processor(&input_root, &output_root).run().unwrap();
    let output = match outcome {
        CaseOutcome::Segmented { output } => output,
        other => panic!("unexpected outcome: {other:?}"),
    };
    assert_eq!(
        output,
        output_root.join("images/stroke-lesion-segmentation/sub-001_dwi.nii")
    );

    // the mask marks exactly the voxels above the cutoff, on the DWI grid
    // and in the DWI frame
    let mask = Volume::from_file(&output).unwrap();
    assert_eq!(mask.dim(), (5, 5, 5));
    assert_eq!(mask.data().sum(), 1.0);
    let dwi = dwi_data();
    for (value, marked) in dwi.iter().zip(mask.data().iter()) {
        assert_eq!(*marked == 1.0, *value > 99.01);
    }
    assert_eq!(
        mask.header().affine::<f64>(),
        reference_frame().affine::<f64>()
    );

    let manifest: Vec<ManifestEntry> =
        serde_json::from_str(&fs::read_to_string(output_root.join("results.json")).unwrap())
            .unwrap();
    assert_eq!(manifest, vec![ManifestEntry::segmentation("sub-001_dwi.nii")]);
}

#[test]
fn rerunning_the_same_case_appends_a_second_identical_entry() {
    let dir = tempfile::tempdir().unwrap();
    let input_root = dir.path().join("input");
    let output_root = dir.path().join("output");
    populate_case(&input_root);

    let mut processor = processor(&input_root, &output_root);
    processor.run().unwrap();
    processor.run().unwrap();

    let manifest: Vec<ManifestEntry> =
        serde_json::from_str(&fs::read_to_string(output_root.join("results.json")).unwrap())
            .unwrap();
    assert_eq!(manifest.len(), 2);
    assert_eq!(manifest[0], manifest[1]);
}

#[test]
fn missing_dwi_image_aborts_before_any_output() {
    let dir = tempfile::tempdir().unwrap();
    let input_root = dir.path().join("input");
    let output_root = dir.path().join("output");
    populate_case(&input_root);
    // empty the DWI image directory: zero matches for that one slug
    fs::remove_file(input_root.join("images/dwi-brain-mri/sub-001_dwi.nii")).unwrap();

    let err = processor(&input_root, &output_root).run().unwrap_err();
    match err {
        PipelineError::InputResolution { slug, count } => {
            assert_eq!(slug, "dwi-brain-mri");
            assert_eq!(count, 0);
        }
        other => panic!("unexpected error: {other}"),
    }

    // nothing was written: no segmentation, no manifest
    assert!(!output_root.join("results.json").exists());
    assert!(!output_root.join("images").exists());
}

#[test]
fn subdir_metadata_layout_resolves_the_legacy_tree() {
    let dir = tempfile::tempdir().unwrap();
    let input_root = dir.path().join("input");
    let output_root = dir.path().join("output");
    populate_case(&input_root);
    // move the sidecars into the legacy per-slug directories
    for slug in [
        "dwi-mri-acquisition-parameters",
        "adc-mri-parameters",
        "flair-mri-acquisition-parameters",
    ] {
        let flat = input_root.join(format!("{slug}.json"));
        let nested = input_root.join(slug).join("params.json");
        fs::create_dir_all(nested.parent().unwrap()).unwrap();
        fs::rename(&flat, &nested).unwrap();
    }

    let config = PipelineConfig {
        input_root: input_root.clone(),
        output_root: output_root.clone(),
        metadata_layout: MetadataLayout::Subdir,
    };
    let mut processor = CaseProcessor::new(config, Box::new(PercentileThreshold::default()));
    assert!(matches!(
        processor.run().unwrap(),
        CaseOutcome::Segmented { .. }
    ));
}
