//! Single-case segmentation pipeline for a multi-modal stroke MRI challenge.
//!
//! Loads the three co-registered modalities of one patient case (DWI, ADC,
//! FLAIR) plus their acquisition metadata, computes a binary lesion mask and
//! writes it back out on the exact voxel grid of the DWI input, together with
//! a `results.json` manifest. The bundled model is a 99th-percentile
//! intensity threshold on the DWI, standing in for a real one; anything
//! implementing [`model::SegmentationModel`] drops into its place.

pub mod common;
pub mod error;
pub mod locate;
pub mod model;
pub mod process;
pub mod volume;
pub mod write;
