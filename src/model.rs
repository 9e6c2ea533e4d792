//! The segmentation interface and the reference threshold model.

use ndarray::Array3;
use std::cmp::Ordering;

use crate::volume::Case;

/// A voxel-wise segmentation model.
///
/// Implementations see the full case (all three modalities plus their
/// acquisition metadata) and return a {0, 1} mask on the DWI voxel grid.
/// Pure: no I/O, no state mutation. A trained model replaces
/// [`PercentileThreshold`] by implementing this.
pub trait SegmentationModel {
    fn predict(&self, case: &Case) -> Array3<u8>;
}

/// Placeholder model: thresholds the DWI at a fixed intensity percentile.
///
/// The cutoff is the given percentile of the strictly-positive DWI voxels,
/// so the zero background does not drag it down; a voxel is foreground when
/// its intensity strictly exceeds the cutoff. A volume with no positive
/// voxels has no defined percentile, and the mask is then all zero.
pub struct PercentileThreshold {
    pub percentile: f64,
}

impl Default for PercentileThreshold {
    fn default() -> Self {
        Self { percentile: 99.0 }
    }
}

impl SegmentationModel for PercentileThreshold {
    fn predict(&self, case: &Case) -> Array3<u8> {
        let dwi = case.dwi().data();
        let mut positive: Vec<f64> = dwi.iter().copied().filter(|v| *v > 0.0).collect();
        if positive.is_empty() {
            return Array3::zeros(dwi.raw_dim());
        }
        positive.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let cutoff = percentile(&positive, self.percentile);
        dwi.mapv(|v| u8::from(v > cutoff))
    }
}

/// Linearly interpolated percentile of already-sorted data.
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let weight = rank - lo as f64;
    sorted[lo] * (1.0 - weight) + sorted[hi] * weight
}
