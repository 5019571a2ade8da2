// core/src/quality.rs
use log::warn;
use serde::{Deserialize, Serialize};

use crate::geo::{cumulative_distances, haversine};
use crate::models::{Coordinate, RouteSegment, SparseRegion};

/// Multiplier applied to the confidence of curves inside a sparse region.
pub const SPARSE_CONFIDENCE_FACTOR: f64 = 0.5;

/// Spacing statistics of a point sequence (m).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityReport {
    pub num_points: usize,
    pub total_distance_m: f64,
    pub avg_spacing_m: f64,
    pub median_spacing_m: f64,
    pub min_spacing_m: f64,
    pub max_spacing_m: f64,
    pub buckets: SpacingBuckets,
}

/// Count of point-to-point gaps per spacing band.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpacingBuckets {
    pub under_5: usize,
    pub from_5_to_15: usize,
    pub from_15_to_50: usize,
    pub from_50_to_100: usize,
    pub over_100: usize,
}

impl SpacingBuckets {
    fn add(&mut self, d: f64) {
        match d {
            d if d < 5.0 => self.under_5 += 1,
            d if d < 15.0 => self.from_5_to_15 += 1,
            d if d < 50.0 => self.from_15_to_50 += 1,
            d if d < 100.0 => self.from_50_to_100 += 1,
            _ => self.over_100 += 1,
        }
    }
}

/// Spacing report for a route; `None` below two points.
pub fn density_report(points: &[Coordinate]) -> Option<DensityReport> {
    if points.len() < 2 {
        return None;
    }
    let mut gaps: Vec<f64> = points.windows(2).map(|w| haversine(&w[0], &w[1])).collect();

    let mut buckets = SpacingBuckets::default();
    for d in &gaps {
        buckets.add(*d);
    }

    let total: f64 = gaps.iter().sum();
    gaps.sort_by(|a, b| a.total_cmp(b));
    let n = gaps.len();
    let median = if n % 2 == 1 {
        gaps[n / 2]
    } else {
        (gaps[n / 2 - 1] + gaps[n / 2]) / 2.0
    };

    Some(DensityReport {
        num_points: points.len(),
        total_distance_m: total,
        avg_spacing_m: total / n as f64,
        median_spacing_m: median,
        min_spacing_m: gaps[0],
        max_spacing_m: gaps[n - 1],
        buckets,
    })
}

/// Gaps between consecutive original points wider than `threshold_m`.
pub fn find_sparse_regions(points: &[Coordinate], threshold_m: f64) -> Vec<SparseRegion> {
    let cumulative = cumulative_distances(points);
    let regions: Vec<SparseRegion> = cumulative
        .windows(2)
        .enumerate()
        .filter_map(|(i, w)| {
            let gap_m = w[1] - w[0];
            (gap_m > threshold_m).then_some(SparseRegion {
                start_m: w[0],
                end_m: w[1],
                gap_m,
                from_index: i,
            })
        })
        .collect();

    if !regions.is_empty() {
        let widest = regions.iter().map(|r| r.gap_m).fold(0.0, f64::max);
        warn!(
            "[Quality] {} sparse region(s) over {:.0} m, widest gap {:.0} m",
            regions.len(),
            threshold_m,
            widest
        );
    }
    regions
}

/// Halve the confidence of every curve that overlaps a sparse region.
pub fn apply_confidence(segments: &mut [RouteSegment], regions: &[SparseRegion]) {
    if regions.is_empty() {
        return;
    }
    for curve in segments.iter_mut().filter_map(RouteSegment::as_curve_mut) {
        let (start, end) = (curve.distance_from_start_m, curve.distance_to_end_m());
        if regions.iter().any(|r| r.overlaps(start, end)) {
            curve.confidence *= SPARSE_CONFIDENCE_FACTOR;
        }
    }
}
