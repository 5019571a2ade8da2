// core/src/analyzer.rs
use log::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::classifier::Classifier;
use crate::compound::{apply_compounds, detect_compounds};
use crate::curvature::compute_curvature;
use crate::error::{from_json_str, CurveError, Result};
use crate::geo::{cumulative_distances, simplify};
use crate::interpolation::resample;
use crate::metrics;
use crate::models::{
    Coordinate, CurveSegment, RouteAnalysis, RouteMetadata, RouteSegment, StraightSegment,
};
use crate::physics::advise;
use crate::quality::{apply_confidence, density_report, find_sparse_regions};
use crate::segmenter::{segment, Run};
use crate::types::AnalysisConfig;

pub const MIN_ROUTE_POINTS: usize = 3;
/// Input points closer than this (m) to the previous kept point are dropped.
pub const MIN_POINT_SPACING_M: f64 = 1.0;

/// Runs the geometry pipeline with one validated configuration.
/// Holds no state between calls.
#[derive(Debug, Clone, Default)]
pub struct RouteAnalyzer {
    config: AnalysisConfig,
}

impl RouteAnalyzer {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Coordinates → ordered curve/straight segments over the interpolated points.
    ///
    /// Fewer than three input points is an error. If interpolation leaves
    /// fewer than three points the result is an empty analysis, not an error.
    pub fn analyze(&self, points: &[Coordinate], metadata: Option<&RouteMetadata>) -> Result<RouteAnalysis> {
        if points.len() < MIN_ROUTE_POINTS {
            return Err(CurveError::InsufficientPoints {
                required: MIN_ROUTE_POINTS,
                actual: points.len(),
            });
        }
        let cfg = &self.config;

        let simplified = simplify(points, MIN_POINT_SPACING_M);
        let interpolated = resample(&simplified, cfg.interpolation_spacing_m);
        let cumulative = cumulative_distances(&interpolated);
        let total_distance_m = cumulative.last().copied().unwrap_or(0.0);
        let density = density_report(points);

        if interpolated.len() < MIN_ROUTE_POINTS {
            debug!(
                "[Analyzer] only {} interpolated points, returning empty analysis",
                interpolated.len()
            );
            return Ok(RouteAnalysis {
                interpolated_points: interpolated,
                total_distance_m,
                density,
                ..RouteAnalysis::default()
            });
        }

        let profile = compute_curvature(&interpolated, cfg.smoothing_window);
        let runs = segment(&profile, &cumulative, cfg);

        let classifier = Classifier {
            points: &interpolated,
            cumulative: &cumulative,
            profile: &profile,
            config: cfg,
            metadata,
        };
        let mut segments = build_segments(&classifier, &runs);

        let groups = detect_compounds(&segments);
        apply_compounds(&mut segments, &groups);

        // externally sourced routes are trusted as-is
        let sparse_regions = match metadata {
            Some(_) => Vec::new(),
            None => find_sparse_regions(points, cfg.sparse_node_threshold_m),
        };
        apply_confidence(&mut segments, &sparse_regions);

        let curve_count = segments.iter().filter(|s| s.as_curve().is_some()).count();

        metrics::ROUTES_ANALYZED.inc();
        for curve in segments.iter().filter_map(RouteSegment::as_curve) {
            metrics::record_curve(curve.severity);
        }
        info!(
            "[Analyzer] {} points -> {} interpolated, {} curves ({} compound groups) over {:.0} m",
            points.len(),
            interpolated.len(),
            curve_count,
            groups.len(),
            total_distance_m
        );

        Ok(RouteAnalysis {
            segments,
            interpolated_points: interpolated,
            sparse_regions,
            total_distance_m,
            curve_count,
            density,
        })
    }
}

fn curve_for(classifier: &Classifier<'_>, run: &Run) -> CurveSegment {
    let mut curve = classifier.classify(run);
    advise(&mut curve, classifier.config);
    curve
}

fn straight_for(classifier: &Classifier<'_>, run: &Run) -> StraightSegment {
    StraightSegment {
        length_m: run.length_m(classifier.cumulative),
        start_index: run.start,
        end_index: run.end,
        distance_from_start_m: classifier.cumulative[run.start],
    }
}

fn to_segment(classifier: &Classifier<'_>, run: &Run) -> RouteSegment {
    if run.is_curve() {
        RouteSegment::Curve(curve_for(classifier, run))
    } else {
        RouteSegment::Straight(straight_for(classifier, run))
    }
}

#[cfg(not(feature = "parallel"))]
fn build_segments(classifier: &Classifier<'_>, runs: &[Run]) -> Vec<RouteSegment> {
    runs.iter().map(|run| to_segment(classifier, run)).collect()
}

// runs are independent; collect keeps input order
#[cfg(feature = "parallel")]
fn build_segments(classifier: &Classifier<'_>, runs: &[Run]) -> Vec<RouteSegment> {
    runs.par_iter().map(|run| to_segment(classifier, run)).collect()
}

/// Convenience wrapper: validate `config` and analyze once.
pub fn analyze_route(
    points: &[Coordinate],
    config: &AnalysisConfig,
    metadata: Option<&RouteMetadata>,
) -> Result<RouteAnalysis> {
    RouteAnalyzer::new(config.clone())?.analyze(points, metadata)
}

/// JSON in, JSON out. `points_json` is an array of `{"lat", "lon"}` objects;
/// config and metadata documents are optional and may be partial.
pub fn analyze_route_json(
    points_json: &str,
    config_json: Option<&str>,
    metadata_json: Option<&str>,
) -> Result<String> {
    let points: Vec<Coordinate> = from_json_str(points_json)?;
    let config = match config_json {
        Some(s) => AnalysisConfig::from_json(s)?,
        None => AnalysisConfig::default(),
    };
    let metadata: Option<RouteMetadata> = metadata_json.map(from_json_str::<RouteMetadata>).transpose()?;

    let analysis = analyze_route(&points, &config, metadata.as_ref())?;
    Ok(serde_json::to_string(&analysis)?)
}
