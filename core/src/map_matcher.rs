// core/src/map_matcher.rs
use std::ops::Range;
use std::sync::Arc;

use log::{trace, warn};
use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::error::{CurveError, Result};
use crate::geo::{cumulative_distances, project_onto_segment, Projection};
use crate::metrics;
use crate::models::{Coordinate, CurveSegment, RouteAnalysis};

/// Route segments searched on each side of the last match.
pub const SEARCH_WINDOW: usize = 50;
/// Perpendicular distance (m) beyond which a fix is off-route.
pub const OFF_ROUTE_THRESHOLD_M: f64 = 100.0;

#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub snapped: Coordinate,
    /// Distance along the route (m) to the snapped point.
    pub route_progress_m: f64,
    pub progress_fraction: f64,
    pub distance_to_next_curve_m: Option<f64>,
    pub next_curve: Option<CurveSegment>,
    /// Index of `next_curve` in the analysis segment list.
    pub next_curve_segment: Option<usize>,
    pub distance_from_route_m: f64,
    pub is_off_route: bool,
    /// Index of the interpolated-point pair the fix was snapped onto.
    pub matched_segment_index: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpcomingCurve {
    pub segment_index: usize,
    pub distance_m: f64,
    pub curve: CurveSegment,
}

/// Snaps live fixes onto one analyzed route. One instance per session.
#[derive(Debug)]
pub struct MapMatcher {
    route: Arc<RouteAnalysis>,
    cumulative: Vec<f64>,
    /// Segment indices of the curves, in route order (entry distance ascending).
    curve_segments: Vec<usize>,
    last_index: usize,
}

impl MapMatcher {
    pub fn new(route: Arc<RouteAnalysis>) -> Result<Self> {
        let n = route.interpolated_points.len();
        if n < 2 {
            return Err(CurveError::InsufficientPoints { required: 2, actual: n });
        }
        let cumulative = cumulative_distances(&route.interpolated_points);
        let curve_segments = route
            .segments
            .iter()
            .enumerate()
            .filter(|(_, s)| s.as_curve().is_some())
            .map(|(i, _)| i)
            .collect();
        Ok(Self {
            route,
            cumulative,
            curve_segments,
            last_index: 0,
        })
    }

    pub fn route(&self) -> &Arc<RouteAnalysis> {
        &self.route
    }

    pub fn last_index(&self) -> usize {
        self.last_index
    }

    fn total_length_m(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    fn segment_count(&self) -> usize {
        self.route.interpolated_points.len() - 1
    }

    fn best_in(&self, position: &Coordinate, range: Range<usize>) -> Option<(usize, Projection)> {
        let pts = &self.route.interpolated_points;
        range
            .map(|i| (i, project_onto_segment(position, &pts[i], &pts[i + 1])))
            .min_by_key(|(_, proj)| OrderedFloat(proj.distance_m))
    }

    /// Snap `position` onto the route and report progress and the next curve.
    ///
    /// Searches ±[`SEARCH_WINDOW`] segments around the previous match, then
    /// the whole route if that window leaves the fix off-route.
    pub fn match_to_route(&mut self, position: &Coordinate) -> MatchResult {
        let n_seg = self.segment_count();
        let lo = self.last_index.saturating_sub(SEARCH_WINDOW);
        let hi = (self.last_index + SEARCH_WINDOW + 1).min(n_seg);

        let mut best = self.best_in(position, lo..hi);
        let window_missed = best.as_ref().map_or(true, |(_, p)| p.distance_m > OFF_ROUTE_THRESHOLD_M);
        if window_missed {
            metrics::MAP_MATCH_FULL_SCANS.inc();
            if let Some(full) = self.best_in(position, 0..n_seg) {
                if best.as_ref().map_or(true, |(_, w)| full.1.distance_m < w.distance_m) {
                    best = Some(full);
                }
            }
        }

        // n_seg >= 1, so a projection always exists
        let (index, proj) = best.unwrap_or_else(|| {
            let pts = &self.route.interpolated_points;
            (0, project_onto_segment(position, &pts[0], &pts[1]))
        });
        self.last_index = index;

        let seg_len = self.cumulative[index + 1] - self.cumulative[index];
        let route_progress_m = self.cumulative[index] + proj.fraction * seg_len;
        let total = self.total_length_m();
        let progress_fraction = if total > 0.0 {
            (route_progress_m / total).clamp(0.0, 1.0)
        } else {
            0.0
        };

        let is_off_route = proj.distance_m > OFF_ROUTE_THRESHOLD_M;
        if is_off_route {
            metrics::OFF_ROUTE_FIXES.inc();
            if window_missed {
                warn!(
                    "[MapMatcher] fix {:.0} m from route after full scan (segment {})",
                    proj.distance_m, index
                );
            }
        }

        let next = if is_off_route {
            None
        } else {
            self.next_curve_after(route_progress_m)
        };
        trace!(
            "[MapMatcher] segment {} progress {:.1} m offset {:.1} m",
            index,
            route_progress_m,
            proj.distance_m
        );

        MatchResult {
            snapped: proj.point,
            route_progress_m,
            progress_fraction,
            distance_to_next_curve_m: next.map(|(_, c)| c.distance_from_start_m - route_progress_m),
            next_curve: next.map(|(_, c)| c.clone()),
            next_curve_segment: next.map(|(i, _)| i),
            distance_from_route_m: proj.distance_m,
            is_off_route,
            matched_segment_index: index,
        }
    }

    /// Curves with entry at or after `progress_m`, nearest first.
    fn curves_ahead(&self, progress_m: f64) -> impl Iterator<Item = (usize, &CurveSegment)> + '_ {
        let segments = &self.route.segments;
        let entry_m = |i: usize| segments[i].distance_from_start_m();
        let first = self.curve_segments.partition_point(|&i| entry_m(i) < progress_m);
        self.curve_segments[first..]
            .iter()
            .filter_map(move |&i| segments[i].as_curve().map(|c| (i, c)))
    }

    fn next_curve_after(&self, progress_m: f64) -> Option<(usize, &CurveSegment)> {
        self.curves_ahead(progress_m).next()
    }

    /// Curves whose entry lies within `lookahead_m` ahead of `progress_m`, nearest first.
    pub fn find_upcoming_curves(&self, progress_m: f64, lookahead_m: f64) -> Vec<UpcomingCurve> {
        self.curves_ahead(progress_m)
            .map(|(segment_index, c)| UpcomingCurve {
                segment_index,
                distance_m: c.distance_from_start_m - progress_m,
                curve: c.clone(),
            })
            .take_while(|u| u.distance_m <= lookahead_m)
            .collect()
    }

    /// Forget the last match; the next fix is searched from the route start.
    pub fn reset(&mut self) {
        self.last_index = 0;
    }
}
