use crate::curvature::CurvatureProfile;
use crate::geo::{bearing, bearing_delta, haversine};
use crate::models::{
    Coordinate, CurveModifier, CurveSegment, Direction, RouteMetadata, Severity, Span,
};
use crate::segmenter::{Run, RunKind};
use crate::types::AnalysisConfig;

pub const LONG_ARC_M: f64 = 200.0;
/// Exit/entry radius ratio at or below which a curve counts as tightening.
const TIGHTENING_RATIO: f64 = 0.6;
/// Max/min radius ratio over the curve body for "holds".
const HOLDS_BAND_RATIO: f64 = 1.25;
/// Body radii are capped at this multiple of the tightest one.
const TRANSITION_CAP: f64 = 4.0;
const NINETY_MIN_DEG: f64 = 85.0;
const NINETY_MAX_DEG: f64 = 95.0;
const NINETY_MAX_ARC_M: f64 = 50.0;
const INTERSECTION_RADIUS_M: f64 = 30.0;

/// Turns curve runs into classified [`CurveSegment`]s.
pub struct Classifier<'a> {
    pub points: &'a [Coordinate],
    pub cumulative: &'a [f64],
    pub profile: &'a CurvatureProfile,
    pub config: &'a AnalysisConfig,
    pub metadata: Option<&'a RouteMetadata>,
}

impl<'a> Classifier<'a> {
    /// Classify one curve run. Speed, lean, compound and confidence fields are
    /// left at their neutral values for the later stages.
    pub fn classify(&self, run: &Run) -> CurveSegment {
        let min_radius_m = own_indices(run)
            .map(|i| self.profile.radius[i])
            .fold(f64::INFINITY, f64::min);
        let severity = Severity::from_radius(min_radius_m, &self.config.severity_thresholds);
        let arc_length_m = run.length_m(self.cumulative);

        let direction = self.dominant_direction(run);
        let total_angle_change_deg = self.angle_change(run);

        let modifiers = modifiers(&self.core_radii(run), arc_length_m);

        let is_90_degree = (NINETY_MIN_DEG..=NINETY_MAX_DEG).contains(&total_angle_change_deg.abs())
            && self.core_arc_m(run) < NINETY_MAX_ARC_M;

        let start = self.points[run.start];
        let end = self.points[run.end];
        let distance_from_start_m = self.cumulative[run.start];

        let mut curve = CurveSegment {
            direction,
            severity,
            min_radius_m,
            arc_length_m,
            modifiers,
            total_angle_change_deg,
            is_90_degree,
            advisory_speed_ms: None,
            lean_angle_deg: None,
            compound_type: None,
            compound_size: None,
            compound_position: None,
            confidence: 1.0,
            start_index: run.start,
            end_index: run.end,
            start,
            end,
            distance_from_start_m,
            road_class: None,
            surface: None,
            speed_limit_kmh: None,
            near_intersection: false,
        };

        if let Some(meta) = self.metadata {
            enrich(&mut curve, meta);
        }
        curve
    }

    fn dominant_direction(&self, run: &Run) -> Direction {
        let sum: f64 = own_indices(run).map(|i| self.profile.direction[i]).sum();
        if sum > 0.0 {
            Direction::Left
        } else if sum < 0.0 {
            Direction::Right
        } else {
            match run.kind {
                RunKind::Curve(d) => d,
                RunKind::Straight => Direction::Left,
            }
        }
    }

    /// Bearing change accumulated chord by chord, so turns past 180° keep their size.
    fn angle_change(&self, run: &Run) -> f64 {
        if run.end < run.start + 2 {
            return 0.0;
        }
        let pts = &self.points[run.start..=run.end];
        pts.windows(3)
            .map(|w| bearing_delta(bearing(&w[0], &w[1]), bearing(&w[1], &w[2])))
            .sum()
    }

    /// Unsmoothed radii of the curve body, capped at a multiple of their
    /// minimum so the entry/exit transition points do not dominate.
    fn core_radii(&self, run: &Run) -> Vec<f64> {
        let threshold = self.config.curvature_threshold_radius_m;
        let core: Vec<f64> = own_indices(run)
            .map(|i| self.profile.raw_radius[i])
            .filter(|r| *r < threshold)
            .collect();
        let cap = (core.iter().copied().fold(f64::INFINITY, f64::min) * TRANSITION_CAP).min(threshold);
        core.into_iter().map(|r| r.min(cap)).collect()
    }

    /// Length covered by points whose unsmoothed radius is under the threshold.
    fn core_arc_m(&self, run: &Run) -> f64 {
        let threshold = self.config.curvature_threshold_radius_m;
        let mut core = own_indices(run).filter(|i| self.profile.raw_radius[*i] < threshold);
        match core.next() {
            Some(first) => {
                let last = core.last().unwrap_or(first);
                self.cumulative[last] - self.cumulative[first]
            }
            None => 0.0,
        }
    }
}

/// Points that belong to the run itself; the shared end index belongs to the
/// next run unless the run is a single step.
fn own_indices(run: &Run) -> std::ops::Range<usize> {
    if run.end > run.start {
        run.start..run.end
    } else {
        run.start..run.start + 1
    }
}

fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn modifiers(radii: &[f64], arc_length_m: f64) -> Vec<CurveModifier> {
    let mut out = Vec::new();
    let n = radii.len();

    if n >= 4 {
        let half = n / 2;
        let entry = mean(&radii[..half]);
        let exit = mean(&radii[n - half..]);
        if entry > 0.0 {
            let ratio = exit / entry;
            if ratio <= TIGHTENING_RATIO {
                out.push(CurveModifier::Tightening);
            } else if ratio >= 1.0 / TIGHTENING_RATIO {
                out.push(CurveModifier::Opening);
            }
        }
    }

    if arc_length_m > LONG_ARC_M {
        // middle 60% of the radii, away from the entry/exit transitions
        let lo = n / 5;
        let hi = (n - lo).max(lo + 1).min(n);
        let body = &radii[lo..hi];
        let max = body.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = body.iter().copied().fold(f64::INFINITY, f64::min);
        if !body.is_empty() && min > 0.0 && max <= min * HOLDS_BAND_RATIO {
            out.push(CurveModifier::Holds);
        }
        out.push(CurveModifier::Long);
    }
    out
}

/// Span covering `distance_m`, if any.
///
/// Linear scan over distance-sorted, non-overlapping spans that stops at the
/// first span starting beyond the query. Spans are few per route.
pub fn span_at<T>(spans: &[Span<T>], distance_m: f64) -> Option<&Span<T>> {
    for span in spans {
        if span.start_m > distance_m {
            break;
        }
        if distance_m < span.end_m {
            return Some(span);
        }
    }
    None
}

fn enrich(curve: &mut CurveSegment, meta: &RouteMetadata) {
    let d = curve.distance_from_start_m;
    curve.road_class = span_at(&meta.road_class, d).map(|s| s.value);
    curve.surface = span_at(&meta.surface, d).map(|s| s.value);
    curve.speed_limit_kmh = span_at(&meta.speed_limit_kmh, d).map(|s| s.value);
    curve.near_intersection = meta.intersections.iter().any(|ix| {
        haversine(ix, &curve.start) <= INTERSECTION_RADIUS_M
            || haversine(ix, &curve.end) <= INTERSECTION_RADIUS_M
    });
}
