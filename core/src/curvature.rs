use crate::geo::{haversine, to_local};
use crate::models::{Coordinate, Direction};
use crate::smoothing::rolling_mean;

/// Radius reported for collinear (or degenerate) triples.
pub const STRAIGHT_RADIUS: f64 = f64::INFINITY;

const MIN_AREA_M2: f64 = 1e-6;
/// Radii past this (m) are rounding noise on a straight line.
const MAX_RADIUS_M: f64 = 1e6;
/// Below this |sin(turn angle)| the triple has no usable direction.
const MIN_TURN_SINE: f64 = 1e-4;

/// Radius (m) of the circle through three points, via Heron's formula.
///
/// Sides are sorted before applying the formula (Kahan's arrangement) so
/// needle-thin triangles keep their precision.
pub fn circumradius(p1: &Coordinate, p2: &Coordinate, p3: &Coordinate) -> f64 {
    let mut sides = [haversine(p1, p2), haversine(p2, p3), haversine(p1, p3)];
    sides.sort_by(|x, y| y.total_cmp(x));
    let [a, b, c] = sides;

    let q = (a + (b + c)) * (c - (a - b)) * (c + (a - b)) * (a + (b - c));
    if !(q > 0.0) {
        return STRAIGHT_RADIUS;
    }
    let area = 0.25 * q.sqrt();
    if area < MIN_AREA_M2 {
        return STRAIGHT_RADIUS;
    }
    let r = a * b * c / (4.0 * area);
    if r > MAX_RADIUS_M {
        STRAIGHT_RADIUS
    } else {
        r
    }
}

/// Turn at `p2` going p1 → p2 → p3, from the sign of the chord cross product
/// in a tangent plane centered at `p2`.
pub fn turn_direction(p1: &Coordinate, p2: &Coordinate, p3: &Coordinate) -> Option<Direction> {
    let (x1, y1) = to_local(p2, p1);
    let (x3, y3) = to_local(p2, p3);
    let (ux, uy) = (-x1, -y1);
    let (vx, vy) = (x3, y3);

    let norm = (ux * ux + uy * uy).sqrt() * (vx * vx + vy * vy).sqrt();
    if norm <= 0.0 {
        return None;
    }
    let sine = (ux * vy - uy * vx) / norm;
    if sine > MIN_TURN_SINE {
        Some(Direction::Left)
    } else if sine < -MIN_TURN_SINE {
        Some(Direction::Right)
    } else {
        None
    }
}

/// Per-point curvature of an interpolated route.
#[derive(Debug, Clone, Default)]
pub struct CurvatureProfile {
    /// Unsmoothed circumradius; endpoints are [`STRAIGHT_RADIUS`].
    pub raw_radius: Vec<f64>,
    pub raw_direction: Vec<Option<Direction>>,
    /// Smoothed radius.
    pub radius: Vec<f64>,
    /// Smoothed direction in [-1, 1]; positive is left.
    pub direction: Vec<f64>,
}

impl CurvatureProfile {
    pub fn len(&self) -> usize {
        self.radius.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radius.is_empty()
    }
}

/// Radius and direction for every point, smoothed over a centered window.
///
/// The rolling average runs on curvature (1/r) so a straight sentinel inside
/// the window contributes zero instead of swamping it; the smoothed radius is
/// the reciprocal of the averaged curvature.
pub fn compute_curvature(points: &[Coordinate], window: usize) -> CurvatureProfile {
    let n = points.len();
    let mut raw_radius = vec![STRAIGHT_RADIUS; n];
    let mut raw_direction = vec![None; n];
    let mut kappa = vec![0.0; n];
    let mut signs = vec![0.0; n];

    for i in 1..n.saturating_sub(1) {
        let (p1, p2, p3) = (&points[i - 1], &points[i], &points[i + 1]);
        let r = circumradius(p1, p2, p3);
        raw_radius[i] = r;
        if r.is_finite() {
            kappa[i] = 1.0 / r;
            raw_direction[i] = turn_direction(p1, p2, p3);
            signs[i] = raw_direction[i].map_or(0.0, Direction::sign);
        }
    }

    let radius = rolling_mean(&kappa, window)
        .into_iter()
        .map(|k| if k > 0.0 { 1.0 / k } else { STRAIGHT_RADIUS })
        .collect();
    let direction = rolling_mean(&signs, window);

    CurvatureProfile {
        raw_radius,
        raw_direction,
        radius,
        direction,
    }
}
