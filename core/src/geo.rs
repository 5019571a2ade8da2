// core/src/geo.rs
use crate::models::Coordinate;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters.
pub fn haversine(a: &Coordinate, b: &Coordinate) -> f64 {
    let (lat1, lat2) = (a.lat().to_radians(), b.lat().to_radians());
    let dlat = lat2 - lat1;
    let dlon = (b.lon() - a.lon()).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).max(0.0).sqrt())
}

/// Initial bearing from `a` to `b` in degrees [0, 360).
pub fn bearing(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let dlon = (b.lon() - a.lon()).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Signed change from one bearing to another, folded to [-180, 180].
/// Positive is clockwise (a right turn).
pub fn bearing_delta(from_deg: f64, to_deg: f64) -> f64 {
    let mut delta = (to_deg - from_deg) % 360.0;
    if delta > 180.0 {
        delta -= 360.0;
    }
    if delta < -180.0 {
        delta += 360.0;
    }
    delta
}

/// Point at fraction `f` (0..=1) along the great circle from `a` to `b`.
pub fn interpolate(a: &Coordinate, b: &Coordinate, f: f64) -> Coordinate {
    // endpoints exactly, without trig rounding
    if f <= 0.0 || f.is_nan() {
        return *a;
    }
    if f >= 1.0 {
        return *b;
    }
    let d = haversine(a, b) / EARTH_RADIUS_M;
    if d < 1e-12 {
        return *a;
    }

    let (lat1, lon1) = (a.lat().to_radians(), a.lon().to_radians());
    let (lat2, lon2) = (b.lat().to_radians(), b.lon().to_radians());
    let wa = ((1.0 - f) * d).sin() / d.sin();
    let wb = (f * d).sin() / d.sin();

    let x = wa * lat1.cos() * lon1.cos() + wb * lat2.cos() * lon2.cos();
    let y = wa * lat1.cos() * lon1.sin() + wb * lat2.cos() * lon2.sin();
    let z = wa * lat1.sin() + wb * lat2.sin();

    let lat = z.atan2((x * x + y * y).sqrt()).to_degrees();
    let lon = y.atan2(x).to_degrees();
    Coordinate::new_unchecked(lat.clamp(-90.0, 90.0), lon.clamp(-180.0, 180.0))
}

/// East/north offset (m) of `p` in a tangent plane centered at `origin`.
pub fn to_local(origin: &Coordinate, p: &Coordinate) -> (f64, f64) {
    let mut dlon = p.lon() - origin.lon();
    if dlon > 180.0 {
        dlon -= 360.0;
    } else if dlon < -180.0 {
        dlon += 360.0;
    }
    let x = dlon.to_radians() * EARTH_RADIUS_M * origin.lat().to_radians().cos();
    let y = (p.lat() - origin.lat()).to_radians() * EARTH_RADIUS_M;
    (x, y)
}

/// Result of projecting a point onto a segment.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub point: Coordinate,
    /// Position along the segment, clamped to 0..=1.
    pub fraction: f64,
    pub distance_m: f64,
}

/// Closest point on segment `a`–`b` to `p`.
pub fn project_onto_segment(p: &Coordinate, a: &Coordinate, b: &Coordinate) -> Projection {
    let (bx, by) = to_local(a, b);
    let (px, py) = to_local(a, p);
    let len_sq = bx * bx + by * by;

    let fraction = if len_sq <= 1e-12 {
        0.0
    } else {
        ((px * bx + py * by) / len_sq).clamp(0.0, 1.0)
    };
    let point = interpolate(a, b, fraction);

    Projection {
        point,
        fraction,
        distance_m: haversine(p, &point),
    }
}

/// Running distance (m) from the first point; same length as `points`.
pub fn cumulative_distances(points: &[Coordinate]) -> Vec<f64> {
    let mut out = Vec::with_capacity(points.len());
    let mut acc = 0.0;
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            acc += haversine(&points[i - 1], p);
        }
        out.push(acc);
    }
    out
}

pub fn route_length(points: &[Coordinate]) -> f64 {
    points.windows(2).map(|w| haversine(&w[0], &w[1])).sum()
}

/// Drop points closer than `min_spacing_m` to the last kept point.
/// First and last points are always kept.
pub fn simplify(points: &[Coordinate], min_spacing_m: f64) -> Vec<Coordinate> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity(points.len());
    out.push(points[0]);
    for p in &points[1..points.len() - 1] {
        if let Some(last) = out.last() {
            if haversine(last, p) >= min_spacing_m {
                out.push(*p);
            }
        }
    }
    out.push(points[points.len() - 1]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn bearing_delta_folds() {
        assert!((bearing_delta(350.0, 10.0) - 20.0).abs() < 1e-9);
        assert!((bearing_delta(10.0, 350.0) + 20.0).abs() < 1e-9);
        assert!((bearing_delta(0.0, 180.0).abs() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn to_local_north_and_east() {
        let o = c(45.0, 7.0);
        let (x, y) = to_local(&o, &c(45.001, 7.0));
        assert!(x.abs() < 1e-6);
        assert!((y - 111.19).abs() < 0.1);
        let (x, _) = to_local(&o, &c(45.0, 7.001));
        assert!((x - 78.63).abs() < 0.1);
    }

    #[test]
    fn projection_clamps_to_ends() {
        let a = c(45.0, 7.0);
        let b = c(45.001, 7.0);
        let before = c(44.999, 7.0);
        let proj = project_onto_segment(&before, &a, &b);
        assert_eq!(proj.fraction, 0.0);
        assert!((proj.distance_m - 111.19).abs() < 0.5);
    }
}
