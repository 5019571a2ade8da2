use crate::geo::{haversine, interpolate};
use crate::models::Coordinate;

/// Resample a polyline to points `spacing_m` apart, measured along the path.
///
/// The first input point is always kept; the last is appended unless the
/// final sample already sits on it. Zero-length legs are skipped.
pub fn resample(points: &[Coordinate], spacing_m: f64) -> Vec<Coordinate> {
    if points.is_empty() || !(spacing_m > 0.0) {
        return points.to_vec();
    }

    let mut out = vec![points[0]];
    let mut next_at = spacing_m;
    let mut walked = 0.0;

    for leg in points.windows(2) {
        let (a, b) = (&leg[0], &leg[1]);
        let d = haversine(a, b);
        if d <= 0.0 {
            continue;
        }
        while next_at <= walked + d {
            out.push(interpolate(a, b, (next_at - walked) / d));
            next_at += spacing_m;
        }
        walked += d;
    }

    if let (Some(last_out), Some(last_in)) = (out.last(), points.last()) {
        if haversine(last_out, last_in) > spacing_m * 0.01 {
            out.push(*last_in);
        }
    }
    out
}
