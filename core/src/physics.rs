// core/src/physics.rs
use crate::models::{CurveSegment, Severity};
use crate::types::AnalysisConfig;

pub const G: f64 = 9.80665; // standard gravity (m/s²)
const MAX_ADVISORY_RADIUS_M: f64 = 1_000.0;

#[inline]
pub fn ms_to_kmh(v_ms: f64) -> f64 {
    v_ms * 3.6
}

#[inline]
fn finite_nonneg(x: f64) -> Option<f64> {
    if x.is_finite() && x >= 0.0 { Some(x) } else { None }
}

/// Advisory entry speed v = √(μ·g·r) (m/s).
///
/// Gentle curves, very large radii and non-physical inputs get no advisory.
pub fn advisory_speed_ms(min_radius_m: f64, severity: Severity, lateral_g: f64) -> Option<f64> {
    if severity == Severity::Gentle {
        return None;
    }
    if !(min_radius_m.is_finite() && min_radius_m > 0.0 && min_radius_m < MAX_ADVISORY_RADIUS_M) {
        return None;
    }
    if !(lateral_g.is_finite() && lateral_g > 0.0) {
        return None;
    }
    finite_nonneg((lateral_g * G * min_radius_m).sqrt())
}

/// Lean angle (degrees) from tan θ = v²/(g·r).
pub fn lean_angle_deg(speed_ms: f64, radius_m: f64) -> Option<f64> {
    if !(speed_ms.is_finite() && speed_ms > 0.0 && radius_m.is_finite() && radius_m > 0.0) {
        return None;
    }
    finite_nonneg((speed_ms * speed_ms / (G * radius_m)).atan().to_degrees())
}

/// Distance (m) to slow from `v_ms` to `v_target_ms` at `decel_ms2`.
/// Zero when no braking is needed.
pub fn braking_distance_m(v_ms: f64, v_target_ms: f64, decel_ms2: f64) -> f64 {
    if !(decel_ms2 > 0.0) || v_ms <= v_target_ms {
        return 0.0;
    }
    let d = (v_ms * v_ms - v_target_ms * v_target_ms) / (2.0 * decel_ms2);
    finite_nonneg(d).unwrap_or(0.0)
}

/// Fill advisory speed and (motorcycle mode only) lean angle on a classified curve.
pub fn advise(curve: &mut CurveSegment, config: &AnalysisConfig) {
    curve.advisory_speed_ms =
        advisory_speed_ms(curve.min_radius_m, curve.severity, config.lateral_g());
    curve.lean_angle_deg = match (config.motorcycle_mode, curve.advisory_speed_ms) {
        (true, Some(v)) => lean_angle_deg(v, curve.min_radius_m),
        _ => None,
    };
}
