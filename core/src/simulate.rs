// core/src/simulate.rs
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::interpolation::resample;
use crate::models::Coordinate;

/// One GPS fix of a simulated drive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedFix {
    pub position: Coordinate,
    pub timestamp: DateTime<Utc>,
    pub speed_ms: f64,
}

/// Replay `points` at a constant speed, one fix per second.
///
/// The route is resampled to `speed_ms` meter spacing so consecutive fixes
/// are one second apart; timestamps are whole seconds from `start`.
pub fn simulate_drive(points: &[Coordinate], speed_ms: f64, start: DateTime<Utc>) -> Vec<TimedFix> {
    if points.is_empty() || !(speed_ms.is_finite() && speed_ms > 0.0) {
        return Vec::new();
    }
    resample(points, speed_ms)
        .into_iter()
        .enumerate()
        .map(|(i, position)| TimedFix {
            position,
            timestamp: start + Duration::seconds(i as i64),
            speed_ms,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fixes_are_one_second_apart() {
        let a = Coordinate::new(45.0, 7.0).unwrap();
        let b = Coordinate::new(45.01, 7.0).unwrap();
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let fixes = simulate_drive(&[a, b], 20.0, start);
        assert!(fixes.len() > 50);
        for w in fixes.windows(2) {
            assert_eq!((w[1].timestamp - w[0].timestamp).num_seconds(), 1);
        }
        assert!(simulate_drive(&[a, b], 0.0, start).is_empty());
    }
}
