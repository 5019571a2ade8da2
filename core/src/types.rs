use serde::{Deserialize, Serialize};

use crate::error::{from_json_str, CurveError, Result};

/// Radius limits (meters) below which a curve reaches each severity.
/// Must be strictly descending: moderate > firm > sharp > hairpin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityThresholds {
    pub moderate_m: f64,
    pub firm_m: f64,
    pub sharp_m: f64,
    pub hairpin_m: f64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            moderate_m: 200.0,
            firm_m: 100.0,
            sharp_m: 50.0,
            hairpin_m: 25.0,
        }
    }
}

impl SeverityThresholds {
    fn validate(&self) -> Result<()> {
        let radii = [self.moderate_m, self.firm_m, self.sharp_m, self.hairpin_m];
        if radii.iter().any(|r| !r.is_finite() || *r <= 0.0) {
            return Err(CurveError::InvalidConfig(
                "severity thresholds must be positive and finite".into(),
            ));
        }
        if radii.windows(2).any(|w| w[0] <= w[1]) {
            return Err(CurveError::InvalidConfig(format!(
                "severity thresholds must be strictly descending, got {:?}",
                radii
            )));
        }
        Ok(())
    }
}

/// Tuning for the geometry pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Uniform resampling distance (m).
    pub interpolation_spacing_m: f64,
    /// Centered rolling window (points) for curvature smoothing.
    pub smoothing_window: usize,
    /// Smoothed radius (m) below which a point belongs to a curve.
    pub curvature_threshold_radius_m: f64,
    /// Same-direction curves separated by a shorter straight (m) are merged.
    pub straight_gap_merge_m: f64,
    pub severity_thresholds: SeverityThresholds,
    pub lateral_g_car: f64,
    pub lateral_g_motorcycle: f64,
    pub motorcycle_mode: bool,
    /// Gap (m) between original points that marks a sparse region.
    pub sparse_node_threshold_m: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            interpolation_spacing_m: 10.0,
            smoothing_window: 7,
            curvature_threshold_radius_m: 500.0,
            straight_gap_merge_m: 50.0,
            severity_thresholds: SeverityThresholds::default(),
            lateral_g_car: 0.35,
            lateral_g_motorcycle: 0.25,
            motorcycle_mode: false,
            sparse_node_threshold_m: 100.0,
        }
    }
}

impl AnalysisConfig {
    pub fn motorcycle() -> Self {
        Self {
            motorcycle_mode: true,
            ..Self::default()
        }
    }

    /// Lateral-G limit for the configured vehicle.
    pub fn lateral_g(&self) -> f64 {
        if self.motorcycle_mode {
            self.lateral_g_motorcycle
        } else {
            self.lateral_g_car
        }
    }

    pub fn driving_mode(&self) -> DrivingMode {
        if self.motorcycle_mode {
            DrivingMode::Motorcycle
        } else {
            DrivingMode::Car
        }
    }

    /// Parse a (possibly partial) JSON document; missing fields keep their defaults.
    pub fn from_json(json_in: &str) -> Result<Self> {
        let cfg: AnalysisConfig = from_json_str(json_in)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.interpolation_spacing_m.is_finite() && self.interpolation_spacing_m > 0.0) {
            return Err(CurveError::InvalidConfig(format!(
                "interpolation_spacing_m must be > 0, got {}",
                self.interpolation_spacing_m
            )));
        }
        if self.smoothing_window == 0 {
            return Err(CurveError::InvalidConfig("smoothing_window must be >= 1".into()));
        }
        if !(self.curvature_threshold_radius_m.is_finite() && self.curvature_threshold_radius_m > 0.0) {
            return Err(CurveError::InvalidConfig(format!(
                "curvature_threshold_radius_m must be > 0, got {}",
                self.curvature_threshold_radius_m
            )));
        }
        if !(self.straight_gap_merge_m.is_finite() && self.straight_gap_merge_m >= 0.0) {
            return Err(CurveError::InvalidConfig(format!(
                "straight_gap_merge_m must be >= 0, got {}",
                self.straight_gap_merge_m
            )));
        }
        self.severity_thresholds.validate()?;
        for (name, g) in [
            ("lateral_g_car", self.lateral_g_car),
            ("lateral_g_motorcycle", self.lateral_g_motorcycle),
        ] {
            if !(g.is_finite() && g > 0.0 && g <= 1.5) {
                return Err(CurveError::InvalidConfig(format!(
                    "{name} must be in (0, 1.5], got {g}"
                )));
            }
        }
        if !(self.sparse_node_threshold_m.is_finite() && self.sparse_node_threshold_m > 0.0) {
            return Err(CurveError::InvalidConfig(format!(
                "sparse_node_threshold_m must be > 0, got {}",
                self.sparse_node_threshold_m
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DrivingMode {
    #[default]
    Car,
    Motorcycle,
}

impl DrivingMode {
    /// Assumed comfortable deceleration (m/s²) when braking for a curve.
    pub fn deceleration_ms2(self) -> f64 {
        match self {
            DrivingMode::Car => 4.0,
            DrivingMode::Motorcycle => 3.5,
        }
    }
}

/// Driver timing preferences consumed by the timing engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingProfileConfig {
    pub reaction_time_s: f64,
    /// Minimum silence (s) between the end of one narration and the next.
    pub min_gap_s: f64,
    /// distance / braking distance below which a warning escalates to urgent.
    pub urgency_threshold: f64,
}

impl Default for TimingProfileConfig {
    fn default() -> Self {
        TimingProfile::Normal.config()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimingProfile {
    Relaxed,
    #[default]
    Normal,
    Sporty,
}

impl TimingProfile {
    pub fn config(self) -> TimingProfileConfig {
        match self {
            TimingProfile::Relaxed => TimingProfileConfig {
                reaction_time_s: 2.5,
                min_gap_s: 5.0,
                urgency_threshold: 0.8,
            },
            TimingProfile::Normal => TimingProfileConfig {
                reaction_time_s: 1.5,
                min_gap_s: 3.0,
                urgency_threshold: 0.6,
            },
            TimingProfile::Sporty => TimingProfileConfig {
                reaction_time_s: 1.0,
                min_gap_s: 2.0,
                urgency_threshold: 0.4,
            },
        }
    }
}

impl From<TimingProfile> for TimingProfileConfig {
    fn from(p: TimingProfile) -> Self {
        p.config()
    }
}
