use curvecall_core::{AnalysisConfig, CurveError, DrivingMode, TimingProfile, TimingProfileConfig};

#[test]
fn partial_json_keeps_defaults() {
    let cfg = AnalysisConfig::from_json(r#"{"interpolation_spacing_m": 5.0, "motorcycle_mode": true}"#).unwrap();
    assert_eq!(cfg.interpolation_spacing_m, 5.0);
    assert!(cfg.motorcycle_mode);
    assert_eq!(cfg.smoothing_window, 7);
    assert_eq!(cfg.curvature_threshold_radius_m, 500.0);
    assert_eq!(cfg.severity_thresholds.hairpin_m, 25.0);
    assert_eq!(cfg.lateral_g(), 0.25);
    assert_eq!(cfg.driving_mode(), DrivingMode::Motorcycle);
}

#[test]
fn thresholds_must_descend() {
    let err = AnalysisConfig::from_json(r#"{"severity_thresholds": {"firm_m": 30.0}}"#).unwrap_err();
    assert!(matches!(err, CurveError::InvalidConfig(_)));
}

#[test]
fn wrong_type_reports_path() {
    let err = AnalysisConfig::from_json(r#"{"severity_thresholds": {"sharp_m": "tight"}}"#).unwrap_err();
    match err {
        CurveError::Parse { path, .. } => assert_eq!(path, "severity_thresholds.sharp_m"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn lateral_g_bounds() {
    let err = AnalysisConfig::from_json(r#"{"lateral_g_car": 2.0}"#).unwrap_err();
    assert!(matches!(err, CurveError::InvalidConfig(_)));
}

#[test]
fn timing_presets() {
    let relaxed: TimingProfileConfig = TimingProfile::Relaxed.into();
    assert_eq!((relaxed.reaction_time_s, relaxed.min_gap_s, relaxed.urgency_threshold), (2.5, 5.0, 0.8));
    let normal = TimingProfileConfig::default();
    assert_eq!((normal.reaction_time_s, normal.min_gap_s, normal.urgency_threshold), (1.5, 3.0, 0.6));
    let sporty = TimingProfile::Sporty.config();
    assert_eq!((sporty.reaction_time_s, sporty.min_gap_s, sporty.urgency_threshold), (1.0, 2.0, 0.4));

    let p: TimingProfile = serde_json::from_str("\"sporty\"").unwrap();
    assert_eq!(p, TimingProfile::Sporty);
}

#[test]
fn deceleration_per_mode() {
    assert_eq!(DrivingMode::Car.deceleration_ms2(), 4.0);
    assert_eq!(DrivingMode::Motorcycle.deceleration_ms2(), 3.5);
    assert_eq!(DrivingMode::default(), DrivingMode::Car);
}
