mod common;

use curvecall_core::compound::{apply_compounds, detect_compounds};
use curvecall_core::models::{
    CompoundType, Coordinate, CurveSegment, Direction, RouteSegment, Severity, StraightSegment,
};
use curvecall_core::{analyze_route, AnalysisConfig};

fn curve(direction: Direction, severity: Severity, radius: f64) -> RouteSegment {
    let here = Coordinate::new(45.0, 7.0).unwrap();
    RouteSegment::Curve(CurveSegment {
        direction,
        severity,
        min_radius_m: radius,
        arc_length_m: 60.0,
        modifiers: Vec::new(),
        total_angle_change_deg: 0.0,
        is_90_degree: false,
        advisory_speed_ms: None,
        lean_angle_deg: None,
        compound_type: None,
        compound_size: None,
        compound_position: None,
        confidence: 1.0,
        start_index: 0,
        end_index: 0,
        start: here,
        end: here,
        distance_from_start_m: 0.0,
        road_class: None,
        surface: None,
        speed_limit_kmh: None,
        near_intersection: false,
    })
}

fn straight(length_m: f64) -> RouteSegment {
    RouteSegment::Straight(StraightSegment {
        length_m,
        start_index: 0,
        end_index: 0,
        distance_from_start_m: 0.0,
    })
}

use Direction::{Left as L, Right as R};

fn kinds(segments: &[RouteSegment]) -> Vec<Option<CompoundType>> {
    segments
        .iter()
        .filter_map(|s| s.as_curve())
        .map(|c| c.compound_type)
        .collect()
}

fn run(mut segments: Vec<RouteSegment>) -> Vec<RouteSegment> {
    let groups = detect_compounds(&segments);
    apply_compounds(&mut segments, &groups);
    segments
}

#[test]
fn opposite_pair_with_short_gap_is_s_bend() {
    let segs = run(vec![
        straight(200.0),
        curve(L, Severity::Firm, 80.0),
        straight(30.0),
        curve(R, Severity::Firm, 80.0),
        straight(200.0),
    ]);
    assert_eq!(kinds(&segs), vec![Some(CompoundType::SBend); 2]);
    let second = segs[3].as_curve().unwrap();
    assert_eq!(second.compound_size, Some(2));
    assert_eq!(second.compound_position, Some(1));
}

#[test]
fn sharp_opposite_pair_is_chicane() {
    let segs = run(vec![curve(L, Severity::Sharp, 40.0), curve(R, Severity::Hairpin, 20.0)]);
    assert_eq!(kinds(&segs), vec![Some(CompoundType::Chicane); 2]);
}

#[test]
fn wide_gap_breaks_the_pair() {
    let segs = run(vec![
        curve(L, Severity::Firm, 80.0),
        straight(50.0),
        curve(R, Severity::Firm, 80.0),
    ]);
    assert_eq!(kinds(&segs), vec![None, None]);
}

#[test]
fn three_linked_curves_are_a_series() {
    let segs = run(vec![
        curve(L, Severity::Firm, 80.0),
        straight(20.0),
        curve(R, Severity::Moderate, 120.0),
        straight(20.0),
        curve(L, Severity::Firm, 70.0),
    ]);
    assert_eq!(kinds(&segs), vec![Some(CompoundType::Series); 3]);
}

#[test]
fn alternating_sharp_curves_are_switchbacks() {
    let segs = run(vec![
        curve(L, Severity::Hairpin, 20.0),
        straight(150.0),
        curve(R, Severity::Sharp, 30.0),
        straight(150.0),
        curve(L, Severity::Hairpin, 20.0),
        straight(40.0),
        curve(R, Severity::Firm, 90.0),
    ]);
    // the trailing firm curve cannot join switchbacks and has no partner left
    assert_eq!(
        kinds(&segs),
        vec![
            Some(CompoundType::Switchbacks),
            Some(CompoundType::Switchbacks),
            Some(CompoundType::Switchbacks),
            None
        ]
    );
}

#[test]
fn same_direction_decreasing_radii_tighten() {
    let segs = run(vec![
        curve(R, Severity::Moderate, 150.0),
        straight(120.0),
        curve(R, Severity::Firm, 90.0),
        straight(120.0),
        curve(R, Severity::Firm, 60.0),
        straight(120.0),
        curve(R, Severity::Firm, 70.0),
    ]);
    assert_eq!(
        kinds(&segs),
        vec![
            Some(CompoundType::TighteningSequence),
            Some(CompoundType::TighteningSequence),
            Some(CompoundType::TighteningSequence),
            None
        ]
    );
}

#[test]
fn lone_curve_is_untouched() {
    let segs = run(vec![straight(100.0), curve(L, Severity::Sharp, 40.0), straight(100.0)]);
    assert_eq!(kinds(&segs), vec![None]);
    assert!(detect_compounds(&segs).is_empty());
}

fn analyzed_kinds(points: &[Coordinate]) -> Vec<Option<CompoundType>> {
    let analysis = analyze_route(points, &AnalysisConfig::default(), None).unwrap();
    analysis.curves().map(|c| c.compound_type).collect()
}

#[test]
fn generated_routes_detect_patterns() {
    assert_eq!(analyzed_kinds(&common::s_bend(30.0)), vec![Some(CompoundType::SBend); 2]);
    assert_eq!(analyzed_kinds(&common::s_bend(150.0)), vec![None, None]);
    assert_eq!(analyzed_kinds(&common::chicane()), vec![Some(CompoundType::Chicane); 2]);
    assert_eq!(analyzed_kinds(&common::switchbacks()), vec![Some(CompoundType::Switchbacks); 3]);
    assert_eq!(
        analyzed_kinds(&common::tightening_sequence()),
        vec![Some(CompoundType::TighteningSequence); 3]
    );
    assert_eq!(analyzed_kinds(&common::series()), vec![Some(CompoundType::Series); 4]);
}
