mod common;

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use curvecall_core::simulate::simulate_drive;
use curvecall_core::timing::estimate_speech_duration;
use curvecall_core::{
    analyze_route, AnalysisConfig, Announcement, Coordinate, DrivingMode, RouteSession, TimingProfile,
    TriggerDecision,
};

fn session_for(points: &[Coordinate]) -> RouteSession {
    let analysis = analyze_route(points, &AnalysisConfig::default(), None).unwrap();
    RouteSession::new(Arc::new(analysis), TimingProfile::Normal, DrivingMode::Car).unwrap()
}

/// Drive the route at a constant speed and collect everything announced.
fn drive(session: &mut RouteSession, points: &[Coordinate], speed_ms: f64) -> Vec<Announcement> {
    let start = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
    let mut spoken = Vec::new();
    for fix in simulate_drive(points, speed_ms, start) {
        let outcome = session.on_fix(&fix.position, fix.speed_ms, fix.timestamp);
        for a in outcome.announcements {
            let ms = (estimate_speech_duration(&a.text) * 1000.0) as i64;
            session.narration_finished(fix.timestamp + Duration::milliseconds(ms));
            spoken.push(a);
        }
    }
    spoken
}

#[test]
fn single_hairpin_is_announced_once_in_time() {
    let pts = common::hairpin();
    let mut s = session_for(&pts);
    let spoken = drive(&mut s, &pts, 20.0);

    assert_eq!(spoken.len(), 1);
    let a = &spoken[0];
    assert_eq!(a.decision, TriggerDecision::Fire);
    assert_eq!(a.unit_size, 1);
    assert!(a.text.starts_with("hairpin left"), "text {}", a.text);
    // lead ≈ 115 m at 20 m/s, fixes 20 m apart
    assert!(a.distance_m > 95.0 && a.distance_m <= 116.0, "distance {}", a.distance_m);
}

#[test]
fn switchbacks_are_one_unit() {
    let pts = common::switchbacks();
    let mut s = session_for(&pts);
    let spoken = drive(&mut s, &pts, 20.0);

    assert_eq!(spoken.len(), 1);
    assert_eq!(spoken[0].unit_size, 3);
    assert!(spoken[0].text.starts_with("switchbacks"), "text {}", spoken[0].text);
}

#[test]
fn every_unit_of_the_pass_is_announced_once() {
    let path = format!("{}/tests/data/mountain_pass.csv", env!("CARGO_MANIFEST_DIR"));
    let pts: Vec<Coordinate> = csv::Reader::from_path(&path)
        .unwrap()
        .deserialize()
        .map(|r| r.unwrap())
        .collect();
    let mut s = session_for(&pts);
    let spoken = drive(&mut s, &pts, 20.0);

    let units: Vec<usize> = spoken.iter().map(|a| a.unit_size).collect();
    assert_eq!(units, vec![1, 3, 2]);
    assert!(spoken.iter().all(|a| a.decision == TriggerDecision::Fire));
}

#[test]
fn restart_allows_a_second_run() {
    let pts = common::hairpin();
    let mut s = session_for(&pts);
    assert_eq!(drive(&mut s, &pts, 20.0).len(), 1);
    // already announced: nothing new on a second pass
    assert!(drive(&mut s, &pts, 20.0).is_empty());

    s.restart();
    assert!(s.engine().last_narration_end().is_none());
    assert_eq!(drive(&mut s, &pts, 20.0).len(), 1);
}

#[test]
fn off_route_fix_announces_nothing() {
    let pts = common::hairpin();
    let mut s = session_for(&pts);
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
    let outcome = s.on_fix(&common::to_coordinate(500.0, 200.0), 20.0, now);
    assert!(outcome.matched.is_off_route);
    assert!(outcome.announcements.is_empty());
}

#[test]
fn late_arrival_escalates_to_urgent() {
    let pts = common::hairpin();
    let mut s = session_for(&pts);
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
    let curve_start = s.matcher().route().curves().next().unwrap().distance_from_start_m;
    // first fix lands 10 m before the hairpin at highway speed
    let fix = common::to_coordinate(0.0, curve_start - 10.0);
    let outcome = s.on_fix(&fix, 27.8, now);
    assert_eq!(outcome.announcements.len(), 1);
    assert_eq!(outcome.announcements[0].decision, TriggerDecision::Urgent);
    assert!(outcome.announcements[0].text.starts_with("caution"));
}

#[test]
fn joining_inside_a_group_announces_the_rest_of_it() {
    let pts = common::switchbacks();
    let mut s = session_for(&pts);
    let route = s.matcher().route().clone();
    let first = route.curves().next().unwrap().clone();

    // pick up the drive two points into the first hairpin
    let joined = &route.interpolated_points[first.start_index + 2..];
    let spoken = drive(&mut s, joined, 20.0);

    assert_eq!(spoken.len(), 1);
    assert_eq!(spoken[0].unit_size, 2);
    assert_eq!(spoken[0].curve.compound_position, Some(1));
    assert!(spoken[0].text.starts_with("switchbacks"), "text {}", spoken[0].text);

    // the whole group counts as announced from then on
    assert!(drive(&mut s, joined, 20.0).is_empty());
}

#[test]
fn short_lookahead_holds_back_distant_curves() {
    let pts = common::hairpin();
    let analysis = analyze_route(&pts, &AnalysisConfig::default(), None).unwrap();
    let mut s = RouteSession::new(Arc::new(analysis), TimingProfile::Normal, DrivingMode::Car)
        .unwrap()
        .with_lookahead(50.0);
    let spoken = drive(&mut s, &pts, 20.0);

    // the ~115 m trigger point is outside the window, so it fires late
    assert_eq!(spoken.len(), 1);
    assert!(spoken[0].distance_m <= 50.0, "distance {}", spoken[0].distance_m);
}
