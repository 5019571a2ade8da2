// core/src/session.rs
use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::debug;
use serde::Serialize;

use crate::error::Result;
use crate::map_matcher::{MapMatcher, MatchResult, UpcomingCurve};
use crate::models::{Coordinate, CurveSegment, RouteAnalysis};
use crate::timing::{estimate_speech_duration, TimingEngine, TriggerDecision};
use crate::types::{DrivingMode, TimingProfileConfig};

/// How far ahead (m) a session looks for curves to announce.
pub const DEFAULT_LOOKAHEAD_M: f64 = 1_000.0;

/// A warning the caller should speak now.
#[derive(Debug, Clone, Serialize)]
pub struct Announcement {
    /// Segment index of the first curve of the unit.
    pub segment_index: usize,
    pub decision: TriggerDecision,
    pub distance_m: f64,
    pub text: String,
    /// 1 for a single curve, the group size for a compound.
    pub unit_size: usize,
    pub curve: CurveSegment,
}

#[derive(Debug, Clone, Serialize)]
pub struct TickOutcome {
    pub matched: MatchResult,
    pub announcements: Vec<Announcement>,
}

/// Matcher + timing engine for one active route. Feed it fixes in order.
#[derive(Debug)]
pub struct RouteSession {
    route: Arc<RouteAnalysis>,
    matcher: MapMatcher,
    engine: TimingEngine,
    announced: HashSet<usize>,
    lookahead_m: f64,
}

impl RouteSession {
    pub fn new(route: Arc<RouteAnalysis>, profile: impl Into<TimingProfileConfig>, mode: DrivingMode) -> Result<Self> {
        let matcher = MapMatcher::new(Arc::clone(&route))?;
        Ok(Self {
            route,
            matcher,
            engine: TimingEngine::new(profile, mode),
            announced: HashSet::new(),
            lookahead_m: DEFAULT_LOOKAHEAD_M,
        })
    }

    pub fn with_lookahead(mut self, lookahead_m: f64) -> Self {
        self.lookahead_m = lookahead_m;
        self
    }

    pub fn matcher(&self) -> &MapMatcher {
        &self.matcher
    }

    pub fn engine(&self) -> &TimingEngine {
        &self.engine
    }

    /// Curves (in route order) narrated together, starting at `first`.
    /// For a compound entered mid-group this is the rest of the group.
    fn unit_members(&self, first: &UpcomingCurve) -> Vec<&CurveSegment> {
        let size = first.curve.compound_size.unwrap_or(1).max(1);
        let remaining = size.saturating_sub(first.curve.compound_position.unwrap_or(0)).max(1);
        self.route.segments[first.segment_index..]
            .iter()
            .filter_map(|s| s.as_curve())
            .take(remaining)
            .collect()
    }

    /// Segment index of the first curve of `u`'s compound group (itself if single).
    fn group_head(&self, u: &UpcomingCurve) -> usize {
        let position = u.curve.compound_position.unwrap_or(0);
        self.route.segments[..=u.segment_index]
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, s)| s.as_curve().is_some())
            .nth(position)
            .map_or(u.segment_index, |(i, _)| i)
    }

    pub fn on_fix(&mut self, position: &Coordinate, speed_ms: f64, now: DateTime<Utc>) -> TickOutcome {
        let matched = self.matcher.match_to_route(position);
        if matched.is_off_route {
            return TickOutcome {
                matched,
                announcements: Vec::new(),
            };
        }

        let upcoming = self
            .matcher
            .find_upcoming_curves(matched.route_progress_m, self.lookahead_m);
        let mut announcements = Vec::new();
        let mut groups_seen = HashSet::new();

        for u in &upcoming {
            // a unit is keyed by its group's first curve and evaluated from
            // its nearest curve ahead, which is a later member when the
            // session joined mid-group
            let head = self.group_head(u);
            if self.announced.contains(&head) || !groups_seen.insert(head) {
                continue;
            }

            let members = self.unit_members(u);
            let text = describe_unit(&u.curve, &members);
            let tts = estimate_speech_duration(&text);
            let unit_size = members.len();
            let mut decision = self
                .engine
                .evaluate_unit(&members, u.distance_m, speed_ms, tts, now);

            // one normal warning per tick; urgent ones always go out
            if decision == TriggerDecision::Fire && !announcements.is_empty() {
                decision = TriggerDecision::Wait;
            }
            if !decision.should_speak() {
                continue;
            }

            self.announced.insert(head);
            debug!(
                "[Session] {} segment {} at {:.0} m: {}",
                decision.as_str(),
                u.segment_index,
                u.distance_m,
                text
            );
            announcements.push(Announcement {
                segment_index: u.segment_index,
                decision,
                distance_m: u.distance_m,
                text: match decision {
                    TriggerDecision::Urgent => format!("caution, {text}"),
                    _ => text,
                },
                unit_size,
                curve: u.curve.clone(),
            });
        }

        TickOutcome { matched, announcements }
    }

    /// The caller finished speaking at `at`; starts the cooldown.
    pub fn narration_finished(&mut self, at: DateTime<Utc>) {
        self.engine.mark_narration_ended(at);
    }

    /// Start over on the same route.
    pub fn restart(&mut self) {
        self.matcher.reset();
        self.engine.reset();
        self.announced.clear();
    }
}

fn describe_unit(head: &CurveSegment, members: &[&CurveSegment]) -> String {
    match head.compound_type {
        Some(kind) if members.len() > 1 => format!("{}, {}", kind.spoken(), head.describe()),
        _ => head.describe(),
    }
}
