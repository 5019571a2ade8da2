// core/src/timing.rs
use chrono::{DateTime, Utc};
use log::trace;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::{from_json_str, Result};
use crate::metrics;
use crate::models::CurveSegment;
use crate::physics::braking_distance_m;
use crate::types::{DrivingMode, TimingProfile, TimingProfileConfig};

/// Floor (m) for the announcement lead distance.
pub const MIN_ANNOUNCE_DISTANCE_M: f64 = 100.0;
/// Spoken rate assumed when no synthesizer estimate is available.
pub const SECONDS_PER_WORD: f64 = 0.45;

/// Rough speech length (s) for a warning phrase.
pub fn estimate_speech_duration(text: &str) -> f64 {
    text.split_whitespace().count() as f64 * SECONDS_PER_WORD
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerDecision {
    Fire,
    Urgent,
    Wait,
}

impl TriggerDecision {
    pub fn as_str(self) -> &'static str {
        match self {
            TriggerDecision::Fire => "fire",
            TriggerDecision::Urgent => "urgent",
            TriggerDecision::Wait => "wait",
        }
    }

    pub fn should_speak(self) -> bool {
        self != TriggerDecision::Wait
    }
}

/// One pending warning as seen on the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingInput {
    pub distance_to_curve_m: f64,
    pub speed_ms: f64,
    pub advisory_speed_ms: Option<f64>,
    pub tts_duration_s: f64,
}

/// Breakdown of the distance a warning needs before the curve entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeadDistance {
    pub braking_m: f64,
    pub reaction_m: f64,
    pub speech_m: f64,
    /// braking + reaction + speech.
    pub total_m: f64,
    /// `total_m` floored at [`MIN_ANNOUNCE_DISTANCE_M`].
    pub required_m: f64,
}

#[inline]
fn non_negative(x: f64) -> f64 {
    if x.is_finite() && x > 0.0 { x } else { 0.0 }
}

/// Per-tick trigger decisions for one session.
///
/// The only state is the end time of the last narration, used for the
/// cooldown between warnings. Never fails: unusable inputs degrade to an
/// awareness-only lead distance or to [`TriggerDecision::Wait`].
#[derive(Debug, Clone)]
pub struct TimingEngine {
    profile: TimingProfileConfig,
    mode: DrivingMode,
    last_narration_end: Option<DateTime<Utc>>,
}

impl TimingEngine {
    pub fn new(profile: impl Into<TimingProfileConfig>, mode: DrivingMode) -> Self {
        Self {
            profile: profile.into(),
            mode,
            last_narration_end: None,
        }
    }

    pub fn profile(&self) -> &TimingProfileConfig {
        &self.profile
    }

    pub fn mode(&self) -> DrivingMode {
        self.mode
    }

    pub fn last_narration_end(&self) -> Option<DateTime<Utc>> {
        self.last_narration_end
    }

    pub fn lead_distance(&self, speed_ms: f64, advisory_speed_ms: Option<f64>, tts_duration_s: f64) -> LeadDistance {
        let v = non_negative(speed_ms);
        let advisory = advisory_speed_ms.filter(|a| a.is_finite() && *a >= 0.0);

        let braking_m = advisory
            .map(|a| braking_distance_m(v, a, self.mode.deceleration_ms2()))
            .unwrap_or(0.0);
        let reaction_m = v * non_negative(self.profile.reaction_time_s);
        let speech_m = v * non_negative(tts_duration_s);
        let total_m = braking_m + reaction_m + speech_m;

        LeadDistance {
            braking_m,
            reaction_m,
            speech_m,
            total_m,
            required_m: total_m.max(MIN_ANNOUNCE_DISTANCE_M),
        }
    }

    /// True while less than `min_gap_s` has passed since the last narration ended.
    pub fn cooldown_active(&self, now: DateTime<Utc>) -> bool {
        match self.last_narration_end {
            Some(end) => {
                let elapsed_s = (now - end).num_milliseconds() as f64 / 1000.0;
                elapsed_s < self.profile.min_gap_s
            }
            None => false,
        }
    }

    pub fn evaluate(&self, input: &TimingInput, now: DateTime<Utc>) -> TriggerDecision {
        let decision = if input.distance_to_curve_m.is_nan() {
            TriggerDecision::Wait
        } else {
            let distance = input.distance_to_curve_m.max(0.0);
            let lead = self.lead_distance(input.speed_ms, input.advisory_speed_ms, input.tts_duration_s);

            if lead.braking_m > 0.0 && distance / lead.braking_m < self.profile.urgency_threshold {
                TriggerDecision::Urgent
            } else if distance <= lead.required_m {
                if self.cooldown_active(now) {
                    TriggerDecision::Wait
                } else {
                    TriggerDecision::Fire
                }
            } else {
                TriggerDecision::Wait
            }
        };

        trace!(
            "[Timing] d={:.1} m v={:.1} m/s adv={:?} -> {}",
            input.distance_to_curve_m,
            input.speed_ms,
            input.advisory_speed_ms,
            decision.as_str()
        );
        metrics::record_decision(decision);
        decision
    }

    /// Evaluate a compound group as one warning: the first curve's entry is
    /// the action point and the most severe member's advisory drives braking.
    pub fn evaluate_unit(
        &self,
        curves: &[&CurveSegment],
        distance_to_first_m: f64,
        speed_ms: f64,
        tts_duration_s: f64,
        now: DateTime<Utc>,
    ) -> TriggerDecision {
        let Some(worst) = curves
            .iter()
            .max_by_key(|c| (c.severity, OrderedFloat(-c.min_radius_m)))
        else {
            return TriggerDecision::Wait;
        };
        let input = TimingInput {
            distance_to_curve_m: distance_to_first_m,
            speed_ms,
            advisory_speed_ms: worst.advisory_speed_ms,
            tts_duration_s,
        };
        self.evaluate(&input, now)
    }

    pub fn mark_narration_ended(&mut self, at: DateTime<Utc>) {
        self.last_narration_end = Some(at);
    }

    /// Clear the cooldown; call when a session restarts or the route changes.
    pub fn reset(&mut self) {
        self.last_narration_end = None;
    }
}

#[derive(Debug, Deserialize)]
struct LeadDistanceRequest {
    speed_ms: f64,
    #[serde(default)]
    advisory_speed_ms: Option<f64>,
    #[serde(default)]
    tts_duration_s: Option<f64>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    profile: TimingProfile,
    #[serde(default)]
    mode: DrivingMode,
}

/// Lead-distance breakdown for a JSON request. Speech duration comes from
/// `tts_duration_s`, or is estimated from `text` when that is absent.
pub fn lead_distance_json(request_json: &str) -> Result<String> {
    let req: LeadDistanceRequest = from_json_str(request_json)?;
    let tts = req
        .tts_duration_s
        .or_else(|| req.text.as_deref().map(estimate_speech_duration))
        .unwrap_or(0.0);
    let engine = TimingEngine::new(req.profile, req.mode);
    let lead = engine.lead_distance(req.speed_ms, req.advisory_speed_ms, tts);
    Ok(serde_json::to_string(&lead)?)
}
