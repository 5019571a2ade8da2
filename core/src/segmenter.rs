use log::debug;

use crate::curvature::CurvatureProfile;
use crate::models::Direction;
use crate::types::AnalysisConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    Curve(Direction),
    Straight,
}

/// Unclassified stretch of interpolated points `[start, end]`.
/// Consecutive runs share their boundary index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub kind: RunKind,
    pub start: usize,
    pub end: usize,
}

impl Run {
    pub fn is_curve(&self) -> bool {
        matches!(self.kind, RunKind::Curve(_))
    }

    pub fn length_m(&self, cumulative: &[f64]) -> f64 {
        cumulative[self.end] - cumulative[self.start]
    }
}

/// Per-point kind: straight at/above the threshold radius, otherwise a curve
/// in the direction of the smoothed sign. Curve points with no sign inherit
/// the nearest signed neighbour of the same curve stretch.
fn point_kinds(profile: &CurvatureProfile, threshold_m: f64) -> Vec<RunKind> {
    let n = profile.len();
    let is_curve: Vec<bool> = profile.radius.iter().map(|r| *r < threshold_m).collect();
    let mut signs: Vec<f64> = (0..n)
        .map(|i| if is_curve[i] { sign(profile.direction[i]) } else { 0.0 })
        .collect();

    let mut i = 0;
    while i < n {
        if !is_curve[i] {
            i += 1;
            continue;
        }
        let mut j = i;
        while j < n && is_curve[j] {
            j += 1;
        }
        let mut carry = 0.0;
        for s in signs[i..j].iter_mut() {
            if *s == 0.0 {
                *s = carry;
            } else {
                carry = *s;
            }
        }
        carry = 0.0;
        for s in signs[i..j].iter_mut().rev() {
            if *s == 0.0 {
                *s = carry;
            } else {
                carry = *s;
            }
        }
        i = j;
    }

    (0..n)
        .map(|i| {
            if !is_curve[i] {
                RunKind::Straight
            } else if signs[i] < 0.0 {
                RunKind::Curve(Direction::Right)
            } else {
                RunKind::Curve(Direction::Left)
            }
        })
        .collect()
}

fn sign(x: f64) -> f64 {
    if x > 1e-9 {
        1.0
    } else if x < -1e-9 {
        -1.0
    } else {
        0.0
    }
}

/// Partition the interpolated index range into alternating curve/straight runs.
///
/// A curve run ends where the smoothed direction flips, so back-to-back
/// opposite curves stay separate. Same-direction curves split by a straight
/// shorter than `straight_gap_merge_m` are merged, absorbing the straight.
pub fn segment(profile: &CurvatureProfile, cumulative: &[f64], config: &AnalysisConfig) -> Vec<Run> {
    let n = profile.len();
    if n < 2 {
        return Vec::new();
    }

    let kinds = point_kinds(profile, config.curvature_threshold_radius_m);
    let mut runs: Vec<Run> = Vec::new();
    let mut start = 0;
    for i in 1..n {
        if kinds[i] != kinds[start] {
            runs.push(Run { kind: kinds[start], start, end: i });
            start = i;
        }
    }
    if start < n - 1 || runs.is_empty() {
        runs.push(Run { kind: kinds[start], start, end: n - 1 });
    }

    let mut merged: Vec<Run> = Vec::with_capacity(runs.len());
    let mut merges = 0usize;
    for run in runs {
        let len = merged.len();
        if run.is_curve() && len >= 2 {
            let gap = merged[len - 1];
            let prev = merged[len - 2];
            if gap.kind == RunKind::Straight
                && prev.kind == run.kind
                && gap.length_m(cumulative) < config.straight_gap_merge_m
            {
                merged.pop();
                if let Some(last) = merged.last_mut() {
                    last.end = run.end;
                }
                merges += 1;
                continue;
            }
        }
        merged.push(run);
    }

    debug!(
        "[Segmenter] {} runs ({} curves), {} merged across short straights",
        merged.len(),
        merged.iter().filter(|r| r.is_curve()).count(),
        merges
    );
    merged
}
