use log::debug;

use crate::models::{CompoundType, CurveSegment, RouteSegment, Severity};

/// Max straight (m) between the curves of an S-bend, chicane or series.
pub const LINKED_MAX_GAP_M: f64 = 50.0;
/// Max straight (m) between consecutive switchbacks.
pub const SWITCHBACK_MAX_GAP_M: f64 = 200.0;
/// Max straight (m) between curves of a tightening sequence.
pub const TIGHTENING_MAX_GAP_M: f64 = 200.0;

/// Curves that are narrated as one unit, by index into the segment list.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundGroup {
    pub kind: CompoundType,
    pub members: Vec<usize>,
}

struct Entry<'a> {
    segment_index: usize,
    curve: &'a CurveSegment,
}

/// Find compound patterns over an already classified segment list.
///
/// Priority: switchbacks, then gap-linked chains (S-bend, chicane, series,
/// tightening chains), then looser same-direction tightening sequences.
/// A curve belongs to at most one group.
pub fn detect_compounds(segments: &[RouteSegment]) -> Vec<CompoundGroup> {
    let entries: Vec<Entry> = segments
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.as_curve().map(|curve| Entry { segment_index: i, curve }))
        .collect();
    let m = entries.len();
    if m < 2 {
        return Vec::new();
    }

    // straight length between curve k and k+1
    let gaps: Vec<f64> = entries
        .windows(2)
        .map(|w| {
            segments[w[0].segment_index + 1..w[1].segment_index]
                .iter()
                .map(RouteSegment::length_m)
                .sum()
        })
        .collect();

    let mut taken = vec![false; m];
    let mut groups = Vec::new();
    let mut take = |range: std::ops::RangeInclusive<usize>, kind: CompoundType, taken: &mut Vec<bool>| {
        for k in range.clone() {
            taken[k] = true;
        }
        groups.push(CompoundGroup {
            kind,
            members: range.map(|k| entries[k].segment_index).collect(),
        });
    };

    let sharp = |k: usize| entries[k].curve.severity.is_at_least(Severity::Sharp);
    let alternates = |k: usize| entries[k].curve.direction != entries[k + 1].curve.direction;
    let tightens = |k: usize| entries[k + 1].curve.min_radius_m < entries[k].curve.min_radius_m;
    let same_dir = |k: usize| entries[k].curve.direction == entries[k + 1].curve.direction;

    // 1. switchbacks: 3+ sharp/hairpin curves, alternating, gaps < 200 m
    let mut i = 0;
    while i < m {
        if !sharp(i) {
            i += 1;
            continue;
        }
        let mut j = i;
        while j + 1 < m && sharp(j + 1) && alternates(j) && gaps[j] < SWITCHBACK_MAX_GAP_M {
            j += 1;
        }
        if j - i + 1 >= 3 {
            take(i..=j, CompoundType::Switchbacks, &mut taken);
        }
        i = j + 1;
    }

    // 2. chains linked by gaps < 50 m
    let mut i = 0;
    while i < m {
        if taken[i] {
            i += 1;
            continue;
        }
        let mut j = i;
        while j + 1 < m && !taken[j + 1] && gaps[j] < LINKED_MAX_GAP_M {
            j += 1;
        }
        let len = j - i + 1;
        if len == 2 && alternates(i) {
            let kind = if sharp(i) && sharp(j) {
                CompoundType::Chicane
            } else {
                CompoundType::SBend
            };
            take(i..=j, kind, &mut taken);
        } else if len >= 3 {
            let kind = if (i..j).all(|k| same_dir(k) && tightens(k)) {
                CompoundType::TighteningSequence
            } else {
                CompoundType::Series
            };
            take(i..=j, kind, &mut taken);
        }
        i = j + 1;
    }

    // 3. same-direction curves, each tighter than the last
    let mut i = 0;
    while i < m {
        if taken[i] {
            i += 1;
            continue;
        }
        let mut j = i;
        while j + 1 < m
            && !taken[j + 1]
            && same_dir(j)
            && tightens(j)
            && gaps[j] < TIGHTENING_MAX_GAP_M
        {
            j += 1;
        }
        if j > i {
            take(i..=j, CompoundType::TighteningSequence, &mut taken);
        }
        i = j + 1;
    }

    debug!("[Compound] {} groups over {} curves", groups.len(), m);
    groups
}

/// Stamp compound type, size and position onto the grouped curves.
pub fn apply_compounds(segments: &mut [RouteSegment], groups: &[CompoundGroup]) {
    for group in groups {
        let size = group.members.len();
        for (pos, &idx) in group.members.iter().enumerate() {
            if let Some(curve) = segments.get_mut(idx).and_then(RouteSegment::as_curve_mut) {
                curve.compound_type = Some(group.kind);
                curve.compound_size = Some(size);
                curve.compound_position = Some(pos);
            }
        }
    }
}
