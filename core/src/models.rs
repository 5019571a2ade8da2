use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CurveError, Result};
use crate::physics::ms_to_kmh;
use crate::quality::DensityReport;
use crate::types::SeverityThresholds;

/// WGS-84 position in decimal degrees. Always within valid ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    #[serde(alias = "latitude")]
    lat: f64,
    #[serde(alias = "lng", alias = "longitude")]
    lon: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CurveError;

    fn try_from(raw: RawCoordinate) -> Result<Self> {
        Coordinate::new(raw.lat, raw.lon)
    }
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(CurveError::InvalidCoordinate { lat, lon });
        }
        Ok(Self { lat, lon })
    }

    /// For positions derived from already-valid coordinates.
    pub(crate) fn new_unchecked(lat: f64, lon: f64) -> Self {
        debug_assert!((-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon));
        Self { lat, lon }
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.lon
    }
}

/// Turn direction. Positive cross product in the local tangent plane is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// +1 for left, -1 for right.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Left => 1.0,
            Direction::Right => -1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Curve severity. Ordering goes through [`Severity::rank`], never declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Hairpin,
    Sharp,
    Firm,
    Moderate,
    Gentle,
}

impl Severity {
    pub const fn rank(self) -> u8 {
        match self {
            Severity::Gentle => 1,
            Severity::Moderate => 2,
            Severity::Firm => 3,
            Severity::Sharp => 4,
            Severity::Hairpin => 5,
        }
    }

    /// The tightest bucket whose limit the radius falls under.
    pub fn from_radius(radius_m: f64, thresholds: &SeverityThresholds) -> Self {
        if radius_m < thresholds.hairpin_m {
            Severity::Hairpin
        } else if radius_m < thresholds.sharp_m {
            Severity::Sharp
        } else if radius_m < thresholds.firm_m {
            Severity::Firm
        } else if radius_m < thresholds.moderate_m {
            Severity::Moderate
        } else {
            Severity::Gentle
        }
    }

    pub fn is_at_least(self, other: Severity) -> bool {
        self.rank() >= other.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Gentle => "gentle",
            Severity::Moderate => "moderate",
            Severity::Firm => "firm",
            Severity::Sharp => "sharp",
            Severity::Hairpin => "hairpin",
        }
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveModifier {
    Tightening,
    Opening,
    Holds,
    Long,
}

impl CurveModifier {
    pub fn as_str(self) -> &'static str {
        match self {
            CurveModifier::Tightening => "tightening",
            CurveModifier::Opening => "opening",
            CurveModifier::Holds => "holds",
            CurveModifier::Long => "long",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompoundType {
    SBend,
    Chicane,
    Series,
    TighteningSequence,
    Switchbacks,
}

impl CompoundType {
    pub fn spoken(self) -> &'static str {
        match self {
            CompoundType::SBend => "S-bend",
            CompoundType::Chicane => "chicane",
            CompoundType::Series => "series of curves",
            CompoundType::TighteningSequence => "tightening sequence",
            CompoundType::Switchbacks => "switchbacks",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoadClass {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Residential,
    Unclassified,
    Track,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Paved,
    Gravel,
    Dirt,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveSegment {
    pub direction: Direction,
    pub severity: Severity,
    pub min_radius_m: f64,
    pub arc_length_m: f64,
    pub modifiers: Vec<CurveModifier>,
    /// Signed bearing change across the curve (degrees, positive = clockwise/right).
    pub total_angle_change_deg: f64,
    pub is_90_degree: bool,
    pub advisory_speed_ms: Option<f64>,
    pub lean_angle_deg: Option<f64>,
    pub compound_type: Option<CompoundType>,
    pub compound_size: Option<usize>,
    /// Zero-based position inside the compound group.
    pub compound_position: Option<usize>,
    pub confidence: f64,
    pub start_index: usize,
    pub end_index: usize,
    pub start: Coordinate,
    pub end: Coordinate,
    pub distance_from_start_m: f64,
    pub road_class: Option<RoadClass>,
    pub surface: Option<Surface>,
    pub speed_limit_kmh: Option<f64>,
    pub near_intersection: bool,
}

impl CurveSegment {
    pub fn has_modifier(&self, modifier: CurveModifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn distance_to_end_m(&self) -> f64 {
        self.distance_from_start_m + self.arc_length_m
    }

    /// Short spoken phrase, e.g. "sharp left, tightening, slow to 35".
    pub fn describe(&self) -> String {
        let mut parts = Vec::with_capacity(4);
        if self.is_90_degree {
            parts.push(format!("ninety degree {}", self.direction.as_str()));
        } else {
            parts.push(format!("{} {}", self.severity.as_str(), self.direction.as_str()));
        }
        for m in &self.modifiers {
            parts.push(m.as_str().to_string());
        }
        if let Some(v) = self.advisory_speed_ms {
            // round down to 5 km/h so the spoken speed is never above the advisory
            let kmh = (ms_to_kmh(v) / 5.0).floor() * 5.0;
            if kmh >= 5.0 {
                parts.push(format!("slow to {kmh:.0}"));
            }
        }
        parts.join(", ")
    }
}

impl fmt::Display for CurveSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {:.0} m (r={:.0} m, {:.0}°)",
            self.describe(),
            self.distance_from_start_m,
            self.min_radius_m,
            self.total_angle_change_deg
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StraightSegment {
    pub length_m: f64,
    pub start_index: usize,
    pub end_index: usize,
    pub distance_from_start_m: f64,
}

/// One piece of the analyzed route. A route's segments cover the interpolated
/// points contiguously: each end index is the next segment's start index.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RouteSegment {
    Curve(CurveSegment),
    Straight(StraightSegment),
}

impl RouteSegment {
    pub fn start_index(&self) -> usize {
        match self {
            RouteSegment::Curve(c) => c.start_index,
            RouteSegment::Straight(s) => s.start_index,
        }
    }

    pub fn end_index(&self) -> usize {
        match self {
            RouteSegment::Curve(c) => c.end_index,
            RouteSegment::Straight(s) => s.end_index,
        }
    }

    pub fn distance_from_start_m(&self) -> f64 {
        match self {
            RouteSegment::Curve(c) => c.distance_from_start_m,
            RouteSegment::Straight(s) => s.distance_from_start_m,
        }
    }

    pub fn length_m(&self) -> f64 {
        match self {
            RouteSegment::Curve(c) => c.arc_length_m,
            RouteSegment::Straight(s) => s.length_m,
        }
    }

    pub fn as_curve(&self) -> Option<&CurveSegment> {
        match self {
            RouteSegment::Curve(c) => Some(c),
            RouteSegment::Straight(_) => None,
        }
    }

    pub(crate) fn as_curve_mut(&mut self) -> Option<&mut CurveSegment> {
        match self {
            RouteSegment::Curve(c) => Some(c),
            RouteSegment::Straight(_) => None,
        }
    }
}

/// A distance range along the route (m from start) carrying one attribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Span<T> {
    pub start_m: f64,
    pub end_m: f64,
    pub value: T,
}

/// Externally supplied road attributes. Spans are distance-sorted and non-overlapping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteMetadata {
    pub road_class: Vec<Span<RoadClass>>,
    pub surface: Vec<Span<Surface>>,
    pub speed_limit_kmh: Vec<Span<f64>>,
    pub intersections: Vec<Coordinate>,
}

/// Stretch of the original input where consecutive points were too far apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseRegion {
    pub start_m: f64,
    pub end_m: f64,
    pub gap_m: f64,
    /// Index of the first original point of the gap.
    pub from_index: usize,
}

impl SparseRegion {
    pub fn overlaps(&self, start_m: f64, end_m: f64) -> bool {
        start_m < self.end_m && end_m > self.start_m
    }
}

/// Output of the geometry pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteAnalysis {
    pub segments: Vec<RouteSegment>,
    pub interpolated_points: Vec<Coordinate>,
    pub sparse_regions: Vec<SparseRegion>,
    pub total_distance_m: f64,
    pub curve_count: usize,
    pub density: Option<DensityReport>,
}

impl RouteAnalysis {
    pub fn curves(&self) -> impl Iterator<Item = &CurveSegment> {
        self.segments.iter().filter_map(RouteSegment::as_curve)
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
