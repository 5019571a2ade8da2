//! Curve analysis and warning timing for road routes.
//!
//! [`analyzer`] turns a coordinate list into classified curve/straight
//! segments; [`map_matcher`] and [`timing`] consume that analysis per GPS
//! tick, and [`session`] wires the two together for one active route.

pub mod analyzer;
pub mod classifier;
pub mod compound;
pub mod curvature;
pub mod error;
pub mod geo;
pub mod interpolation;
pub mod map_matcher;
pub mod metrics;
pub mod models;
pub mod physics;
pub mod quality;
pub mod segmenter;
pub mod session;
pub mod simulate;
pub mod smoothing;
pub mod timing;
pub mod types;

#[cfg(feature = "python")]
mod py;

pub use analyzer::{analyze_route, analyze_route_json, RouteAnalyzer};
pub use error::{CurveError, Result};
pub use map_matcher::{MapMatcher, MatchResult, UpcomingCurve};
pub use models::{
    CompoundType, Coordinate, CurveModifier, CurveSegment, Direction, RouteAnalysis, RouteMetadata,
    RouteSegment, Severity, SparseRegion, StraightSegment,
};
pub use session::{Announcement, RouteSession, TickOutcome};
pub use timing::{LeadDistance, TimingEngine, TimingInput, TriggerDecision};
pub use types::{AnalysisConfig, DrivingMode, SeverityThresholds, TimingProfile, TimingProfileConfig};
