// Synthetic routes laid out in a local east/north plane around (45°N, 7°E).
#![allow(dead_code)]

use curvecall_core::geo::EARTH_RADIUS_M;
use curvecall_core::Coordinate;

pub const LAT0: f64 = 45.0;
pub const LON0: f64 = 7.0;

/// Meters per degree of latitude.
pub fn m_per_deg() -> f64 {
    EARTH_RADIUS_M * std::f64::consts::PI / 180.0
}

/// Local offset (m east, m north) → coordinate.
pub fn to_coordinate(x: f64, y: f64) -> Coordinate {
    let m = m_per_deg();
    Coordinate::new(LAT0 + y / m, LON0 + x / (m * LAT0.to_radians().cos())).unwrap()
}

/// Turtle-style path builder. Heading 0 is north; a right turn is clockwise.
pub struct LocalPath {
    x: f64,
    y: f64,
    heading: f64,
    pts: Vec<(f64, f64)>,
}

const STEP_M: f64 = 5.0;

impl LocalPath {
    pub fn new() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            heading: 0.0,
            pts: vec![(0.0, 0.0)],
        }
    }

    pub fn straight(mut self, len_m: f64) -> Self {
        let n = ((len_m / STEP_M) as usize).max(1);
        let d = len_m / n as f64;
        for _ in 0..n {
            self.x += self.heading.sin() * d;
            self.y += self.heading.cos() * d;
            self.pts.push((self.x, self.y));
        }
        self
    }

    /// Circular arc of `radius_m` through `deg` degrees, sampled by chords.
    pub fn arc(mut self, radius_m: f64, deg: f64, left: bool) -> Self {
        let angle = deg.to_radians();
        let n = ((radius_m * angle / STEP_M) as usize).max(2);
        let da = angle / n as f64 * if left { -1.0 } else { 1.0 };
        let chord = 2.0 * radius_m * (da.abs() / 2.0).sin();
        for _ in 0..n {
            self.heading += da / 2.0;
            self.x += self.heading.sin() * chord;
            self.y += self.heading.cos() * chord;
            self.heading += da / 2.0;
            self.pts.push((self.x, self.y));
        }
        self
    }

    pub fn left(self, radius_m: f64, deg: f64) -> Self {
        self.arc(radius_m, deg, true)
    }

    pub fn right(self, radius_m: f64, deg: f64) -> Self {
        self.arc(radius_m, deg, false)
    }

    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.pts.iter().map(|(x, y)| to_coordinate(*x, *y)).collect()
    }
}

/// Three points on a circle of `radius_m`, `step_deg` apart, counter-clockwise.
pub fn circle_triple(radius_m: f64, step_deg: f64) -> [Coordinate; 3] {
    let p = |a: f64| {
        let t = a.to_radians();
        to_coordinate(radius_m * t.cos(), radius_m * t.sin())
    };
    [p(0.0), p(step_deg), p(2.0 * step_deg)]
}

pub fn straight_route(len_m: f64) -> Vec<Coordinate> {
    LocalPath::new().straight(len_m).coordinates()
}

pub fn right_angle_bend() -> Vec<Coordinate> {
    LocalPath::new().straight(300.0).right(60.0, 90.0).straight(300.0).coordinates()
}

pub fn hairpin() -> Vec<Coordinate> {
    LocalPath::new().straight(300.0).left(20.0, 180.0).straight(300.0).coordinates()
}

pub fn junction_turn() -> Vec<Coordinate> {
    LocalPath::new().straight(300.0).right(12.0, 90.0).straight(300.0).coordinates()
}

pub fn s_bend(gap_m: f64) -> Vec<Coordinate> {
    LocalPath::new()
        .straight(300.0)
        .left(80.0, 60.0)
        .straight(gap_m)
        .right(80.0, 60.0)
        .straight(300.0)
        .coordinates()
}

pub fn chicane() -> Vec<Coordinate> {
    LocalPath::new()
        .straight(300.0)
        .left(40.0, 70.0)
        .right(40.0, 70.0)
        .straight(300.0)
        .coordinates()
}

pub fn switchbacks() -> Vec<Coordinate> {
    LocalPath::new()
        .straight(300.0)
        .left(20.0, 180.0)
        .straight(100.0)
        .right(20.0, 180.0)
        .straight(100.0)
        .left(20.0, 180.0)
        .straight(300.0)
        .coordinates()
}

pub fn tightening_sequence() -> Vec<Coordinate> {
    LocalPath::new()
        .straight(300.0)
        .left(150.0, 60.0)
        .straight(120.0)
        .left(90.0, 60.0)
        .straight(120.0)
        .left(45.0, 60.0)
        .straight(300.0)
        .coordinates()
}

pub fn series() -> Vec<Coordinate> {
    LocalPath::new()
        .straight(300.0)
        .left(80.0, 50.0)
        .straight(20.0)
        .right(80.0, 50.0)
        .straight(20.0)
        .left(80.0, 50.0)
        .straight(20.0)
        .right(80.0, 50.0)
        .straight(300.0)
        .coordinates()
}
