//! Plain geometric value types: points, segments, circles and arcs.
//!
//! All values are immutable after construction. Two points are only ever
//! considered "the same" through an explicit distance threshold.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;

/// A pixel-space coordinate.
pub type Point = Point2<f64>;

/// Line segment between two endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub a: Point,
    pub b: Point,
}

impl Line {
    #[inline]
    pub fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    /// True when both endpoints coincide (up to machine precision).
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.length() <= f64::EPSILON
    }

    #[inline]
    pub fn vector(&self) -> Vector2<f64> {
        self.b - self.a
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.vector().norm()
    }

    /// Unit direction from `a` to `b`. Undefined for degenerate lines.
    #[inline]
    pub fn unit_vector(&self) -> Vector2<f64> {
        self.vector() / self.length()
    }

    /// Unit normal `(u.y, -u.x)`.
    #[inline]
    pub fn normal_vector(&self) -> Vector2<f64> {
        let u = self.unit_vector();
        Vector2::new(u.y, -u.x)
    }

    #[inline]
    pub fn midpoint(&self) -> Point {
        Point::from((self.a.coords + self.b.coords) * 0.5)
    }

    /// Distance from `p` to the segment.
    ///
    /// Inside the segment's extent this is the perpendicular distance,
    /// outside it is the distance to the nearer endpoint.
    pub fn distance_to(&self, p: &Point) -> f64 {
        let length = self.length();
        if length <= f64::EPSILON {
            return (p - self.a).norm();
        }
        let v = p - self.midpoint();
        let u = self.vector() / length;
        let n = Vector2::new(u.y, -u.x);
        if v.dot(&u).abs() <= 0.5 * length {
            v.dot(&n).abs()
        } else {
            (p - self.a).norm().min((p - self.b).norm())
        }
    }

    /// Distance from `p` to the infinite line through the segment.
    pub fn perpendicular_distance_to(&self, p: &Point) -> f64 {
        (p - self.midpoint()).dot(&self.normal_vector()).abs()
    }

    /// Colinear segment extended by `distance` beyond both endpoints.
    pub fn extended(&self, distance: f64) -> Self {
        if self.is_degenerate() {
            return *self;
        }
        let u = self.unit_vector() * distance;
        Self::new(self.a - u, self.b + u)
    }

    /// Parameter `t` of `p` along `a + t (b - a)`, measured on the dominant axis.
    ///
    /// Returns `None` for degenerate segments.
    pub fn axis_parameter(&self, p: &Point) -> Option<f64> {
        let d = self.vector();
        if d.x.abs() < 1e-10 && d.y.abs() < 1e-10 {
            return None;
        }
        if d.x.abs() > d.y.abs() {
            Some((p.x - self.a.x) / d.x)
        } else {
            Some((p.y - self.a.y) / d.y)
        }
    }
}

/// Circle given by its center and a positive radius.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

impl Circle {
    #[inline]
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    #[inline]
    pub fn circumference(&self) -> f64 {
        TAU * self.radius
    }

    /// Absolute distance from `p` to the circumference.
    #[inline]
    pub fn distance_to(&self, p: &Point) -> f64 {
        ((p - self.center).norm() - self.radius).abs()
    }

    /// Point on the circumference at `angle` (radians, image convention).
    #[inline]
    pub fn point_at(&self, angle: f64) -> Point {
        let (s, c) = angle.sin_cos();
        Point::new(self.center.x + self.radius * c, self.center.y + self.radius * s)
    }
}

/// Shape class of a detected circle-like primitive.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcType {
    #[default]
    FullCircle,
    Semicircle,
    QuarterCircle,
    Arc,
}

impl ArcType {
    /// Anything but a full circle.
    #[inline]
    pub fn is_partial(self) -> bool {
        self != ArcType::FullCircle
    }

    /// Assumed fraction of the circumference that is actually drawn.
    pub fn expected_fraction(self) -> f64 {
        match self {
            ArcType::FullCircle => 1.0,
            ArcType::Semicircle => 0.5,
            ArcType::QuarterCircle => 0.25,
            ArcType::Arc => 0.3,
        }
    }
}

impl fmt::Display for ArcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArcType::FullCircle => "full_circle",
            ArcType::Semicircle => "semicircle",
            ArcType::QuarterCircle => "quarter_circle",
            ArcType::Arc => "arc",
        };
        f.write_str(name)
    }
}

/// Strategy that produced a circle candidate.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMethod {
    Hough,
    Contour,
    Template,
}

/// Circle candidate together with its classification metadata.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectedCircle {
    pub circle: Circle,
    pub arc_type: ArcType,
    pub method: DetectionMethod,
    pub confidence: f32,
}

impl DetectedCircle {
    pub fn new(circle: Circle, arc_type: ArcType, method: DetectionMethod, confidence: f32) -> Self {
        Self {
            circle,
            arc_type,
            method,
            confidence,
        }
    }

    #[inline]
    pub fn is_partial(&self) -> bool {
        self.arc_type.is_partial()
    }
}

/// Directed arc of `circle` running counter-clockwise (in image angle
/// convention) from `a` to `b`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub circle: Circle,
    pub a: Point,
    pub b: Point,
}

impl Arc {
    #[inline]
    pub fn new(circle: Circle, a: Point, b: Point) -> Self {
        Self { circle, a, b }
    }

    /// Angular sweep from `a` to `b` in `[0, 2π)`.
    pub fn sweep(&self) -> f64 {
        let c = &self.circle.center;
        ccw_angle_between(cartesian_angle(c, &self.a), cartesian_angle(c, &self.b))
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.sweep() * self.circle.radius
    }

    /// Distance to the circumference when `p` falls inside the sweep, otherwise
    /// the distance to the nearer boundary point.
    pub fn distance_to(&self, p: &Point) -> f64 {
        let c = &self.circle.center;
        let angle_a = cartesian_angle(c, &self.a);
        let sweep = ccw_angle_between(angle_a, cartesian_angle(c, &self.b));
        let dp = ccw_angle_between(angle_a, cartesian_angle(c, p));
        if dp <= sweep {
            self.circle.distance_to(p)
        } else {
            (p - self.a).norm().min((p - self.b).norm())
        }
    }

    /// Point halfway along the sweep.
    pub fn midpoint(&self) -> Point {
        let start = cartesian_angle(&self.circle.center, &self.a);
        self.circle.point_at(start + 0.5 * self.sweep())
    }
}

/// Angle of `p` around `center` in `[0, 2π)`.
pub fn cartesian_angle(center: &Point, p: &Point) -> f64 {
    let angle = (p.y - center.y).atan2(p.x - center.x);
    if angle < 0.0 {
        angle + TAU
    } else {
        angle
    }
}

/// Counter-clockwise distance from angle `a0` to angle `a1`, in `[0, 2π)`.
pub fn ccw_angle_between(a0: f64, a1: f64) -> f64 {
    (a1 - a0).rem_euclid(TAU)
}
