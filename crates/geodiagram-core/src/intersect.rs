//! Approximate intersections between primitives.
//!
//! Every routine is tolerant: `eps` both rejects near-degenerate
//! configurations and accepts solutions that land slightly off a segment.
//! Degenerate inputs yield no intersection instead of an error.

use crate::geometry::{cartesian_angle, ccw_angle_between, Circle, Line, Point};
use std::f64::consts::TAU;

/// Two circle/line solutions subtending less than this angle at the center
/// are merged into their midpoint (near-tangent lines).
pub const TANGENT_MERGE_ANGLE_DEG: f64 = 40.0;

/// Intersection of two segments.
///
/// Pairs whose direction cross product is below `eps` are treated as
/// parallel. The solution is accepted only if it lies within `eps` of both
/// segments.
pub fn intersections_between_lines(line0: &Line, line1: &Line, eps: f64) -> Option<Point> {
    let x = line0.a - line1.a;
    let d1 = line1.vector();
    let d2 = line0.vector();
    let cross = d1.x * d2.y - d1.y * d2.x;
    if cross.abs() < eps {
        return None;
    }

    let t1 = (x.x * d2.y - x.y * d2.x) / cross;
    let p = line1.a + d1 * t1;
    if line1.distance_to(&p) < eps && line0.distance_to(&p) < eps {
        Some(p)
    } else {
        None
    }
}

/// Intersections of a circle with a segment (zero, one or two points).
///
/// When the exact discriminant is negative but the line passes within `eps`
/// of the circumference, the foot of the perpendicular from the center is
/// returned as a tangency point.
pub fn intersections_between_circle_and_line(circle: &Circle, line: &Line, eps: f64) -> Vec<Point> {
    if line.is_degenerate() {
        return Vec::new();
    }
    let n = line.normal_vector();
    let u = line.unit_vector();
    let d = (line.midpoint() - circle.center).dot(&n);
    let foot = circle.center + n * d;

    let mut candidates = Vec::with_capacity(2);
    let disc = circle.radius * circle.radius - d * d;
    if disc < 0.0 {
        let relaxed = (circle.radius + eps).powi(2) - d * d;
        if relaxed >= 0.0 {
            candidates.push(foot);
        }
    } else {
        let along = u * disc.sqrt();
        candidates.push(foot + along);
        candidates.push(foot - along);
    }

    let on_line: Vec<Point> = candidates
        .into_iter()
        .filter(|p| line.distance_to(p) < eps)
        .collect();

    if let [p0, p1] = on_line.as_slice() {
        if subtended_angle_deg(&circle.center, p0, p1) < TANGENT_MERGE_ANGLE_DEG {
            return vec![Point::from((p0.coords + p1.coords) * 0.5)];
        }
    }
    on_line
}

/// Circle/circle intersections are not computed.
///
/// Circle pairs contribute no candidates; shared points still surface through
/// line intersections and endpoints.
pub fn intersections_between_circles(_circle0: &Circle, _circle1: &Circle) -> Vec<Point> {
    Vec::new()
}

/// Smaller angle (degrees) at `vertex` between rays to `p0` and `p1`.
fn subtended_angle_deg(vertex: &Point, p0: &Point, p1: &Point) -> f64 {
    let diff = ccw_angle_between(cartesian_angle(vertex, p0), cartesian_angle(vertex, p1));
    let smaller = if diff > std::f64::consts::PI {
        TAU - diff
    } else {
        diff
    };
    smaller.to_degrees()
}
