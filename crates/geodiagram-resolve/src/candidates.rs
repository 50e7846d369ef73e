//! Candidate points harvested from the selected primitives.

use geodiagram_core::{
    intersections_between_circle_and_line, intersections_between_circles, intersections_between_lines,
    Line, Point,
};
use geodiagram_primitives::{Primitive, PrimitiveSet};
use serde::{Deserialize, Serialize};

use crate::params::ResolveParams;

/// Where a candidate came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    Intersection,
    Endpoint,
    CircleCenter,
    Extended,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub point: Point,
    pub source: CandidateSource,
}

impl Candidate {
    #[inline]
    pub fn new(point: Point, source: CandidateSource) -> Self {
        Self { point, source }
    }
}

fn intersections_between(p0: &Primitive, p1: &Primitive, eps: f64) -> Vec<Point> {
    match (p0, p1) {
        (Primitive::Line(l0), Primitive::Line(l1)) => {
            intersections_between_lines(l0, l1, eps).into_iter().collect()
        }
        (Primitive::Line(l), Primitive::Circle(c)) | (Primitive::Circle(c), Primitive::Line(l)) => {
            intersections_between_circle_and_line(&c.circle, l, eps)
        }
        (Primitive::Circle(c0), Primitive::Circle(c1)) => intersections_between_circles(&c0.circle, &c1.circle),
    }
}

/// Intersections of every unordered primitive pair.
pub fn pairwise_intersections(primitives: &PrimitiveSet, eps: f64) -> Vec<Candidate> {
    let all: Vec<Primitive> = primitives.iter().map(|(_, p)| p).collect();
    let mut out = Vec::new();
    for (i, p0) in all.iter().enumerate() {
        for p1 in &all[i + 1..] {
            out.extend(
                intersections_between(p0, p1, eps)
                    .into_iter()
                    .map(|p| Candidate::new(p, CandidateSource::Intersection)),
            );
        }
    }
    out
}

fn endpoint_is_significant(index: usize, endpoint: &Point, primitives: &PrimitiveSet, threshold: f64) -> bool {
    let near_line = primitives.lines.iter().enumerate().any(|(j, other)| {
        j != index && (endpoint - other.a).norm().min((endpoint - other.b).norm()) < threshold
    });
    near_line
        || primitives
            .circles
            .iter()
            .any(|c| c.circle.distance_to(endpoint) < threshold)
}

/// Both endpoints of every line with at least one endpoint near another
/// line's endpoint or near a circumference.
pub fn significant_endpoints(primitives: &PrimitiveSet, threshold: f64) -> Vec<Candidate> {
    let mut out = Vec::new();
    for (i, line) in primitives.lines.iter().enumerate() {
        if [line.a, line.b]
            .iter()
            .any(|e| endpoint_is_significant(i, e, primitives, threshold))
        {
            out.push(Candidate::new(line.a, CandidateSource::Endpoint));
            out.push(Candidate::new(line.b, CandidateSource::Endpoint));
        }
    }
    out
}

/// Every circle center.
///
/// Whether some line passes near the center is computed and traced, but
/// centers are kept either way.
pub fn circle_centers(primitives: &PrimitiveSet, threshold: f64) -> Vec<Candidate> {
    primitives
        .circles
        .iter()
        .map(|c| {
            let center = c.circle.center;
            let line_nearby = primitives.lines.iter().any(|l| l.distance_to(&center) < threshold);
            log::trace!(
                "circle center ({:.1}, {:.1}) line nearby: {line_nearby}",
                center.x,
                center.y
            );
            Candidate::new(center, CandidateSource::CircleCenter)
        })
        .collect()
}

fn is_beyond_segment(p: &Point, line: &Line, overshoot: f64) -> bool {
    match line.axis_parameter(p) {
        Some(t) => t < -overshoot || t > 1.0 + overshoot,
        None => false,
    }
}

/// Virtual intersections of line pairs that do not meet within their drawn
/// extent, kept when they fall beyond at least one of the two segments.
pub fn extended_intersections(primitives: &PrimitiveSet, params: &ResolveParams) -> Vec<Candidate> {
    let eps = params.intersection_eps;
    let lines = &primitives.lines;
    let mut out = Vec::new();
    for (i, l0) in lines.iter().enumerate() {
        for l1 in &lines[i + 1..] {
            if intersections_between_lines(l0, l1, eps).is_some() {
                continue;
            }
            let e0 = l0.extended(params.extension);
            let e1 = l1.extended(params.extension);
            let Some(p) = intersections_between_lines(&e0, &e1, eps) else {
                continue;
            };
            if is_beyond_segment(&p, l0, params.overshoot) || is_beyond_segment(&p, l1, params.overshoot) {
                log::trace!("extended intersection at ({:.1}, {:.1})", p.x, p.y);
                out.push(Candidate::new(p, CandidateSource::Extended));
            }
        }
    }
    out
}

/// All candidates, in harvesting order: pairwise intersections, endpoints,
/// circle centers, extended intersections.
pub fn collect_candidates(primitives: &PrimitiveSet, params: &ResolveParams) -> Vec<Candidate> {
    let mut out = pairwise_intersections(primitives, params.intersection_eps);
    let n_pairwise = out.len();
    out.extend(significant_endpoints(primitives, params.endpoint_significance));
    out.extend(circle_centers(primitives, params.circle_center_threshold));
    let before_extended = out.len();
    out.extend(extended_intersections(primitives, params));
    log::debug!(
        "candidates: {n_pairwise} pairwise, {} endpoints/centers, {} extended",
        before_extended - n_pairwise,
        out.len() - before_extended
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use geodiagram_core::{ArcType, Circle, DetectedCircle, DetectionMethod};

    fn line(ax: f64, ay: f64, bx: f64, by: f64) -> Line {
        Line::new(Point::new(ax, ay), Point::new(bx, by))
    }

    fn circle(x: f64, y: f64, r: f64) -> DetectedCircle {
        DetectedCircle::new(
            Circle::new(Point::new(x, y), r),
            ArcType::FullCircle,
            DetectionMethod::Hough,
            1.0,
        )
    }

    #[test]
    fn crossing_lines_and_circle() {
        let set = PrimitiveSet::new(
            vec![line(0.0, 0.0, 10.0, 0.0), line(5.0, -5.0, 5.0, 5.0)],
            vec![circle(5.0, 0.0, 3.0)],
        );
        let found = pairwise_intersections(&set, 0.5);
        // one line/line crossing plus two hits per line on the circle
        assert_eq!(found.len(), 5);
        assert!(found
            .iter()
            .any(|c| (c.point - Point::new(5.0, 0.0)).norm() < 1e-9));
        assert!(found.iter().all(|c| c.source == CandidateSource::Intersection));
    }

    #[test]
    fn touching_endpoints_are_significant() {
        let set = PrimitiveSet::new(
            vec![
                line(0.0, 0.0, 50.0, 0.0),
                line(52.0, 3.0, 52.0, 60.0),
                line(200.0, 200.0, 260.0, 200.0),
            ],
            vec![],
        );
        let endpoints = significant_endpoints(&set, 10.0);
        assert_eq!(endpoints.len(), 4);
        assert!(endpoints.iter().all(|c| c.point.x < 100.0));
    }

    #[test]
    fn endpoint_near_circumference_is_significant() {
        let set = PrimitiveSet::new(vec![line(0.0, 0.0, 38.0, 0.0)], vec![circle(80.0, 0.0, 40.0)]);
        assert_eq!(significant_endpoints(&set, 10.0).len(), 2);
    }

    #[test]
    fn circle_centers_are_always_kept() {
        let set = PrimitiveSet::new(vec![line(300.0, 300.0, 400.0, 300.0)], vec![circle(50.0, 50.0, 20.0)]);
        let centers = circle_centers(&set, 15.0);
        assert_eq!(centers.len(), 1);
        assert_eq!(centers[0].point, Point::new(50.0, 50.0));
    }

    #[test]
    fn short_lines_meet_when_extended() {
        let set = PrimitiveSet::new(
            vec![line(0.0, 0.0, 40.0, 0.0), line(60.0, 10.0, 60.0, 50.0)],
            vec![],
        );
        let extended = extended_intersections(&set, &ResolveParams::default());
        assert_eq!(extended.len(), 1);
        assert_abs_diff_eq!(extended[0].point.x, 60.0, epsilon = 1e-6);
        assert_abs_diff_eq!(extended[0].point.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn parallel_or_crossing_lines_have_no_extended_point() {
        let params = ResolveParams::default();
        let parallel = PrimitiveSet::new(
            vec![line(0.0, 0.0, 40.0, 0.0), line(0.0, 10.0, 40.0, 10.0)],
            vec![],
        );
        assert!(extended_intersections(&parallel, &params).is_empty());
        let crossing = PrimitiveSet::new(
            vec![line(0.0, 0.0, 40.0, 0.0), line(20.0, -10.0, 20.0, 10.0)],
            vec![],
        );
        assert!(extended_intersections(&crossing, &params).is_empty());
    }
}
