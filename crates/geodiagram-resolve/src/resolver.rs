use std::collections::BTreeMap;

use geodiagram_core::{AssignedValue, DetectedCircle, Point, Variable};
use geodiagram_primitives::PrimitiveSet;
use serde::{Deserialize, Serialize};

use crate::candidates::collect_candidates;
use crate::cluster::cluster_points;
use crate::filter::{remove_isolated, within_bounds};
use crate::params::ResolveParams;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Canonical points, circles grouped by center and their symbolic handles.
///
/// Point keys are indices into `points`. Circle keys are `(center key,
/// radius key)` with radius keys enumerated per center.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreParse {
    pub points: Vec<Point>,
    pub point_variables: Vec<Variable>,
    pub circles: BTreeMap<usize, Vec<DetectedCircle>>,
    pub radius_variables: BTreeMap<usize, Vec<Variable>>,
    pub assignment: BTreeMap<String, AssignedValue>,
}

impl CoreParse {
    #[inline]
    pub fn point(&self, key: usize) -> Option<Point> {
        self.points.get(key).copied()
    }

    pub fn circle(&self, center_key: usize, radius_key: usize) -> Option<&DetectedCircle> {
        self.circles.get(&center_key)?.get(radius_key)
    }

    /// `((center key, radius key), circle)` in key order.
    pub fn iter_circles(&self) -> impl Iterator<Item = ((usize, usize), &DetectedCircle)> + '_ {
        self.circles
            .iter()
            .flat_map(|(&c, list)| list.iter().enumerate().map(move |(r, circle)| ((c, r), circle)))
    }

    /// Concrete value assigned to `variable`.
    pub fn evaluate(&self, variable: &Variable) -> Option<AssignedValue> {
        self.assignment.get(&variable.id).copied()
    }
}

/// Turns selected primitives into canonical points.
#[derive(Clone, Debug, Default)]
pub struct CoreResolver {
    params: ResolveParams,
}

impl CoreResolver {
    pub fn new(params: ResolveParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &ResolveParams {
        &self.params
    }

    /// Resolve canonical points. `bounds` is the `(width, height)` of the
    /// source raster; without it a square of `fallback_extent` is assumed.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, primitives),
            fields(lines = primitives.lines.len(), circles = primitives.circles.len())
        )
    )]
    pub fn resolve(&self, primitives: &PrimitiveSet, bounds: Option<(f64, f64)>) -> CoreParse {
        let p = &self.params;
        let (width, height) = bounds.unwrap_or((p.fallback_extent, p.fallback_extent));

        let candidates = collect_candidates(primitives, p);
        let candidates = within_bounds(candidates, width, height, p.margin_ratio);
        let candidates = remove_isolated(candidates, p.isolation_factor);
        let positions: Vec<Point> = candidates.iter().map(|c| c.point).collect();

        let mut points = cluster_points(&positions, p.radius_threshold, p.max_clusters, p.max_iters);
        let clustered = points.len();
        reconcile_endpoints(&mut points, primitives, p.endpoint_tolerance);
        log::debug!(
            "core points: {} candidates, {clustered} clustered, {} with endpoints",
            positions.len(),
            points.len()
        );

        let circles = group_circles(&points, primitives, p.circle_membership_eps);
        build_parse(points, circles)
    }
}

/// Append every line endpoint farther than `tolerance` from all points so
/// far, including endpoints appended earlier.
pub fn reconcile_endpoints(points: &mut Vec<Point>, primitives: &PrimitiveSet, tolerance: f64) {
    for line in &primitives.lines {
        for endpoint in [line.a, line.b] {
            if !points.iter().any(|p| (p - endpoint).norm() <= tolerance) {
                log::trace!("endpoint ({:.1}, {:.1}) appended", endpoint.x, endpoint.y);
                points.push(endpoint);
            }
        }
    }
}

/// Circles owned by each canonical point whose distance to the circle
/// center is at most `eps`, in primitive order.
pub fn group_circles(points: &[Point], primitives: &PrimitiveSet, eps: f64) -> BTreeMap<usize, Vec<DetectedCircle>> {
    let mut out = BTreeMap::new();
    for (key, p) in points.iter().enumerate() {
        let owned: Vec<DetectedCircle> = primitives
            .circles
            .iter()
            .filter(|c| (c.circle.center - p).norm() <= eps)
            .copied()
            .collect();
        if !owned.is_empty() {
            out.insert(key, owned);
        }
    }
    out
}

fn build_parse(points: Vec<Point>, circles: BTreeMap<usize, Vec<DetectedCircle>>) -> CoreParse {
    let mut assignment = BTreeMap::new();
    let point_variables: Vec<Variable> = points
        .iter()
        .enumerate()
        .map(|(key, p)| {
            let v = Variable::point(key);
            assignment.insert(v.id.clone(), AssignedValue::Point(*p));
            v
        })
        .collect();

    let mut radius_variables = BTreeMap::new();
    for (&center_key, list) in &circles {
        let vars: Vec<Variable> = list
            .iter()
            .enumerate()
            .map(|(radius_key, c)| {
                let v = Variable::radius(center_key, radius_key);
                assignment.insert(v.id.clone(), AssignedValue::Number(c.circle.radius));
                v
            })
            .collect();
        radius_variables.insert(center_key, vars);
    }

    CoreParse {
        points,
        point_variables,
        circles,
        radius_variables,
        assignment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geodiagram_core::{ArcType, Circle, DetectionMethod, Line};

    fn line(ax: f64, ay: f64, bx: f64, by: f64) -> Line {
        Line::new(Point::new(ax, ay), Point::new(bx, by))
    }

    fn full_circle(x: f64, y: f64, r: f64) -> DetectedCircle {
        DetectedCircle::new(
            Circle::new(Point::new(x, y), r),
            ArcType::FullCircle,
            DetectionMethod::Hough,
            1.0,
        )
    }

    #[test]
    fn triangle_resolves_to_three_corners() {
        let set = PrimitiveSet::new(
            vec![
                line(100.0, 100.0, 300.0, 100.0),
                line(300.0, 100.0, 200.0, 250.0),
                line(200.0, 250.0, 100.0, 100.0),
            ],
            vec![],
        );
        let parse = CoreResolver::default().resolve(&set, Some((400.0, 300.0)));
        assert_eq!(parse.points.len(), 3);
        for corner in [Point::new(100.0, 100.0), Point::new(300.0, 100.0), Point::new(200.0, 250.0)] {
            assert!(parse.points.iter().any(|p| (p - corner).norm() < 2.0), "{corner:?}");
        }
        assert_eq!(parse.point_variables[2].id, "point_2");
        assert!(parse.circles.is_empty());
        assert_eq!(parse.assignment.len(), 3);
    }

    #[test]
    fn every_endpoint_is_near_a_point() {
        let set = PrimitiveSet::new(
            vec![
                line(10.0, 10.0, 90.0, 10.0),
                line(200.0, 200.0, 260.0, 240.0),
                line(50.0, 150.0, 50.0, 290.0),
            ],
            vec![],
        );
        let parse = CoreResolver::default().resolve(&set, Some((300.0, 300.0)));
        for l in &set.lines {
            for e in [l.a, l.b] {
                assert!(parse.points.iter().any(|p| (p - e).norm() <= 15.0), "{e:?}");
            }
        }
    }

    #[test]
    fn circle_is_keyed_by_its_center_point() {
        let set = PrimitiveSet::new(
            vec![line(40.0, 100.0, 160.0, 100.0)],
            vec![full_circle(100.0, 100.0, 50.0)],
        );
        let parse = CoreResolver::default().resolve(&set, Some((200.0, 200.0)));
        let (&center_key, list) = parse.circles.iter().next().expect("circle grouped");
        assert_eq!(list.len(), 1);
        assert!((parse.points[center_key] - Point::new(100.0, 100.0)).norm() <= 5.0);
        let radius = &parse.radius_variables[&center_key][0];
        assert_eq!(radius.id, format!("radius_{center_key}_0"));
        assert_eq!(parse.evaluate(radius), Some(AssignedValue::Number(50.0)));
        assert_eq!(parse.iter_circles().count(), 1);
    }

    #[test]
    fn empty_primitives_give_an_empty_parse() {
        let parse = CoreResolver::default().resolve(&PrimitiveSet::default(), None);
        assert_eq!(parse, CoreParse::default());
    }

    #[test]
    fn endpoints_are_appended_once() {
        let mut points = vec![Point::new(0.0, 0.0)];
        let set = PrimitiveSet::new(
            vec![line(5.0, 0.0, 100.0, 0.0), line(100.0, 3.0, 100.0, 80.0)],
            vec![],
        );
        reconcile_endpoints(&mut points, &set, 15.0);
        assert_eq!(
            points,
            vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0), Point::new(100.0, 80.0)]
        );
    }
}
