use geodiagram_core::{Arc, ArcType, DetectedCircle, Formula, Line, Point, Variable};
use geodiagram_resolve::CoreParse;

use crate::existence::{arc_exists, circle_exists, line_exists};
use crate::graph::{ArcEdge, ArcGraph, CircleEntry, GraphParse, LineEdge, LineGraph};
use crate::params::GraphParams;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Points closer than this are treated as one location.
const COINCIDENT: f64 = 1e-9;

/// Builds incidence graphs from canonical points and foreground pixels.
#[derive(Clone, Debug, Default)]
pub struct GraphBuilder {
    params: GraphParams,
}

impl GraphBuilder {
    pub fn new(params: GraphParams) -> Self {
        Self { params }
    }

    #[inline]
    pub fn params(&self) -> &GraphParams {
        &self.params
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, core, pixels),
            fields(points = core.points.len(), pixels = pixels.len())
        )
    )]
    pub fn build(&self, core: &CoreParse, pixels: &[Point]) -> GraphParse {
        let line_graph = self.line_graph(core, pixels);
        let circles = self.circle_registry(core, pixels);
        let arc_graphs: Vec<ArcGraph> = circles
            .iter()
            .map(|entry| self.arc_graph(core, entry, pixels))
            .collect();
        log::debug!(
            "graph: {} line edges, {} circles, {} arc edges",
            line_graph.len(),
            circles.len(),
            arc_graphs.iter().map(|g| g.edges.len()).sum::<usize>()
        );
        GraphParse {
            line_graph,
            circles,
            arc_graphs,
        }
    }

    /// Whether `circle` is handled with the partial-circle relaxations.
    fn is_partial(&self, circle: &DetectedCircle) -> bool {
        self.params.partial_circles && circle.is_partial()
    }

    /// Edges between every pair of distinct canonical points whose segment is
    /// supported by the pixels.
    pub fn line_graph(&self, core: &CoreParse, pixels: &[Point]) -> LineGraph {
        let points = &core.points;
        let mut edges = Vec::new();
        for (i, a) in points.iter().enumerate() {
            for (j, b) in points.iter().enumerate().skip(i + 1) {
                if (a - b).norm() <= COINCIDENT {
                    log::trace!("points {i} and {j} coincide");
                    continue;
                }
                let line = Line::new(*a, *b);
                if !line_exists(pixels, &line, &self.params) {
                    continue;
                }
                let collinear: Vec<usize> = points
                    .iter()
                    .enumerate()
                    .filter(|(k, p)| *k != i && *k != j && line.distance_to(p) <= self.params.line_eps)
                    .map(|(k, _)| k)
                    .collect();
                edges.push(LineEdge {
                    from: i,
                    to: j,
                    line,
                    points: collinear,
                    variable: Formula::line(Variable::point(i), Variable::point(j)),
                });
            }
        }
        LineGraph { edges }
    }

    /// Registry entries for every grouped circle, with member points and
    /// pixel support.
    pub fn circle_registry(&self, core: &CoreParse, pixels: &[Point]) -> Vec<CircleEntry> {
        let p = &self.params;
        core.iter_circles()
            .map(|((center_key, radius_key), detected)| {
                let partial = self.is_partial(detected);
                let mut eps = p.circle_eps * p.membership_scale;
                if partial {
                    eps *= p.partial_scale;
                }
                let members: Vec<usize> = core
                    .points
                    .iter()
                    .enumerate()
                    .filter(|(_, q)| detected.circle.distance_to(q) <= eps)
                    .map(|(k, _)| k)
                    .collect();
                let arc_type = if p.partial_circles {
                    detected.arc_type
                } else {
                    ArcType::FullCircle
                };
                let supported = circle_exists(pixels, &detected.circle, arc_type, p);
                if !supported {
                    log::debug!(
                        "circle ({center_key}, {radius_key}) r={:.1} lacks pixel support",
                        detected.circle.radius
                    );
                }
                CircleEntry {
                    center_key,
                    radius_key,
                    circle: *detected,
                    points: members,
                    variable: Formula::circle(Variable::point(center_key), Variable::radius(center_key, radius_key)),
                    supported,
                }
            })
            .collect()
    }

    /// Directed arcs between ordered pairs of member points. Arcs of partial
    /// circles are accepted without a pixel test.
    pub fn arc_graph(&self, core: &CoreParse, entry: &CircleEntry, pixels: &[Point]) -> ArcGraph {
        let partial = self.is_partial(&entry.circle);
        let circle = entry.circle.circle;
        let mut edges = Vec::new();
        for &i in &entry.points {
            for &j in &entry.points {
                if i == j {
                    continue;
                }
                let (Some(a), Some(b)) = (core.point(i), core.point(j)) else {
                    continue;
                };
                if (a - b).norm() <= COINCIDENT {
                    continue;
                }
                let arc = Arc::new(circle, a, b);
                if !partial && !arc_exists(pixels, &arc, &self.params) {
                    continue;
                }
                let on_arc: Vec<usize> = entry
                    .points
                    .iter()
                    .copied()
                    .filter(|&k| k != i && k != j)
                    .filter(|&k| core.point(k).is_some_and(|q| arc.distance_to(&q) <= self.params.circle_eps))
                    .collect();
                edges.push(ArcEdge {
                    from: i,
                    to: j,
                    arc,
                    points: on_arc,
                    variable: Formula::arc(entry.variable.clone(), Variable::point(i), Variable::point(j)),
                });
            }
        }
        ArcGraph {
            center_key: entry.center_key,
            radius_key: entry.radius_key,
            edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geodiagram_core::raster::{draw_arc, draw_circle, draw_line};
    use geodiagram_core::{Circle, DetectionMethod, GrayImage};
    use geodiagram_primitives::PrimitiveSet;
    use geodiagram_resolve::CoreResolver;
    use std::collections::BTreeMap;
    use std::f64::consts::PI;

    fn core_with(points: Vec<Point>, circles: BTreeMap<usize, Vec<DetectedCircle>>) -> CoreParse {
        CoreParse {
            point_variables: (0..points.len()).map(Variable::point).collect(),
            points,
            circles,
            ..CoreParse::default()
        }
    }

    #[test]
    fn collinear_points_are_recorded() {
        let mut img = GrayImage::new(200, 100);
        draw_line(&mut img, &Line::new(Point::new(20.0, 50.0), Point::new(180.0, 50.0)), 2.0, 255);
        let core = core_with(
            vec![Point::new(20.0, 50.0), Point::new(100.0, 50.0), Point::new(180.0, 50.0), Point::new(100.0, 10.0)],
            BTreeMap::new(),
        );
        let graph = GraphBuilder::default().line_graph(&core, &img.foreground_pixels());
        assert_eq!(graph.len(), 3);
        let long = graph.edge(2, 0).expect("long edge");
        assert_eq!(long.points, vec![1]);
        assert_eq!(long.variable.to_string(), "Line(point_0, point_2)");
        assert!(graph.has_edge(0, 1) && graph.has_edge(1, 2));
        assert!(graph.neighbors(3).is_empty());
    }

    #[test]
    fn coincident_points_make_no_edge() {
        let core = core_with(vec![Point::new(5.0, 5.0), Point::new(5.0, 5.0)], BTreeMap::new());
        let pixels = vec![Point::new(5.0, 5.0)];
        assert!(GraphBuilder::default().line_graph(&core, &pixels).is_empty());
    }

    fn circle_scene(arc_type: ArcType) -> (CoreParse, Vec<Point>) {
        let circle = Circle::new(Point::new(100.0, 100.0), 50.0);
        let mut img = GrayImage::new(200, 200);
        match arc_type {
            ArcType::FullCircle => draw_circle(&mut img, &circle, 2.0, 255),
            _ => draw_arc(&mut img, &circle, 0.0, PI, 1.0, 255),
        }
        let mut circles = BTreeMap::new();
        circles.insert(0, vec![DetectedCircle::new(circle, arc_type, DetectionMethod::Contour, 0.8)]);
        let points = vec![
            circle.center,
            circle.point_at(0.0),
            circle.point_at(0.5 * PI),
            circle.point_at(PI),
            // just outside the full tolerance, inside the partial one
            Point::new(100.0, 160.0),
        ];
        (core_with(points, circles), img.foreground_pixels())
    }

    #[test]
    fn full_circle_registry_and_arcs() {
        let (core, pixels) = circle_scene(ArcType::FullCircle);
        let graph = GraphBuilder::default().build(&core, &pixels);
        let entry = graph.circle(0, 0).expect("circle entry");
        assert_eq!(entry.points, vec![1, 2, 3]);
        assert!(entry.supported);
        assert_eq!(entry.variable.to_string(), "Circle(point_0, radius_0_0)");

        let arcs = graph.arc_graph(0, 0).expect("arc graph");
        assert_eq!(arcs.edges.len(), 6);
        let half = arcs.edge(1, 3).expect("lower half");
        assert_eq!(half.points, vec![2]);
        assert!(arcs.edge(3, 1).expect("upper half").points.is_empty());
    }

    #[test]
    fn partial_circle_is_lenient() {
        let (core, pixels) = circle_scene(ArcType::Semicircle);
        let graph = GraphBuilder::default().build(&core, &pixels);
        let entry = graph.circle(0, 0).expect("circle entry");
        assert_eq!(entry.points, vec![1, 2, 3, 4]);
        assert!(entry.supported);
        // every ordered pair exists without a pixel test
        assert_eq!(graph.arc_graphs[0].edges.len(), 12);

        let strict = GraphBuilder::new(GraphParams {
            partial_circles: false,
            ..GraphParams::default()
        })
        .build(&core, &pixels);
        let entry = strict.circle(0, 0).expect("circle entry");
        assert_eq!(entry.points, vec![1, 2, 3]);
        assert!(!entry.supported);
        assert!(strict.arc_graphs[0].edges.len() < 6);
    }

    #[test]
    fn resolver_output_feeds_the_builder() {
        let a = Point::new(40.0, 160.0);
        let b = Point::new(160.0, 160.0);
        let c = Point::new(100.0, 56.0);
        let lines = vec![Line::new(a, b), Line::new(b, c), Line::new(c, a)];
        let mut img = GrayImage::new(200, 200);
        for l in &lines {
            draw_line(&mut img, l, 2.0, 255);
        }
        let core = CoreResolver::default().resolve(&PrimitiveSet::new(lines, vec![]), Some((200.0, 200.0)));
        assert_eq!(core.points.len(), 3);
        let graph = GraphBuilder::default().build(&core, &img.foreground_pixels());
        assert_eq!(graph.line_graph.len(), 3);
        assert!(graph.circles.is_empty());
    }
}
