//! Incidence statements extracted from a graph parse.

use geodiagram_core::{Formula, Variable};

use crate::graph::GraphParse;

/// `PointLiesOnLine(point_k, Line(point_i, point_j))` for every line edge
/// and collinear point, then `PointLiesOnCircle(point_k, Circle(point_c,
/// radius_c_r))` for every circle member.
pub fn confident_formulas(graph: &GraphParse) -> Vec<Formula> {
    let mut out = Vec::new();
    for edge in &graph.line_graph.edges {
        for &k in &edge.points {
            out.push(Formula::point_lies_on_line(Variable::point(k), edge.variable.clone()));
        }
    }
    for entry in &graph.circles {
        for &k in &entry.points {
            out.push(Formula::point_lies_on_circle(Variable::point(k), entry.variable.clone()));
        }
    }
    log::debug!("{} confident formulas", out.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{CircleEntry, LineEdge, LineGraph};
    use geodiagram_core::{ArcType, Circle, DetectedCircle, DetectionMethod, Line, Point};

    #[test]
    fn statements_render_in_edge_order() {
        let graph = GraphParse {
            line_graph: LineGraph {
                edges: vec![LineEdge {
                    from: 0,
                    to: 1,
                    line: Line::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0)),
                    points: vec![2],
                    variable: Formula::line(Variable::point(0), Variable::point(1)),
                }],
            },
            circles: vec![CircleEntry {
                center_key: 3,
                radius_key: 0,
                circle: DetectedCircle::new(
                    Circle::new(Point::new(5.0, 5.0), 5.0),
                    ArcType::FullCircle,
                    DetectionMethod::Hough,
                    1.0,
                ),
                points: vec![0, 1],
                variable: Formula::circle(Variable::point(3), Variable::radius(3, 0)),
                supported: true,
            }],
            arc_graphs: Vec::new(),
        };
        let rendered: Vec<String> = confident_formulas(&graph).iter().map(|f| f.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "PointLiesOnLine(point_2, Line(point_0, point_1))",
                "PointLiesOnCircle(point_0, Circle(point_3, radius_3_0))",
                "PointLiesOnCircle(point_1, Circle(point_3, radius_3_0))",
            ]
        );
    }

    #[test]
    fn empty_graph_has_no_statements() {
        assert!(confident_formulas(&GraphParse::default()).is_empty());
    }
}
