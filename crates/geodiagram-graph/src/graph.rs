//! Incidence graph types.

use geodiagram_core::{Arc, DetectedCircle, Formula, Line};
use serde::{Deserialize, Serialize};

/// Supported segment between two canonical points.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineEdge {
    pub from: usize,
    pub to: usize,
    pub line: Line,
    /// Other canonical points lying on the segment, ascending.
    pub points: Vec<usize>,
    /// `Line(point_from, point_to)`.
    pub variable: Formula,
}

/// Undirected graph over canonical point keys; `from < to` on every edge.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LineGraph {
    pub edges: Vec<LineEdge>,
}

impl LineGraph {
    /// Edge joining `a` and `b` in either order.
    pub fn edge(&self, a: usize, b: usize) -> Option<&LineEdge> {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        self.edges.iter().find(|e| e.from == lo && e.to == hi)
    }

    #[inline]
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.edge(a, b).is_some()
    }

    /// Keys adjacent to `key`, ascending.
    pub fn neighbors(&self, key: usize) -> Vec<usize> {
        let mut out: Vec<usize> = self
            .edges
            .iter()
            .filter_map(|e| {
                if e.from == key {
                    Some(e.to)
                } else if e.to == key {
                    Some(e.from)
                } else {
                    None
                }
            })
            .collect();
        out.sort_unstable();
        out
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// One circle of the registry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CircleEntry {
    pub center_key: usize,
    pub radius_key: usize,
    pub circle: DetectedCircle,
    /// Canonical points on the circumference, ascending.
    pub points: Vec<usize>,
    /// `Circle(point_c, radius_c_r)`.
    pub variable: Formula,
    /// Whether the foreground pixels support the circle.
    pub supported: bool,
}

/// Directed arc between two member points of a circle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArcEdge {
    pub from: usize,
    pub to: usize,
    pub arc: Arc,
    /// Other member points lying on the arc, ascending.
    pub points: Vec<usize>,
    /// `Arc(Circle(..), point_from, point_to)`.
    pub variable: Formula,
}

/// Directed arc graph of one circle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArcGraph {
    pub center_key: usize,
    pub radius_key: usize,
    pub edges: Vec<ArcEdge>,
}

impl ArcGraph {
    pub fn edge(&self, from: usize, to: usize) -> Option<&ArcEdge> {
        self.edges.iter().find(|e| e.from == from && e.to == to)
    }
}

/// Line graph, circle registry and per-circle arc graphs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphParse {
    pub line_graph: LineGraph,
    /// Ordered by `(center_key, radius_key)`.
    pub circles: Vec<CircleEntry>,
    /// Same order as `circles`.
    pub arc_graphs: Vec<ArcGraph>,
}

impl GraphParse {
    pub fn circle(&self, center_key: usize, radius_key: usize) -> Option<&CircleEntry> {
        self.circles
            .iter()
            .find(|c| c.center_key == center_key && c.radius_key == radius_key)
    }

    pub fn arc_graph(&self, center_key: usize, radius_key: usize) -> Option<&ArcGraph> {
        self.arc_graphs
            .iter()
            .find(|g| g.center_key == center_key && g.radius_key == radius_key)
    }
}
