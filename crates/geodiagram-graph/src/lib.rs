//! Incidence graphs over canonical diagram points.
//!
//! The line graph joins two canonical points when the foreground pixels
//! support the segment between them. The circle registry lists, per circle,
//! the canonical points on its circumference; every circle also gets a
//! directed arc graph over those points. Partial circles (semicircles,
//! quarter circles, generic arcs) use wider tolerances and accept their
//! arcs without a pixel test.
//!
//! [`confident_formulas`] turns a [`GraphParse`] into `PointLiesOnLine` and
//! `PointLiesOnCircle` statements.

mod builder;
mod existence;
mod formulas;
mod graph;
mod params;

pub use builder::GraphBuilder;
pub use existence::{arc_exists, arc_support, circle_exists, circle_support, line_exists, line_support};
pub use formulas::confident_formulas;
pub use graph::{ArcEdge, ArcGraph, CircleEntry, GraphParse, LineEdge, LineGraph};
pub use params::GraphParams;
