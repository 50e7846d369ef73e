//! High-level facade for the `geodiagram-*` crates.
//!
//! Turns a raster of a geometric diagram into canonical points, line and
//! arc incidence graphs, a circle registry and `PointLiesOnLine` /
//! `PointLiesOnCircle` statements.
//!
//! ## Quickstart
//!
//! ```no_run
//! # #[cfg(feature = "image")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use geodiagram::detect;
//!
//! let segment = detect::load_segment("diagram.png")?;
//! let parse = geodiagram::DiagramParser::default().parse(&segment)?;
//! for formula in parse.formula_strings() {
//!     println!("{formula}");
//! }
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "image"))]
//! # fn main() {}
//! ```
//!
//! ## Stages
//!
//! - [`primitives`]: Hough lines plus Hough, contour and template circles,
//!   and the [`PrimitiveSelector`] seam.
//! - [`resolve`]: candidate intersections clustered into canonical points.
//! - [`graph`]: incidence graphs and formula extraction.
//!
//! ## Features
//!
//! - `image` (default): decoding image files into a [`DiagramSegment`].
//! - `cli` (default): the `geodiagram` binary.
//! - `tracing`: spans on the pipeline stages.

pub use geodiagram_core as core;
pub use geodiagram_graph as graph;
pub use geodiagram_primitives as primitives;
pub use geodiagram_resolve as resolve;

pub use geodiagram_core::{
    init_with_level, AssignedValue, DiagramSegment, Formula, GrayImage, Point, Variable,
};
pub use geodiagram_graph::{GraphParams, GraphParse};
pub use geodiagram_primitives::{
    CoverageParams, PassThroughSelector, PrimitiveParams, PrimitiveSelector, PrimitiveSet,
    SelectError,
};
pub use geodiagram_resolve::{CoreParse, ResolveParams};

#[cfg(feature = "tracing")]
pub use geodiagram_core::init_tracing;

mod io;
mod pipeline;

pub use io::{DiagramConfig, DiagramIoError, DiagramReport};
pub use pipeline::{DiagramParams, DiagramParse, DiagramParser, ParseError};

#[cfg(feature = "image")]
pub mod detect;
