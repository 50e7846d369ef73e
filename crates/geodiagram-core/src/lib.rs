//! Core types and utilities for geometric diagram parsing.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any concrete detector or image decoding library: rasters are
//! plain row-major byte buffers and all coordinates are `f64` pixels.

mod formula;
mod geometry;
mod image;
mod intersect;
mod logger;
pub mod raster;

pub use formula::{AssignedValue, Formula, FunctionKind, Variable, VariableKind};
pub use geometry::{
    cartesian_angle, ccw_angle_between, Arc, ArcType, Circle, DetectedCircle, DetectionMethod,
    Line, Point,
};
pub use image::{otsu_threshold, DiagramSegment, GrayImage, GrayImageView, SegmentError};
pub use intersect::{
    intersections_between_circle_and_line, intersections_between_circles,
    intersections_between_lines, TANGENT_MERGE_ANGLE_DEG,
};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
