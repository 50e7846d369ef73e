//! Primitive detection for geometric diagram rasters.
//!
//! Lines come from a standard Hough accumulator followed by pixel-run
//! segmentation. Circles and arcs come from three strategies whose outputs
//! are concatenated and deduplicated:
//!
//! - gradient Hough transform on the grayscale raster,
//! - contour tracing with minimum enclosing circle fits,
//! - ring template matching against the ink mask.
//!
//! Every circle carries its own [`ArcType`](geodiagram_core::ArcType),
//! detection method and confidence.
//!
//! ```no_run
//! use geodiagram_core::{DiagramSegment, GrayImage};
//! use geodiagram_primitives::{PrimitiveDetector, PrimitiveParams};
//!
//! let segment = DiagramSegment::from_gray(GrayImage::filled(64, 64, 255));
//! let set = PrimitiveDetector::new(PrimitiveParams::default()).detect(&segment);
//! println!("{} lines, {} circles", set.lines.len(), set.circles.len());
//! ```

mod contour;
mod dedup;
mod detector;
mod enclosing;
mod hough_circles;
mod hough_lines;
mod luma;
mod morphology;
mod params;
mod selector;
mod set;
mod template;

pub use contour::{analyze_contour, angular_coverage, classify_shape, detect_contour_circles, external_contours};
pub use dedup::remove_duplicate_circles;
pub use detector::PrimitiveDetector;
pub use enclosing::min_enclosing_circle;
pub use hough_circles::detect_hough_circles;
pub use hough_lines::{detect_lines, hough_line_peaks, rho_theta_distance, segment_peak, suppress_peaks, RhoTheta};
pub use morphology::{adaptive_threshold_inv, close3x3, dilate3x3, erode3x3};
pub use params::{ContourParams, DedupParams, HoughCircleParams, LineDetectParams, PrimitiveParams, TemplateParams};
pub use selector::{CoverageParams, CoverageSelector, PassThroughSelector, PrimitiveSelector, SelectError};
pub use set::{Primitive, PrimitiveSet};
pub use template::{detect_template_circles, match_template, RingTemplate, TemplateMatch, TemplateShape};
