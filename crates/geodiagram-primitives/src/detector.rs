use geodiagram_core::{DetectedCircle, DiagramSegment};

use crate::contour::detect_contour_circles;
use crate::dedup::remove_duplicate_circles;
use crate::hough_circles::detect_hough_circles;
use crate::hough_lines::detect_lines;
use crate::params::PrimitiveParams;
use crate::set::PrimitiveSet;
use crate::template::detect_template_circles;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Line and circle detector over one diagram segment.
#[derive(Clone, Debug, Default)]
pub struct PrimitiveDetector {
    params: PrimitiveParams,
}

impl PrimitiveDetector {
    pub fn new(params: PrimitiveParams) -> Self {
        Self { params }
    }

    /// Detector parameters.
    #[inline]
    pub fn params(&self) -> &PrimitiveParams {
        &self.params
    }

    /// Detect lines and circles. Never fails: a strategy that finds nothing
    /// contributes nothing.
    #[cfg_attr(
        feature = "tracing",
        instrument(
            level = "info",
            skip(self, segment),
            fields(width = segment.width(), height = segment.height(), pixels = segment.pixels().len())
        )
    )]
    pub fn detect(&self, segment: &DiagramSegment) -> PrimitiveSet {
        let lines = detect_lines(segment.binary(), segment.pixels(), &self.params.lines);
        let circles = self.detect_circles(segment);
        log::debug!(
            "primitives: {} lines, {} circles",
            lines.len(),
            circles.len()
        );
        PrimitiveSet::new(lines, circles)
    }

    /// Hough circles, then contour and template candidates when enabled,
    /// deduplicated with first-seen priority.
    pub fn detect_circles(&self, segment: &DiagramSegment) -> Vec<DetectedCircle> {
        let p = &self.params;
        let mut circles = detect_hough_circles(segment.gray(), &p.hough_circles);
        if !p.enhanced_circles {
            return circles;
        }

        if p.contour_detection {
            let contour = detect_contour_circles(segment.gray(), &p.contour);
            log::debug!("contour strategy: {} candidates", contour.len());
            circles.extend(contour);
        }
        if p.template_matching {
            let template = detect_template_circles(segment.binary(), &p.template);
            log::debug!("template strategy: {} candidates", template.len());
            circles.extend(template);
        }

        let before = circles.len();
        let circles = remove_duplicate_circles(circles, &p.dedup);
        log::debug!("circle dedup: {before} -> {}", circles.len());
        circles
    }
}
