//! Multi-scale ring template matching against the ink mask.
//!
//! Templates are rasterized directly at every scale rather than resized and
//! scored with normalized cross-correlation over every placement.

use std::f64::consts::PI;

use geodiagram_core::raster::{draw_arc, draw_circle};
use geodiagram_core::{ArcType, Circle, DetectedCircle, DetectionMethod, GrayImage, Point};
use imageproc::template_matching::{self, MatchTemplateMethod};

use crate::luma::{to_luma, LumaImage};
use crate::params::TemplateParams;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Ring shapes searched for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TemplateShape {
    Full,
    /// Half ring below the center (image convention, y down).
    LowerHalf,
    UpperHalf,
}

impl TemplateShape {
    pub const ALL: [TemplateShape; 3] = [
        TemplateShape::Full,
        TemplateShape::LowerHalf,
        TemplateShape::UpperHalf,
    ];

    pub fn arc_type(self) -> ArcType {
        match self {
            TemplateShape::Full => ArcType::FullCircle,
            TemplateShape::LowerHalf | TemplateShape::UpperHalf => ArcType::Semicircle,
        }
    }
}

/// One rasterized template at a given scale.
#[derive(Clone, Debug)]
pub struct RingTemplate {
    pub shape: TemplateShape,
    pub scale: f64,
    pub size: usize,
    /// `size x size` window, ring pixels at 255.
    pub image: image::GrayImage,
}

impl RingTemplate {
    /// Rasterize `shape` at `scale`; the base window is `2 r + 4` pixels.
    pub fn new(shape: TemplateShape, scale: f64, params: &TemplateParams) -> Option<Self> {
        let base = 2.0 * params.base_radius + 4.0;
        let size = (base * scale).floor() as usize;
        if size == 0 {
            return None;
        }
        let half = 0.5 * base * scale;
        let circle = Circle::new(Point::new(half, half), params.base_radius * scale);
        let stroke = (params.stroke * scale).max(1.0);
        let mut img = GrayImage::new(size, size);
        match shape {
            TemplateShape::Full => draw_circle(&mut img, &circle, stroke, 255),
            TemplateShape::LowerHalf => draw_arc(&mut img, &circle, 0.0, PI, stroke, 255),
            TemplateShape::UpperHalf => draw_arc(&mut img, &circle, PI, PI, stroke, 255),
        }
        let ring = img.data.iter().filter(|&&v| v != 0).count();
        if ring == 0 || ring == size * size {
            return None;
        }
        Some(Self {
            shape,
            scale,
            size,
            image: to_luma(&img),
        })
    }

    /// Ring pixel coordinates inside the window.
    pub fn ring_pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.image
            .enumerate_pixels()
            .filter(|(_, _, v)| v[0] != 0)
            .map(|(x, y, _)| (x, y))
    }
}

/// Template match location (top-left corner) and score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TemplateMatch {
    pub x: usize,
    pub y: usize,
    pub score: f32,
}

/// Normalized cross-correlation of `template` over every placement on the
/// ink mask, keeping placements scoring at least `min_score`. A template
/// larger than the mask has no placement.
pub fn match_template(mask: &image::GrayImage, template: &RingTemplate, min_score: f32) -> Vec<TemplateMatch> {
    let (tw, th) = template.image.dimensions();
    if tw > mask.width() || th > mask.height() {
        return Vec::new();
    }
    let scores = template_matching::match_template(
        mask,
        &template.image,
        MatchTemplateMethod::CrossCorrelationNormalized,
    );
    scores
        .enumerate_pixels()
        .filter(|(_, _, v)| v[0].is_finite() && v[0] >= min_score)
        .map(|(x, y, v)| TemplateMatch {
            x: x as usize,
            y: y as usize,
            score: v[0],
        })
        .collect()
}

/// Circles and semicircles found by template matching on the ink mask.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(binary, params), fields(width = binary.width, height = binary.height))
)]
pub fn detect_template_circles(binary: &GrayImage, params: &TemplateParams) -> Vec<DetectedCircle> {
    let (w, h) = (binary.width, binary.height);
    if w < params.min_image_size || h < params.min_image_size {
        log::debug!("template matching skipped on {w}x{h} raster");
        return Vec::new();
    }
    let mask: LumaImage = to_luma(binary);
    let base_half = params.base_radius + 2.0;
    let max_radius = w.min(h) as f64 / params.max_radius_divisor;

    let mut out = Vec::new();
    for shape in TemplateShape::ALL {
        for &scale in &params.scales {
            let Some(template) = RingTemplate::new(shape, scale, params) else {
                continue;
            };
            if template.size < params.min_template_size || template.size > w || template.size > h {
                log::trace!("template {shape:?} at scale {scale} skipped ({} px)", template.size);
                continue;
            }
            let radius = base_half * scale;
            if !(params.min_radius < radius && radius < max_radius) {
                continue;
            }
            for m in match_template(&mask, &template, params.match_threshold) {
                if m.score > params.accept_threshold {
                    let center = Point::new(m.x as f64 + radius, m.y as f64 + radius);
                    out.push(DetectedCircle::new(
                        Circle::new(center, radius),
                        shape.arc_type(),
                        DetectionMethod::Template,
                        m.score,
                    ));
                }
            }
        }
    }
    log::debug!("template circles: {} matches", out.len());
    out
}
