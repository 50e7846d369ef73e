//! Pixel-support tests for candidate lines, arcs and circles.
//!
//! A primitive exists when the foreground pixels within a tolerance band
//! around it are dense enough relative to its length.

use geodiagram_core::{Arc, ArcType, Circle, Line, Point};

use crate::params::GraphParams;

/// Number of pixels within `eps` according to `distance`.
fn count_near(pixels: &[Point], eps: f64, distance: impl Fn(&Point) -> f64) -> usize {
    pixels.iter().filter(|p| distance(p) <= eps).count()
}

/// Pixels within `eps` of the segment per unit length.
pub fn line_support(pixels: &[Point], line: &Line, eps: f64) -> f64 {
    count_near(pixels, eps, |p| line.distance_to(p)) as f64 / line.length()
}

/// Pixels within `eps` of the arc per unit arc length.
pub fn arc_support(pixels: &[Point], arc: &Arc, eps: f64) -> f64 {
    count_near(pixels, eps, |p| arc.distance_to(p)) as f64 / arc.length()
}

/// Pixels within `eps` of the circumference per unit of `expected_length`.
pub fn circle_support(pixels: &[Point], circle: &Circle, eps: f64, expected_length: f64) -> f64 {
    count_near(pixels, eps, |p| circle.distance_to(p)) as f64 / expected_length
}

pub fn line_exists(pixels: &[Point], line: &Line, params: &GraphParams) -> bool {
    if line.is_degenerate() {
        return false;
    }
    line_support(pixels, line, params.line_eps) >= params.line_multiplier
}

pub fn arc_exists(pixels: &[Point], arc: &Arc, params: &GraphParams) -> bool {
    if arc.length() <= f64::EPSILON {
        return false;
    }
    arc_support(pixels, arc, params.arc_eps) >= params.arc_multiplier
}

/// Circle support test.
///
/// Full circles need `circle_multiplier` pixels per unit circumference
/// within `circle_exist_eps`. Partial circles widen the band by
/// `partial_scale`, shrink the expected length to the arc type's fraction
/// and accept at half the multiplier.
pub fn circle_exists(pixels: &[Point], circle: &Circle, arc_type: ArcType, params: &GraphParams) -> bool {
    if circle.radius <= 0.0 {
        return false;
    }
    if arc_type.is_partial() {
        let expected = circle.circumference() * arc_type.expected_fraction();
        let eps = params.circle_exist_eps * params.partial_scale;
        circle_support(pixels, circle, eps, expected) >= 0.5 * params.circle_multiplier
    } else {
        circle_support(pixels, circle, params.circle_exist_eps, circle.circumference()) >= params.circle_multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geodiagram_core::raster::{draw_arc, draw_circle, draw_line};
    use geodiagram_core::GrayImage;
    use std::f64::consts::PI;

    #[test]
    fn sparse_segment_is_rejected() {
        let line = Line::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let pixels: Vec<Point> = (0..40).map(|i| Point::new(i as f64 * 2.5, 0.0)).collect();
        assert!(!line_exists(&pixels, &line, &GraphParams::default()));
    }

    #[test]
    fn drawn_segment_is_supported() {
        let line = Line::new(Point::new(10.0, 20.0), Point::new(90.0, 60.0));
        let mut img = GrayImage::new(100, 80);
        draw_line(&mut img, &line, 2.0, 255);
        let pixels = img.foreground_pixels();
        assert!(line_exists(&pixels, &line, &GraphParams::default()));
        let off = Line::new(Point::new(10.0, 70.0), Point::new(90.0, 70.0));
        assert!(!line_exists(&pixels, &off, &GraphParams::default()));
    }

    #[test]
    fn support_grows_with_the_band() {
        let circle = Circle::new(Point::new(60.0, 60.0), 40.0);
        let mut img = GrayImage::new(120, 120);
        draw_circle(&mut img, &circle, 3.0, 255);
        let pixels = img.foreground_pixels();
        let mut last = 0.0;
        for eps in [0.5, 1.0, 2.0, 4.0, 8.0] {
            let ratio = circle_support(&pixels, &circle, eps, circle.circumference());
            assert!(ratio >= last);
            last = ratio;
        }
    }

    #[test]
    fn full_and_partial_circles() {
        let circle = Circle::new(Point::new(60.0, 60.0), 40.0);
        let params = GraphParams::default();

        let mut full = GrayImage::new(120, 120);
        draw_circle(&mut full, &circle, 2.0, 255);
        assert!(circle_exists(&full.foreground_pixels(), &circle, ArcType::FullCircle, &params));

        let mut half = GrayImage::new(120, 120);
        draw_arc(&mut half, &circle, 0.0, PI, 1.0, 255);
        let pixels = half.foreground_pixels();
        assert!(!circle_exists(&pixels, &circle, ArcType::FullCircle, &params));
        assert!(circle_exists(&pixels, &circle, ArcType::Semicircle, &params));
    }

    #[test]
    fn drawn_arc_exists_only_along_its_sweep() {
        let circle = Circle::new(Point::new(60.0, 60.0), 40.0);
        let mut img = GrayImage::new(120, 120);
        draw_arc(&mut img, &circle, 0.0, PI, 2.0, 255);
        let pixels = img.foreground_pixels();
        let params = GraphParams::default();
        let right = circle.point_at(0.0);
        let left = circle.point_at(PI);
        assert!(arc_exists(&pixels, &Arc::new(circle, right, left), &params));
        assert!(!arc_exists(&pixels, &Arc::new(circle, left, right), &params));
    }
}
