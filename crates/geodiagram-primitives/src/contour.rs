//! Contour-based circle and arc detection.
//!
//! The grayscale raster is binarized with an inverted adaptive threshold,
//! closed and eroded, and the outer boundary of every top-level component
//! is traced. Each boundary is fitted with its minimum enclosing circle and
//! classified by angular coverage and circularity.

use std::f64::consts::{PI, TAU};

use geodiagram_core::{
    cartesian_angle, ArcType, DetectedCircle, DetectionMethod, GrayImage, Point,
};
use imageproc::contours::{find_contours, BorderType};

use crate::enclosing::min_enclosing_circle;
use crate::luma::to_luma;
use crate::morphology::{adaptive_threshold_inv, close3x3, erode3x3};
use crate::params::ContourParams;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Drop points lying in the middle of horizontal, vertical or diagonal runs.
fn compress_chain(points: &[(i32, i32)]) -> Vec<(i32, i32)> {
    let mut chain = points.to_vec();
    chain.dedup();
    if chain.len() > 1 && chain.first() == chain.last() {
        chain.pop();
    }
    let n = chain.len();
    if n < 3 {
        return chain;
    }
    (0..n)
        .filter(|&i| {
            let prev = chain[(i + n - 1) % n];
            let cur = chain[i];
            let next = chain[(i + 1) % n];
            (cur.0 - prev.0, cur.1 - prev.1) != (next.0 - cur.0, next.1 - cur.1)
        })
        .map(|i| chain[i])
        .collect()
}

/// Outermost boundaries of the foreground, chain-compressed. Components
/// nested inside a hole of another component are skipped.
pub fn external_contours(binary: &GrayImage) -> Vec<Vec<Point>> {
    if binary.width == 0 || binary.height == 0 {
        return Vec::new();
    }
    find_contours::<i32>(&to_luma(binary))
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|c| {
            let raw: Vec<(i32, i32)> = c.points.iter().map(|p| (p.x, p.y)).collect();
            compress_chain(&raw)
                .into_iter()
                .map(|(x, y)| Point::new(x as f64, y as f64))
                .collect()
        })
        .collect()
}

fn polygon_area(points: &[Point]) -> f64 {
    let n = points.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let (a, b) = (points[i], points[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum();
    0.5 * twice.abs()
}

fn closed_perimeter(points: &[Point]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| (points[(i + 1) % n] - points[i]).norm())
        .sum()
}

/// Fraction of the full turn covered by `angles`, i.e. one minus the largest
/// angular gap (the wrap-around gap included).
pub fn angular_coverage(angles: &mut [f64]) -> f64 {
    if angles.len() < 2 {
        return 0.0;
    }
    angles.sort_by(|a, b| a.total_cmp(b));
    let mut max_gap = angles[0] + TAU - angles[angles.len() - 1];
    for pair in angles.windows(2) {
        max_gap = max_gap.max(pair[1] - pair[0]);
    }
    (TAU - max_gap) / TAU
}

/// Shape class and confidence from coverage and circularity, `None` when the
/// shape is not circular enough.
pub fn classify_shape(coverage: f64, circularity: f64, params: &ContourParams) -> Option<(ArcType, f32)> {
    let score = coverage.min(circularity) as f32;
    if coverage > params.full_coverage && circularity > params.full_circularity {
        return Some((ArcType::FullCircle, score));
    }
    if coverage > params.partial_coverage && circularity > params.partial_circularity {
        let arc_type = if 0.4 < coverage && coverage < 0.6 {
            ArcType::Semicircle
        } else if 0.2 < coverage && coverage < 0.35 {
            ArcType::QuarterCircle
        } else {
            ArcType::Arc
        };
        return Some((arc_type, score * params.partial_confidence));
    }
    None
}

/// Fit and classify one contour.
pub fn analyze_contour(points: &[Point], params: &ContourParams) -> Option<DetectedCircle> {
    let circle = min_enclosing_circle(points)?;
    if circle.radius < params.min_radius || circle.radius > params.max_radius {
        return None;
    }
    let perimeter = closed_perimeter(points);
    if perimeter <= 0.0 {
        return None;
    }
    let circularity = 4.0 * PI * polygon_area(points) / (perimeter * perimeter);

    let mut angles: Vec<f64> = points
        .iter()
        .map(|p| cartesian_angle(&circle.center, p))
        .collect();
    let coverage = angular_coverage(&mut angles);

    let (arc_type, confidence) = classify_shape(coverage, circularity, params)?;

    let deviation =
        points.iter().map(|p| circle.distance_to(p)).sum::<f64>() / points.len() as f64;
    if deviation > params.max_radius_deviation * circle.radius {
        log::trace!(
            "contour at ({:.1}, {:.1}) rejected: deviation {deviation:.2}",
            circle.center.x,
            circle.center.y
        );
        return None;
    }
    Some(DetectedCircle::new(
        circle,
        arc_type,
        DetectionMethod::Contour,
        confidence,
    ))
}

/// Circles and arcs found by contour analysis.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(gray, params), fields(width = gray.width, height = gray.height))
)]
pub fn detect_contour_circles(gray: &GrayImage, params: &ContourParams) -> Vec<DetectedCircle> {
    let binary = adaptive_threshold_inv(gray, params.block_size, params.c);
    let cleaned = erode3x3(&close3x3(&binary));
    let contours = external_contours(&cleaned);
    let circles: Vec<DetectedCircle> = contours
        .iter()
        .filter(|c| c.len() >= params.min_contour_points)
        .filter_map(|c| analyze_contour(c, params))
        .collect();
    log::debug!(
        "contour circles: {} contours, {} circles",
        contours.len(),
        circles.len()
    );
    circles
}

#[cfg(test)]
mod tests {
    use super::*;
    use geodiagram_core::raster::{draw_circle, draw_line};
    use geodiagram_core::{Circle, Line};

    #[test]
    fn square_boundary_is_traced_and_compressed() {
        let mut img = GrayImage::new(10, 10);
        for y in 2..6 {
            for x in 3..8 {
                img.set(x, y, 255);
            }
        }
        let contours = external_contours(&img);
        assert_eq!(contours.len(), 1);
        let mut corners = contours[0].clone();
        corners.sort_by(|a, b| (a.y, a.x).partial_cmp(&(b.y, b.x)).unwrap());
        assert_eq!(
            corners,
            vec![
                Point::new(3.0, 2.0),
                Point::new(7.0, 2.0),
                Point::new(3.0, 5.0),
                Point::new(7.0, 5.0)
            ]
        );
    }

    #[test]
    fn separate_components_get_separate_contours() {
        let mut img = GrayImage::new(12, 6);
        img.set(1, 1, 255);
        for x in 5..10 {
            img.set(x, 3, 255);
        }
        let contours = external_contours(&img);
        assert_eq!(contours.len(), 2);
        assert!(!contours[0].is_empty());
        assert!(contours[0].iter().all(|p| *p == Point::new(1.0, 1.0)));
        assert!(contours[1].contains(&Point::new(5.0, 3.0)));
        assert!(contours[1].contains(&Point::new(9.0, 3.0)));
    }

    #[test]
    fn blobs_inside_a_hole_are_not_external() {
        let mut img = GrayImage::new(20, 20);
        for i in 2..18 {
            for t in [2, 3, 16, 17] {
                img.set(i, t, 255);
                img.set(t, i, 255);
            }
        }
        for y in 9..11 {
            for x in 9..11 {
                img.set(x, y, 255);
            }
        }
        let contours = external_contours(&img);
        assert_eq!(contours.len(), 1);
        assert!(contours[0].contains(&Point::new(2.0, 2.0)));
    }

    #[test]
    fn chain_drops_run_interiors_and_closing_duplicate() {
        let raw = [(0, 0), (1, 0), (2, 0), (2, 1), (2, 2), (1, 1), (0, 0)];
        assert_eq!(compress_chain(&raw), vec![(0, 0), (2, 0), (2, 2)]);
    }

    #[test]
    fn coverage_counts_wrap_gap() {
        let mut angles = vec![0.1, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let cov = angular_coverage(&mut angles);
        assert!(cov > 0.8 && cov < 1.0);

        let mut half: Vec<f64> = (0..=18).map(|i| i as f64 * PI / 18.0).collect();
        let cov = angular_coverage(&mut half);
        assert!((cov - 0.5).abs() < 1e-9);
    }

    #[test]
    fn classification_thresholds() {
        let p = ContourParams::default();
        assert_eq!(classify_shape(0.95, 0.9, &p).map(|c| c.0), Some(ArcType::FullCircle));
        let (t, conf) = classify_shape(0.5, 0.6, &p).expect("partial");
        assert_eq!(t, ArcType::Semicircle);
        assert!((conf - 0.4).abs() < 1e-6);
        assert_eq!(classify_shape(0.7, 0.6, &p).map(|c| c.0), Some(ArcType::Arc));
        assert_eq!(classify_shape(0.9, 0.6, &p).map(|c| c.0), Some(ArcType::Arc));
        assert!(classify_shape(0.3, 0.9, &p).is_none());
        assert!(classify_shape(0.9, 0.4, &p).is_none());
    }

    #[test]
    fn thick_ring_is_a_full_circle() {
        let mut gray = GrayImage::filled(120, 120, 255);
        let truth = Circle::new(Point::new(60.0, 58.0), 40.0);
        draw_circle(&mut gray, &truth, 6.0, 0);

        let circles = detect_contour_circles(&gray, &ContourParams::default());
        assert_eq!(circles.len(), 1, "{circles:?}");
        let c = &circles[0];
        assert_eq!(c.arc_type, ArcType::FullCircle);
        assert_eq!(c.method, DetectionMethod::Contour);
        assert!((c.circle.center - truth.center).norm() < 2.0, "{c:?}");
        assert!((c.circle.radius - truth.radius).abs() < 3.0, "{c:?}");
    }

    #[test]
    fn thick_line_is_rejected() {
        let mut gray = GrayImage::filled(120, 60, 255);
        draw_line(
            &mut gray,
            &Line::new(Point::new(10.0, 30.0), Point::new(110.0, 30.0)),
            6.0,
            0,
        );
        assert!(detect_contour_circles(&gray, &ContourParams::default()).is_empty());
    }
}
