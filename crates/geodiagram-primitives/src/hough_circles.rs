//! Gradient Hough transform for full circles.
//!
//! Edge pixels (Sobel magnitude above `param1`) vote along their gradient
//! line, in both directions, for every radius in the allowed band. Centers
//! are accumulator maxima; the radius is the best supported edge distance.

use geodiagram_core::{ArcType, Circle, DetectedCircle, DetectionMethod, GrayImage, Point};

use imageproc::gradients::{horizontal_sobel, vertical_sobel};

use crate::luma::to_luma;
use crate::params::HoughCircleParams;

#[cfg(feature = "tracing")]
use tracing::instrument;

const RADIUS_WINDOW: usize = 2;

struct EdgePixel {
    p: Point,
    ux: f64,
    uy: f64,
}

/// Pixels whose Sobel magnitude exceeds `min_magnitude`, with the unit
/// gradient direction.
fn sobel_edges(gray: &GrayImage, min_magnitude: f64) -> Vec<EdgePixel> {
    let luma = to_luma(gray);
    let gx = horizontal_sobel(&luma);
    let gy = vertical_sobel(&luma);
    gx.enumerate_pixels()
        .zip(gy.pixels())
        .filter_map(|((x, y, hx), vy)| {
            let (dx, dy) = (hx[0] as f64, vy[0] as f64);
            let mag = dx.hypot(dy);
            (mag > min_magnitude).then(|| EdgePixel {
                p: Point::new(x as f64, y as f64),
                ux: dx / mag,
                uy: dy / mag,
            })
        })
        .collect()
}

/// Radius with the best edge support around `center`, with its support.
///
/// Distances are binned at 1 px; support is counted over a five-bin window,
/// wide enough to cover both edges of a stroke, and the radius is the mean
/// distance inside it.
fn best_radius(center: &Point, edges: &[EdgePixel], params: &HoughCircleParams) -> Option<(f64, u32)> {
    let n_bins = (params.max_radius - params.min_radius).floor() as usize + 1;
    let mut hist = vec![0u32; n_bins];
    let mut sums = vec![0f64; n_bins];
    for e in edges {
        let d = (e.p - center).norm();
        if d < params.min_radius || d > params.max_radius {
            continue;
        }
        let bin = ((d - params.min_radius).floor() as usize).min(n_bins - 1);
        hist[bin] += 1;
        sums[bin] += d;
    }

    let mut best: Option<(usize, u32)> = None;
    for b in 0..n_bins {
        let lo = b.saturating_sub(RADIUS_WINDOW);
        let hi = (b + RADIUS_WINDOW).min(n_bins - 1);
        let support: u32 = hist[lo..=hi].iter().sum();
        if best.is_none_or(|(_, s)| support > s) {
            best = Some((b, support));
        }
    }
    let (b, support) = best?;
    if support < params.param2 || support == 0 {
        return None;
    }
    let lo = b.saturating_sub(RADIUS_WINDOW);
    let hi = (b + RADIUS_WINDOW).min(n_bins - 1);
    let radius = sums[lo..=hi].iter().sum::<f64>() / support as f64;
    Some((radius, support))
}

/// Full circles found by the gradient Hough transform, strongest first.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(gray, params), fields(width = gray.width, height = gray.height))
)]
pub fn detect_hough_circles(gray: &GrayImage, params: &HoughCircleParams) -> Vec<DetectedCircle> {
    if params.dp <= 0.0 || params.max_radius < params.min_radius || params.min_radius < 0.0 {
        return Vec::new();
    }
    let edges = sobel_edges(gray, params.param1);
    if edges.is_empty() {
        return Vec::new();
    }

    let aw = (gray.width as f64 / params.dp).ceil() as usize;
    let ah = (gray.height as f64 / params.dp).ceil() as usize;
    let mut acc = vec![0u32; aw * ah];
    let r0 = params.min_radius.ceil() as i64;
    let r1 = params.max_radius.floor() as i64;
    for e in &edges {
        for sign in [-1.0, 1.0] {
            for r in r0..=r1 {
                let r = sign * r as f64;
                let cx = ((e.p.x + r * e.ux) / params.dp).round();
                let cy = ((e.p.y + r * e.uy) / params.dp).round();
                if cx < 0.0 || cy < 0.0 || cx >= aw as f64 || cy >= ah as f64 {
                    continue;
                }
                acc[cy as usize * aw + cx as usize] += 1;
            }
        }
    }

    let votes_at = |x: i64, y: i64| -> u32 {
        if x < 0 || y < 0 || x >= aw as i64 || y >= ah as i64 {
            0
        } else {
            acc[y as usize * aw + x as usize]
        }
    };
    let mut centers: Vec<(u32, usize, usize)> = Vec::new();
    for y in 0..ah {
        for x in 0..aw {
            let v = acc[y * aw + x];
            if v < params.param2 {
                continue;
            }
            let mut is_max = true;
            'nbr: for dy in -1i64..=1 {
                for dx in -1i64..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let n = votes_at(x as i64 + dx, y as i64 + dy);
                    let earlier = dy < 0 || (dy == 0 && dx < 0);
                    if (earlier && n >= v) || (!earlier && n > v) {
                        is_max = false;
                        break 'nbr;
                    }
                }
            }
            if is_max {
                centers.push((v, x, y));
            }
        }
    }
    centers.sort_by(|a, b| b.0.cmp(&a.0));

    let mut out: Vec<DetectedCircle> = Vec::new();
    for (votes, x, y) in centers {
        if out.len() >= params.max_num {
            break;
        }
        let center = Point::new(x as f64 * params.dp, y as f64 * params.dp);
        if out
            .iter()
            .any(|c| (c.circle.center - center).norm() < params.min_dist)
        {
            continue;
        }
        let Some((radius, support)) = best_radius(&center, &edges, params) else {
            log::trace!("hough center ({:.1}, {:.1}) with {votes} votes lacks radius support", center.x, center.y);
            continue;
        };
        log::trace!(
            "hough circle ({:.1}, {:.1}) r={radius:.1} votes={votes} support={support}",
            center.x,
            center.y
        );
        out.push(DetectedCircle::new(
            Circle::new(center, radius),
            ArcType::FullCircle,
            DetectionMethod::Hough,
            1.0,
        ));
    }
    log::debug!("hough circles: {} edge pixels, {} circles", edges.len(), out.len());
    out
}
