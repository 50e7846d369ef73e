//! Standard Hough transform for lines plus pixel-run segmentation.
//!
//! Peaks live in normal form `rho = x cos(theta) + y sin(theta)` with
//! `theta` in `[0, pi)`. The accumulator is treated as cyclic in `theta`:
//! the row after `pi - dtheta` is `theta = 0` with `rho` mirrored, so a
//! near-vertical line produces a single peak.

use geodiagram_core::{GrayImage, Line, Point};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::params::LineDetectParams;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Accumulator peak.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RhoTheta {
    pub rho: f64,
    pub theta: f64,
    pub votes: u32,
}

impl RhoTheta {
    /// Unsigned distance of `p` to the peak line.
    #[inline]
    pub fn distance_to(&self, p: &Point) -> f64 {
        let (s, c) = self.theta.sin_cos();
        (self.rho - p.x * c - p.y * s).abs()
    }

    /// Direction along the line, `(sin theta, -cos theta)`.
    #[inline]
    pub fn direction(&self) -> Vector2<f64> {
        let (s, c) = self.theta.sin_cos();
        Vector2::new(s, -c)
    }
}

/// `(|rho0 - rho1|, wrapped |theta0 - theta1|)`.
pub fn rho_theta_distance(a: &RhoTheta, b: &RhoTheta) -> (f64, f64) {
    let d = a.theta - b.theta;
    let theta = d
        .abs()
        .min((d + std::f64::consts::TAU).abs())
        .min((d - std::f64::consts::TAU).abs());
    ((a.rho - b.rho).abs(), theta)
}

struct Accumulator {
    n_theta: usize,
    n_rho: usize,
    votes: Vec<u32>,
}

impl Accumulator {
    fn at(&self, t: i64, r: i64) -> u32 {
        let (mut t, mut r) = (t, r);
        let n_theta = self.n_theta as i64;
        let n_rho = self.n_rho as i64;
        if t < 0 || t >= n_theta {
            t = t.rem_euclid(n_theta);
            r = n_rho - 1 - r;
        }
        if r < 0 || r >= n_rho {
            return 0;
        }
        self.votes[t as usize * self.n_rho + r as usize]
    }

    /// 8-neighbour maximum; ties are broken towards the earlier cell.
    fn is_local_max(&self, t: usize, r: usize) -> bool {
        let v = self.votes[t * self.n_rho + r];
        for dt in -1i64..=1 {
            for dr in -1i64..=1 {
                if dt == 0 && dr == 0 {
                    continue;
                }
                let n = self.at(t as i64 + dt, r as i64 + dr);
                let earlier = dt < 0 || (dt == 0 && dr < 0);
                if (earlier && n >= v) || (!earlier && n > v) {
                    return false;
                }
            }
        }
        true
    }
}

/// Accumulator peaks with more than `threshold` votes, strongest first.
pub fn hough_line_peaks(binary: &GrayImage, params: &LineDetectParams) -> Vec<RhoTheta> {
    let (w, h) = (binary.width, binary.height);
    if w == 0 || h == 0 || params.rho <= 0.0 || params.theta <= 0.0 {
        return Vec::new();
    }
    let n_theta = ((std::f64::consts::PI / params.theta).round() as usize).max(1);
    let n_rho = ((((w + h) * 2 + 1) as f64 / params.rho).round() as usize).max(1);
    let offset = (n_rho as i64 - 1) / 2;

    let trig: Vec<(f64, f64)> = (0..n_theta)
        .map(|t| (t as f64 * params.theta).sin_cos())
        .collect();

    let mut acc = Accumulator {
        n_theta,
        n_rho,
        votes: vec![0; n_theta * n_rho],
    };
    for y in 0..h {
        for x in 0..w {
            if binary.get(x, y) == 0 {
                continue;
            }
            for (t, &(s, c)) in trig.iter().enumerate() {
                let r = ((x as f64 * c + y as f64 * s) / params.rho).round() as i64 + offset;
                if (0..n_rho as i64).contains(&r) {
                    acc.votes[t * n_rho + r as usize] += 1;
                }
            }
        }
    }

    let mut peaks = Vec::new();
    for t in 0..n_theta {
        for r in 0..n_rho {
            let v = acc.votes[t * n_rho + r];
            if v > params.threshold && acc.is_local_max(t, r) {
                peaks.push(RhoTheta {
                    rho: (r as i64 - offset) as f64 * params.rho,
                    theta: t as f64 * params.theta,
                    votes: v,
                });
            }
        }
    }
    peaks.sort_by(|a, b| b.votes.cmp(&a.votes));
    peaks
}

/// Drop peaks within `(nms_rho, nms_theta)` of an already kept, stronger peak.
///
/// `peaks` must be sorted by decreasing strength.
pub fn suppress_peaks(peaks: &[RhoTheta], nms_rho: f64, nms_theta: f64) -> Vec<RhoTheta> {
    let mut kept: Vec<RhoTheta> = Vec::with_capacity(peaks.len());
    for peak in peaks {
        let suppressed = kept.iter().any(|k| {
            let (dr, dt) = rho_theta_distance(k, peak);
            dr <= nms_rho && dt <= nms_theta
        });
        if !suppressed {
            kept.push(*peak);
        }
    }
    kept
}

/// Split the pixels along one peak line into segments.
pub fn segment_peak(pixels: &[Point], peak: &RhoTheta, params: &LineDetectParams) -> Vec<Line> {
    let near: Vec<&Point> = pixels
        .iter()
        .filter(|p| peak.distance_to(p) <= params.eps)
        .collect();
    let Some(reference) = near.first() else {
        return Vec::new();
    };

    let u = peak.direction();
    let mut projected: Vec<(f64, &Point)> = near
        .iter()
        .map(|p| ((*p - *reference).dot(&u), *p))
        .collect();
    projected.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut lines = Vec::new();
    let mut start = 0usize;
    for i in 1..=projected.len() {
        let split = i == projected.len() || projected[i].0 - projected[i - 1].0 > params.max_gap;
        if !split {
            continue;
        }
        let (first, last) = (projected[start], projected[i - 1]);
        if last.0 - first.0 > params.min_length {
            lines.push(Line::new(*first.1, *last.1));
        }
        start = i;
    }
    lines
}

/// Full line detector: peaks, cap, suppression, segmentation.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(binary, pixels, params), fields(pixels = pixels.len()))
)]
pub fn detect_lines(binary: &GrayImage, pixels: &[Point], params: &LineDetectParams) -> Vec<Line> {
    let mut peaks = hough_line_peaks(binary, params);
    peaks.truncate(params.max_num);
    let kept = suppress_peaks(&peaks, params.nms_rho, params.nms_theta);

    let lines: Vec<Line> = kept
        .iter()
        .flat_map(|peak| segment_peak(pixels, peak, params))
        .filter(|l| !l.is_degenerate())
        .collect();
    log::debug!(
        "hough lines: {} peaks, {} after suppression, {} segments",
        peaks.len(),
        kept.len(),
        lines.len()
    );
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use geodiagram_core::raster::draw_line;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn raster_with(lines: &[Line], w: usize, h: usize) -> GrayImage {
        let mut img = GrayImage::new(w, h);
        for line in lines {
            draw_line(&mut img, line, 1.0, 255);
        }
        img
    }

    fn seg(ax: f64, ay: f64, bx: f64, by: f64) -> Line {
        Line::new(Point::new(ax, ay), Point::new(bx, by))
    }

    fn has_endpoints(line: &Line, p: Point, q: Point, tol: f64) -> bool {
        let direct = (line.a - p).norm() <= tol && (line.b - q).norm() <= tol;
        let swapped = (line.a - q).norm() <= tol && (line.b - p).norm() <= tol;
        direct || swapped
    }

    #[test]
    fn wrapped_theta_distance() {
        let a = RhoTheta {
            rho: 10.0,
            theta: 0.01,
            votes: 0,
        };
        let b = RhoTheta {
            rho: 11.0,
            theta: 2.0 * PI - 0.01,
            votes: 0,
        };
        let (dr, dt) = rho_theta_distance(&a, &b);
        assert!((dr - 1.0).abs() < 1e-12);
        assert!((dt - 0.02).abs() < 1e-9);
    }

    #[test]
    fn suppression_keeps_strongest() {
        let peaks = [
            RhoTheta { rho: 50.0, theta: FRAC_PI_2, votes: 100 },
            RhoTheta { rho: 51.0, theta: FRAC_PI_2 + 0.02, votes: 80 },
            RhoTheta { rho: 90.0, theta: FRAC_PI_2, votes: 60 },
        ];
        let kept = suppress_peaks(&peaks, 2.0, PI / 60.0);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].votes, 100);
        assert_eq!(kept[1].rho, 90.0);
    }

    #[test]
    fn horizontal_line_is_found_once() {
        let img = raster_with(&[seg(20.0, 50.0, 180.0, 50.0)], 200, 100);
        let lines = detect_lines(&img, &img.foreground_pixels(), &LineDetectParams::default());
        assert_eq!(lines.len(), 1, "{lines:?}");
        assert!(has_endpoints(
            &lines[0],
            Point::new(20.0, 50.0),
            Point::new(180.0, 50.0),
            1.0
        ));
    }

    #[test]
    fn crossing_lines_are_separated() {
        let img = raster_with(
            &[seg(20.0, 50.0, 180.0, 50.0), seg(100.0, 10.0, 100.0, 90.0)],
            200,
            100,
        );
        let lines = detect_lines(&img, &img.foreground_pixels(), &LineDetectParams::default());
        assert_eq!(lines.len(), 2, "{lines:?}");
        assert!(lines.iter().any(|l| has_endpoints(
            l,
            Point::new(100.0, 10.0),
            Point::new(100.0, 90.0),
            1.0
        )));
    }

    #[test]
    fn gaps_split_segments() {
        let img = raster_with(
            &[seg(10.0, 50.0, 60.0, 50.0), seg(80.0, 50.0, 150.0, 50.0)],
            200,
            100,
        );
        let mut lines = detect_lines(&img, &img.foreground_pixels(), &LineDetectParams::default());
        lines.sort_by(|a, b| a.a.x.min(a.b.x).total_cmp(&b.a.x.min(b.b.x)));
        assert_eq!(lines.len(), 2, "{lines:?}");
        assert!(has_endpoints(&lines[0], Point::new(10.0, 50.0), Point::new(60.0, 50.0), 1.0));
        assert!(has_endpoints(&lines[1], Point::new(80.0, 50.0), Point::new(150.0, 50.0), 1.0));
    }

    #[test]
    fn short_runs_are_dropped() {
        let peak = RhoTheta { rho: 5.0, theta: FRAC_PI_2, votes: 0 };
        let pixels: Vec<Point> = (0..15).map(|x| Point::new(x as f64, 5.0)).collect();
        assert!(segment_peak(&pixels, &peak, &LineDetectParams::default()).is_empty());
    }

    #[test]
    fn empty_raster_has_no_lines() {
        let img = GrayImage::new(50, 50);
        assert!(detect_lines(&img, &[], &LineDetectParams::default()).is_empty());
    }
}
