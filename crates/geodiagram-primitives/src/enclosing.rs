//! Minimum enclosing circle (incremental Welzl).

use geodiagram_core::{Circle, Point};

const EPS: f64 = 1e-7;

fn contains(c: &Circle, p: &Point) -> bool {
    (p - c.center).norm() <= c.radius + EPS
}

fn from_two(a: &Point, b: &Point) -> Circle {
    let center = Point::from((a.coords + b.coords) * 0.5);
    Circle::new(center, (a - center).norm())
}

fn from_three(a: &Point, b: &Point, c: &Point) -> Option<Circle> {
    let (bx, by) = (b.x - a.x, b.y - a.y);
    let (cx, cy) = (c.x - a.x, c.y - a.y);
    let d = 2.0 * (bx * cy - by * cx);
    if d.abs() < 1e-12 {
        return None;
    }
    let b2 = bx * bx + by * by;
    let c2 = cx * cx + cy * cy;
    let ux = (cy * b2 - by * c2) / d;
    let uy = (bx * c2 - cx * b2) / d;
    let center = Point::new(a.x + ux, a.y + uy);
    Some(Circle::new(center, ux.hypot(uy)))
}

/// Circle through `a` and `b` with `c` on or inside it. Collinear triples fall
/// back to the circle over the farthest pair.
fn circle_with_boundary(a: &Point, b: &Point, c: &Point) -> Circle {
    from_three(a, b, c).unwrap_or_else(|| {
        [from_two(a, b), from_two(a, c), from_two(b, c)]
            .into_iter()
            .max_by(|l, r| l.radius.total_cmp(&r.radius))
            .unwrap_or_else(|| from_two(a, b))
    })
}

/// Deterministic scramble so the expected-linear bound holds on ordered
/// contour input.
fn scrambled(points: &[Point]) -> Vec<Point> {
    let mut out = points.to_vec();
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    for i in (1..out.len()).rev() {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let j = (state % (i as u64 + 1)) as usize;
        out.swap(i, j);
    }
    out
}

/// Smallest circle containing every point. `None` for an empty set.
pub fn min_enclosing_circle(points: &[Point]) -> Option<Circle> {
    let pts = scrambled(points);
    let first = *pts.first()?;
    let mut c = Circle::new(first, 0.0);
    for i in 1..pts.len() {
        if contains(&c, &pts[i]) {
            continue;
        }
        c = Circle::new(pts[i], 0.0);
        for j in 0..i {
            if contains(&c, &pts[j]) {
                continue;
            }
            c = from_two(&pts[i], &pts[j]);
            for k in 0..j {
                if !contains(&c, &pts[k]) {
                    c = circle_with_boundary(&pts[i], &pts[j], &pts[k]);
                }
            }
        }
    }
    Some(c)
}
