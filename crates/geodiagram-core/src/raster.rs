//! Stroke rasterization for synthetic diagrams and ring templates.
//!
//! Strokes are drawn by distance test over the primitive's bounding box: a
//! pixel is set when its center lies within `thickness / 2` of the ideal
//! curve (never less than half a pixel).

use crate::geometry::{cartesian_angle, ccw_angle_between, Circle, Line, Point};
use crate::image::GrayImage;

fn half_width(thickness: f64) -> f64 {
    (0.5 * thickness).max(0.5)
}

/// Clamp a float range to pixel indices inside `0..len`.
fn pixel_range(lo: f64, hi: f64, len: usize) -> Option<(usize, usize)> {
    if len == 0 || hi < 0.0 {
        return None;
    }
    let lo = lo.floor().max(0.0) as usize;
    let hi = (hi.ceil().max(0.0) as usize).min(len - 1);
    (lo <= hi).then_some((lo, hi))
}

fn for_each_in_box(
    img: &mut GrayImage,
    min: (f64, f64),
    max: (f64, f64),
    value: u8,
    mut inside: impl FnMut(&Point) -> bool,
) {
    let Some((x0, x1)) = pixel_range(min.0, max.0, img.width) else {
        return;
    };
    let Some((y0, y1)) = pixel_range(min.1, max.1, img.height) else {
        return;
    };
    for y in y0..=y1 {
        for x in x0..=x1 {
            if inside(&Point::new(x as f64, y as f64)) {
                img.set(x, y, value);
            }
        }
    }
}

/// Draw a straight stroke from `line.a` to `line.b`.
pub fn draw_line(img: &mut GrayImage, line: &Line, thickness: f64, value: u8) {
    let hw = half_width(thickness);
    for_each_in_box(
        img,
        (line.a.x.min(line.b.x) - hw, line.a.y.min(line.b.y) - hw),
        (line.a.x.max(line.b.x) + hw, line.a.y.max(line.b.y) + hw),
        value,
        |p| line.distance_to(p) <= hw,
    );
}

/// Draw the full circumference of `circle`.
pub fn draw_circle(img: &mut GrayImage, circle: &Circle, thickness: f64, value: u8) {
    draw_arc(img, circle, 0.0, std::f64::consts::TAU, thickness, value);
}

/// Draw the part of `circle` swept counter-clockwise (image angle convention)
/// from `start` by `sweep` radians.
pub fn draw_arc(
    img: &mut GrayImage,
    circle: &Circle,
    start: f64,
    sweep: f64,
    thickness: f64,
    value: u8,
) {
    let hw = half_width(thickness);
    let reach = circle.radius + hw;
    let c = circle.center;
    let full = sweep >= std::f64::consts::TAU;
    for_each_in_box(
        img,
        (c.x - reach, c.y - reach),
        (c.x + reach, c.y + reach),
        value,
        |p| {
            if circle.distance_to(p) > hw {
                return false;
            }
            full || ccw_angle_between(start, cartesian_angle(&c, p)) <= sweep
        },
    );
}
