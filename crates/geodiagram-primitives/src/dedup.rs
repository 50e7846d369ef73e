use geodiagram_core::DetectedCircle;

use crate::params::DedupParams;

/// Drop circles whose center is closer than `center_threshold` and whose radius
/// differs by less than `radius_threshold` from an earlier kept circle.
pub fn remove_duplicate_circles(circles: Vec<DetectedCircle>, params: &DedupParams) -> Vec<DetectedCircle> {
    let mut kept: Vec<DetectedCircle> = Vec::with_capacity(circles.len());
    for candidate in circles {
        let duplicate = kept.iter().any(|k| {
            (k.circle.center - candidate.circle.center).norm() < params.center_threshold
                && (k.circle.radius - candidate.circle.radius).abs() < params.radius_threshold
        });
        if !duplicate {
            kept.push(candidate);
        }
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use geodiagram_core::{ArcType, Circle, DetectionMethod, Point};

    fn circle(x: f64, y: f64, r: f64, method: DetectionMethod) -> DetectedCircle {
        DetectedCircle::new(Circle::new(Point::new(x, y), r), ArcType::FullCircle, method, 1.0)
    }

    #[test]
    fn first_seen_wins() {
        let kept = remove_duplicate_circles(
            vec![
                circle(50.0, 50.0, 30.0, DetectionMethod::Hough),
                circle(55.0, 52.0, 35.0, DetectionMethod::Contour),
                circle(50.0, 50.0, 45.0, DetectionMethod::Template),
                circle(90.0, 50.0, 30.0, DetectionMethod::Template),
            ],
            &DedupParams::default(),
        );
        assert_eq!(kept.len(), 3);
        assert_eq!(kept[0].method, DetectionMethod::Hough);
        assert_eq!(kept[1].circle.radius, 45.0);
        assert_eq!(kept[2].circle.center.x, 90.0);
    }
}
