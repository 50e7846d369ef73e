use serde::{Deserialize, Serialize};

/// Standard Hough line detection followed by pixel-run segmentation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineDetectParams {
    /// Distance resolution of the accumulator, in pixels.
    pub rho: f64,
    /// Angle resolution of the accumulator, in radians.
    pub theta: f64,
    /// Minimum votes for an accumulator peak.
    pub threshold: u32,
    /// Largest projection gap (pixels) tolerated inside one segment.
    pub max_gap: f64,
    /// Segments must be strictly longer than this.
    pub min_length: f64,
    pub nms_rho: f64,
    pub nms_theta: f64,
    /// Peaks kept before non-maximum suppression.
    pub max_num: usize,
    /// Pixels within this distance of a peak line are gathered for segmentation.
    pub eps: f64,
}

impl Default for LineDetectParams {
    fn default() -> Self {
        Self {
            rho: 1.0,
            theta: std::f64::consts::PI / 180.0,
            threshold: 30,
            max_gap: 3.0,
            min_length: 20.0,
            nms_rho: 2.0,
            nms_theta: std::f64::consts::PI / 60.0,
            max_num: 40,
            eps: 2.0,
        }
    }
}

/// Gradient Hough circle detection on the grayscale raster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughCircleParams {
    /// Inverse accumulator resolution (1 = image resolution).
    pub dp: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    /// Minimum Sobel gradient magnitude of an edge pixel.
    pub param1: f64,
    /// Minimum accumulator votes for a center and edge support for a radius.
    pub param2: u32,
    /// Minimum distance between accepted centers.
    pub min_dist: f64,
    pub max_num: usize,
}

impl Default for HoughCircleParams {
    fn default() -> Self {
        Self {
            dp: 1.0,
            min_radius: 20.0,
            max_radius: 200.0,
            param1: 50.0,
            param2: 30,
            min_dist: 2.0,
            max_num: 50,
        }
    }
}

/// Contour-based circle and arc classification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContourParams {
    /// Adaptive threshold neighbourhood (odd).
    pub block_size: usize,
    /// Constant subtracted from the weighted neighbourhood mean.
    pub c: f64,
    pub min_contour_points: usize,
    pub min_radius: f64,
    pub max_radius: f64,
    pub full_coverage: f64,
    pub full_circularity: f64,
    pub partial_coverage: f64,
    pub partial_circularity: f64,
    /// Confidence multiplier applied to partial shapes.
    pub partial_confidence: f32,
    /// Mean point-to-circle deviation allowed, relative to the radius.
    pub max_radius_deviation: f64,
}

impl Default for ContourParams {
    fn default() -> Self {
        Self {
            block_size: 11,
            c: 2.0,
            min_contour_points: 20,
            min_radius: 10.0,
            max_radius: 300.0,
            full_coverage: 0.8,
            full_circularity: 0.7,
            partial_coverage: 0.4,
            partial_circularity: 0.5,
            partial_confidence: 0.8,
            max_radius_deviation: 0.15,
        }
    }
}

/// Multi-scale ring template matching.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateParams {
    pub base_radius: f64,
    pub stroke: f64,
    pub scales: Vec<f64>,
    /// Images smaller than this (either side) are skipped.
    pub min_image_size: usize,
    /// Scaled templates smaller than this are skipped.
    pub min_template_size: usize,
    /// Correlation score for a location to be considered.
    pub match_threshold: f32,
    /// Correlation score for a match to be accepted.
    pub accept_threshold: f32,
    pub min_radius: f64,
    /// Accepted radii stay below `min(width, height) / max_radius_divisor`.
    pub max_radius_divisor: f64,
}

impl Default for TemplateParams {
    fn default() -> Self {
        Self {
            base_radius: 20.0,
            stroke: 2.0,
            scales: vec![0.5, 0.7, 0.9, 1.1, 1.3, 1.5, 1.7, 1.9],
            min_image_size: 30,
            min_template_size: 10,
            match_threshold: 0.5,
            accept_threshold: 0.6,
            min_radius: 15.0,
            max_radius_divisor: 3.0,
        }
    }
}

/// Duplicate suppression over all circle candidates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupParams {
    pub center_threshold: f64,
    pub radius_threshold: f64,
}

impl Default for DedupParams {
    fn default() -> Self {
        Self {
            center_threshold: 20.0,
            radius_threshold: 10.0,
        }
    }
}

/// Parameters of [`crate::PrimitiveDetector`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimitiveParams {
    pub lines: LineDetectParams,
    pub hough_circles: HoughCircleParams,
    pub contour: ContourParams,
    pub template: TemplateParams,
    pub dedup: DedupParams,
    /// Run contour and template strategies next to the Hough circles.
    pub enhanced_circles: bool,
    pub contour_detection: bool,
    pub template_matching: bool,
}

impl Default for PrimitiveParams {
    fn default() -> Self {
        Self {
            lines: LineDetectParams::default(),
            hough_circles: HoughCircleParams::default(),
            contour: ContourParams::default(),
            template: TemplateParams::default(),
            dedup: DedupParams::default(),
            enhanced_circles: true,
            contour_detection: true,
            template_matching: true,
        }
    }
}
