use serde::{Deserialize, Serialize};

/// Pixel tolerances and support ratios of the graph builder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphParams {
    /// Pixel band around a candidate segment; also the collinearity tolerance.
    pub line_eps: f64,
    /// Base tolerance for circle membership and for points on an arc.
    pub circle_eps: f64,
    /// Factor on `circle_eps` for circle membership.
    pub membership_scale: f64,
    /// Extra factor on tolerances of partial circles.
    pub partial_scale: f64,
    /// Required pixels per unit of segment length.
    pub line_multiplier: f64,
    pub arc_eps: f64,
    /// Required pixels per unit of arc length.
    pub arc_multiplier: f64,
    pub circle_exist_eps: f64,
    /// Required pixels per unit of (expected) circumference.
    pub circle_multiplier: f64,
    /// Honour partial arc types. When off every circle is handled as full.
    pub partial_circles: bool,
}

impl Default for GraphParams {
    fn default() -> Self {
        Self {
            line_eps: 3.0,
            circle_eps: 6.0,
            membership_scale: 1.2,
            partial_scale: 1.5,
            line_multiplier: 1.0,
            arc_eps: 4.0,
            arc_multiplier: 1.0,
            circle_exist_eps: 4.0,
            circle_multiplier: 1.0,
            partial_circles: true,
        }
    }
}
