use serde::{Deserialize, Serialize};

/// Thresholds of the core resolver, all in pixels unless noted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveParams {
    /// Tolerance of the pairwise intersection routines.
    pub intersection_eps: f64,
    /// Largest point-to-centroid distance inside one canonical point cluster.
    pub radius_threshold: f64,
    /// Line endpoints closer than this to another line's endpoint or to a
    /// circumference become candidates.
    pub endpoint_significance: f64,
    /// Line endpoints farther than this from every canonical point are appended.
    pub endpoint_tolerance: f64,
    /// Distance of a line to a circle center that marks the center as used.
    pub circle_center_threshold: f64,
    /// Canonical points this close to a circle center own the circle.
    pub circle_membership_eps: f64,
    /// Length added to both ends of a segment for virtual intersections.
    pub extension: f64,
    /// Relative tolerance on the segment parameter for "beyond the segment".
    pub overshoot: f64,
    /// Candidates farther than this many median pairwise distances from
    /// their nearest neighbour are dropped.
    pub isolation_factor: f64,
    /// Upper bound of the cluster count search.
    pub max_clusters: usize,
    /// Lloyd iterations per k-means run.
    pub max_iters: usize,
    /// Validation margin as a fraction of the larger image side.
    pub margin_ratio: f64,
    /// Image side assumed when bounds are unknown.
    pub fallback_extent: f64,
}

impl Default for ResolveParams {
    fn default() -> Self {
        Self {
            intersection_eps: 2.0,
            radius_threshold: 15.0,
            endpoint_significance: 10.0,
            endpoint_tolerance: 15.0,
            circle_center_threshold: 15.0,
            circle_membership_eps: 5.0,
            extension: 5000.0,
            overshoot: 0.05,
            isolation_factor: 3.0,
            max_clusters: 20,
            max_iters: 100,
            margin_ratio: 0.3,
            fallback_extent: 1000.0,
        }
    }
}
