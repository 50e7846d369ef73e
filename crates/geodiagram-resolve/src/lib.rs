//! Core point resolution.
//!
//! Pairwise primitive intersections, significant line endpoints, circle
//! centers and virtual intersections of extended lines are harvested as
//! candidates. After the bounds and isolation filters the candidates are
//! clustered with a deterministic k-means whose cluster count is the
//! smallest one keeping every cluster within a radius threshold. Line
//! endpoints that no canonical point represents are appended, and circles
//! are grouped under the canonical point at their center.

mod candidates;
mod cluster;
mod filter;
mod params;
mod resolver;

pub use candidates::{
    circle_centers, collect_candidates, extended_intersections, pairwise_intersections,
    significant_endpoints, Candidate, CandidateSource,
};
pub use cluster::{cluster_points, kmeans, select_cluster_count, KMeans};
pub use filter::{nearest_other_distances, remove_isolated, within_bounds};
pub use params::ResolveParams;
pub use resolver::{group_circles, reconcile_endpoints, CoreParse, CoreResolver};
