//! Deterministic k-means and the adaptive cluster-count search.
//!
//! Seeding is farthest-point: the first point, then repeatedly the point
//! farthest from all chosen seeds (lowest index on ties). Lloyd iterations
//! follow until assignments settle. A cluster that loses all its members
//! keeps its previous center.

use geodiagram_core::Point;
use nalgebra::Vector2;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Result of one k-means run.
#[derive(Clone, Debug, PartialEq)]
pub struct KMeans {
    pub centers: Vec<Point>,
    /// Cluster index of every input point.
    pub assignments: Vec<usize>,
}

impl KMeans {
    /// Member count of every cluster.
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centers.len()];
        for &a in &self.assignments {
            sizes[a] += 1;
        }
        sizes
    }

    /// Largest member-to-centroid distance over clusters with more than one
    /// member. Zero when every cluster is a singleton or empty.
    pub fn max_spread(&self, points: &[Point]) -> f64 {
        let sizes = self.sizes();
        points
            .iter()
            .zip(&self.assignments)
            .filter(|(_, &a)| sizes[a] > 1)
            .map(|(p, &a)| (p - self.centers[a]).norm())
            .fold(0.0, f64::max)
    }

    /// Centers of non-empty clusters, in cluster order.
    pub fn occupied_centers(&self) -> Vec<Point> {
        let sizes = self.sizes();
        self.centers
            .iter()
            .zip(sizes)
            .filter(|(_, n)| *n > 0)
            .map(|(c, _)| *c)
            .collect()
    }
}

fn nearest_center(p: &Point, centers: &[Point]) -> usize {
    let mut best = 0;
    let mut best_d = f64::INFINITY;
    for (i, c) in centers.iter().enumerate() {
        let d = (p - c).norm_squared();
        if d < best_d {
            best_d = d;
            best = i;
        }
    }
    best
}

fn farthest_point_seeds(points: &[Point], k: usize) -> Vec<Point> {
    let mut seeds = vec![points[0]];
    let mut min_d: Vec<f64> = points.iter().map(|p| (p - points[0]).norm_squared()).collect();
    while seeds.len() < k {
        let mut far = 0;
        for (i, d) in min_d.iter().enumerate() {
            if *d > min_d[far] {
                far = i;
            }
        }
        let seed = points[far];
        seeds.push(seed);
        for (d, p) in min_d.iter_mut().zip(points) {
            *d = d.min((p - seed).norm_squared());
        }
    }
    seeds
}

/// k-means over `points`. `k` must be in `1..=points.len()`.
pub fn kmeans(points: &[Point], k: usize, max_iters: usize) -> KMeans {
    assert!(
        k >= 1 && k <= points.len(),
        "k-means needs 1 <= k <= n (k = {k}, n = {})",
        points.len()
    );
    let mut centers = farthest_point_seeds(points, k);
    let mut assignments: Vec<usize> = points.iter().map(|p| nearest_center(p, &centers)).collect();

    for _ in 0..max_iters {
        let mut sums = vec![Vector2::<f64>::zeros(); k];
        let mut counts = vec![0usize; k];
        for (p, &a) in points.iter().zip(&assignments) {
            sums[a] += p.coords;
            counts[a] += 1;
        }
        for (c, (sum, n)) in centers.iter_mut().zip(sums.into_iter().zip(counts)) {
            if n > 0 {
                *c = Point::from(sum / n as f64);
            }
        }
        let next: Vec<usize> = points.iter().map(|p| nearest_center(p, &centers)).collect();
        if next == assignments {
            break;
        }
        assignments = next;
    }
    KMeans { centers, assignments }
}

/// Smallest cluster count in `1..min(n + 1, max_clusters)` whose clusters
/// all stay within `radius_threshold` of their centroid, or
/// `min(n, max_clusters)` when none does.
pub fn select_cluster_count(points: &[Point], radius_threshold: f64, max_clusters: usize, max_iters: usize) -> usize {
    let n = points.len();
    if n <= 1 {
        return 1;
    }
    for k in 1..(n + 1).min(max_clusters) {
        let fit = kmeans(points, k, max_iters);
        let spread = fit.max_spread(points);
        log::trace!("k = {k}: max spread {spread:.2}");
        if spread <= radius_threshold {
            return k;
        }
    }
    n.min(max_clusters)
}

/// Canonical points for `points`: centroids of the adaptive k-means
/// partition.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(points), fields(n = points.len()))
)]
pub fn cluster_points(points: &[Point], radius_threshold: f64, max_clusters: usize, max_iters: usize) -> Vec<Point> {
    assert!(radius_threshold > 0.0, "cluster radius threshold must be positive");
    assert!(max_clusters >= 1, "at least one cluster must be allowed");
    match points.len() {
        0 => Vec::new(),
        1 => vec![points[0]],
        _ => {
            let k = select_cluster_count(points, radius_threshold, max_clusters, max_iters);
            let centers = kmeans(points, k, max_iters).occupied_centers();
            log::debug!("clustered {} candidates into {} points (k = {k})", points.len(), centers.len());
            centers
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn two_groups_from_three_candidates() {
        let points = [Point::new(0.0, 0.0), Point::new(0.1, 0.1), Point::new(50.0, 50.0)];
        let centers = cluster_points(&points, 15.0, 20, 100);
        assert_eq!(centers.len(), 2);
        assert_abs_diff_eq!(centers[0].x, 0.05, epsilon = 1e-12);
        assert_abs_diff_eq!(centers[0].y, 0.05, epsilon = 1e-12);
        assert_eq!(centers[1], Point::new(50.0, 50.0));
    }

    #[test]
    fn clustering_is_idempotent() {
        let noisy = [
            Point::new(10.0, 10.0),
            Point::new(11.0, 9.5),
            Point::new(9.0, 10.5),
            Point::new(100.0, 20.0),
            Point::new(101.0, 21.0),
            Point::new(60.0, 90.0),
        ];
        let once = cluster_points(&noisy, 15.0, 20, 100);
        assert_eq!(once.len(), 3);
        let twice = cluster_points(&once, 15.0, 20, 100);
        assert_eq!(twice.len(), once.len());
        for p in &once {
            assert!(twice.iter().any(|q| (p - q).norm() < 1e-9));
        }
    }

    #[test]
    fn duplicate_points_leave_empty_clusters_out() {
        let points = vec![Point::new(5.0, 5.0); 4];
        let fit = kmeans(&points, 3, 10);
        assert_eq!(fit.occupied_centers(), vec![Point::new(5.0, 5.0)]);
        assert_eq!(fit.max_spread(&points), 0.0);
    }

    #[test]
    fn cap_is_used_when_no_count_fits() {
        let points: Vec<Point> = (0..30).map(|i| Point::new(i as f64 * 40.0, 0.0)).collect();
        assert_eq!(select_cluster_count(&points, 15.0, 20, 100), 20);
        let centers = cluster_points(&points, 15.0, 20, 100);
        assert!(centers.len() > 10 && centers.len() <= 20, "{}", centers.len());
    }

    #[test]
    fn empty_and_single_inputs() {
        assert!(cluster_points(&[], 15.0, 20, 100).is_empty());
        assert_eq!(cluster_points(&[Point::new(3.0, 4.0)], 15.0, 20, 100), vec![Point::new(3.0, 4.0)]);
    }
}
