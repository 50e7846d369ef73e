//! Candidate filters applied before clustering.

use std::collections::HashMap;

use geodiagram_core::Point;
use kiddo::{KdTree, SquaredEuclidean};

use crate::candidates::Candidate;

/// Bucket capacity of kiddo's default tree: it cannot split a bucket whose
/// items all share one coordinate value on the split axis.
const KD_BUCKET: usize = 32;

/// Keep candidates inside the image rectangle grown by
/// `margin_ratio * max(w, h)` on every side.
pub fn within_bounds(candidates: Vec<Candidate>, width: f64, height: f64, margin_ratio: f64) -> Vec<Candidate> {
    let margin = margin_ratio * width.max(height);
    let (x0, y0, x1, y1) = (-margin, -margin, width + margin, height + margin);
    let before = candidates.len();
    let kept: Vec<Candidate> = candidates
        .into_iter()
        .filter(|c| x0 <= c.point.x && c.point.x <= x1 && y0 <= c.point.y && c.point.y <= y1)
        .collect();
    if kept.len() < before {
        log::debug!("bounds filter dropped {} candidates", before - kept.len());
    }
    kept
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len();
    let mid = n / 2;
    let (lower, upper, _) = values.select_nth_unstable_by(mid, f64::total_cmp);
    let upper = *upper;
    if n % 2 == 1 {
        return Some(upper);
    }
    let below = lower.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(0.5 * (below + upper))
}

fn axis_collisions_exceed_bucket(points: &[[f64; 2]]) -> bool {
    (0..2).any(|axis| {
        let mut counts: HashMap<u64, usize> = HashMap::new();
        points.iter().any(|p| {
            let n = counts.entry(p[axis].to_bits()).or_insert(0);
            *n += 1;
            *n > KD_BUCKET
        })
    })
}

/// Distance from every point to its nearest point at a different location.
///
/// Exact duplicates do not count as neighbours of each other; a point with
/// no distinct neighbour gets infinity.
pub fn nearest_other_distances(points: &[Point]) -> Vec<f64> {
    let mut unique: Vec<[f64; 2]> = Vec::new();
    let mut slot: HashMap<(u64, u64), usize> = HashMap::new();
    let mut owner = Vec::with_capacity(points.len());
    for p in points {
        let key = (p.x.to_bits(), p.y.to_bits());
        let idx = *slot.entry(key).or_insert_with(|| {
            unique.push([p.x, p.y]);
            unique.len() - 1
        });
        owner.push(idx);
    }
    let nearest_unique: Vec<f64> = if unique.len() < 2 {
        vec![f64::INFINITY; unique.len()]
    } else if axis_collisions_exceed_bucket(&unique) {
        unique
            .iter()
            .enumerate()
            .map(|(i, a)| {
                unique
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .map(|(_, b)| (a[0] - b[0]).hypot(a[1] - b[1]))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect()
    } else {
        let tree: KdTree<f64, 2> = (&unique).into();
        unique
            .iter()
            .enumerate()
            .map(|(i, q)| {
                tree.nearest_n::<SquaredEuclidean>(q, 2)
                    .into_iter()
                    .find(|nn| nn.item as usize != i)
                    .map_or(f64::INFINITY, |nn| nn.distance.sqrt())
            })
            .collect()
    };

    owner.iter().map(|&u| nearest_unique[u]).collect()
}

/// Drop candidates whose nearest distinct candidate is farther than
/// `factor` times the median pairwise distance. Sets of at most three
/// candidates, or with a single distinct location, pass unchanged.
///
/// The cutoff is the median over all `n (n - 1) / 2` pairs, duplicates
/// included, so building it stays quadratic; candidate sets are the
/// pairwise intersections of a few dozen primitives.
pub fn remove_isolated(candidates: Vec<Candidate>, factor: f64) -> Vec<Candidate> {
    if candidates.len() <= 3 {
        return candidates;
    }
    let points: Vec<Point> = candidates.iter().map(|c| c.point).collect();
    let nearest = nearest_other_distances(&points);
    if nearest.iter().all(|d| d.is_infinite()) {
        return candidates;
    }
    let mut pairwise = Vec::with_capacity(points.len() * (points.len() - 1) / 2);
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            pairwise.push((a - b).norm());
        }
    }
    let Some(median) = median(&mut pairwise) else {
        return candidates;
    };
    let limit = median * factor;
    let before = candidates.len();
    let kept: Vec<Candidate> = candidates
        .into_iter()
        .zip(nearest)
        .filter(|(_, d)| *d <= limit)
        .map(|(c, _)| c)
        .collect();
    if kept.len() < before {
        log::debug!(
            "isolation filter dropped {} candidates (limit {limit:.1})",
            before - kept.len()
        );
    }
    kept
}
