//! Thematic clustering via seeded k-means.
//!
//! Partitions the vector store's points into at most K groups by iterative
//! reassignment to the nearest centroid. The effective K is clamped so that
//! clusters are not pathologically small, and centroids that end up with no
//! members are dropped from the output, so the caller may receive fewer
//! clusters than requested.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::error::InsightError;

/// Centroid-based cluster extractor.
///
/// With a fixed seed the clustering is fully deterministic: the same
/// vectors and target K always produce the same membership.
#[derive(Debug, Clone)]
pub struct KmeansClusterer {
    max_iterations: usize,
    min_points_per_cluster: usize,
    seed: u64,
}

impl KmeansClusterer {
    pub fn new(max_iterations: usize, min_points_per_cluster: usize, seed: u64) -> Self {
        Self {
            max_iterations: max_iterations.max(1),
            min_points_per_cluster: min_points_per_cluster.max(1),
            seed,
        }
    }

    /// Clamp the target cluster count: never more than one cluster per
    /// `min_points_per_cluster` points, never less than one.
    pub fn clamp_k(&self, total_points: usize, target: usize) -> usize {
        target.min((total_points / self.min_points_per_cluster).max(1))
    }

    /// Partition the vectors into non-empty index groups.
    ///
    /// Reports insufficient data when there are fewer points than the
    /// clamped K (no clustering is attempted).
    pub fn cluster(
        &self,
        vectors: &[Vec<f32>],
        target_k: usize,
    ) -> Result<Vec<Vec<usize>>, InsightError> {
        let n = vectors.len();
        let k = self.clamp_k(n, target_k.max(1));

        if n < k {
            return Err(InsightError::InsufficientData(format!(
                "{} points cannot form {} clusters",
                n, k
            )));
        }

        info!(points = n, k, "Running k-means clustering");

        let dim = vectors[0].len();
        let mut rng = StdRng::seed_from_u64(self.seed);

        // Farthest-point initialization: a seeded random first centroid,
        // then each next centroid is the point farthest from its nearest
        // already-chosen centroid. Deterministic for a fixed seed.
        let mut chosen: Vec<usize> = vec![rng.gen_range(0..n)];
        while chosen.len() < k {
            let mut best_idx = 0;
            let mut best_dist = -1.0f64;
            for i in 0..n {
                let nearest = chosen
                    .iter()
                    .map(|&c| squared_l2_points(&vectors[i], &vectors[c]))
                    .fold(f64::MAX, f64::min);
                if nearest > best_dist {
                    best_dist = nearest;
                    best_idx = i;
                }
            }
            chosen.push(best_idx);
        }
        let mut centroids: Vec<Vec<f64>> = chosen
            .into_iter()
            .map(|i| vectors[i].iter().map(|&v| v as f64).collect())
            .collect();

        let mut labels = vec![usize::MAX; n];
        for iteration in 0..self.max_iterations {
            // Assignment: each point to its nearest centroid.
            let mut changed = false;
            for (i, vector) in vectors.iter().enumerate() {
                let nearest = nearest_centroid(vector, &centroids);
                if labels[i] != nearest {
                    labels[i] = nearest;
                    changed = true;
                }
            }

            if !changed {
                debug!(iteration, "Assignments converged");
                break;
            }

            // Update: centroids move to the mean of their members. A
            // centroid with no members keeps its position.
            let mut sums = vec![vec![0.0f64; dim]; k];
            let mut counts = vec![0usize; k];
            for (i, vector) in vectors.iter().enumerate() {
                counts[labels[i]] += 1;
                for (d, &v) in vector.iter().enumerate() {
                    sums[labels[i]][d] += v as f64;
                }
            }
            for c in 0..k {
                if counts[c] > 0 {
                    for d in 0..dim {
                        centroids[c][d] = sums[c][d] / counts[c] as f64;
                    }
                }
            }
        }

        // Collect members per label; empty centroids are dropped.
        let mut clusters = vec![Vec::new(); k];
        for (i, &label) in labels.iter().enumerate() {
            clusters[label].push(i);
        }
        let clusters: Vec<Vec<usize>> = clusters.into_iter().filter(|c| !c.is_empty()).collect();

        info!(clusters = clusters.len(), "Clustering complete");
        Ok(clusters)
    }
}

fn nearest_centroid(vector: &[f32], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::MAX;
    for (c, centroid) in centroids.iter().enumerate() {
        let dist = squared_l2(vector, centroid);
        if dist < best_dist {
            best_dist = dist;
            best = c;
        }
    }
    best
}

fn squared_l2(a: &[f32], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x as f64 - y;
            d * d
        })
        .sum()
}

fn squared_l2_points(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum()
}
