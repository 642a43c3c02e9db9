//! Similarity-threshold agglomerative clustering over signal vectors.
//!
//! Average linkage over a precomputed cosine-distance matrix. Merging
//! stops as soon as the closest pair of clusters sits further apart
//! than the fixed distance threshold; the threshold alone determines
//! how many clusters come out, singletons included.

use crate::vectorizer::SparseVec;

/// Two signals must share at least this much cosine similarity
/// (equivalently, distance below `1 - SIMILARITY_THRESHOLD`) for their
/// clusters to merge. Fixed design constant, not configuration.
pub const SIMILARITY_THRESHOLD: f64 = 0.5;

/// Cosine similarity of two sparse rows. Rows from the vectorizer are
/// already L2-normalized, so this reduces to a sparse dot product.
#[must_use]
pub fn cosine_similarity(a: &SparseVec, b: &SparseVec) -> f64 {
    let mut dot = 0.0;
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                dot += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    dot
}

/// Group row indices into clusters. Returns clusters ordered by their
/// smallest member index; members within a cluster are sorted.
#[must_use]
pub fn cluster_signals(rows: &[SparseVec]) -> Vec<Vec<usize>> {
    let n = rows.len();
    if n == 0 {
        return Vec::new();
    }

    let mut distance = vec![vec![0.0_f64; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = 1.0 - cosine_similarity(&rows[i], &rows[j]);
            distance[i][j] = d;
            distance[j][i] = d;
        }
    }

    let mut clusters: Vec<Vec<usize>> = (0..n).map(|i| vec![i]).collect();
    loop {
        let Some((a, b, min_distance)) = closest_pair(&clusters, &distance) else {
            break;
        };
        if min_distance > SIMILARITY_THRESHOLD {
            break;
        }
        let merged = clusters.remove(b);
        clusters[a].extend(merged);
        clusters[a].sort_unstable();
    }

    clusters.sort_by_key(|members| members[0]);
    clusters
}

/// The pair of clusters with the minimum average inter-cluster
/// distance. Ties resolve to the lowest index pair for determinism.
fn closest_pair(clusters: &[Vec<usize>], distance: &[Vec<f64>]) -> Option<(usize, usize, f64)> {
    let mut best: Option<(usize, usize, f64)> = None;
    for a in 0..clusters.len() {
        for b in (a + 1)..clusters.len() {
            let d = average_distance(&clusters[a], &clusters[b], distance);
            if best.is_none_or(|(_, _, current)| d < current) {
                best = Some((a, b, d));
            }
        }
    }
    best
}

fn average_distance(a: &[usize], b: &[usize], distance: &[Vec<f64>]) -> f64 {
    let mut total = 0.0;
    for &i in a {
        for &j in b {
            total += distance[i][j];
        }
    }
    #[allow(clippy::cast_precision_loss)]
    let pairs = (a.len() * b.len()) as f64;
    total / pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(entries: &[(usize, f64)]) -> SparseVec {
        let norm: f64 = entries.iter().map(|&(_, w)| w * w).sum::<f64>().sqrt();
        entries.iter().map(|&(i, w)| (i, w / norm)).collect()
    }

    #[test]
    fn cosine_of_identical_rows_is_one() {
        let a = unit(&[(0, 1.0), (3, 2.0)]);
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cosine_of_disjoint_rows_is_zero() {
        let a = unit(&[(0, 1.0)]);
        let b = unit(&[(1, 1.0)]);
        assert!(cosine_similarity(&a, &b).abs() < f64::EPSILON);
    }

    #[test]
    fn high_similarity_pairs_cluster_together() {
        // Similarity ~0.9: distance 0.1, well under the threshold.
        let a = unit(&[(0, 0.9), (1, (1.0_f64 - 0.81).sqrt())]);
        let b = unit(&[(0, 1.0)]);
        assert!((cosine_similarity(&a, &b) - 0.9).abs() < 1e-9);
        let clusters = cluster_signals(&[a, b]);
        assert_eq!(clusters, vec![vec![0, 1]]);
    }

    #[test]
    fn low_similarity_pairs_stay_apart() {
        // Similarity 0.2: distance 0.8, over the threshold.
        let a = unit(&[(0, 0.2), (1, (1.0_f64 - 0.04).sqrt())]);
        let b = unit(&[(0, 1.0)]);
        assert!((cosine_similarity(&a, &b) - 0.2).abs() < 1e-9);
        let clusters = cluster_signals(&[a, b]);
        assert_eq!(clusters, vec![vec![0], vec![1]]);
    }

    #[test]
    fn average_linkage_keeps_outlier_out() {
        let a = unit(&[(0, 1.0)]);
        let b = unit(&[(0, 1.0)]);
        let c = unit(&[(5, 1.0)]);
        let clusters = cluster_signals(&[a, b, c]);
        assert_eq!(clusters, vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn all_singletons_is_a_valid_outcome() {
        let rows = vec![unit(&[(0, 1.0)]), unit(&[(1, 1.0)]), unit(&[(2, 1.0)])];
        let clusters = cluster_signals(&rows);
        assert_eq!(clusters.len(), 3);
    }

    #[test]
    fn single_giant_cluster_is_a_valid_outcome() {
        let rows = vec![unit(&[(0, 1.0)]); 4];
        let clusters = cluster_signals(&rows);
        assert_eq!(clusters, vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn empty_vectors_stay_singletons() {
        let rows = vec![Vec::new(), Vec::new(), unit(&[(0, 1.0)])];
        let clusters = cluster_signals(&rows);
        // Empty rows have zero similarity to everything, distance 1.
        assert_eq!(clusters.len(), 3);
    }

    #[test]
    fn clustering_is_deterministic() {
        let rows = vec![
            unit(&[(0, 1.0), (1, 0.4)]),
            unit(&[(0, 1.0), (2, 0.4)]),
            unit(&[(3, 1.0)]),
            unit(&[(3, 1.0), (4, 0.2)]),
        ];
        let a = cluster_signals(&rows);
        let b = cluster_signals(&rows);
        assert_eq!(a, b);
    }

    #[test]
    fn no_rows_no_clusters() {
        assert!(cluster_signals(&[]).is_empty());
    }
}
