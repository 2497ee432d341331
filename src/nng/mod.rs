//! Batched NNG clusterer.
//!
//! Streams points through a pluggable [`NnSearchBackend`] in batches,
//! forming clusters online as seeds are discovered: a batch member becomes a
//! new seed when none of its k nearest neighbors already carries a label,
//! claiming itself and all k neighbors for the new cluster. This bypasses
//! the digraph algebra and seed finder entirely, forming clusters directly
//! from the nearest-neighbor scan rather than materializing a digraph.

pub mod backend;

use tracing::{instrument, warn};

use crate::clustering::Clustering;
use crate::error::{ClusterError, NoSolutionReason, record_error};
use crate::ids::{ClusterLabel, PointIndex};

/// How a point with no assigned neighbor among its k nearest should be
/// handled once it is established not to be a seed itself.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UnassignedMethod {
    /// Leave the point unassigned (`CLBL_NA`).
    Ignore,
    /// Give the point a preliminary label copied from the first already-
    /// assigned neighbor found; a later seed may still overwrite it.
    AnyNeighbor,
}

/// Collaborator interface for nearest-neighbor search. Implementations own
/// whatever index or data set they search;
/// [`backend::BruteForceBackend`] is the reference implementation shipped
/// with this crate.
pub trait NnSearchBackend {
    /// Returns the `k` nearest neighbors of `query`, in ascending distance,
    /// or `Ok(None)` if fewer than `k` candidates satisfy the constraints
    /// (optionally including `radius`).
    ///
    /// # Errors
    /// Returns [`ClusterError::DistSearchError`] if the backend's own search
    /// fails.
    fn nearest_neighbors(
        &self,
        query: PointIndex,
        k: usize,
        radius_constraint: bool,
        radius: f32,
    ) -> Result<Option<Vec<PointIndex>>, ClusterError>;
}

/// Parameters controlling [`cluster_batches`], grouped the way a caller
/// typically assembles them once and reuses across calls.
#[derive(Clone, Debug)]
pub struct BatchClusterOptions<'a> {
    /// Minimum cluster size, and the neighbor count queried per point.
    pub k: usize,
    /// How to handle points with no assigned neighbor among their k nearest.
    pub unassigned_method: UnassignedMethod,
    /// Whether `radius` bounds the neighbor search.
    pub radius_constraint: bool,
    /// Radius bound, meaningful only when `radius_constraint` is set.
    pub radius: f32,
    /// If set, only these points may seed or be batch members; `None` means
    /// every point is eligible.
    pub primary_points: Option<&'a [bool]>,
    /// Maximum number of points considered per backend query round.
    pub batch_size: usize,
}

/// Fills `clustering`'s labels by streaming its points through `backend` in
/// batches.
///
/// # Errors
/// Returns [`ClusterError::InvalidInput`] for a malformed `options` (`k <
/// 2`, `batch_size == 0`, or a `primary_points` length mismatch),
/// [`ClusterError::NoSolution`] if no seed is ever found,
/// [`ClusterError::TooLargeProblem`] if the cluster count would exceed
/// [`ClusterLabel::MAX_VALUE`], and propagates [`ClusterError::DistSearchError`]
/// from the backend.
#[instrument(name = "nng::cluster_batches", skip(clustering, backend, options), fields(n = clustering.count_points(), k = options.k), err)]
pub fn cluster_batches<B: NnSearchBackend>(
    clustering: &mut Clustering,
    backend: &B,
    options: &BatchClusterOptions<'_>,
) -> Result<(), ClusterError> {
    let n = clustering.count_points();
    if options.k < 2 {
        return Err(record_error(ClusterError::InvalidInput {
            message: "k must be at least 2".to_owned(),
        }));
    }
    if options.batch_size == 0 {
        return Err(record_error(ClusterError::InvalidInput {
            message: "batch_size must be positive".to_owned(),
        }));
    }
    if let Some(primary) = options.primary_points {
        if primary.len() != n {
            return Err(record_error(ClusterError::InvalidInput {
                message: "primary_points length must equal the number of points".to_owned(),
            }));
        }
    }
    if n < options.k {
        return Err(record_error(ClusterError::NoSolution {
            reason: NoSolutionReason::TooFewPoints,
        }));
    }
    if options.primary_points.is_some_and(|p| !p.contains(&true)) {
        return Err(record_error(ClusterError::NoSolution {
            reason: NoSolutionReason::NoPrimaries,
        }));
    }

    let mut assigned = vec![false; n];
    let mut labels = vec![ClusterLabel::NONE; n];
    let mut num_clusters: u32 = 0;

    let mut cursor = 0usize;
    while cursor < n {
        let mut batch = Vec::with_capacity(options.batch_size);
        while cursor < n && batch.len() < options.batch_size {
            let unassigned = assigned.get(cursor).copied() == Some(false);
            let is_primary = options
                .primary_points
                .is_none_or(|p| p.get(cursor).copied().unwrap_or(false));
            if unassigned && is_primary {
                batch.push(cursor);
            }
            cursor += 1;
        }

        for i in batch {
            let Some(mut neighbors) =
                backend.nearest_neighbors(PointIndex::from(i), options.k, options.radius_constraint, options.radius)?
            else {
                continue;
            };
            neighbors.sort_by_key(PointIndex::get);

            let all_unassigned = neighbors
                .iter()
                .all(|nb| assigned.get(nb.index()).copied() == Some(false));
            if all_unassigned {
                if num_clusters == ClusterLabel::MAX_VALUE {
                    return Err(record_error(ClusterError::TooLargeProblem {
                        context: "cluster count",
                        limit: ClusterLabel::MAX_VALUE,
                    }));
                }
                let label = ClusterLabel::new(num_clusters);
                num_clusters += 1;
                for nb in &neighbors {
                    if let Some(slot) = labels.get_mut(nb.index()) {
                        *slot = label;
                    }
                    if let Some(slot) = assigned.get_mut(nb.index()) {
                        *slot = true;
                    }
                }
                if assigned.get(i).copied() == Some(false) {
                    if let Some(slot) = labels.get_mut(i) {
                        *slot = label;
                    }
                    if let Some(slot) = assigned.get_mut(i) {
                        *slot = true;
                    }
                }
            } else if options.unassigned_method == UnassignedMethod::AnyNeighbor {
                let assigned_label = neighbors
                    .iter()
                    .find(|nb| assigned.get(nb.index()).copied() == Some(true))
                    .and_then(|nb| labels.get(nb.index()).copied());
                if let Some(label) = assigned_label {
                    if let Some(slot) = labels.get_mut(i) {
                        *slot = label;
                    }
                }
            }
        }
    }

    if num_clusters == 0 {
        let reason = if options.radius_constraint {
            NoSolutionReason::InfeasibleRadius
        } else if options.primary_points.is_some() {
            NoSolutionReason::NoPrimaries
        } else {
            NoSolutionReason::TooFewPoints
        };
        warn!(?reason, "batched clustering produced no seeds");
        return Err(record_error(ClusterError::NoSolution { reason }));
    }

    clustering.set_labels(labels, num_clusters as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clustering::Clustering;

    struct FixedNeighbors(Vec<Vec<usize>>);

    impl NnSearchBackend for FixedNeighbors {
        fn nearest_neighbors(
            &self,
            query: PointIndex,
            k: usize,
            _radius_constraint: bool,
            _radius: f32,
        ) -> Result<Option<Vec<PointIndex>>, ClusterError> {
            let row = self.0.get(query.index()).map_or(&[][..], Vec::as_slice);
            if row.len() < k {
                return Ok(None);
            }
            Ok(Some(row.iter().take(k).map(|&i| PointIndex::from(i)).collect()))
        }
    }

    #[test]
    fn s6_three_mutual_pairs_ignore_unassigned() {
        let backend = FixedNeighbors(vec![vec![0, 1], vec![1, 0], vec![2, 3], vec![3, 2], vec![4, 5], vec![5, 4]]);
        let mut clustering = Clustering::empty(6);
        let options = BatchClusterOptions {
            k: 2,
            unassigned_method: UnassignedMethod::Ignore,
            radius_constraint: false,
            radius: 0.0,
            primary_points: None,
            batch_size: 6,
        };
        cluster_batches(&mut clustering, &backend, &options).expect("clustering succeeds");
        assert_eq!(clustering.count_clusters(), 3);
        let labels: Vec<u32> = clustering.labels().iter().map(ClusterLabel::get).collect();
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_eq!(labels[4], labels[5]);
    }

    #[test]
    fn s7_primary_only_seeds() {
        // A backend restricted to an active set of primary points (via its
        // own `active_mask`) would never offer vertex 3 as a candidate for
        // vertex 2, leaving vertex 2 with only itself: fewer than k=2
        // candidates, so the backend reports no usable tuple.
        let backend = FixedNeighbors(vec![vec![0, 1], vec![1, 0], vec![2], vec![], vec![], vec![]]);
        let mut clustering = Clustering::empty(6);
        let primary = vec![true, true, true, false, false, false];
        let options = BatchClusterOptions {
            k: 2,
            unassigned_method: UnassignedMethod::Ignore,
            radius_constraint: false,
            radius: 0.0,
            primary_points: Some(&primary),
            batch_size: 6,
        };
        cluster_batches(&mut clustering, &backend, &options).expect("clustering succeeds");
        assert_eq!(clustering.count_clusters(), 1);
        let labels = clustering.labels();
        assert!(!labels[0].is_none());
        assert!(!labels[1].is_none());
        assert!(labels[2].is_none());
        assert!(labels[3].is_none());
        assert!(labels[4].is_none());
        assert!(labels[5].is_none());
    }

    #[test]
    fn fewer_points_than_k_is_no_solution() {
        let backend = FixedNeighbors(vec![vec![1], vec![0]]);
        let mut clustering = Clustering::empty(2);
        let options = BatchClusterOptions {
            k: 3,
            unassigned_method: UnassignedMethod::Ignore,
            radius_constraint: false,
            radius: 0.0,
            primary_points: None,
            batch_size: 2,
        };
        let err = cluster_batches(&mut clustering, &backend, &options).expect_err("too few points");
        assert!(matches!(
            err,
            ClusterError::NoSolution { reason: NoSolutionReason::TooFewPoints }
        ));
    }
}
