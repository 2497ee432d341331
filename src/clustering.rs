//! Clustering container adapter.
//!
//! The original C ABI distinguishes an owned label buffer from one supplied
//! by the caller, because `free` must never release memory it does not own.
//! Rust's ownership model makes that distinction unnecessary: [`Clustering`]
//! always owns its `Vec<ClusterLabel>`, and [`Clustering::into_labels`] is
//! the ownership-transfer equivalent of the original `make_labels_external` —
//! the caller simply takes the `Vec` by value instead of flipping a flag.

use crate::error::{ClusterError, record_error};
use crate::ids::ClusterLabel;

/// Owns a point count and the per-point cluster assignment produced by one
/// of the clustering algorithms ([`crate::nng::cluster_batches`], or the
/// seed-finder-driven pipeline built from [`crate::digraph`] and
/// [`crate::seeds`]).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Clustering {
    num_points: usize,
    cluster_label: Vec<ClusterLabel>,
    num_clusters: usize,
}

/// Per-cluster size summary returned by [`Clustering::stats`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ClusteringStats {
    /// Number of points carrying each cluster label, indexed by label.
    pub cluster_sizes: Vec<usize>,
    /// Number of points with no assigned label.
    pub unassigned_count: usize,
}

impl Clustering {
    /// Builds a clustering over `num_points` points, all initially
    /// unassigned and with zero clusters.
    #[must_use]
    pub fn empty(num_points: usize) -> Self {
        Self {
            num_points,
            cluster_label: vec![ClusterLabel::NONE; num_points],
            num_clusters: 0,
        }
    }

    /// Builds a clustering from an existing label buffer.
    ///
    /// # Errors
    /// Returns [`ClusterError::InvalidInput`] if `cluster_label.len() !=
    /// num_points`, or if any non-sentinel label is not `< num_clusters`.
    pub fn from_existing(num_points: usize, num_clusters: usize, cluster_label: Vec<ClusterLabel>) -> Result<Self, ClusterError> {
        let clustering = Self { num_points, cluster_label, num_clusters };
        clustering.check()?;
        Ok(clustering)
    }

    /// Validates the structural invariant: the label buffer has exactly
    /// `num_points` entries, and every non-sentinel label is `< num_clusters`.
    ///
    /// # Errors
    /// Returns [`ClusterError::InvalidInput`] describing the first violation
    /// found.
    pub fn check(&self) -> Result<(), ClusterError> {
        if self.cluster_label.len() != self.num_points {
            return Err(record_error(ClusterError::InvalidInput {
                message: format!(
                    "label buffer has {} entries, expected {}",
                    self.cluster_label.len(),
                    self.num_points
                ),
            }));
        }
        if let Some(out_of_range) = self
            .cluster_label
            .iter()
            .find(|label| !label.is_none() && label.index() >= self.num_clusters)
        {
            return Err(record_error(ClusterError::InvalidInput {
                message: format!("label {out_of_range} is not less than num_clusters ({})", self.num_clusters),
            }));
        }
        Ok(())
    }

    /// Number of points this clustering covers.
    #[must_use]
    pub const fn count_points(&self) -> usize {
        self.num_points
    }

    /// Number of clusters currently recorded.
    #[must_use]
    pub const fn count_clusters(&self) -> usize {
        self.num_clusters
    }

    /// Read-only access to the per-point labels.
    #[must_use]
    pub fn labels(&self) -> &[ClusterLabel] {
        &self.cluster_label
    }

    /// Consumes the clustering, returning ownership of its label buffer.
    /// The Rust-idiomatic equivalent of the original `make_labels_external`.
    #[must_use]
    pub fn into_labels(self) -> Vec<ClusterLabel> {
        self.cluster_label
    }

    /// Replaces the label buffer and cluster count wholesale. Used by the
    /// batched clusterer ([`crate::nng::cluster_batches`]) once it has
    /// finished a full pass.
    ///
    /// # Errors
    /// Propagates [`Self::check`]'s validation failure.
    pub(crate) fn set_labels(&mut self, cluster_label: Vec<ClusterLabel>, num_clusters: usize) -> Result<(), ClusterError> {
        self.cluster_label = cluster_label;
        self.num_clusters = num_clusters;
        self.check()
    }

    /// Computes per-cluster sizes and the unassigned count.
    #[must_use]
    pub fn stats(&self) -> ClusteringStats {
        let mut cluster_sizes = vec![0usize; self.num_clusters];
        let mut unassigned_count = 0;
        for label in &self.cluster_label {
            if label.is_none() {
                unassigned_count += 1;
            } else if let Some(slot) = cluster_sizes.get_mut(label.index()) {
                *slot += 1;
            }
        }
        ClusteringStats { cluster_sizes, unassigned_count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_clustering_has_no_clusters() {
        let clustering = Clustering::empty(4);
        assert_eq!(clustering.count_points(), 4);
        assert_eq!(clustering.count_clusters(), 0);
        assert!(clustering.labels().iter().all(ClusterLabel::is_none));
    }

    #[test]
    fn from_existing_rejects_out_of_range_label() {
        let labels = vec![ClusterLabel::new(0), ClusterLabel::new(5)];
        let err = Clustering::from_existing(2, 1, labels).expect_err("label 5 exceeds num_clusters");
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidInput);
    }

    #[test]
    fn stats_counts_sizes_and_unassigned() {
        let labels = vec![ClusterLabel::new(0), ClusterLabel::new(0), ClusterLabel::NONE, ClusterLabel::new(1)];
        let clustering = Clustering::from_existing(4, 2, labels).expect("valid clustering");
        let stats = clustering.stats();
        assert_eq!(stats.cluster_sizes, vec![2, 1]);
        assert_eq!(stats.unassigned_count, 1);
    }

    #[test]
    fn into_labels_transfers_ownership() {
        let clustering = Clustering::empty(3);
        let labels = clustering.into_labels();
        assert_eq!(labels.len(), 3);
    }
}
