//! Top-level orchestration wiring a validated [`ClusterSpec`], a
//! [`DataSource`], and the batched NNG clusterer ([`crate::nng`]) together.
//!
//! This is the entry point most callers reach for: build a [`ClusterSpec`]
//! with [`crate::builder::ClusterSpecBuilder`], hand it to [`NngClusterer::new`],
//! then call [`NngClusterer::run`] against any [`DataSource`].

use tracing::{instrument, warn};

use crate::builder::ClusterSpec;
use crate::clustering::Clustering;
use crate::datasource::DataSource;
use crate::error::{ClusterError, NoSolutionReason, record_error};
use crate::nng::backend::BruteForceBackend;
use crate::nng::{BatchClusterOptions, cluster_batches};

/// Runs the batched NNG clustering pipeline against a [`DataSource`] using a
/// validated [`ClusterSpec`].
///
/// # Examples
/// ```
/// use nngclust::{ClusterSpecBuilder, DataSource, DataSourceError, NngClusterer};
///
/// struct Dummy(Vec<f32>);
///
/// impl DataSource for Dummy {
///     fn len(&self) -> usize { self.0.len() }
///     fn name(&self) -> &str { "dummy" }
///     fn distance(&self, i: usize, j: usize) -> Result<f32, DataSourceError> {
///         let a = self.0.get(i).ok_or(DataSourceError::OutOfBounds { index: i })?;
///         let b = self.0.get(j).ok_or(DataSourceError::OutOfBounds { index: j })?;
///         Ok((a - b).abs())
///     }
/// }
///
/// let spec = ClusterSpecBuilder::new().with_k(2).build().expect("valid spec");
/// let clusterer = NngClusterer::new(spec);
/// let clustering = clusterer
///     .run(&Dummy(vec![0.0, 0.1, 5.0, 5.1]))
///     .expect("run must succeed");
/// assert_eq!(clustering.count_clusters(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct NngClusterer {
    spec: ClusterSpec,
}

impl NngClusterer {
    /// Builds an orchestrator from a validated configuration.
    #[must_use]
    pub const fn new(spec: ClusterSpec) -> Self {
        Self { spec }
    }

    /// Returns the configuration this orchestrator runs with.
    #[must_use]
    pub const fn spec(&self) -> &ClusterSpec {
        &self.spec
    }

    /// Clusters every point in `source`.
    ///
    /// # Errors
    /// See [`Self::run_with_primary`].
    pub fn run<D: DataSource>(&self, source: &D) -> Result<Clustering, ClusterError> {
        self.run_with_primary(source, None)
    }

    /// Clusters `source`, restricting which points may seed or be queried as
    /// batch members to `primary_points`. Pass `None` to make every point
    /// eligible.
    ///
    /// The backend itself is restricted to the same mask, so non-primary
    /// points are never offered as neighbor candidates either.
    ///
    /// # Errors
    /// Returns [`ClusterError::NoSolution`] if `source` is empty or if no
    /// feasible clustering exists, and propagates any [`ClusterError`] raised
    /// by [`crate::nng::cluster_batches`].
    #[instrument(
        name = "nngclust.run",
        skip(self, source, primary_points),
        fields(data_source = %source.name(), items = source.len(), k = self.spec.k().get()),
        err
    )]
    pub fn run_with_primary<D: DataSource>(
        &self,
        source: &D,
        primary_points: Option<&[bool]>,
    ) -> Result<Clustering, ClusterError> {
        let n = source.len();
        if n == 0 {
            warn!(data_source = source.name(), "data source is empty");
            return Err(record_error(ClusterError::NoSolution { reason: NoSolutionReason::TooFewPoints }));
        }

        let backend = match primary_points {
            Some(mask) => BruteForceBackend::with_active_mask(source, mask),
            None => BruteForceBackend::new(source),
        };
        let options = BatchClusterOptions {
            k: self.spec.k().get(),
            unassigned_method: self.spec.unassigned_method(),
            radius_constraint: self.spec.radius_constraint(),
            radius: self.spec.radius(),
            primary_points,
            batch_size: self.spec.batch_size().get(),
        };

        let mut clustering = Clustering::empty(n);
        cluster_batches(&mut clustering, &backend, &options)?;
        Ok(clustering)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ClusterSpecBuilder;
    use crate::test_utils::CountingSource;
    use std::sync::{Arc, atomic::AtomicUsize};

    #[test]
    fn clusters_two_tight_pairs() {
        let spec = ClusterSpecBuilder::new().with_k(2).build().expect("valid spec");
        let clusterer = NngClusterer::new(spec);
        let source = CountingSource::new(vec![0.0, 0.1, 5.0, 5.1], Arc::new(AtomicUsize::new(0)));
        let clustering = clusterer.run(&source).expect("clustering succeeds");
        assert_eq!(clustering.count_clusters(), 2);
        assert_eq!(clustering.labels()[0], clustering.labels()[1]);
        assert_eq!(clustering.labels()[2], clustering.labels()[3]);
    }

    #[test]
    fn empty_source_is_no_solution() {
        let spec = ClusterSpecBuilder::new().with_k(2).build().expect("valid spec");
        let clusterer = NngClusterer::new(spec);
        let source = CountingSource::new(vec![], Arc::new(AtomicUsize::new(0)));
        let err = clusterer.run(&source).expect_err("empty source has no solution");
        assert!(matches!(err, ClusterError::NoSolution { reason: NoSolutionReason::TooFewPoints }));
    }

    #[test]
    fn instrumented_run_emits_tracing_events() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let spec = ClusterSpecBuilder::new().with_k(2).build().expect("valid spec");
        let clusterer = NngClusterer::new(spec);
        let source = CountingSource::new(vec![0.0], Arc::new(AtomicUsize::new(0)));
        let err = clusterer.run(&source).expect_err("single point has no solution");
        assert!(matches!(err, ClusterError::NoSolution { reason: NoSolutionReason::TooFewPoints }));
    }

    #[test]
    fn primary_points_restrict_backend_candidates() {
        let spec = ClusterSpecBuilder::new().with_k(2).build().expect("valid spec");
        let clusterer = NngClusterer::new(spec);
        let source = CountingSource::new(vec![0.0, 0.1, 100.0], Arc::new(AtomicUsize::new(0)));
        let primary = vec![true, true, false];
        let clustering = clusterer
            .run_with_primary(&source, Some(&primary))
            .expect("clustering succeeds");
        assert_eq!(clustering.count_clusters(), 1);
        assert!(clustering.labels()[2].is_none());
    }
}
