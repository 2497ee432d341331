//! Reference nearest-neighbor search backend, the external "NN search
//! backend" collaborator the batched clusterer is generic over.
//!
//! The clusterer in [`super`] is generic over any [`NnSearchBackend`]; this
//! module supplies the one reference implementation this crate ships, a
//! brute-force scan over a [`crate::datasource::DataSource`]. A production
//! deployment would swap this for an index-backed collaborator (HNSW, a ball
//! tree, …) without touching [`super::cluster_batches`].

use crate::datasource::DataSource;
use crate::error::ClusterError;
use crate::ids::PointIndex;

use super::NnSearchBackend;

/// Brute-force [`NnSearchBackend`] over any [`DataSource`]: for each query,
/// scans every point and keeps the `k` closest.
pub struct BruteForceBackend<'a, D: DataSource> {
    source: &'a D,
    active: Option<&'a [bool]>,
}

impl<'a, D: DataSource> BruteForceBackend<'a, D> {
    /// Builds a backend scanning every point in `source`.
    #[must_use]
    pub fn new(source: &'a D) -> Self {
        Self { source, active: None }
    }

    /// Builds a backend that only ever returns neighbors flagged active in
    /// `active_mask` (one entry per point in `source`).
    #[must_use]
    pub fn with_active_mask(source: &'a D, active_mask: &'a [bool]) -> Self {
        Self { source, active: Some(active_mask) }
    }

    fn is_active(&self, index: usize) -> bool {
        self.active.is_none_or(|mask| mask.get(index).copied().unwrap_or(false))
    }
}

impl<D: DataSource> NnSearchBackend for BruteForceBackend<'_, D> {
    fn nearest_neighbors(
        &self,
        query: PointIndex,
        k: usize,
        radius_constraint: bool,
        radius: f32,
    ) -> Result<Option<Vec<PointIndex>>, ClusterError> {
        let mut candidates = Vec::with_capacity(self.source.len());
        for candidate in 0..self.source.len() {
            if !self.is_active(candidate) {
                continue;
            }
            let distance = self.source.distance(query.index(), candidate).map_err(|err| {
                ClusterError::DistSearchError {
                    message: format!("{} while querying {}: {err}", self.source.name(), query),
                }
            })?;
            if radius_constraint && distance > radius {
                continue;
            }
            candidates.push((distance, candidate));
        }
        if candidates.len() < k {
            return Ok(None);
        }
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        candidates.truncate(k);
        Ok(Some(candidates.into_iter().map(|(_, idx)| PointIndex::from(idx)).collect()))
    }
}
