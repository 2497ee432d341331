//! Point-data abstraction used by the reference brute-force search backend.
//!
//! The clustering core itself never touches raw point data directly — it
//! only ever sees [`PointIndex`](crate::ids::PointIndex)s returned by an
//! [`crate::nng::NnSearchBackend`]. [`DataSource`] exists one layer below
//! that: it is what [`crate::nng::backend::BruteForceBackend`] (and, by
//! extension, tests) use to turn raw vectors into distances.

use thiserror::Error;

/// Errors produced while computing distances over a [`DataSource`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DataSourceError {
    /// Requested index was outside the source's bounds.
    #[error("index {index} is out of bounds")]
    OutOfBounds { index: usize },
    /// Compared vectors had different dimensions.
    #[error("dimension mismatch: left={left}, right={right}")]
    DimensionMismatch { left: usize, right: usize },
    /// Data source contained no rows.
    #[error("data source contains no rows")]
    EmptyData,
}

/// Abstraction over a collection of points that can yield pairwise distances.
///
/// # Examples
/// ```
/// use nngclust::{DataSource, DataSourceError};
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
/// let src = Dummy(vec![1.0, 2.0, 4.0]);
/// assert_eq!(src.len(), 3);
/// assert_eq!(src.distance(0, 2)?, 3.0);
/// # Ok::<(), DataSourceError>(())
/// ```
pub trait DataSource {
    /// Returns the number of points in the source.
    fn len(&self) -> usize;

    /// Returns whether the source contains no points.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a human-readable name, used in error messages.
    fn name(&self) -> &str;

    /// Computes the distance between two points.
    ///
    /// # Errors
    /// Returns [`DataSourceError::OutOfBounds`] if either index is out of
    /// range.
    fn distance(&self, i: usize, j: usize) -> Result<f32, DataSourceError>;

    /// Computes the distances from `query` to every entry in `candidates`.
    ///
    /// The default implementation calls [`Self::distance`] repeatedly;
    /// implementations backed by SIMD or batched kernels can override it.
    ///
    /// # Errors
    /// Propagates any [`DataSourceError`] surfaced by [`Self::distance`].
    fn batch_distances(&self, query: usize, candidates: &[usize]) -> Result<Vec<f32>, DataSourceError> {
        candidates
            .iter()
            .map(|&candidate| self.distance(query, candidate))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dummy(Vec<f32>);

    impl DataSource for Dummy {
        fn len(&self) -> usize {
            self.0.len()
        }

        fn name(&self) -> &str {
            "dummy"
        }

        fn distance(&self, i: usize, j: usize) -> Result<f32, DataSourceError> {
            let a = self.0.get(i).ok_or(DataSourceError::OutOfBounds { index: i })?;
            let b = self.0.get(j).ok_or(DataSourceError::OutOfBounds { index: j })?;
            Ok((a - b).abs())
        }
    }

    #[test]
    fn batch_distances_invokes_scalar_distance() {
        let source = Dummy(vec![0.0, 1.0, 3.0]);
        let distances = source
            .batch_distances(0, &[1, 2])
            .expect("batch distances should succeed");
        assert_eq!(distances, vec![1.0, 3.0]);
    }

    #[test]
    fn batch_distances_propagates_errors() {
        let source = Dummy(vec![0.0, 1.0]);
        let err = source
            .batch_distances(0, &[1, 5])
            .expect_err("invalid candidate must fail");
        assert!(matches!(err, DataSourceError::OutOfBounds { index: 5 }));
    }
}
