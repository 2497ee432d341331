//! Builder for the batched-clusterer configuration surface.
//!
//! Mirrors how many in-process libraries in this stack separate "can this
//! configuration ever be valid" (checked once, here) from "does it work
//! against this particular input" (checked per call, in
//! [`crate::nng::cluster_batches`]).

use std::num::NonZeroUsize;

use crate::error::{ClusterError, record_error};
use crate::nng::UnassignedMethod;

/// Validated configuration for one run of the batched NNG clusterer.
#[derive(Debug, Clone)]
pub struct ClusterSpec {
    k: NonZeroUsize,
    unassigned_method: UnassignedMethod,
    radius_constraint: bool,
    radius: f32,
    batch_size: NonZeroUsize,
}

impl ClusterSpec {
    /// Minimum cluster size and neighbor count queried per point.
    #[must_use]
    pub const fn k(&self) -> NonZeroUsize {
        self.k
    }

    /// How points with no assigned neighbor are handled.
    #[must_use]
    pub const fn unassigned_method(&self) -> UnassignedMethod {
        self.unassigned_method
    }

    /// Whether a radius bound constrains the neighbor search.
    #[must_use]
    pub const fn radius_constraint(&self) -> bool {
        self.radius_constraint
    }

    /// The radius bound, meaningful only when [`Self::radius_constraint`].
    #[must_use]
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Maximum number of points considered per backend query round.
    #[must_use]
    pub const fn batch_size(&self) -> NonZeroUsize {
        self.batch_size
    }
}

/// Builds a [`ClusterSpec`], validating parameters before they reach the
/// clusterer.
///
/// # Examples
/// ```
/// use nngclust::{ClusterSpecBuilder, UnassignedMethod};
///
/// let spec = ClusterSpecBuilder::new()
///     .with_k(4)
///     .with_unassigned_method(UnassignedMethod::AnyNeighbor)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(spec.k().get(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct ClusterSpecBuilder {
    k: usize,
    unassigned_method: UnassignedMethod,
    radius_constraint: bool,
    radius: f32,
    batch_size: usize,
}

impl Default for ClusterSpecBuilder {
    fn default() -> Self {
        Self {
            k: 5,
            unassigned_method: UnassignedMethod::Ignore,
            radius_constraint: false,
            radius: 0.0,
            batch_size: 1024,
        }
    }
}

impl ClusterSpecBuilder {
    /// Creates a builder populated with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the minimum cluster size / neighbor count.
    #[must_use]
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Sets the policy for points with no assigned neighbor.
    #[must_use]
    pub fn with_unassigned_method(mut self, method: UnassignedMethod) -> Self {
        self.unassigned_method = method;
        self
    }

    /// Enables a radius constraint on the neighbor search.
    #[must_use]
    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius_constraint = true;
        self.radius = radius;
        self
    }

    /// Overrides the per-round batch size.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Validates the configuration and constructs a [`ClusterSpec`].
    ///
    /// # Errors
    /// Returns [`ClusterError::InvalidInput`] if `k` is below the minimum
    /// cluster size of 2, if `batch_size` is zero, or if a radius
    /// constraint is enabled with a non-finite or negative radius.
    pub fn build(self) -> Result<ClusterSpec, ClusterError> {
        if self.k < 2 {
            return Err(record_error(ClusterError::InvalidInput {
                message: "k must be at least 2".to_owned(),
            }));
        }
        let k = NonZeroUsize::new(self.k).ok_or_else(|| {
            record_error(ClusterError::InvalidInput {
                message: "k must be at least 2".to_owned(),
            })
        })?;
        let batch_size = NonZeroUsize::new(self.batch_size).ok_or_else(|| {
            record_error(ClusterError::InvalidInput {
                message: "batch_size must be at least 1".to_owned(),
            })
        })?;
        if self.radius_constraint && !(self.radius.is_finite() && self.radius >= 0.0) {
            return Err(record_error(ClusterError::InvalidInput {
                message: "radius must be finite and non-negative".to_owned(),
            }));
        }
        Ok(ClusterSpec {
            k,
            unassigned_method: self.unassigned_method,
            radius_constraint: self.radius_constraint,
            radius: self.radius,
            batch_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_k_is_rejected() {
        let err = ClusterSpecBuilder::new().with_k(0).build().expect_err("k=0 invalid");
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidInput);
    }

    #[test]
    fn k_of_one_is_rejected() {
        let err = ClusterSpecBuilder::new().with_k(1).build().expect_err("k=1 is below the minimum cluster size");
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidInput);
    }

    #[test]
    fn negative_radius_is_rejected() {
        let err = ClusterSpecBuilder::new().with_radius(-1.0).build().expect_err("negative radius invalid");
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidInput);
    }

    #[test]
    fn defaults_build_successfully() {
        let spec = ClusterSpecBuilder::new().build().expect("defaults are valid");
        assert_eq!(spec.k().get(), 5);
        assert!(!spec.radius_constraint());
    }
}
