//! Size-constrained nearest-neighbor-graph clustering core.
//!
//! Builds a mutually-nearest-neighbor digraph over a point set, derives an
//! independent dominating set of seeds from it, and grows clusters outward
//! from those seeds — or, for streaming use, forms clusters directly from a
//! batched nearest-neighbor scan without ever materializing the digraph.
//! See [`digraph`], [`seeds`], and [`nng`] respectively.

mod builder;
mod cluster;
mod clustering;
mod datasource;
mod digraph;
mod distance;
mod error;
mod ids;
mod nng;
mod seeds;

pub use crate::{
    builder::{ClusterSpec, ClusterSpecBuilder},
    cluster::NngClusterer,
    clustering::{Clustering, ClusteringStats},
    datasource::{DataSource, DataSourceError},
    digraph::Digraph,
    digraph::algebra::LoopPolicy,
    distance::{CosineNorms, Distance, DistanceError, Norm, Result as DistanceResult, VectorKind, cosine_distance, euclidean_distance},
    error::{ClusterError, ErrorKind, LastError, NoSolutionReason, Result, last_error, reset_last_error},
    ids::{ClusterLabel, PointIndex},
    nng::{BatchClusterOptions, NnSearchBackend, UnassignedMethod, cluster_batches},
    nng::backend::BruteForceBackend,
    seeds::{Strategy, find_seeds},
};

#[cfg(test)]
pub(crate) mod test_utils;
