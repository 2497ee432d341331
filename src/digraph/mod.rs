//! CSR digraph core.
//!
//! A [`Digraph`] is a compressed-sparse-row adjacency structure over
//! `vertices` vertices: `tail_ptr[v]..tail_ptr[v + 1]` indexes the slice of
//! `head` holding vertex `v`'s out-neighbours. The structure is always a
//! valid CSR graph once constructed — unlike the original C ABI, there is no
//! "allocated but uninitialized" state exposed to callers, because Rust's
//! `Vec` has no safe notion of allocated-but-unwritten memory. [`Digraph::init`]
//! and [`Digraph::empty`] are therefore behaviourally identical here; both
//! names are kept so call sites documented against the original two-name
//! contract remain meaningful (see `DESIGN.md`).

pub mod algebra;

use crate::error::{ClusterError, record_error};
use crate::ids::PointIndex;

/// Upper bound on the number of arcs a single [`Digraph`] can address.
///
/// `tail_ptr` entries are stored as `u32`, so no row boundary may exceed
/// this value.
pub const MAX_ARCS: usize = u32::MAX as usize;

/// A compressed-sparse-row directed graph over `[0, vertices)`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Digraph {
    vertices: usize,
    tail_ptr: Vec<u32>,
    head: Vec<PointIndex>,
}

impl Digraph {
    /// Allocates a digraph with `vertices` vertices and room for
    /// `arc_capacity` arcs, with every row initially empty.
    ///
    /// # Errors
    /// Returns [`ClusterError::TooLargeDigraph`] if `arc_capacity` exceeds
    /// [`MAX_ARCS`], and [`ClusterError::NoMemory`] if the backing
    /// allocation fails.
    #[track_caller]
    pub fn empty(vertices: usize, arc_capacity: usize) -> Result<Self, ClusterError> {
        if arc_capacity > MAX_ARCS {
            return Err(record_error(ClusterError::TooLargeDigraph {
                context: "digraph arc capacity",
                #[expect(clippy::cast_possible_truncation, reason = "MAX_ARCS fits u32 by construction")]
                limit: MAX_ARCS as u32,
            }));
        }
        let mut head = Vec::new();
        head.try_reserve_exact(arc_capacity).map_err(|_| {
            record_error(ClusterError::NoMemory {
                context: "allocating digraph head array",
                requested: arc_capacity,
            })
        })?;
        Ok(Self {
            vertices,
            tail_ptr: vec![0; vertices + 1],
            head,
        })
    }

    /// Identical to [`Self::empty`]; see the module documentation for why the
    /// original two-constructor contract collapses to one implementation.
    ///
    /// # Errors
    /// See [`Self::empty`].
    pub fn init(vertices: usize, arc_capacity: usize) -> Result<Self, ClusterError> {
        Self::empty(vertices, arc_capacity)
    }

    /// Number of vertices in the digraph.
    #[must_use]
    pub const fn vertices(&self) -> usize {
        self.vertices
    }

    /// Total number of arcs currently stored.
    #[must_use]
    pub fn arc_count(&self) -> usize {
        self.tail_ptr.last().copied().unwrap_or(0) as usize
    }

    /// Current arc storage capacity.
    #[must_use]
    pub fn arc_capacity(&self) -> usize {
        self.head.capacity()
    }

    /// Returns the out-neighbours of vertex `v` in CSR order.
    ///
    /// # Panics
    /// Panics if `v >= self.vertices()`; callers operate on vertex indices
    /// that are always bounds-checked against the same digraph upstream.
    #[must_use]
    #[expect(
        clippy::indexing_slicing,
        reason = "documented panic: caller upholds v < self.vertices()"
    )]
    pub fn row(&self, v: usize) -> &[PointIndex] {
        let start = self.tail_ptr[v] as usize;
        let end = self.tail_ptr[v + 1] as usize;
        &self.head[start..end]
    }

    /// Out-degree of vertex `v`.
    #[must_use]
    pub fn out_degree(&self, v: usize) -> usize {
        self.row(v).len()
    }

    /// Read-only access to the raw `tail_ptr` array (length `vertices + 1`).
    #[must_use]
    pub(crate) fn tail_ptr(&self) -> &[u32] {
        &self.tail_ptr
    }

    /// Hands the preallocated head buffer to a builder pass, leaving an
    /// empty one in its place. Used by [`algebra`] to fill into the capacity
    /// the two-pass protocol already reserved, instead of allocating fresh.
    pub(crate) fn take_head(&mut self) -> Vec<PointIndex> {
        std::mem::take(&mut self.head)
    }

    /// Reallocates the arc storage to `new_capacity`, preserving existing
    /// arcs (up to `min(old_capacity, new_capacity)`). Passing `0` releases
    /// the backing storage.
    ///
    /// # Errors
    /// Returns [`ClusterError::TooLargeDigraph`] if `new_capacity` exceeds
    /// [`MAX_ARCS`], and [`ClusterError::NoMemory`] if growing the
    /// allocation fails.
    #[track_caller]
    pub fn resize_arcs(&mut self, new_capacity: usize) -> Result<(), ClusterError> {
        if new_capacity > MAX_ARCS {
            return Err(record_error(ClusterError::TooLargeDigraph {
                context: "digraph arc capacity",
                #[expect(clippy::cast_possible_truncation, reason = "MAX_ARCS fits u32 by construction")]
                limit: MAX_ARCS as u32,
            }));
        }
        if new_capacity < self.head.len() {
            self.head.truncate(new_capacity);
        }
        if new_capacity == 0 {
            self.head = Vec::new();
            return Ok(());
        }
        let additional = new_capacity.saturating_sub(self.head.capacity());
        if additional > 0 {
            self.head.try_reserve_exact(additional).map_err(|_| {
                record_error(ClusterError::NoMemory {
                    context: "resizing digraph head array",
                    requested: new_capacity,
                })
            })?;
        } else {
            self.head.shrink_to(new_capacity);
        }
        Ok(())
    }

    /// Structural validity check: `tail_ptr[0] == 0`, `tail_ptr` is
    /// nondecreasing, the last entry does not exceed arc capacity, and every
    /// stored head lies in `[0, vertices)`. Intended for debug assertions and
    /// an opt-in "extensive" checking mode, not for routine control flow.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        if self.tail_ptr.len() != self.vertices + 1 {
            return false;
        }
        if self.tail_ptr.first() != Some(&0) {
            return false;
        }
        if self.tail_ptr.windows(2).any(|w| w[0] > w[1]) {
            return false;
        }
        let Some(&arcs) = self.tail_ptr.last() else {
            return false;
        };
        let arcs = arcs as usize;
        if arcs > self.head.capacity() {
            return false;
        }
        let Some(heads) = self.head.get(..arcs) else {
            return false;
        };
        heads.iter().all(|h| h.index() < self.vertices)
    }

    /// Builds a digraph directly from raw CSR parts, for use by the algebra
    /// module once a pass has finished writing. Not validated; callers are
    /// expected to uphold the CSR invariants themselves.
    pub(crate) fn from_raw_parts(vertices: usize, tail_ptr: Vec<u32>, head: Vec<PointIndex>) -> Self {
        Self {
            vertices,
            tail_ptr,
            head,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_digraph_has_no_arcs() {
        let dg = Digraph::empty(4, 8).expect("allocation succeeds");
        assert_eq!(dg.vertices(), 4);
        assert_eq!(dg.arc_count(), 0);
        assert!(dg.is_initialized());
        for v in 0..4 {
            assert!(dg.row(v).is_empty());
        }
    }

    #[test]
    fn resize_arcs_to_zero_releases_storage() {
        let mut dg = Digraph::empty(2, 8).expect("allocation succeeds");
        dg.resize_arcs(0).expect("shrink succeeds");
        assert_eq!(dg.arc_capacity(), 0);
    }

    #[test]
    fn too_large_arc_capacity_is_rejected() {
        let err = Digraph::empty(1, MAX_ARCS + 1).expect_err("capacity exceeds MAX_ARCS");
        assert_eq!(err.kind(), crate::error::ErrorKind::TooLargeDigraph);
    }
}
