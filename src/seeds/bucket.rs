//! Bucket-sorted in-degree index with on-line decrement.
//!
//! Vertices are bucket-sorted by ascending in-degree using the classic
//! degeneracy-ordering layout (Batagelj & Zaversnik): `sorted_vertices` holds
//! every vertex once, partitioned into contiguous ascending-degree buckets;
//! `bucket_start[d]` is the current first position of the bucket holding
//! vertices whose live count equals `d` (bucket d's span is
//! `bucket_start[d]..bucket_start[d + 1]`). `vertex_index[v]` is the inverse
//! of `sorted_vertices`, kept in sync on every swap — this is the arena +
//! integer-index re-architecture of the source's pointer-based
//! `vertex_index`.

/// Bucket-sorted index over vertex in-degrees, supporting on-line decrement.
pub struct SortIndex {
    inwards_count: Vec<u32>,
    sorted_vertices: Vec<u32>,
    vertex_index: Vec<u32>,
    bucket_start: Vec<u32>,
    stable: bool,
}

impl SortIndex {
    /// Builds an index from `in_degree`, one entry per vertex. `stable`
    /// enables the id-tiebreaking re-sort on every decrement, at the cost of
    /// additional O(bucket) work per call.
    #[must_use]
    pub fn build(in_degree: &[u32], stable: bool) -> Self {
        let vertices = in_degree.len();
        let max_degree = in_degree.iter().copied().max().unwrap_or(0);

        let mut bucket_start = vec![0u32; max_degree as usize + 2];
        for &d in in_degree {
            if let Some(slot) = bucket_start.get_mut(d as usize + 1) {
                *slot += 1;
            }
        }
        for d in 1..bucket_start.len() {
            let prev = bucket_start.get(d - 1).copied().unwrap_or(0);
            if let Some(slot) = bucket_start.get_mut(d) {
                *slot += prev;
            }
        }

        let mut cursor = bucket_start.clone();
        let mut sorted_vertices = vec![0u32; vertices];
        let mut vertex_index = vec![0u32; vertices];
        for (v, &d) in in_degree.iter().enumerate() {
            if let Some(slot) = cursor.get_mut(d as usize) {
                #[expect(clippy::cast_possible_truncation, reason = "vertex count is bounded by PointIndex::MAX_VALUE")]
                let pos = *slot as usize;
                if let Some(dest) = sorted_vertices.get_mut(pos) {
                    *dest = v as u32;
                }
                if let Some(dest) = vertex_index.get_mut(v) {
                    *dest = pos as u32;
                }
                *slot += 1;
            }
        }

        Self {
            inwards_count: in_degree.to_vec(),
            sorted_vertices,
            vertex_index,
            bucket_start,
            stable,
        }
    }

    /// Number of vertices held in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sorted_vertices.len()
    }

    /// Returns whether the index holds no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sorted_vertices.is_empty()
    }

    /// Vertices in ascending in-degree order, as recorded at construction
    /// time or after subsequent decrements.
    #[must_use]
    pub fn order(&self) -> &[u32] {
        &self.sorted_vertices
    }

    /// Current live in-degree of `v`.
    #[must_use]
    pub fn count(&self, v: usize) -> u32 {
        self.inwards_count.get(v).copied().unwrap_or(0)
    }

    /// Decrements `v`'s live in-degree by one, repositioning it into the
    /// bucket below. `cur` is the scan cursor's current position: if the
    /// vertex that would ordinarily be swapped with `v` already lies at or
    /// before `cur` (i.e. has already been visited), the swap instead
    /// targets position `cur + 1` so the decrement never disturbs vertices
    /// the caller has already scanned past.
    ///
    /// No-op if `v`'s count is already zero.
    pub fn decrement(&mut self, v: usize, cur: usize) {
        let Some(&d) = self.inwards_count.get(v) else {
            return;
        };
        if d == 0 {
            return;
        }
        let Some(&pv) = self.vertex_index.get(v) else {
            return;
        };
        let Some(&bucket_head) = self.bucket_start.get(d as usize) else {
            return;
        };

        let target_pos = if (bucket_head as usize) <= cur { cur + 1 } else { bucket_head as usize };
        if let Some(&w) = self.sorted_vertices.get(target_pos) {
            if target_pos != pv as usize {
                self.sorted_vertices[pv as usize] = w;
                self.sorted_vertices[target_pos] = v as u32;
                self.vertex_index[w as usize] = pv;
                self.vertex_index[v] = target_pos as u32;
            }
        }
        if let Some(slot) = self.bucket_start.get_mut(d as usize) {
            *slot += 1;
        }
        if let Some(slot) = self.inwards_count.get_mut(v) {
            *slot = d - 1;
        }

        if self.stable {
            self.restore_stable_order(d - 1);
        }
    }

    /// Re-sorts the current span of bucket `d` by ascending vertex id,
    /// keeping `vertex_index` consistent. Only called under the `stable`
    /// option.
    fn restore_stable_order(&mut self, d: u32) {
        let start = self.bucket_start.get(d as usize).copied().unwrap_or(0) as usize;
        let end = self.bucket_start.get(d as usize + 1).copied().map_or(self.sorted_vertices.len(), |e| e as usize);
        let Some(span) = self.sorted_vertices.get_mut(start..end) else {
            return;
        };
        span.sort_unstable();
        for (offset, &v) in span.iter().enumerate() {
            if let Some(slot) = self.vertex_index.get_mut(v as usize) {
                #[expect(clippy::cast_possible_truncation, reason = "offset bounded by vertex count")]
                let pos = (start + offset) as u32;
                *slot = pos;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_orders_ascending_by_degree() {
        let index = SortIndex::build(&[2, 0, 1, 0], false);
        let order = index.order();
        let degrees: Vec<u32> = order.iter().map(|&v| index.count(v as usize)).collect();
        assert!(degrees.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn vertex_index_is_inverse_of_order() {
        let index = SortIndex::build(&[3, 1, 2, 0, 1], false);
        for (pos, &v) in index.order().iter().enumerate() {
            assert_eq!(index.vertex_index[v as usize] as usize, pos);
        }
    }

    #[test]
    fn decrement_moves_vertex_to_lower_bucket() {
        let mut index = SortIndex::build(&[2, 2, 0], false);
        assert_eq!(index.count(0), 2);
        index.decrement(0, 0);
        assert_eq!(index.count(0), 1);
        let pos0 = index.vertex_index[0] as usize;
        assert_eq!(index.order()[pos0], 0);
    }

    #[test]
    fn stable_mode_breaks_ties_by_ascending_id() {
        let mut index = SortIndex::build(&[1, 1, 1], true);
        index.decrement(2, 0);
        let zero_degree_span: Vec<u32> = index
            .order()
            .iter()
            .copied()
            .filter(|&v| index.count(v as usize) == 0)
            .collect();
        assert_eq!(zero_degree_span, vec![2]);
    }
}
