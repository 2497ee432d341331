//! Exclusion-graph construction.
//!
//! `G_excl = prune(NNG ∪ (NNG · NNGᵀ), keep = { v : out-deg_NNG(v) > 0 })`,
//! with the adjacency product computed under `force_loops` so that every arc
//! u→x in the NNG contributes x→{every vertex pointing to x in the NNG}.
//! `union_and_delete` performs the union and the prune in the same pass, so
//! pruning costs nothing extra when every vertex qualifies: the mask is then
//! all-true and we skip straight to a plain [`union`].

use crate::digraph::Digraph;
use crate::digraph::algebra::{self, LoopPolicy};
use crate::error::ClusterError;

/// Builds the exclusion graph for `nng`.
///
/// # Errors
/// Propagates [`ClusterError::NoMemory`] from the underlying transpose,
/// product, and union/union-and-delete passes.
pub fn build(nng: &Digraph) -> Result<Digraph, ClusterError> {
    let transposed = algebra::transpose(nng)?;
    let product = algebra::product(nng, &transposed, LoopPolicy::ForceLoops)?;

    let keep: Vec<bool> = (0..nng.vertices()).map(|v| nng.out_degree(v) > 0).collect();
    if keep.iter().all(|&k| k) {
        algebra::union(&[nng, &product])
    } else {
        algebra::union_and_delete(&[nng, &product], &keep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::PointIndex;

    fn build_digraph(vertices: usize, rows: &[&[u32]]) -> Digraph {
        let arcs: usize = rows.iter().map(|r| r.len()).sum();
        let mut dg = Digraph::empty(vertices, arcs).expect("alloc succeeds");
        let mut tail_ptr = vec![0u32; vertices + 1];
        let mut head = Vec::with_capacity(arcs);
        for (v, row) in rows.iter().enumerate() {
            for &x in *row {
                head.push(PointIndex::new(x));
            }
            tail_ptr[v + 1] = u32::try_from(head.len()).expect("arc count fits u32");
        }
        dg = Digraph::from_raw_parts(vertices, tail_ptr, head);
        dg.resize_arcs(arcs).expect("resize succeeds");
        dg
    }

    #[test]
    fn isolated_vertices_keep_empty_rows() {
        let nng = build_digraph(3, &[&[1], &[0], &[]]);
        let excl = build(&nng).expect("exclusion graph builds");
        assert!(excl.row(2).is_empty());
    }
}
