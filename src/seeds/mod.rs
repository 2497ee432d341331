//! Seed finder.
//!
//! Given an NNG where arc u→x means "x is an acceptable neighbor of u",
//! [`find_seeds`] returns a set of vertices such that no two seeds are
//! adjacent in the NNG, every seed has positive out-degree, and — under the
//! chosen [`Strategy`] — the set is produced greedily and deterministically.
//! All six strategies share one skeleton (scan an ordering, mark the seed
//! and its neighbors, skip already-marked vertices); they differ only in how
//! the ordering is built and whether it updates online as seeds are chosen.

pub mod bucket;
pub mod exclusion;

use crate::digraph::Digraph;
use crate::error::{ClusterError, record_error};
use crate::ids::{ClusterLabel, PointIndex};

use bucket::SortIndex;

/// Selects how the seed-finder orders candidate vertices and whether that
/// order updates as seeds are chosen.
///
/// The source material names six strategies despite describing "five" in
/// prose; this crate keeps all six as named, since each has a distinct,
/// separately testable ordering rule.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Strategy {
    /// Ordering is `0, 1, …, V - 1`, fixed.
    Lexical,
    /// Ordering is ascending NNG in-degree, fixed at construction.
    InwardsOrder,
    /// Ascending NNG in-degree, updated online: when a seed is chosen, its
    /// neighbors' neighbors' in-degrees are decremented and repositioned.
    InwardsUpdating,
    /// As [`Self::InwardsUpdating`], but a single level further: a decrement
    /// also propagates through unmarked non-seed vertices the cursor visits.
    InwardsAltUpdating,
    /// Ascending in-degree in the exclusion graph, fixed at construction.
    ExclusionOrder,
    /// Ascending in-degree in the exclusion graph, updated online as seeds
    /// exclude their exclusion-graph neighbors.
    ExclusionUpdating,
}

/// Initial seed-list capacity before the first growth step.
const INITIAL_SEED_CAPACITY: usize = 256;

fn grow_capacity(capacity: usize) -> Result<usize, ClusterError> {
    let grown = capacity.saturating_add(capacity >> 3).saturating_add(1024);
    if grown > ClusterLabel::MAX_VALUE as usize {
        return Err(record_error(ClusterError::TooLargeProblem {
            context: "seed list",
            limit: ClusterLabel::MAX_VALUE,
        }));
    }
    Ok(grown)
}

/// Finds a seed set for `nng` using `strategy`.
///
/// # Errors
/// Returns [`ClusterError::TooLargeProblem`] if the seed count would exceed
/// [`ClusterLabel::MAX_VALUE`], and propagates [`ClusterError::NoMemory`]
/// from the exclusion-graph construction used by the `Exclusion*` strategies.
pub fn find_seeds(nng: &Digraph, strategy: Strategy) -> Result<Vec<PointIndex>, ClusterError> {
    match strategy {
        Strategy::Lexical => scan_fixed_order(nng, &lexical_order(nng.vertices())),
        Strategy::InwardsOrder => {
            let in_degree = in_degree_vector(nng);
            let index = SortIndex::build(&in_degree, false);
            scan_fixed_order(nng, index.order())
        }
        Strategy::InwardsUpdating => inwards_updating(nng, false),
        Strategy::InwardsAltUpdating => inwards_updating(nng, true),
        Strategy::ExclusionOrder => {
            let excl = exclusion::build(nng)?;
            let in_degree = in_degree_vector(&excl);
            let index = SortIndex::build(&in_degree, false);
            scan_fixed_order(nng, index.order())
        }
        Strategy::ExclusionUpdating => {
            let excl = exclusion::build(nng)?;
            exclusion_updating(nng, &excl)
        }
    }
}

fn lexical_order(vertices: usize) -> Vec<u32> {
    #[expect(clippy::cast_possible_truncation, reason = "vertex count is bounded by PointIndex::MAX_VALUE")]
    let order = (0..vertices).map(|v| v as u32).collect();
    order
}

fn in_degree_vector(dg: &Digraph) -> Vec<u32> {
    let mut in_degree = vec![0u32; dg.vertices()];
    for v in 0..dg.vertices() {
        for &x in dg.row(v) {
            if let Some(slot) = in_degree.get_mut(x.index()) {
                *slot += 1;
            }
        }
    }
    in_degree
}

fn qualifies(nng: &Digraph, marks: &[bool], v: usize) -> bool {
    !marks.get(v).copied().unwrap_or(true)
        && nng.out_degree(v) > 0
        && nng.row(v).iter().all(|x| !marks.get(x.index()).copied().unwrap_or(true))
}

fn scan_fixed_order(nng: &Digraph, order: &[u32]) -> Result<Vec<PointIndex>, ClusterError> {
    let mut marks = vec![false; nng.vertices()];
    let mut seeds = Vec::with_capacity(INITIAL_SEED_CAPACITY.min(nng.vertices()));
    for &v in order {
        let v = v as usize;
        if qualifies(nng, &marks, v) {
            push_seed(&mut seeds, v)?;
            if let Some(slot) = marks.get_mut(v) {
                *slot = true;
            }
            for &x in nng.row(v) {
                if let Some(slot) = marks.get_mut(x.index()) {
                    *slot = true;
                }
            }
        }
    }
    Ok(seeds)
}

fn push_seed(seeds: &mut Vec<PointIndex>, v: usize) -> Result<(), ClusterError> {
    if seeds.len() == seeds.capacity() {
        let grown = grow_capacity(seeds.capacity().max(INITIAL_SEED_CAPACITY))?;
        seeds.reserve(grown - seeds.len());
    }
    seeds.push(PointIndex::from(v));
    Ok(())
}

/// `INWARDS_UPDATING` / `INWARDS_ALT_UPDATING`.
///
/// After choosing seed s, for every NNG-neighbor x of s and every
/// NNG-neighbor y of x that is still eligible (unmarked, ahead of the
/// cursor, has outgoing arcs), y's in-degree is decremented and
/// repositioned. Under `alt`, a decrement also fires for an unmarked
/// non-seed vertex the cursor visits (one that failed qualification because
/// a neighbor was marked), propagating one level further.
fn inwards_updating(nng: &Digraph, alt: bool) -> Result<Vec<PointIndex>, ClusterError> {
    let vertices = nng.vertices();
    let in_degree = in_degree_vector(nng);
    let mut index = SortIndex::build(&in_degree, false);
    let mut marks = vec![false; vertices];
    let mut seeds = Vec::with_capacity(INITIAL_SEED_CAPACITY.min(vertices));

    let mut cur = 0;
    while cur < vertices {
        let Some(&v) = index.order().get(cur) else {
            break;
        };
        let v = v as usize;
        if qualifies(nng, &marks, v) {
            push_seed(&mut seeds, v)?;
            if let Some(slot) = marks.get_mut(v) {
                *slot = true;
            }
            for &x in nng.row(v) {
                if let Some(slot) = marks.get_mut(x.index()) {
                    *slot = true;
                }
            }
            for &x in nng.row(v) {
                for &y in nng.row(x.index()) {
                    let yi = y.index();
                    if !marks.get(yi).copied().unwrap_or(true) && nng.out_degree(yi) > 0 {
                        index.decrement(yi, cur);
                    }
                }
            }
        } else if alt && !marks.get(v).copied().unwrap_or(true) {
            for &x in nng.row(v) {
                let xi = x.index();
                if !marks.get(xi).copied().unwrap_or(true) && nng.out_degree(xi) > 0 {
                    index.decrement(xi, cur);
                }
            }
        }
        cur += 1;
    }
    Ok(seeds)
}

/// `EXCLUSION_UPDATING`.
///
/// Qualification is simply "not yet excluded". When a seed s is chosen: (1)
/// every exclusion-graph neighbor of s that was still live is marked
/// excluded, recorded into a scratch buffer; (2) for each newly-excluded x,
/// every still-live exclusion-graph neighbor of x has its in-degree
/// decremented. This avoids decrementing vertices that are about to be
/// excluded anyway.
fn exclusion_updating(nng: &Digraph, excl: &Digraph) -> Result<Vec<PointIndex>, ClusterError> {
    let vertices = excl.vertices();
    let in_degree = in_degree_vector(excl);
    let mut index = SortIndex::build(&in_degree, false);
    let mut excluded = vec![false; vertices];
    let mut seeds = Vec::with_capacity(INITIAL_SEED_CAPACITY.min(vertices));

    let mut cur = 0;
    while cur < vertices {
        let Some(&v) = index.order().get(cur) else {
            break;
        };
        let v = v as usize;
        if !excluded.get(v).copied().unwrap_or(true) && nng.out_degree(v) > 0 {
            push_seed(&mut seeds, v)?;
            if let Some(slot) = excluded.get_mut(v) {
                *slot = true;
            }
            let mut newly_excluded = Vec::new();
            for &x in excl.row(v) {
                let xi = x.index();
                if !excluded.get(xi).copied().unwrap_or(true) {
                    if let Some(slot) = excluded.get_mut(xi) {
                        *slot = true;
                    }
                    newly_excluded.push(xi);
                }
            }
            for &xi in &newly_excluded {
                for &y in excl.row(xi) {
                    let yi = y.index();
                    if !excluded.get(yi).copied().unwrap_or(true) {
                        index.decrement(yi, cur);
                    }
                }
            }
        }
        cur += 1;
    }
    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

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

    fn as_raw(seeds: &[PointIndex]) -> Vec<u32> {
        seeds.iter().map(|s| s.get()).collect()
    }

    #[test]
    fn s1_lexical_clique_pairs() {
        let nng = build_digraph(5, &[&[1, 2], &[0, 2], &[0, 1], &[4], &[3]]);
        let seeds = find_seeds(&nng, Strategy::Lexical).expect("seeds found");
        assert_eq!(as_raw(&seeds), vec![0, 3]);
    }

    #[test]
    fn s2_inwards_order_tie_broken_by_insertion() {
        let nng = build_digraph(5, &[&[1, 2], &[0, 2], &[0, 1], &[4], &[3]]);
        let seeds = find_seeds(&nng, Strategy::InwardsOrder).expect("seeds found");
        assert_eq!(as_raw(&seeds), vec![3, 0]);
    }

    #[test]
    fn s3_lexical_path() {
        let nng = build_digraph(5, &[&[1], &[2], &[3], &[4], &[]]);
        let seeds = find_seeds(&nng, Strategy::Lexical).expect("seeds found");
        assert_eq!(as_raw(&seeds), vec![0, 2]);
    }

    #[rstest]
    #[case::lexical(Strategy::Lexical)]
    #[case::inwards_order(Strategy::InwardsOrder)]
    #[case::inwards_updating(Strategy::InwardsUpdating)]
    #[case::inwards_alt_updating(Strategy::InwardsAltUpdating)]
    #[case::exclusion_order(Strategy::ExclusionOrder)]
    #[case::exclusion_updating(Strategy::ExclusionUpdating)]
    fn seeds_are_an_independent_dominating_set(#[case] strategy: Strategy) {
        let nng = build_digraph(6, &[&[1, 2], &[0], &[0], &[4], &[3], &[]]);
        let seeds = find_seeds(&nng, strategy).expect("seeds found");
        let seed_set: std::collections::HashSet<u32> = seeds.iter().map(|s| s.get()).collect();
        for &s in &seed_set {
            for x in nng.row(s as usize) {
                assert!(!seed_set.contains(&x.get()), "strategy {strategy:?} produced adjacent seeds");
            }
        }
        for v in 0..nng.vertices() {
            if nng.out_degree(v) == 0 {
                continue;
            }
            let dominated =
                seed_set.contains(&(v as u32)) || nng.row(v).iter().any(|x| seed_set.contains(&x.get()));
            assert!(dominated, "strategy {strategy:?} left vertex {v} undominated");
        }
    }
}
