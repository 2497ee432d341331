//! Primitive algebraic operations over [`Digraph`]s.
//!
//! Every operation here follows the same two-pass allocation protocol: guess
//! a cheap upper bound on the output arc count, try to allocate it, and if
//! that allocation fails, fall back to a dry run that counts the exact arc
//! count before retrying. `Vec::try_reserve` gives us this for free where the
//! original C implementation needed an explicit `init`/dry-run/`init` dance;
//! we keep the dry-run fallback anyway so the exact-count path (and its
//! `NO_MEMORY` semantics) stays exercised and documented.
//!
//! Deduplication within a row is done with a `row_markers` scratch buffer:
//! `row_markers[x] == v` means "x has already been written into v's output
//! row in this pass." Resetting the buffer is never needed because every
//! entry is tagged with the producing row's own index.

use crate::error::{ClusterError, record_error};
use crate::ids::PointIndex;

use super::Digraph;

/// Upper bound (in arcs) past which we refuse to even attempt the optimistic
/// allocation and go straight to a dry run; a defensive cap so a hostile or
/// malformed upper-bound computation cannot request an absurd allocation.
const OPTIMISTIC_BOUND_CEILING: usize = 1 << 30;

fn try_build<F>(vertices: usize, upper_bound: usize, mut fill: F) -> Result<Digraph, ClusterError>
where
    F: FnMut(&mut Digraph, Mode) -> usize,
{
    let bound = upper_bound.min(OPTIMISTIC_BOUND_CEILING);
    match Digraph::empty(vertices, bound) {
        Ok(mut dg) => {
            let written = fill(&mut dg, Mode::Write);
            finish(dg, written)
        }
        Err(_) => {
            let mut probe = Digraph::empty(vertices, 0)?;
            let exact = fill(&mut probe, Mode::DryRun);
            let mut dg = Digraph::empty(vertices, exact)?;
            let written = fill(&mut dg, Mode::Write);
            debug_assert_eq!(written, exact, "dry run and write pass disagree on arc count");
            finish(dg, written)
        }
    }
}

fn finish(mut dg: Digraph, written: usize) -> Result<Digraph, ClusterError> {
    dg.resize_arcs(written)?;
    Ok(dg)
}

/// Scratch buffer shared by every row-producing pass: `marks[x] == v` records
/// that vertex `x` has already been emitted into row `v` this pass.
struct RowMarkers(Vec<PointIndex>);

impl RowMarkers {
    fn new(vertices: usize) -> Self {
        Self(vec![PointIndex::NONE; vertices])
    }

    fn seen(&self, x: usize, v: usize) -> bool {
        self.0.get(x).is_some_and(|&m| m.index() == v)
    }

    fn mark(&mut self, x: usize, v: usize) {
        if let Some(slot) = self.0.get_mut(x) {
            *slot = PointIndex::from(v);
        }
    }
}

/// Whether a pass should append to `dg`'s head array (`Write`) or merely
/// count arcs without touching storage (`DryRun`).
#[derive(Clone, Copy, Eq, PartialEq)]
enum Mode {
    Write,
    DryRun,
}

fn emit(head: &mut Vec<PointIndex>, mode: Mode, value: PointIndex) {
    if mode == Mode::Write {
        head.push(value);
    }
}

/// Row v of the output is the set-union (by first appearance) of row v
/// across every digraph in `inputs`. All inputs must share the same vertex
/// count; mismatches are an invalid-input error.
///
/// # Errors
/// Returns [`ClusterError::InvalidInput`] if `inputs` is empty or the
/// vertex counts disagree, and [`ClusterError::NoMemory`] if allocation
/// fails on both passes.
pub fn union(inputs: &[&Digraph]) -> Result<Digraph, ClusterError> {
    let Some(first) = inputs.first() else {
        return Err(record_error(ClusterError::InvalidInput {
            message: "union requires at least one input digraph".to_owned(),
        }));
    };
    let vertices = first.vertices();
    if inputs.iter().any(|dg| dg.vertices() != vertices) {
        return Err(record_error(ClusterError::InvalidInput {
            message: "union inputs must share the same vertex count".to_owned(),
        }));
    }
    let upper_bound = inputs.iter().map(Digraph::arc_count).sum();

    try_build(vertices, upper_bound, |dg, mode| run_union(dg, inputs, None, mode))
}

/// Like [`union`], but rows whose tail is not in `tails_to_keep` are forced
/// empty. `tail_ptr` still advances so every row's range stays well-defined.
///
/// # Errors
/// See [`union`]; additionally returns [`ClusterError::InvalidInput`] if
/// `tails_to_keep.len()` does not equal the shared vertex count.
pub fn union_and_delete(inputs: &[&Digraph], tails_to_keep: &[bool]) -> Result<Digraph, ClusterError> {
    let Some(first) = inputs.first() else {
        return Err(record_error(ClusterError::InvalidInput {
            message: "union_and_delete requires at least one input digraph".to_owned(),
        }));
    };
    let vertices = first.vertices();
    if inputs.iter().any(|dg| dg.vertices() != vertices) {
        return Err(record_error(ClusterError::InvalidInput {
            message: "union_and_delete inputs must share the same vertex count".to_owned(),
        }));
    }
    if tails_to_keep.len() != vertices {
        return Err(record_error(ClusterError::InvalidInput {
            message: "tails_to_keep length must equal the digraphs' vertex count".to_owned(),
        }));
    }
    let upper_bound = inputs.iter().map(Digraph::arc_count).sum();

    try_build(vertices, upper_bound, |dg, mode| {
        run_union(dg, inputs, Some(tails_to_keep), mode)
    })
}

fn run_union(dg: &mut Digraph, inputs: &[&Digraph], tails_to_keep: Option<&[bool]>, mode: Mode) -> usize {
    let vertices = dg.vertices();
    let mut markers = RowMarkers::new(vertices);
    let mut head = dg.take_head();
    let mut tail_ptr = vec![0u32; vertices + 1];
    for v in 0..vertices {
        let keep = tails_to_keep.is_none_or(|mask| mask.get(v).copied().unwrap_or(false));
        if keep {
            for input in inputs {
                for &x in input.row(v) {
                    if !markers.seen(x.index(), v) {
                        markers.mark(x.index(), v);
                        emit(&mut head, mode, x);
                    }
                }
            }
        }
        #[expect(clippy::cast_possible_truncation, reason = "head length bounded by MAX_ARCS, which fits u32")]
        let count = head.len() as u32;
        if let Some(slot) = tail_ptr.get_mut(v + 1) {
            *slot = count;
        }
    }
    if mode == Mode::Write {
        *dg = Digraph::from_raw_parts(vertices, tail_ptr, head);
    }
    usize::try_from(tail_ptr.last().copied().unwrap_or(0)).unwrap_or(usize::MAX)
}

/// Produces, for each row v, the first `cap` elements of `(minuend-row-v) \
/// (subtrahend-row-v)`, in minuend order. `minuend` and `subtrahend` must
/// share the same vertex count; the vertex count of the result is the
/// minuend's (the original C implementation reads an uninitialised local
/// here, which this crate does not replicate — see `DESIGN.md`).
///
/// # Errors
/// Returns [`ClusterError::InvalidInput`] if vertex counts disagree or
/// `cap == 0`, and [`ClusterError::NoMemory`] if allocation fails on both
/// passes.
pub fn difference(minuend: &Digraph, subtrahend: &Digraph, cap: usize) -> Result<Digraph, ClusterError> {
    if minuend.vertices() != subtrahend.vertices() {
        return Err(record_error(ClusterError::InvalidInput {
            message: "difference operands must share the same vertex count".to_owned(),
        }));
    }
    if cap == 0 {
        return Err(record_error(ClusterError::InvalidInput {
            message: "difference row cap must be positive".to_owned(),
        }));
    }
    let vertices = minuend.vertices();
    let upper_bound = minuend.arc_count().min(vertices.saturating_mul(cap));

    try_build(vertices, upper_bound, |dg, mode| {
        run_difference(dg, minuend, subtrahend, cap, mode)
    })
}

fn run_difference(dg: &mut Digraph, minuend: &Digraph, subtrahend: &Digraph, cap: usize, mode: Mode) -> usize {
    let vertices = dg.vertices();
    let mut markers = RowMarkers::new(vertices);
    let mut head = dg.take_head();
    let mut tail_ptr = vec![0u32; vertices + 1];
    for v in 0..vertices {
        for &x in subtrahend.row(v) {
            markers.mark(x.index(), v);
        }
        let mut kept = 0;
        for &x in minuend.row(v) {
            if kept >= cap {
                break;
            }
            if !markers.seen(x.index(), v) {
                emit(&mut head, mode, x);
                kept += 1;
            }
        }
        #[expect(clippy::cast_possible_truncation, reason = "head length bounded by MAX_ARCS, which fits u32")]
        let count = head.len() as u32;
        if let Some(slot) = tail_ptr.get_mut(v + 1) {
            *slot = count;
        }
    }
    if mode == Mode::Write {
        *dg = Digraph::from_raw_parts(vertices, tail_ptr, head);
    }
    usize::try_from(tail_ptr.last().copied().unwrap_or(0)).unwrap_or(usize::MAX)
}

/// Reverses every arc: for each u→x in `input`, emits x→u. Built by counting
/// in-degrees into `tail_ptr`, prefix-summing, then writing each head at a
/// decremented cursor. This makes a transposed row's heads appear in reverse
/// order of the source scan (see `DESIGN.md`) — downstream seed-finder
/// output depends on this ordering, not a forward scan.
///
/// # Errors
/// Returns [`ClusterError::NoMemory`] if allocation fails.
pub fn transpose(input: &Digraph) -> Result<Digraph, ClusterError> {
    let vertices = input.vertices();
    let arcs = input.arc_count();

    let mut tail_ptr = vec![0u32; vertices + 1];
    for v in 0..vertices {
        for &x in input.row(v) {
            if let Some(slot) = tail_ptr.get_mut(x.index() + 1) {
                *slot += 1;
            }
        }
    }
    for i in 1..=vertices {
        let prev = tail_ptr.get(i - 1).copied().unwrap_or(0);
        if let Some(slot) = tail_ptr.get_mut(i) {
            *slot += prev;
        }
    }

    let mut dg = Digraph::empty(vertices, arcs)?;
    let mut cursor = tail_ptr.clone();
    let mut head = vec![PointIndex::NONE; arcs];
    for v in 0..vertices {
        for &x in input.row(v) {
            if let Some(slot) = cursor.get_mut(x.index() + 1) {
                *slot -= 1;
                if let Some(dest) = head.get_mut(*slot as usize) {
                    *dest = PointIndex::from(v);
                }
            }
        }
    }
    dg = Digraph::from_raw_parts(vertices, tail_ptr, head);
    dg.resize_arcs(arcs)?;
    Ok(dg)
}

/// Controls how self-loops in `a` are treated while computing [`product`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoopPolicy {
    /// Self-loops in `a` are treated like any other arc.
    Natural,
    /// Every row v of `a` behaves as though it additionally contains the arc
    /// v→v, so row v of the product always includes `b`'s row v.
    ForceLoops,
    /// Any arc v→v present in `a`'s row v is skipped.
    IgnoreLoops,
}

/// Row v of the product is the deduplicated union, in A-scan order, of
/// `b`'s row x for every head x in `a`'s row v, modulo `policy`. `a` and `b`
/// must share the same vertex count.
///
/// # Errors
/// Returns [`ClusterError::InvalidInput`] if vertex counts disagree, and
/// [`ClusterError::NoMemory`] if allocation fails on both passes.
pub fn product(a: &Digraph, b: &Digraph, policy: LoopPolicy) -> Result<Digraph, ClusterError> {
    if a.vertices() != b.vertices() {
        return Err(record_error(ClusterError::InvalidInput {
            message: "product operands must share the same vertex count".to_owned(),
        }));
    }
    let vertices = a.vertices();
    let upper_bound: usize = (0..vertices)
        .map(|v| a.row(v).iter().map(|x| b.out_degree(x.index())).sum::<usize>())
        .sum();

    try_build(vertices, upper_bound, |dg, mode| run_product(dg, a, b, policy, mode))
}

fn run_product(dg: &mut Digraph, a: &Digraph, b: &Digraph, policy: LoopPolicy, mode: Mode) -> usize {
    let vertices = dg.vertices();
    let mut markers = RowMarkers::new(vertices);
    let mut head = dg.take_head();
    let mut tail_ptr = vec![0u32; vertices + 1];
    for v in 0..vertices {
        if policy == LoopPolicy::ForceLoops {
            for &y in b.row(v) {
                if !markers.seen(y.index(), v) {
                    markers.mark(y.index(), v);
                    emit(&mut head, mode, y);
                }
            }
        }
        for &x in a.row(v) {
            if policy == LoopPolicy::IgnoreLoops && x.index() == v {
                continue;
            }
            for &y in b.row(x.index()) {
                if !markers.seen(y.index(), v) {
                    markers.mark(y.index(), v);
                    emit(&mut head, mode, y);
                }
            }
        }
        #[expect(clippy::cast_possible_truncation, reason = "head length bounded by MAX_ARCS, which fits u32")]
        let count = head.len() as u32;
        if let Some(slot) = tail_ptr.get_mut(v + 1) {
            *slot = count;
        }
    }
    if mode == Mode::Write {
        *dg = Digraph::from_raw_parts(vertices, tail_ptr, head);
    }
    usize::try_from(tail_ptr.last().copied().unwrap_or(0)).unwrap_or(usize::MAX)
}
