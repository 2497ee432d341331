//! Error carrier for the clustering core.
//!
//! Every fallible operation returns a [`ClusterError`] through the ordinary
//! `Result` channel — that is the primary, idiomatic path and the one all
//! callers in this crate use. In addition, each failure site records the
//! same [`ErrorKind`] plus its source location and message into a
//! thread-local "last error" record, mirroring the process-local carrier
//! the clustering engine has always exposed so host applications translating
//! from the original C ABI have an equivalent `last_error()`/`reset_last_error()`
//! pair to poll. No error is ever silently swallowed: every non-`Ok` return
//! updates the carrier before propagating upward.

use std::{cell::RefCell, fmt, panic::Location};

use thiserror::Error;

/// Stable, ABI-style classification of a [`ClusterError`].
///
/// There is deliberately no `Ok` variant: success is represented by
/// `Result::Ok`, not by a member of this enum.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Unclassified failure; used only when no more specific kind applies.
    Unknown,
    /// A caller-supplied argument violated a documented precondition.
    InvalidInput,
    /// An allocation failed even after the two-pass retry in the digraph
    /// algebra (see [`crate::digraph::algebra`]).
    NoMemory,
    /// The requested operation has no feasible solution given the inputs
    /// (for example, fewer than `k` points, or no primary points at all).
    NoSolution,
    /// The clustering problem would require more clusters or seeds than
    /// [`crate::ids::ClusterLabel::MAX_VALUE`] allows.
    TooLargeProblem,
    /// The digraph would require more vertices or arcs than the index
    /// newtypes can represent.
    TooLargeDigraph,
    /// The nearest-neighbor search backend reported a failure.
    DistSearchError,
    /// The requested strategy or option is not implemented.
    NotImplemented,
}

impl ErrorKind {
    /// Returns the stable, machine-readable spelling of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::InvalidInput => "INVALID_INPUT",
            Self::NoMemory => "NO_MEMORY",
            Self::NoSolution => "NO_SOLUTION",
            Self::TooLargeProblem => "TOO_LARGE_PROBLEM",
            Self::TooLargeDigraph => "TOO_LARGE_DIGRAPH",
            Self::DistSearchError => "DIST_SEARCH_ERROR",
            Self::NotImplemented => "NOT_IMPLEMENTED",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type produced by the digraph, seed-finder, and batched-clusterer
/// operations.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ClusterError {
    /// A caller-supplied argument violated a documented precondition.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    /// An allocation failed even after the two-pass retry.
    #[error("allocation failed while {context} (requested {requested} elements)")]
    NoMemory { context: &'static str, requested: usize },
    /// No feasible clustering exists for the given inputs.
    #[error("no solution: {reason}")]
    NoSolution { reason: NoSolutionReason },
    /// The problem would exceed the maximum representable cluster count.
    #[error("problem too large: {context} would exceed {limit}")]
    TooLargeProblem { context: &'static str, limit: u32 },
    /// The digraph would exceed the maximum representable vertex or arc count.
    #[error("digraph too large: {context} would exceed {limit}")]
    TooLargeDigraph { context: &'static str, limit: u32 },
    /// The nearest-neighbor search backend failed.
    #[error("nearest-neighbor search failed: {message}")]
    DistSearchError { message: String },
    /// The requested strategy or option is not implemented.
    #[error("not implemented: {what}")]
    NotImplemented { what: &'static str },
}

/// Distinguishes the reasons [`ClusterError::NoSolution`] can arise, so
/// callers can match on the cause without parsing the message.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NoSolutionReason {
    /// Fewer than `k` points were available to cluster.
    TooFewPoints,
    /// No point was eligible to seed a cluster (e.g. no primary points).
    NoPrimaries,
    /// The radius constraint made every candidate cluster infeasible.
    InfeasibleRadius,
}

impl fmt::Display for NoSolutionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::TooFewPoints => "fewer than k points are available",
            Self::NoPrimaries => "no primary points were eligible to seed a cluster",
            Self::InfeasibleRadius => "the radius constraint admits no feasible cluster",
        };
        f.write_str(text)
    }
}

impl ClusterError {
    /// Retrieve the stable [`ErrorKind`] for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::NoMemory { .. } => ErrorKind::NoMemory,
            Self::NoSolution { .. } => ErrorKind::NoSolution,
            Self::TooLargeProblem { .. } => ErrorKind::TooLargeProblem,
            Self::TooLargeDigraph { .. } => ErrorKind::TooLargeDigraph,
            Self::DistSearchError { .. } => ErrorKind::DistSearchError,
            Self::NotImplemented { .. } => ErrorKind::NotImplemented,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, ClusterError>;

/// A snapshot of the thread-local "last error" carrier.
#[derive(Clone, Debug)]
pub struct LastError {
    kind: ErrorKind,
    location: &'static Location<'static>,
    message: String,
}

impl LastError {
    /// The stable kind of the recorded failure.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The source location the failure was recorded at.
    #[must_use]
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// The human-readable message recorded alongside the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Formats this record as `"(nngclust:<file>:<line>) <message>"`, the
    /// shape callers historically parsed out of the process-local carrier.
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "(nngclust:{}:{}) {}",
            self.location.file(),
            self.location.line(),
            self.message
        )
    }
}

thread_local! {
    static LAST_ERROR: RefCell<Option<LastError>> = const { RefCell::new(None) };
}

/// Records `error` as the thread's last error and returns it unchanged, so
/// call sites can write `return Err(record_error(ClusterError::...))`.
#[track_caller]
pub(crate) fn record_error(error: ClusterError) -> ClusterError {
    let record = LastError {
        kind: error.kind(),
        location: Location::caller(),
        message: error.to_string(),
    };
    LAST_ERROR.with(|cell| *cell.borrow_mut() = Some(record));
    error
}

/// Returns the most recently recorded error on this thread, if any.
///
/// Mirrors `get_latest_error`: the carrier is independent per thread and is
/// left untouched by reads. Use [`reset_last_error`] to clear it explicitly.
#[must_use]
pub fn last_error() -> Option<LastError> {
    LAST_ERROR.with(|cell| cell.borrow().clone())
}

/// Explicitly clears the thread-local last-error record.
pub fn reset_last_error() {
    LAST_ERROR.with(|cell| *cell.borrow_mut() = None);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_error_is_visible_via_last_error() {
        reset_last_error();
        assert!(last_error().is_none());

        let _ = record_error(ClusterError::InvalidInput {
            message: "k must be at least 2".to_owned(),
        });

        let recorded = last_error().expect("an error was just recorded");
        assert_eq!(recorded.kind(), ErrorKind::InvalidInput);
        assert!(recorded.display().contains("nngclust:"));
        assert!(recorded.display().contains("k must be at least 2"));
    }

    #[test]
    fn reset_clears_the_carrier() {
        let _ = record_error(ClusterError::NotImplemented {
            what: "simulated annealing seed finder",
        });
        reset_last_error();
        assert!(last_error().is_none());
    }
}
