//! Error types for container and cursor operations.
//!
//! Every recoverable condition is a distinct [`Error`] variant carrying
//! enough context to act on. Internal bookkeeping corruption is *not*
//! represented here — it panics at the point of detection.

use std::error::Error as StdError;
use std::fmt;

/// How badly a cursor has been invalidated by a container mutation.
///
/// Reported inside [`Error::Invalidated`]. The three levels are distinct,
/// caller-visible signals; none is ever downgraded to another. The derived
/// ordering ranks by badness: `Mild < Moderate < Severe`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// A structural change occurred with no identity change and no
    /// out-of-bounds condition. Reached by non-growing pushes and pops
    /// observed by a cursor that is still within arithmetic bounds.
    Mild,
    /// The position is still in range, but the backing buffer is no longer
    /// the one the cursor was created against (growth reallocation or
    /// container reassignment). Apparent validity from position alone is
    /// never trusted.
    Moderate,
    /// The cursor's position now falls outside the container's logical
    /// bounds.
    Severe,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Severe => write!(f, "severe"),
            Self::Moderate => write!(f, "moderate"),
            Self::Mild => write!(f, "mild"),
        }
    }
}

/// Errors from container and cursor operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// Indexed access outside the logical element range, a pop on an empty
    /// container, or a dereference of an in-sync cursor parked out of
    /// bounds. Recoverable; no state is disturbed.
    IndexOutOfRange {
        /// The offending logical index. May be negative for cursor
        /// positions that walked before the front.
        index: i64,
        /// Logical element count at the time of the access.
        len: usize,
    },
    /// Sized construction was asked for zero elements. Recoverable; no
    /// allocation is performed.
    InvalidConstruction {
        /// The rejected element count.
        requested: usize,
    },
    /// The cursor was never bound to a container, or its container has
    /// been destroyed. A programming error, reported rather than silently
    /// ignored.
    UnboundCursor,
    /// The cursor's captured state no longer matches the container's live
    /// state. The severity distinguishes *why*.
    Invalidated {
        /// Classification of the divergence.
        severity: Severity,
    },
    /// Two cursors bound to different container instances were compared,
    /// subtracted, or a cursor was used against a container it does not
    /// belong to. Always reported, never a meaningless numeric result.
    CrossContainer,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Self::InvalidConstruction { requested } => {
                write!(f, "invalid construction: requested {requested} elements")
            }
            Self::UnboundCursor => {
                write!(f, "cursor is bound to no container, or its container has been destroyed")
            }
            Self::Invalidated { severity } => {
                write!(f, "cursor invalidated ({severity})")
            }
            Self::CrossContainer => {
                write!(f, "cursors belong to different containers")
            }
        }
    }
}

impl StdError for Error {}
