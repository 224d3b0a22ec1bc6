//! Errors that abort a routing pass.

use drover_grid::Coord;
use thiserror::Error;

/// Failure modes of [`route_herds`](crate::route_herds).
///
/// Placement and stride problems are caught up front, before any switch is
/// touched. `Unroutable` can only surface during path building; the pass
/// reports it instead of silently wedging and leaves the design's
/// declarations untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// A route references a herd pair with no declared placement distance.
    #[error("no placement distance declared from herd '{source_herd}' to herd '{dest_herd}'")]
    MissingPlacement {
        /// Name of the route's source herd.
        source_herd: String,
        /// Name of the route's destination herd.
        dest_herd: String,
    },

    /// The same herd pair has more than one declared placement distance.
    #[error("duplicate placement distance declared from herd '{source_herd}' to herd '{dest_herd}'")]
    DuplicatePlacement {
        /// Name of the pair's source herd.
        source_herd: String,
        /// Name of the pair's destination herd.
        dest_herd: String,
    },

    /// A routed iteration range cannot make forward progress.
    #[error("iteration range {start}..{end} has non-positive stride {stride}")]
    InvalidStride {
        /// Start of the offending range.
        start: i32,
        /// Exclusive end of the offending range.
        end: i32,
        /// The rejected stride.
        stride: i32,
    },

    /// Path search gave up: every channel exhausted with no hop left to
    /// retreat to, or the search's hop budget spent.
    #[error("no route from {start} to {dest}: search exhausted at {at}")]
    Unroutable {
        /// Start coordinate of the failed route instance.
        start: Coord,
        /// Destination coordinate of the failed route instance.
        dest: Coord,
        /// Coordinate where the search gave up.
        at: Coord,
    },
}
