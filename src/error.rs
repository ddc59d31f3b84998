//! Errors surfaced by the routing engine.

use crate::grid::Pos;
use thiserror::Error;

/// Failure modes of a routing request.
///
/// `Unreachable` and `NoAccess` describe infeasible warehouse layouts,
/// `InvalidPosition`, `UnknownAlgorithm` and `EmptyRequest` describe bad
/// request parameters and are rejected before any work is done.
/// `Cancelled` never escapes [`solve`](crate::supervisor::solve): the
/// supervisor replaces it with the nearest-neighbour fallback result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// No path exists between two cells that the route must connect.
    #[error("no path between {from:?} and {to:?}")]
    Unreachable {
        /// Cell the search started from.
        from: Pos,
        /// Cell that could not be reached.
        to: Pos,
    },

    /// An item's shelf cell has no free orthogonal neighbour to pick from.
    #[error("item at {0:?} cannot be reached from any side")]
    NoAccess(Pos),

    /// A start or end position lies outside the grid or on a shelf.
    #[error("{0:?} is not a free cell")]
    InvalidPosition(Pos),

    /// An algorithm tag that none of the solvers answer to.
    #[error("unknown algorithm `{0}`")]
    UnknownAlgorithm(String),

    /// The request names no items.
    #[error("request contains no items")]
    EmptyRequest,

    /// The solver was interrupted by its time or memory budget.
    #[error("solver interrupted by its budget")]
    Cancelled,

    /// An invariant of the engine was violated.
    #[error("internal invariant violated: {0}")]
    Internal(&'static str),
}
