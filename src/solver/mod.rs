//! Tour solvers over the access-point cost graph.
//!
//! All three solvers consume a request whose distance table has been
//! populated by [`build_cost_graph`](crate::cost_graph::build_cost_graph)
//! and produce a [`Tour`]: one access point per node, start first, end
//! last. The closing `end -> start` edge costs zero by construction, so a
//! tour's length is the sum of its consecutive edges.

pub mod branch_bound;
pub mod genetic;
pub mod nearest_neighbor;

use crate::error::RouteError;
use crate::request::{ApSlot, Request};
use crate::supervisor::CancelToken;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// An ordered visit of one access point per node: the start stance first,
/// every item stance once, the end stance last.
pub type Tour = Vec<ApSlot>;

/// Which solver to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Algorithm {
    /// Exact branch and bound over reduced cost matrices.
    #[default]
    BranchAndBound,
    /// Multi-start greedy; always feasible, never slower than a blink.
    NearestNeighbour,
    /// Genetic search with ordered crossover and swap mutation.
    Genetic,
}

impl Algorithm {
    /// Short human name, e.g. for reporting which solver produced a route.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BranchAndBound => "Branch and Bound",
            Self::NearestNeighbour => "Nearest Neighbour",
            Self::Genetic => "Genetic",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = RouteError;

    /// Parse an algorithm tag. Single letters match the historical menu
    /// tags (`b`, `n`, `g` or `t` for the genetic solver, `d` for the
    /// default choice).
    ///
    /// ```
    /// use pickroute::solver::Algorithm;
    ///
    /// assert_eq!("b".parse(), Ok(Algorithm::BranchAndBound));
    /// assert_eq!("nearest-neighbour".parse(), Ok(Algorithm::NearestNeighbour));
    /// assert!("quantum".parse::<Algorithm>().is_err());
    /// ```
    fn from_str(tag: &str) -> Result<Self, RouteError> {
        match tag {
            "b" | "bnb" | "branch-and-bound" => Ok(Self::BranchAndBound),
            "n" | "nn" | "nearest-neighbour" | "nearest-neighbor" => Ok(Self::NearestNeighbour),
            "g" | "t" | "ga" | "genetic" => Ok(Self::Genetic),
            "d" | "default" => Ok(Self::default()),
            _ => Err(RouteError::UnknownAlgorithm(tag.to_owned())),
        }
    }
}

/// Run the selected solver and return its tour.
///
/// `ga_rounds` overrides the genetic solver's round budget and is ignored
/// by the other two. The token is polled at every solver iteration.
///
/// # Errors
///
/// [`RouteError::Cancelled`] when the token is raised mid-run, plus
/// whatever the selected solver reports.
pub fn solve<R: Rng + ?Sized>(
    request: &Request,
    algorithm: Algorithm,
    ga_rounds: Option<usize>,
    rng: &mut R,
    cancel: &CancelToken,
) -> Result<Tour, RouteError> {
    match algorithm {
        Algorithm::BranchAndBound => branch_bound::solve(request, rng, cancel),
        Algorithm::NearestNeighbour => nearest_neighbor::solve(request, cancel),
        Algorithm::Genetic => genetic::solve(request, ga_rounds, rng, cancel).map(|run| run.tour),
    }
}

/// Rotate a Hamiltonian cycle so it reads start-first. The cost overlay
/// guarantees the end stance immediately precedes the start stance in any
/// finite cycle, so the rotated tour finishes at the end node.
pub(crate) fn rotate_to_start(request: &Request, mut cycle: Vec<ApSlot>) -> Result<Tour, RouteError> {
    let at = cycle
        .iter()
        .position(|&slot| slot == request.start_slot())
        .ok_or(RouteError::Internal("cycle misses the start node"))?;
    cycle.rotate_left(at);
    if cycle.last() != Some(&request.end_slot()) {
        return Err(RouteError::Internal("cycle does not close through the end node"));
    }
    Ok(cycle)
}
