#![deny(missing_docs)]

//! Route optimisation for warehouse order picking.
//!
//! Given a rectangular grid of free cells and shelves, a set of requested
//! products, and the picker's start and end positions, this crate computes
//! a short traversal route that passes next to every requested shelf and
//! renders it as step-by-step instructions. The work happens in two
//! stages:
//!
//! 1. A **cost graph** is built over the products' *access points* (the
//!    free cells adjacent to each shelf) by running a turn-aware grid
//!    shortest-path search between every pair of stances
//!    ([`cost_graph::build_cost_graph`]).
//! 2. The resulting asymmetric travelling-salesman problem is handed to
//!    one of three interchangeable solvers ([`solver::Algorithm`]): an
//!    exact branch and bound with reduced-cost-matrix lower bounds, a
//!    multi-start nearest-neighbour heuristic, and a genetic algorithm.
//!
//! [`supervisor::solve`] ties the stages together and imposes a
//! wall-clock and memory budget on the solver: when the budget trips, the
//! request is transparently re-solved with the nearest-neighbour
//! heuristic and the outcome says so.
//!
//! # Example
//!
//! ```
//! use pickroute::prelude::*;
//!
//! // A tiny aisle: one shelf in the middle of the floor.
//! let mut grid = Grid::new(5, 4);
//! grid.add_shelf((2, 1));
//!
//! let products = [Product { id: 661741, cell: (2, 1) }];
//! let outcome = solve(&grid, &products, (0, 0), (0, 0), &SolveOptions::default())?;
//!
//! assert_eq!(outcome.total_cost, 4);
//! assert_eq!(outcome.route.first(), Some(&(0, 0)));
//! assert_eq!(outcome.route.last(), Some(&(0, 0)));
//! # Ok::<(), pickroute::error::RouteError>(())
//! ```

pub mod cost_graph;
pub mod directions;
pub mod error;
pub mod grid;
mod matrix;
pub mod request;
pub mod search;
pub mod solver;
pub mod supervisor;

/// Commonly used types and entry points.
pub mod prelude {
    pub use crate::cost_graph::build_cost_graph;
    pub use crate::directions::{route_text, Instruction};
    pub use crate::error::RouteError;
    pub use crate::grid::{Dir, Grid, Pos};
    pub use crate::request::{Product, Request};
    pub use crate::search::shortest_path;
    pub use crate::solver::Algorithm;
    pub use crate::supervisor::{solve, SolveOptions, SolveOutcome};
}

use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;

pub(crate) type FxIndexMap<K, V> = indexmap::IndexMap<K, V, BuildHasherDefault<FxHasher>>;
