//! Shortest path between two free grid cells using a uniform-cost search.
//!
//! All edges have unit weight, so the search is equivalent to a
//! breadth-first search on the 4-connected free subgraph. The priority
//! queue is keyed on `(steps, turns)` rather than on steps alone: among
//! all shortest paths, the one with the fewest direction changes is
//! returned, which keeps the printed instructions short.

use crate::error::RouteError;
use crate::grid::{Dir, Grid, Pos};
use crate::FxIndexMap;
use indexmap::map::Entry::{Occupied, Vacant};
use num_traits::Zero;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::ops::Add;

/// Search state: a cell plus the direction the walker entered it from.
/// Two visits of the same cell with different headings accumulate turns
/// differently, so they are distinct states.
type State = (Pos, Option<Dir>);

/// Accumulated cost of a walk. Ordered lexicographically, so comparing two
/// costs compares path lengths first and direction changes second.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct WalkCost {
    steps: u32,
    turns: u32,
}

impl Add for WalkCost {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            steps: self.steps + rhs.steps,
            turns: self.turns + rhs.turns,
        }
    }
}

impl Zero for WalkCost {
    fn zero() -> Self {
        Self::default()
    }

    fn is_zero(&self) -> bool {
        self.steps == 0 && self.turns == 0
    }
}

/// A shortest grid path and its length.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridPath {
    /// Number of steps taken, i.e. `cells.len() - 1`.
    pub dist: u32,
    /// The traversed cells, from source to target inclusive.
    pub cells: Vec<Pos>,
}

/// Compute a shortest path between two free cells of `grid`.
///
/// The returned path comprises both endpoints and realises the minimum
/// number of steps; among all paths of that length it performs a minimum
/// number of direction changes.
///
/// # Errors
///
/// [`RouteError::Unreachable`] when either cell is not free or no path
/// connects them.
///
/// # Example
///
/// ```
/// use pickroute::grid::Grid;
/// use pickroute::search::shortest_path;
///
/// let mut grid = Grid::new(3, 3);
/// grid.add_shelf((1, 0));
/// grid.add_shelf((1, 1));
/// let path = shortest_path(&grid, (0, 0), (2, 0))?;
/// assert_eq!(path.dist, 6);
/// assert_eq!(path.cells.first(), Some(&(0, 0)));
/// assert_eq!(path.cells.last(), Some(&(2, 0)));
/// # Ok::<(), pickroute::error::RouteError>(())
/// ```
pub fn shortest_path(grid: &Grid, source: Pos, target: Pos) -> Result<GridPath, RouteError> {
    if grid.is_free(&source) && grid.is_free(&target) {
        if let Some(path) = run_search(grid, source, target) {
            return Ok(path);
        }
    }
    Err(RouteError::Unreachable {
        from: source,
        to: target,
    })
}

fn run_search(grid: &Grid, source: Pos, target: Pos) -> Option<GridPath> {
    let mut to_see = BinaryHeap::new();
    to_see.push(SmallestHolder {
        cost: WalkCost::zero(),
        index: 0,
    });
    let mut parents: FxIndexMap<State, (usize, WalkCost)> = FxIndexMap::default();
    parents.insert((source, None), (usize::MAX, WalkCost::zero()));
    let mut reached = None;
    while let Some(SmallestHolder { cost, index }) = to_see.pop() {
        let successors = {
            let (&(cell, heading), &(_, best)) = parents.get_index(index).unwrap();
            if cell == target {
                reached = Some(index);
                break;
            }
            // The same state may sit in the heap several times with
            // different costs; only the cheapest occurrence matters.
            if cost > best {
                continue;
            }
            Dir::ALL.into_iter().filter_map(move |dir| {
                let next = dir.step(cell, grid.width, grid.height)?;
                grid.is_free(&next).then(|| {
                    let turned = heading.is_some_and(|h| h != dir);
                    ((next, Some(dir)), WalkCost { steps: 1, turns: u32::from(turned) })
                })
            })
        };
        for (successor, move_cost) in successors {
            let new_cost = cost + move_cost;
            let n;
            match parents.entry(successor) {
                Vacant(e) => {
                    n = e.index();
                    e.insert((index, new_cost));
                }
                Occupied(mut e) => {
                    if e.get().1 > new_cost {
                        n = e.index();
                        e.insert((index, new_cost));
                    } else {
                        continue;
                    }
                }
            }
            to_see.push(SmallestHolder {
                cost: new_cost,
                index: n,
            });
        }
    }
    reached.map(|index| GridPath {
        dist: parents.get_index(index).unwrap().1 .1.steps,
        cells: reverse_path(&parents, index),
    })
}

fn reverse_path(parents: &FxIndexMap<State, (usize, WalkCost)>, reached: usize) -> Vec<Pos> {
    let mut cells = Vec::new();
    let mut index = reached;
    while let Some((&(cell, _), &(parent, _))) = parents.get_index(index) {
        cells.push(cell);
        index = parent;
    }
    cells.reverse();
    cells
}

struct SmallestHolder {
    cost: WalkCost,
    index: usize,
}

impl PartialEq for SmallestHolder {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}

impl Eq for SmallestHolder {}

impl PartialOrd for SmallestHolder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SmallestHolder {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.cmp(&self.cost)
    }
}
