//! Build the access-point cost graph of a request.
//!
//! Every pair of access points belonging to different nodes is connected
//! by a grid shortest path computed once and stored in both directions,
//! the reverse direction carrying the reversed trace. On top of the raw
//! distances, a start/end overlay forces every tour into the shape
//! `start -> ... -> end -> start`: the only finite edge into the start stance
//! leaves the end stance, at cost zero.

use crate::error::RouteError;
use crate::grid::{Grid, Pos};
use crate::request::{ApSlot, Edge, Request};
use crate::search::shortest_path;

/// Populate the distance table of `request`.
///
/// The table is cleared first, so requests may be rebuilt (for instance
/// after the caller mutated the grid). Pairs of stances on the same node
/// stay disallowed.
///
/// After the raw population, the overlay is applied:
///
/// * every stance not on the start node gets an infinite edge towards the
///   start stance, except the end stance, whose edge to start costs zero;
/// * the end stance gets infinite edges towards everything else;
/// * the start stance gets an infinite edge towards the end stance.
///
/// # Errors
///
/// [`RouteError::Unreachable`] as soon as one required pair cannot be
/// connected, in which case the whole request is unusable.
pub fn build_cost_graph(grid: &Grid, request: &mut Request) -> Result<(), RouteError> {
    request.clear_edges();

    let stances: Vec<Vec<(ApSlot, Pos)>> = (0..request.node_count())
        .map(|node| {
            request
                .node_slots(node)
                .filter_map(|slot| request.ap(slot).map(|ap| (slot, ap.cell)))
                .collect()
        })
        .collect();

    let mut pairs = 0usize;
    for (i, from_stances) in stances.iter().enumerate() {
        for to_stances in &stances[i + 1..] {
            for &(a, a_cell) in from_stances {
                for &(b, b_cell) in to_stances {
                    if request.edge(a, b).is_some() {
                        continue;
                    }
                    let path = shortest_path(grid, a_cell, b_cell)?;
                    let mut reversed = path.cells.clone();
                    reversed.reverse();
                    request.set_edge(
                        a,
                        b,
                        Edge {
                            dist: path.dist,
                            trace: path.cells,
                        },
                    );
                    request.set_edge(
                        b,
                        a,
                        Edge {
                            dist: path.dist,
                            trace: reversed,
                        },
                    );
                    pairs += 1;
                }
            }
        }
    }

    apply_overlay(request);
    tracing::debug!(
        nodes = request.node_count(),
        pairs,
        "cost graph populated"
    );
    Ok(())
}

/// Rewrite the start/end edges so every Hamiltonian cycle over the nodes
/// closes through `end -> start` at zero cost.
fn apply_overlay(request: &mut Request) {
    let start = request.start_slot();
    let end = request.end_slot();
    let slots: Vec<ApSlot> = request.slots().collect();
    for &slot in &slots {
        if Request::slot_node(slot) != Request::slot_node(start) {
            request.clear_edge(slot, start);
        }
        if slot != start && slot != end {
            request.clear_edge(end, slot);
        }
    }
    request.clear_edge(start, end);
    request.set_edge(
        end,
        start,
        Edge {
            dist: 0,
            trace: Vec::new(),
        },
    );
}
