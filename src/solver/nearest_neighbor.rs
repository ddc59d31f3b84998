//! Multi-start greedy solver.
//!
//! One greedy tour is grown from every stance of every node, the start
//! and end stances included, and the shortest of the grown tours wins.
//! Ties break towards the lower slot, so the result is deterministic.
//! This is the guaranteed-feasible fallback the supervisor reaches for
//! when an exact solve blows its budget.

use crate::error::RouteError;
use crate::request::{ApSlot, Request, INFINITE};
use crate::solver::{rotate_to_start, Tour};
use crate::supervisor::CancelToken;

/// Grow a greedy tour from every possible starting stance and return the
/// shortest one found.
///
/// # Errors
///
/// [`RouteError::Cancelled`] when the token is raised, and
/// [`RouteError::Internal`] if no starting stance grows a full tour.
pub fn solve(request: &Request, cancel: &CancelToken) -> Result<Tour, RouteError> {
    let mut best: Option<(u32, Vec<ApSlot>)> = None;
    for init in request.slots() {
        if cancel.is_cancelled() {
            return Err(RouteError::Cancelled);
        }
        if let Some((cost, cycle)) = grow(request, init) {
            if best.as_ref().is_none_or(|&(shortest, _)| cost < shortest) {
                best = Some((cost, cycle));
            }
        }
    }
    let (cost, cycle) = best.ok_or(RouteError::Internal("no greedy start produced a tour"))?;
    tracing::debug!(cost, "nearest neighbour tour grown");
    rotate_to_start(request, cycle)
}

/// Grow one cycle greedily from `init`: repeatedly step to the nearest
/// stance of a not-yet-visited node, then close back to `init`.
///
/// The cost overlay does the special-casing for free: the start node is
/// infinitely far from everything but the end stance, so the tour picks
/// it up right after the end node and nowhere else. Starts that strand
/// the walk on an unreachable remainder return `None` and are skipped.
fn grow(request: &Request, init: ApSlot) -> Option<(u32, Vec<ApSlot>)> {
    let nodes = request.node_count();
    let mut visited = vec![false; nodes];
    visited[Request::slot_node(init)] = true;
    let mut cycle = vec![init];
    let mut total = 0u32;

    while cycle.len() < nodes {
        let tail = *cycle.last().unwrap();
        let mut nearest: Option<(u32, ApSlot)> = None;
        for slot in request.slots() {
            if visited[Request::slot_node(slot)] {
                continue;
            }
            let dist = request.dist(tail, slot);
            if dist == INFINITE {
                continue;
            }
            if nearest.is_none_or(|(shortest, _)| dist < shortest) {
                nearest = Some((dist, slot));
            }
        }
        let (dist, slot) = nearest?;
        visited[Request::slot_node(slot)] = true;
        cycle.push(slot);
        total += dist;
    }

    let closing = request.dist(*cycle.last().unwrap(), init);
    if closing == INFINITE {
        return None;
    }
    Some((total + closing, cycle))
}
