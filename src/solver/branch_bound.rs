//! Exact solver: best-first branch and bound over reduced cost matrices.
//!
//! Every search-tree node carries a lower bound, the partial stance path,
//! and its own reduced copy of the cost matrix. Expanding a node masks
//! the departed node's row block and the entered node's column block,
//! then re-reduces; the reduction surplus plus the edge cost tightens the
//! child's bound. The first complete path popped from the queue is an
//! optimal tour, because the bound of a complete path equals its true
//! length while every open node still holds a lower bound.

use crate::error::RouteError;
use crate::matrix::CostMatrix;
use crate::request::{Request, INFINITE};
use crate::solver::{rotate_to_start, Tour};
use crate::supervisor::CancelToken;
use rand::Rng;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

struct TreeNode {
    bound: u32,
    path: Vec<usize>,
    matrix: CostMatrix,
}

impl PartialEq for TreeNode {
    fn eq(&self, other: &Self) -> bool {
        self.bound == other.bound && self.path.len() == other.path.len()
    }
}

impl Eq for TreeNode {}

impl PartialOrd for TreeNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TreeNode {
    /// Smallest bound pops first; among equal bounds the deeper path wins,
    /// which steers the search towards completing a tour.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .bound
            .cmp(&self.bound)
            .then_with(|| self.path.len().cmp(&other.path.len()))
    }
}

/// Find a minimum-length tour. The seed node the search branches from is
/// drawn from `rng`; the result is optimal regardless of the draw.
///
/// # Errors
///
/// [`RouteError::Cancelled`] when the token is raised, and
/// [`RouteError::Internal`] if the queue runs dry, which a request that
/// survived the cost-graph build cannot make happen.
pub fn solve<R: Rng + ?Sized>(
    request: &Request,
    rng: &mut R,
    cancel: &CancelToken,
) -> Result<Tour, RouteError> {
    let nodes = request.node_count();
    let mut root = CostMatrix::from_request(request);
    let root_bound = root.reduce();

    let seed = rng.random_range(0..nodes);
    let mut queue = BinaryHeap::new();
    for slot in request.node_slots(seed) {
        let mut matrix = root.clone();
        matrix.mask_column_block_except(seed, slot);
        matrix.mask_row_block_except(seed, slot);
        queue.push(TreeNode {
            bound: root_bound,
            path: vec![slot],
            matrix,
        });
    }
    tracing::debug!(seed, root_bound, "branch and bound seeded");

    let mut expansions = 0usize;
    while let Some(TreeNode { bound, path, matrix }) = queue.pop() {
        if cancel.is_cancelled() {
            tracing::debug!(expansions, "branch and bound cancelled");
            return Err(RouteError::Cancelled);
        }
        if path.len() == nodes {
            // The closing edge back to the seed stance must exist for the
            // path to be a cycle; paths stranded on the end node fail here.
            if let &[first, .., last] = path.as_slice() {
                if matrix[(last, first)] == INFINITE {
                    continue;
                }
            }
            tracing::debug!(bound, expansions, "optimal tour found");
            return rotate_to_start(request, path);
        }
        expansions += 1;

        let mut visited = vec![false; nodes];
        for &slot in &path {
            visited[Request::slot_node(slot)] = true;
        }
        let Some(&tail) = path.last() else {
            continue;
        };
        for slot in request.slots() {
            let entered = Request::slot_node(slot);
            if visited[entered] {
                continue;
            }
            let edge = matrix[(tail, slot)];
            if edge == INFINITE {
                continue;
            }
            let mut child = matrix.clone();
            child.mask_row_block(Request::slot_node(tail));
            child.mask_column_block(entered);
            child.mask_row_block_except(entered, slot);
            let surplus = child.reduce();
            let mut extended = path.clone();
            extended.push(slot);
            queue.push(TreeNode {
                bound: bound + edge + surplus,
                path: extended,
                matrix: child,
            });
        }
    }

    // The cost-graph build rejects disconnected inputs, so running dry
    // means an invariant was broken upstream.
    Err(RouteError::Internal("branch and bound exhausted its queue"))
}
