//! Cost matrix over access-point slots for the branch-and-bound solver.
//!
//! Rows and columns are grouped in blocks of four, one block per node.
//! Reduction works on whole blocks rather than single rows: only one of a
//! node's four stances is ultimately part of a tour, so subtracting the
//! block minimum charges each node exactly once and the accumulated
//! minima form a valid lower bound on any completion.

use crate::request::{ApSlot, NodeId, Request, INFINITE};
use std::ops::{Index, IndexMut, Range};

/// Square matrix of edge costs, `INFINITE` marking missing stances,
/// same-node pairs and already-consumed rows or columns.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct CostMatrix {
    size: usize,
    data: Vec<u32>,
}

impl CostMatrix {
    /// Build the `4N x 4N` matrix from a populated distance table.
    pub(crate) fn from_request(request: &Request) -> Self {
        let size = request.slot_count();
        let mut matrix = Self {
            size,
            data: vec![INFINITE; size * size],
        };
        for from in request.slots() {
            for to in request.slots() {
                if Request::slot_node(from) != Request::slot_node(to) {
                    matrix[(from, to)] = request.dist(from, to);
                }
            }
        }
        matrix
    }

    pub(crate) const fn node_count(&self) -> usize {
        self.size / 4
    }

    const fn block(node: NodeId) -> Range<usize> {
        node * 4..node * 4 + 4
    }

    /// Subtract every block's minimum from its finite entries, rows first,
    /// then columns, and return the sum of the minima. A block with no
    /// finite entry contributes nothing.
    pub(crate) fn reduce(&mut self) -> u32 {
        let mut total = 0;
        for node in 0..self.node_count() {
            total += self.reduce_rows(node);
        }
        for node in 0..self.node_count() {
            total += self.reduce_columns(node);
        }
        total
    }

    fn reduce_rows(&mut self, node: NodeId) -> u32 {
        let mut min = INFINITE;
        for row in Self::block(node) {
            for col in 0..self.size {
                min = min.min(self[(row, col)]);
            }
        }
        if min == INFINITE || min == 0 {
            return 0;
        }
        for row in Self::block(node) {
            for col in 0..self.size {
                if self[(row, col)] != INFINITE {
                    self[(row, col)] -= min;
                }
            }
        }
        min
    }

    fn reduce_columns(&mut self, node: NodeId) -> u32 {
        let mut min = INFINITE;
        for col in Self::block(node) {
            for row in 0..self.size {
                min = min.min(self[(row, col)]);
            }
        }
        if min == INFINITE || min == 0 {
            return 0;
        }
        for col in Self::block(node) {
            for row in 0..self.size {
                if self[(row, col)] != INFINITE {
                    self[(row, col)] -= min;
                }
            }
        }
        min
    }

    /// Disallow every edge leaving `node`.
    pub(crate) fn mask_row_block(&mut self, node: NodeId) {
        for row in Self::block(node) {
            for col in 0..self.size {
                self[(row, col)] = INFINITE;
            }
        }
    }

    /// Disallow every edge entering `node`.
    pub(crate) fn mask_column_block(&mut self, node: NodeId) {
        for col in Self::block(node) {
            for row in 0..self.size {
                self[(row, col)] = INFINITE;
            }
        }
    }

    /// Disallow every edge entering `node` except through `keep`, pinning
    /// the stance the tour will eventually close on.
    pub(crate) fn mask_column_block_except(&mut self, node: NodeId, keep: ApSlot) {
        for col in Self::block(node) {
            if col == keep {
                continue;
            }
            for row in 0..self.size {
                self[(row, col)] = INFINITE;
            }
        }
    }

    /// Disallow every edge leaving `node` except through `keep`. Once a
    /// tour has committed to a stance, the node's sibling stances can no
    /// longer contribute an exit, and dropping their rows keeps the
    /// block minima honest.
    pub(crate) fn mask_row_block_except(&mut self, node: NodeId, keep: ApSlot) {
        for row in Self::block(node) {
            if row == keep {
                continue;
            }
            for col in 0..self.size {
                self[(row, col)] = INFINITE;
            }
        }
    }
}

impl Index<(ApSlot, ApSlot)> for CostMatrix {
    type Output = u32;

    fn index(&self, (row, col): (ApSlot, ApSlot)) -> &u32 {
        &self.data[row * self.size + col]
    }
}

impl IndexMut<(ApSlot, ApSlot)> for CostMatrix {
    fn index_mut(&mut self, (row, col): (ApSlot, ApSlot)) -> &mut u32 {
        &mut self.data[row * self.size + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two-node matrix with a handful of finite edges.
    fn sample() -> CostMatrix {
        let mut matrix = CostMatrix {
            size: 8,
            data: vec![INFINITE; 64],
        };
        matrix[(0, 4)] = 5;
        matrix[(1, 5)] = 7;
        matrix[(4, 0)] = 3;
        matrix[(5, 2)] = 9;
        matrix
    }

    #[test]
    fn reduction_charges_each_block_once() {
        let mut matrix = sample();
        assert_eq!(matrix.reduce(), 5 + 3);
        assert_eq!(matrix[(0, 4)], 0);
        assert_eq!(matrix[(1, 5)], 2);
        assert_eq!(matrix[(4, 0)], 0);
        assert_eq!(matrix[(5, 2)], 6);
    }

    #[test]
    fn reduction_of_an_empty_block_costs_nothing() {
        let mut matrix = CostMatrix {
            size: 8,
            data: vec![INFINITE; 64],
        };
        assert_eq!(matrix.reduce(), 0);
        assert!((0..8).all(|r| (0..8).all(|c| matrix[(r, c)] == INFINITE)));
    }

    #[test]
    fn reduction_is_idempotent() {
        let mut matrix = sample();
        matrix.reduce();
        assert_eq!(matrix.reduce(), 0);
    }

    #[test]
    fn masking_rows_and_columns() {
        let mut matrix = sample();
        matrix.mask_row_block(0);
        assert_eq!(matrix[(0, 4)], INFINITE);
        assert_eq!(matrix[(1, 5)], INFINITE);
        assert_eq!(matrix[(4, 0)], 3);

        let mut matrix = sample();
        matrix.mask_column_block_except(1, 5);
        assert_eq!(matrix[(0, 4)], INFINITE);
        assert_eq!(matrix[(1, 5)], 7);

        let mut matrix = sample();
        matrix.mask_row_block_except(1, 4);
        assert_eq!(matrix[(4, 0)], 3);
        assert_eq!(matrix[(5, 2)], INFINITE);
    }
}
