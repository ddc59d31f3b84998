//! Per-request model: the visited nodes, their access points, and the
//! distance table populated by the cost-graph builder.
//!
//! Nodes and access points reference each other, so both live in arenas
//! owned by the [`Request`] and refer to each other by index. Access
//! points use a fixed slot scheme: node `n`'s four directional slots are
//! `n * 4 + dir`, with empty slots for sides that are blocked. The start
//! and end nodes are degenerate: each has a single access point whose
//! cell is the node's own cell, so no adjacency step is needed.

use crate::error::RouteError;
use crate::grid::{Dir, Grid, Pos};
use indexmap::IndexMap;

/// Identifier of a product in the caller's inventory table.
pub type ProductId = u64;

/// Distance sentinel for access-point pairs with no stored edge.
pub const INFINITE: u32 = u32::MAX;

/// A requested product: its inventory id and the shelf cell it sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Product {
    /// Inventory id.
    pub id: ProductId,
    /// Shelf cell holding the product.
    pub cell: Pos,
}

/// Index of a node within a request.
pub type NodeId = usize;

/// Index of an access-point slot; slot `s` belongs to node `s / 4`.
pub type ApSlot = usize;

/// What a node stands for in the tour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// The picker's starting position.
    Start,
    /// A shelf cell with one or more requested products.
    Item,
    /// The picker's final position.
    End,
}

/// A stop the tour must cover: the start position, one shelf cell worth of
/// products, or the end position.
#[derive(Clone, Debug)]
pub struct Node {
    /// Products on this cell; empty for the start and end nodes.
    pub ids: Vec<ProductId>,
    /// The node's own cell: a shelf for items, a free cell for start/end.
    pub cell: Pos,
    /// Role of the node in the tour.
    pub role: Role,
}

/// A free cell from which an item can be picked, labelled with the side of
/// the shelf it faces.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessPoint {
    /// The stance cell.
    pub cell: Pos,
    /// Which side of the node's cell this stance is on.
    pub dir: Dir,
    /// Owning node.
    pub node: NodeId,
}

/// A stored edge of the cost graph: grid distance plus the realising cell
/// trace, from the source stance to the destination stance inclusive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    /// Shortest grid distance between the two stances.
    pub dist: u32,
    /// Cells of one shortest path, endpoints included.
    pub trace: Vec<Pos>,
}

/// One routing request: the ordered node arena (start, items..., end), the
/// access-point slots, and the dense slot-to-slot distance table.
///
/// The distance table is empty until
/// [`build_cost_graph`](crate::cost_graph::build_cost_graph) runs; it is
/// cleared again on every build so a request can be reused.
#[derive(Debug)]
pub struct Request {
    nodes: Vec<Node>,
    aps: Vec<Option<AccessPoint>>,
    edges: Vec<Option<Edge>>,
}

impl Request {
    /// Assemble a request from an already-parsed product list and the
    /// picker's start and end cells.
    ///
    /// Products sharing a cell collapse into a single node carrying all
    /// their ids.
    ///
    /// # Errors
    ///
    /// [`RouteError::InvalidPosition`] if start or end is not a free
    /// cell, [`RouteError::EmptyRequest`] if no products are given, and
    /// [`RouteError::NoAccess`] if some item has no free orthogonal
    /// neighbour to stand on.
    pub fn new(grid: &Grid, products: &[Product], start: Pos, end: Pos) -> Result<Self, RouteError> {
        if products.is_empty() {
            return Err(RouteError::EmptyRequest);
        }
        for position in [start, end] {
            if !grid.is_free(&position) {
                return Err(RouteError::InvalidPosition(position));
            }
        }

        let mut by_cell: IndexMap<Pos, Vec<ProductId>> = IndexMap::new();
        for product in products {
            by_cell.entry(product.cell).or_default().push(product.id);
        }

        let mut nodes = Vec::with_capacity(by_cell.len() + 2);
        nodes.push(Node {
            ids: Vec::new(),
            cell: start,
            role: Role::Start,
        });
        nodes.extend(by_cell.into_iter().map(|(cell, ids)| Node {
            ids,
            cell,
            role: Role::Item,
        }));
        nodes.push(Node {
            ids: Vec::new(),
            cell: end,
            role: Role::End,
        });

        let mut aps: Vec<Option<AccessPoint>> = vec![None; nodes.len() * 4];
        for (node, entry) in nodes.iter().enumerate() {
            match entry.role {
                // Start and end carry a single stance on their own cell.
                Role::Start | Role::End => {
                    aps[node * 4] = Some(AccessPoint {
                        cell: entry.cell,
                        dir: Dir::North,
                        node,
                    });
                }
                Role::Item => {
                    let mut reachable = false;
                    for dir in Dir::ALL {
                        if let Some(cell) = dir.step(entry.cell, grid.width, grid.height) {
                            if grid.is_free(&cell) {
                                aps[node * 4 + dir.index()] = Some(AccessPoint { cell, dir, node });
                                reachable = true;
                            }
                        }
                    }
                    if !reachable {
                        return Err(RouteError::NoAccess(entry.cell));
                    }
                }
            }
        }

        let slots = aps.len();
        Ok(Self {
            nodes,
            aps,
            edges: vec![None; slots * slots],
        })
    }

    /// Number of nodes, start and end included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes in tour-arena order: start first, end last.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// The node with the given index.
    #[must_use]
    pub fn node(&self, node: NodeId) -> &Node {
        &self.nodes[node]
    }

    /// Slot of the start node's single access point.
    #[must_use]
    pub const fn start_slot(&self) -> ApSlot {
        0
    }

    /// Slot of the end node's single access point.
    #[must_use]
    pub fn end_slot(&self) -> ApSlot {
        (self.nodes.len() - 1) * 4
    }

    /// Total number of slots, occupied or not (`4 * node_count`).
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.aps.len()
    }

    /// Node owning a slot.
    #[must_use]
    pub const fn slot_node(slot: ApSlot) -> NodeId {
        slot / 4
    }

    /// The access point stored in `slot`, if the side exists.
    #[must_use]
    pub fn ap(&self, slot: ApSlot) -> Option<&AccessPoint> {
        self.aps[slot].as_ref()
    }

    /// All occupied slots, in (node, direction) order.
    pub fn slots(&self) -> impl Iterator<Item = ApSlot> + '_ {
        self.aps
            .iter()
            .enumerate()
            .filter_map(|(slot, ap)| ap.as_ref().map(|_| slot))
    }

    /// The occupied slots of one node.
    pub fn node_slots(&self, node: NodeId) -> impl Iterator<Item = ApSlot> + '_ {
        (node * 4..node * 4 + 4).filter(|&slot| self.aps[slot].is_some())
    }

    /// The stored edge from `from` to `to`, or `None` when the pair is
    /// unknown or disallowed.
    #[must_use]
    pub fn edge(&self, from: ApSlot, to: ApSlot) -> Option<&Edge> {
        self.edges[from * self.aps.len() + to].as_ref()
    }

    /// Distance from `from` to `to`, [`INFINITE`] when no edge is stored.
    #[must_use]
    pub fn dist(&self, from: ApSlot, to: ApSlot) -> u32 {
        self.edge(from, to).map_or(INFINITE, |edge| edge.dist)
    }

    pub(crate) fn set_edge(&mut self, from: ApSlot, to: ApSlot, edge: Edge) {
        debug_assert!(self.aps[from].is_some() && self.aps[to].is_some());
        let slots = self.aps.len();
        self.edges[from * slots + to] = Some(edge);
    }

    pub(crate) fn clear_edge(&mut self, from: ApSlot, to: ApSlot) {
        let slots = self.aps.len();
        self.edges[from * slots + to] = None;
    }

    pub(crate) fn clear_edges(&mut self) {
        self.edges.iter_mut().for_each(|edge| *edge = None);
    }
}
