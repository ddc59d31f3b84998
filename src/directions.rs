//! Turn a solved tour into human-readable picking guidance.
//!
//! The per-edge cell traces stored in the cost graph are concatenated
//! into one trajectory (joining cells deduplicated), runs of identical
//! movement collapse into a single instruction, and an annotation is
//! emitted wherever the picker arrives at a stance: a pickup line for
//! item nodes, a closing line for the end node.

use crate::error::RouteError;
use crate::grid::{Dir, Pos};
use crate::request::{ProductId, Request, Role};
use crate::solver::Tour;
use std::fmt;

/// One line of picking guidance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// Walk `steps` cells in one direction.
    Move {
        /// Cell the run starts on.
        from: Pos,
        /// Cell the run ends on.
        to: Pos,
        /// Direction of every step of the run.
        dir: Dir,
        /// Number of cells walked.
        steps: u32,
    },
    /// Pick the listed products from the current stance.
    Pickup {
        /// Ids of every product on the adjacent shelf cell.
        ids: Vec<ProductId>,
    },
    /// The end position has been reached.
    ReturnToEnd,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move { from, to, dir, steps } => write!(
                f,
                "From ({}, {}), move {} {} {} to ({}, {})",
                from.0,
                from.1,
                steps,
                if *steps > 1 { "steps" } else { "step" },
                dir.movement(),
                to.0,
                to.1,
            ),
            Self::Pickup { ids } => write!(f, "Pick up the product {ids:?}!"),
            Self::ReturnToEnd => f.write_str("Return to the end position!"),
        }
    }
}

/// Join instructions into the report text, one per line.
#[must_use]
pub fn route_text(instructions: &[Instruction]) -> String {
    instructions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Expand a tour into its full cell trajectory and total length.
///
/// The trajectory begins on the start cell, ends on the end cell, and
/// walks every stored edge trace with the duplicated joining cells
/// dropped. The zero-cost closing edge back to start is counted but not
/// walked.
///
/// # Errors
///
/// [`RouteError::Internal`] when the tour is empty or walks an edge the
/// cost graph does not hold.
pub fn expand_route(request: &Request, tour: &Tour) -> Result<(u32, Vec<Pos>), RouteError> {
    let (Some(&first), Some(&last)) = (tour.first(), tour.last()) else {
        return Err(RouteError::Internal("empty tour"));
    };
    let mut route = vec![stance_cell(request, first)?];
    let mut total = 0u32;
    for pair in tour.windows(2) {
        let edge = request
            .edge(pair[0], pair[1])
            .ok_or(RouteError::Internal("tour walks a missing edge"))?;
        total += edge.dist;
        route.extend_from_slice(&edge.trace[1..]);
    }
    let closing = request.dist(last, first);
    if closing != crate::request::INFINITE {
        total += closing;
    }
    Ok((total, route))
}

/// Produce the instruction list for a tour: compressed movement runs,
/// pickup annotations on item stances, and the closing line on the end
/// stance.
///
/// # Errors
///
/// [`RouteError::Internal`] when the tour walks an edge the cost graph
/// does not hold or a stored trace is not 4-connected.
pub fn instructions(request: &Request, tour: &Tour) -> Result<Vec<Instruction>, RouteError> {
    let mut out = Vec::new();
    for pair in tour.windows(2) {
        let edge = request
            .edge(pair[0], pair[1])
            .ok_or(RouteError::Internal("tour walks a missing edge"))?;
        compress(&edge.trace, &mut out)?;
        let arrived = request.node(Request::slot_node(pair[1]));
        match arrived.role {
            Role::Item => out.push(Instruction::Pickup {
                ids: arrived.ids.clone(),
            }),
            Role::End => out.push(Instruction::ReturnToEnd),
            Role::Start => {}
        }
    }
    Ok(out)
}

/// Collapse a cell trace into runs of identical movement.
fn compress(trace: &[Pos], out: &mut Vec<Instruction>) -> Result<(), RouteError> {
    let mut at = 0;
    while at + 1 < trace.len() {
        let Some(dir) = Dir::between(trace[at], trace[at + 1]) else {
            return Err(RouteError::Internal("route trace is not 4-connected"));
        };
        let mut run_end = at + 1;
        while run_end + 1 < trace.len() && Dir::between(trace[run_end], trace[run_end + 1]) == Some(dir) {
            run_end += 1;
        }
        out.push(Instruction::Move {
            from: trace[at],
            to: trace[run_end],
            dir,
            steps: (run_end - at) as u32,
        });
        at = run_end;
    }
    Ok(())
}

fn stance_cell(request: &Request, slot: usize) -> Result<Pos, RouteError> {
    request
        .ap(slot)
        .map(|ap| ap.cell)
        .ok_or(RouteError::Internal("tour references an empty slot"))
}
