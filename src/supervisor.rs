//! Budgeted execution of a solver, with a guaranteed fallback.
//!
//! The chosen solver runs in its own worker thread while the supervisor
//! polls a short interval clock. When the wall-clock budget runs out or
//! system memory use crosses the configured ceiling, the worker is told
//! to stop through a shared cancellation token (every solver checks it
//! at each iteration) and the request is re-solved in-process with the
//! nearest-neighbour heuristic, which completes for any feasible input.
//! A result that arrives before the budget trips always wins the race.

use crate::cost_graph::build_cost_graph;
use crate::directions::{expand_route, instructions, Instruction};
use crate::error::RouteError;
use crate::grid::{Grid, Pos};
use crate::request::{Product, Request};
use crate::solver::{self, nearest_neighbor, Algorithm, Tour};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use sysinfo::System;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Shared flag the supervisor raises to stop a running solver. Solvers
/// poll it at the top of every expansion, greedy start, or round.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A fresh, unraised token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the owner of the token to stop.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether the token has been raised.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Tunables of a supervised solve.
#[derive(Clone, Debug)]
pub struct SolveOptions {
    /// Solver to run under the budget.
    pub algorithm: Algorithm,
    /// Wall-clock budget; `None` disables the timeout.
    pub timeout: Option<Duration>,
    /// System memory ceiling in percent; crossing it cancels the solver.
    pub memory_pct: f32,
    /// Seed for the solver's random generator. A fixed seed makes the
    /// whole request reproducible; `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Override for the genetic solver's round budget.
    pub ga_rounds: Option<usize>,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            timeout: None,
            memory_pct: 80.0,
            seed: None,
            ga_rounds: None,
        }
    }
}

/// Result of a supervised solve.
#[derive(Clone, Debug)]
pub struct SolveOutcome {
    /// Step-by-step picking guidance.
    pub instructions: Vec<Instruction>,
    /// Total length of the route in grid steps.
    pub total_cost: u32,
    /// The full cell trajectory, from the start cell to the end cell.
    pub route: Vec<Pos>,
    /// Solver that actually produced the route; differs from the
    /// requested one after a fallback.
    pub algorithm: Algorithm,
    /// `true` when the budget tripped and the nearest-neighbour fallback
    /// produced this result.
    pub fallback_used: bool,
}

impl SolveOutcome {
    /// One-line summary naming the solver that did the work, suitable for
    /// the tail of a printed report.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Total distance is {}. (Calculated with {})",
            self.total_cost,
            self.algorithm.name()
        )
    }
}

/// Build the cost graph for a request and solve it under the configured
/// budget.
///
/// # Errors
///
/// Configuration and feasibility failures from [`Request::new`] and
/// [`build_cost_graph`] propagate unchanged. A budget breach is not an
/// error: the nearest-neighbour fallback answers instead, flagged by
/// [`SolveOutcome::fallback_used`].
///
/// # Example
///
/// ```
/// use pickroute::prelude::*;
///
/// let mut grid = Grid::new(5, 4);
/// grid.add_shelf((2, 1));
/// let products = [Product { id: 42, cell: (2, 1) }];
/// let options = SolveOptions {
///     algorithm: Algorithm::NearestNeighbour,
///     ..SolveOptions::default()
/// };
/// let outcome = solve(&grid, &products, (0, 0), (0, 0), &options)?;
/// assert_eq!(outcome.total_cost, 4);
/// assert!(!outcome.fallback_used);
/// # Ok::<(), pickroute::error::RouteError>(())
/// ```
pub fn solve(
    grid: &Grid,
    products: &[Product],
    start: Pos,
    end: Pos,
    options: &SolveOptions,
) -> Result<SolveOutcome, RouteError> {
    let mut request = Request::new(grid, products, start, end)?;
    build_cost_graph(grid, &mut request)?;
    solve_prepared(&request, options)
}

/// Solve a request whose cost graph is already built.
///
/// # Errors
///
/// Solver failures other than a budget breach; the breach itself is
/// absorbed by the nearest-neighbour fallback.
pub fn solve_prepared(request: &Request, options: &SolveOptions) -> Result<SolveOutcome, RouteError> {
    let cancel = CancelToken::new();
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let verdict = thread::scope(|scope| {
        let (tx, rx) = mpsc::channel();
        let worker_cancel = cancel.clone();
        let worker_rng = &mut rng;
        scope.spawn(move || {
            let tour = solver::solve(
                request,
                options.algorithm,
                options.ga_rounds,
                worker_rng,
                &worker_cancel,
            );
            // The supervisor may already have walked away; that is fine.
            let _ = tx.send(tour);
        });
        supervise(&rx, &cancel, options)
    });

    match verdict {
        Some(Ok(tour)) => finish(request, tour, options.algorithm, false),
        Some(Err(RouteError::Cancelled)) | None => {
            tracing::warn!(
                algorithm = %options.algorithm,
                "budget exceeded, substituting nearest neighbour"
            );
            let tour = nearest_neighbor::solve(request, &CancelToken::new())?;
            finish(request, tour, Algorithm::NearestNeighbour, true)
        }
        Some(Err(error)) => Err(error),
    }
}

/// Poll for the worker's result until it arrives or the budget trips.
/// Returns `None` on a budget breach.
fn supervise(
    rx: &mpsc::Receiver<Result<Tour, RouteError>>,
    cancel: &CancelToken,
    options: &SolveOptions,
) -> Option<Result<Tour, RouteError>> {
    let started = Instant::now();
    let mut system = System::new();
    loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(result) => return Some(result),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                return Some(Err(RouteError::Internal("solver worker vanished")));
            }
        }
        let over_time = options.timeout.is_some_and(|budget| started.elapsed() >= budget);
        let over_memory = memory_exceeded(&mut system, options.memory_pct);
        if over_time || over_memory {
            tracing::info!(
                over_time,
                over_memory,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "budget tripped, cancelling solver"
            );
            cancel.cancel();
            // The worker may have published in the same instant; a
            // published result beats the budget.
            return rx.try_recv().ok();
        }
    }
}

fn memory_exceeded(system: &mut System, memory_pct: f32) -> bool {
    system.refresh_memory();
    let total = system.total_memory();
    total > 0 && system.used_memory() as f64 >= f64::from(memory_pct) / 100.0 * total as f64
}

fn finish(
    request: &Request,
    tour: Tour,
    algorithm: Algorithm,
    fallback_used: bool,
) -> Result<SolveOutcome, RouteError> {
    let (total_cost, route) = expand_route(request, &tour)?;
    let instructions = instructions(request, &tour)?;
    Ok(SolveOutcome {
        instructions,
        total_cost,
        route,
        algorithm,
        fallback_used,
    })
}
