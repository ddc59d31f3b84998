//! Genetic solver.
//!
//! A chromosome is an ordered choice of one stance per item node; the
//! start and end stances are spliced in only when a chromosome is scored.
//! Ordered one-point crossover preserves the one-stance-per-node
//! invariant, mutation swaps two positions, and elitist truncation keeps
//! the population size constant, which makes the best fitness
//! non-increasing across rounds.

use crate::error::RouteError;
use crate::request::{ApSlot, Request, Role, INFINITE};
use crate::solver::Tour;
use crate::supervisor::CancelToken;
use rand::seq::SliceRandom;
use rand::Rng;

const MUTATION_RATE: f64 = 0.1;

/// Result of a genetic run: the tour, its length, and the best fitness
/// observed after each round.
#[derive(Clone, Debug)]
pub struct GeneticOutcome {
    /// Best tour of the final population, start and end spliced in.
    pub tour: Tour,
    /// Length of that tour.
    pub cost: u32,
    /// Best fitness after every round; non-increasing.
    pub best_per_round: Vec<u32>,
}

/// Evolve a population of stance orderings and return the fittest.
///
/// The population holds `max(k * (k - 1) / 2, 2)` individuals for `k`
/// item nodes and evolves for `max(k * k / 2, 100)` rounds unless
/// `rounds` overrides the budget.
///
/// # Errors
///
/// [`RouteError::Cancelled`] when the token is raised between rounds.
pub fn solve<R: Rng + ?Sized>(
    request: &Request,
    rounds: Option<usize>,
    rng: &mut R,
    cancel: &CancelToken,
) -> Result<GeneticOutcome, RouteError> {
    let items: Vec<usize> = (0..request.node_count())
        .filter(|&node| request.node(node).role == Role::Item)
        .collect();
    let size = (items.len() * (items.len() - 1) / 2).max(2);
    let rounds = rounds.unwrap_or_else(|| (items.len() * items.len() / 2).max(100));

    let mut population: Vec<Vec<ApSlot>> = (0..size)
        .map(|_| {
            let mut chromosome: Vec<ApSlot> = items
                .iter()
                .map(|&node| {
                    let stances: Vec<ApSlot> = request.node_slots(node).collect();
                    stances[rng.random_range(0..stances.len())]
                })
                .collect();
            chromosome.shuffle(rng);
            chromosome
        })
        .collect();

    let mut best_per_round = Vec::with_capacity(rounds);
    for _ in 0..rounds {
        if cancel.is_cancelled() {
            return Err(RouteError::Cancelled);
        }
        population.sort_by_cached_key(|chromosome| fitness(request, chromosome));

        let mut offspring = Vec::with_capacity(size / 2 * 2);
        for pair in 0..size / 2 {
            let (child_a, child_b) =
                crossover(request, &population[2 * pair], &population[2 * pair + 1], rng);
            offspring.push(child_a);
            offspring.push(child_b);
        }
        for child in &mut offspring {
            mutate(child, rng);
        }
        population.append(&mut offspring);

        population.sort_by_cached_key(|chromosome| fitness(request, chromosome));
        population.truncate(size);
        best_per_round.push(fitness(request, &population[0]));
    }

    let best = population.swap_remove(0);
    let cost = fitness(request, &best);
    if cost == INFINITE {
        return Err(RouteError::Internal("genetic population never became feasible"));
    }
    tracing::debug!(cost, rounds, "genetic run finished");

    let mut tour = Vec::with_capacity(best.len() + 2);
    tour.push(request.start_slot());
    tour.extend(best);
    tour.push(request.end_slot());
    Ok(GeneticOutcome {
        tour,
        cost,
        best_per_round,
    })
}

/// Tour length of a chromosome with start and end spliced at the ends and
/// the zero-cost closing edge back to start. Chromosomes in which two
/// adjacent stances share a parent node are infeasible and score
/// [`INFINITE`], as does any missing edge.
fn fitness(request: &Request, chromosome: &[ApSlot]) -> u32 {
    let mut cost = 0u32;
    let mut prev = request.start_slot();
    for &slot in chromosome {
        if Request::slot_node(prev) == Request::slot_node(slot) {
            return INFINITE;
        }
        let dist = request.dist(prev, slot);
        if dist == INFINITE {
            return INFINITE;
        }
        cost += dist;
        prev = slot;
    }
    for next in [request.end_slot(), request.start_slot()] {
        let dist = request.dist(prev, next);
        if dist == INFINITE {
            return INFINITE;
        }
        cost += dist;
        prev = next;
    }
    cost
}

/// Ordered one-point crossover. Each child keeps one parent's prefix up to
/// the cut and fills the remainder with the other parent's stances for the
/// nodes the prefix misses, preserving their order, so every child still
/// holds exactly one stance per item node.
fn crossover<R: Rng + ?Sized>(
    request: &Request,
    a: &[ApSlot],
    b: &[ApSlot],
    rng: &mut R,
) -> (Vec<ApSlot>, Vec<ApSlot>) {
    let cut = rng.random_range(0..a.len());
    let child = |head: &[ApSlot], tail: &[ApSlot]| {
        let mut kept = vec![false; request.node_count()];
        let mut merged = head[..cut].to_vec();
        for &slot in &merged {
            kept[Request::slot_node(slot)] = true;
        }
        merged.extend(tail.iter().copied().filter(|&slot| !kept[Request::slot_node(slot)]));
        merged
    };
    (child(a, b), child(b, a))
}

/// Swap two positions with probability [`MUTATION_RATE`].
fn mutate<R: Rng + ?Sized>(chromosome: &mut [ApSlot], rng: &mut R) {
    if chromosome.len() < 2 || !rng.random_bool(MUTATION_RATE) {
        return;
    }
    let i = rng.random_range(0..chromosome.len());
    let mut j = rng.random_range(0..chromosome.len() - 1);
    if j >= i {
        j += 1;
    }
    chromosome.swap(i, j);
}
