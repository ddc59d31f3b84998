use itertools::Itertools;
use pickroute::grid::{Dir, Grid, Pos};
use pickroute::prelude::{solve, Algorithm, Product, SolveOptions};
use std::time::Duration;

fn warehouse() -> Grid {
    let shelves = (2..=35usize)
        .filter(|x| x % 4 == 2 || x % 4 == 3)
        .cartesian_product(1..=19usize)
        .filter(|&(_, y)| y != 10);
    Grid::from_shelves(40, 21, shelves)
}

/// A twelve-stop order, far beyond what branch and bound can finish in
/// one supervisor poll interval.
fn big_order() -> Vec<Product> {
    [
        (108335u64, (2, 1)),
        (391825, (6, 5)),
        (340367, (11, 9)),
        (286457, (14, 13)),
        (661741, (18, 17)),
        (281610, (22, 3)),
        (342706, (26, 7)),
        (111873, (30, 11)),
        (198029, (34, 15)),
        (366109, (3, 18)),
        (287261, (7, 6)),
        (76283, (11, 12)),
    ]
    .into_iter()
    .map(|(id, cell)| Product { id, cell })
    .collect()
}

fn small_order() -> Vec<Product> {
    big_order().into_iter().take(3).collect()
}

fn covers(route: &[Pos], shelf: Pos) -> bool {
    route
        .iter()
        .any(|&cell| cell == shelf || Dir::between(cell, shelf).is_some())
}

#[test]
fn timeout_falls_back_to_nearest_neighbour() {
    let grid = warehouse();
    let products = big_order();
    let budgeted = SolveOptions {
        algorithm: Algorithm::BranchAndBound,
        timeout: Some(Duration::from_millis(1)),
        seed: Some(3),
        ..SolveOptions::default()
    };
    let outcome = solve(&grid, &products, (0, 0), (0, 0), &budgeted).unwrap();
    assert!(outcome.fallback_used);
    assert_eq!(outcome.algorithm, Algorithm::NearestNeighbour);

    // The substituted result is exactly what the heuristic would return.
    let direct = SolveOptions {
        algorithm: Algorithm::NearestNeighbour,
        ..SolveOptions::default()
    };
    let reference = solve(&grid, &products, (0, 0), (0, 0), &direct).unwrap();
    assert_eq!(outcome.total_cost, reference.total_cost);
    assert_eq!(outcome.route, reference.route);

    // Fallback liveness: the route is still a valid cover.
    for product in &products {
        assert!(covers(&outcome.route, product.cell));
    }
}

#[test]
fn one_second_budget_on_a_ten_item_order() {
    // The budget may or may not trip depending on the machine; either way
    // the result must be coherent with the heuristic baseline.
    let grid = warehouse();
    let products: Vec<Product> = big_order().into_iter().take(10).collect();
    let budgeted = SolveOptions {
        algorithm: Algorithm::BranchAndBound,
        timeout: Some(Duration::from_secs(1)),
        seed: Some(11),
        ..SolveOptions::default()
    };
    let outcome = solve(&grid, &products, (0, 0), (0, 0), &budgeted).unwrap();

    let baseline = SolveOptions {
        algorithm: Algorithm::NearestNeighbour,
        memory_pct: 100.0,
        ..SolveOptions::default()
    };
    let reference = solve(&grid, &products, (0, 0), (0, 0), &baseline).unwrap();
    if outcome.fallback_used {
        assert_eq!(outcome.total_cost, reference.total_cost);
    } else {
        assert!(outcome.total_cost <= reference.total_cost);
    }
    for product in &products {
        assert!(covers(&outcome.route, product.cell));
    }
}

#[test]
fn summary_names_the_working_solver() {
    let grid = warehouse();
    let products = small_order();
    let options = SolveOptions {
        algorithm: Algorithm::NearestNeighbour,
        memory_pct: 100.0,
        ..SolveOptions::default()
    };
    let outcome = solve(&grid, &products, (0, 0), (0, 0), &options).unwrap();
    assert_eq!(
        outcome.summary(),
        format!(
            "Total distance is {}. (Calculated with Nearest Neighbour)",
            outcome.total_cost
        )
    );
}

#[test]
fn memory_ceiling_of_zero_always_trips() {
    let grid = warehouse();
    let products = big_order();
    let strangled = SolveOptions {
        algorithm: Algorithm::BranchAndBound,
        memory_pct: 0.0,
        seed: Some(3),
        ..SolveOptions::default()
    };
    let outcome = solve(&grid, &products, (0, 0), (0, 0), &strangled).unwrap();
    assert!(outcome.fallback_used);
    assert_eq!(outcome.algorithm, Algorithm::NearestNeighbour);
}

#[test]
fn disabled_timeout_lets_the_solver_finish() {
    let grid = warehouse();
    let products = small_order();
    let unhurried = SolveOptions {
        algorithm: Algorithm::BranchAndBound,
        timeout: None,
        seed: Some(3),
        memory_pct: 100.0,
        ..SolveOptions::default()
    };
    let outcome = solve(&grid, &products, (0, 0), (0, 0), &unhurried).unwrap();
    assert!(!outcome.fallback_used);
    assert_eq!(outcome.algorithm, Algorithm::BranchAndBound);
}

#[test]
fn generous_timeout_does_not_trip() {
    let grid = warehouse();
    let products = small_order();
    let generous = SolveOptions {
        algorithm: Algorithm::BranchAndBound,
        timeout: Some(Duration::from_secs(60)),
        seed: Some(3),
        memory_pct: 100.0,
        ..SolveOptions::default()
    };
    let outcome = solve(&grid, &products, (0, 0), (0, 0), &generous).unwrap();
    assert!(!outcome.fallback_used);
}

#[test]
fn heuristics_finish_under_tight_budgets() {
    let grid = warehouse();
    let products = small_order();
    for algorithm in [Algorithm::NearestNeighbour, Algorithm::Genetic] {
        let options = SolveOptions {
            algorithm,
            timeout: Some(Duration::from_secs(30)),
            seed: Some(5),
            memory_pct: 100.0,
            ..SolveOptions::default()
        };
        let outcome = solve(&grid, &products, (0, 0), (0, 0), &options).unwrap();
        assert!(!outcome.fallback_used, "{algorithm} should beat a 30s budget");
        assert_eq!(outcome.algorithm, algorithm);
    }
}
