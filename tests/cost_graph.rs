use pickroute::cost_graph::build_cost_graph;
use pickroute::error::RouteError;
use pickroute::grid::Grid;
use pickroute::request::{Product, Request, Role, INFINITE};

/// Two aisles, three shelves, everything reachable.
///
/// ```text
/// . . . . . .
/// . # . # . .
/// . . . . . .
/// . # . . . .
/// . . . . . .
/// ```
fn fixture() -> (Grid, Vec<Product>) {
    let grid = Grid::from_shelves(6, 5, [(1, 3), (3, 3), (1, 1)]);
    let products = vec![
        Product { id: 101, cell: (1, 3) },
        Product { id: 102, cell: (3, 3) },
        Product { id: 103, cell: (1, 1) },
    ];
    (grid, products)
}

#[test]
fn symmetry_between_item_stances() {
    let (grid, products) = fixture();
    let mut request = Request::new(&grid, &products, (0, 0), (5, 4)).unwrap();
    build_cost_graph(&grid, &mut request).unwrap();

    let items: Vec<usize> = (1..request.node_count() - 1).collect();
    for &i in &items {
        for &j in &items {
            if i == j {
                continue;
            }
            for a in request.node_slots(i) {
                for b in request.node_slots(j) {
                    let forward = request.edge(a, b).expect("edge must exist");
                    let backward = request.edge(b, a).expect("edge must exist");
                    assert_eq!(forward.dist, backward.dist);
                    let mut reversed = backward.trace.clone();
                    reversed.reverse();
                    assert_eq!(forward.trace, reversed);
                }
            }
        }
    }
}

#[test]
fn same_node_pairs_stay_disallowed() {
    let (grid, products) = fixture();
    let mut request = Request::new(&grid, &products, (0, 0), (0, 0)).unwrap();
    build_cost_graph(&grid, &mut request).unwrap();

    for node in 0..request.node_count() {
        let slots: Vec<usize> = request.node_slots(node).collect();
        for &a in &slots {
            for &b in &slots {
                assert!(request.edge(a, b).is_none());
                assert_eq!(request.dist(a, b), INFINITE);
            }
        }
    }
}

#[test]
fn start_end_overlay() {
    let (grid, products) = fixture();
    let mut request = Request::new(&grid, &products, (0, 0), (5, 4)).unwrap();
    build_cost_graph(&grid, &mut request).unwrap();

    let start = request.start_slot();
    let end = request.end_slot();

    // The only way into the start stance is from the end stance, for free.
    let closing = request.edge(end, start).expect("closing edge");
    assert_eq!(closing.dist, 0);
    assert!(closing.trace.is_empty());
    assert!(request.edge(start, end).is_none());
    for slot in request.slots() {
        if Request::slot_node(slot) == Request::slot_node(start) {
            continue;
        }
        if slot != end {
            assert_eq!(request.dist(slot, start), INFINITE, "slot {slot} reaches start");
            assert_eq!(request.dist(end, slot), INFINITE, "end reaches slot {slot}");
        }
    }
    // Start still reaches every item stance.
    for node in 1..request.node_count() - 1 {
        for slot in request.node_slots(node) {
            assert_ne!(request.dist(start, slot), INFINITE);
        }
    }
}

#[test]
fn single_stance_coincides_with_own_cell() {
    let (grid, products) = fixture();
    let request = Request::new(&grid, &products, (0, 0), (5, 4)).unwrap();
    let start = request.ap(request.start_slot()).unwrap();
    let end = request.ap(request.end_slot()).unwrap();
    assert_eq!(start.cell, (0, 0));
    assert_eq!(end.cell, (5, 4));
    assert_eq!(request.node_slots(0).count(), 1);
    assert_eq!(request.node_slots(request.node_count() - 1).count(), 1);
}

#[test]
fn rebuild_resets_the_table() {
    let (grid, products) = fixture();
    let mut request = Request::new(&grid, &products, (0, 0), (5, 4)).unwrap();
    build_cost_graph(&grid, &mut request).unwrap();
    let before: Vec<u32> = all_dists(&request);
    build_cost_graph(&grid, &mut request).unwrap();
    assert_eq!(before, all_dists(&request));
}

fn all_dists(request: &Request) -> Vec<u32> {
    let mut dists = Vec::new();
    for a in request.slots() {
        for b in request.slots() {
            dists.push(request.dist(a, b));
        }
    }
    dists
}

#[test]
fn products_sharing_a_cell_collapse_into_one_node() {
    let (grid, _) = fixture();
    let products = vec![
        Product { id: 7, cell: (1, 3) },
        Product { id: 8, cell: (1, 3) },
    ];
    let request = Request::new(&grid, &products, (0, 0), (0, 0)).unwrap();
    assert_eq!(request.node_count(), 3);
    assert_eq!(request.node(1).ids, vec![7, 8]);
    assert_eq!(request.node(1).role, Role::Item);
}

#[test]
fn boxed_in_item_is_rejected_upfront() {
    //   . # .
    //   # # #   <- centre shelf has no free side
    //   . # .
    let grid = Grid::from_shelves(5, 3, [(1, 1), (2, 0), (2, 1), (2, 2), (3, 1)]);
    let products = vec![Product { id: 9, cell: (2, 1) }];
    assert_eq!(
        Request::new(&grid, &products, (0, 0), (0, 0)).unwrap_err(),
        RouteError::NoAccess((2, 1))
    );
}

#[test]
fn walled_off_item_fails_the_build() {
    // The item's stance exists but no path reaches it.
    let mut grid = Grid::new(7, 3);
    for y in 0..3 {
        grid.add_shelf((3, y));
    }
    grid.add_shelf((5, 1));
    let products = vec![Product { id: 11, cell: (5, 1) }];
    let mut request = Request::new(&grid, &products, (0, 0), (0, 0)).unwrap();
    assert!(matches!(
        build_cost_graph(&grid, &mut request),
        Err(RouteError::Unreachable { .. })
    ));
}

#[test]
fn invalid_positions_are_config_errors() {
    let (grid, products) = fixture();
    assert_eq!(
        Request::new(&grid, &products, (1, 1), (0, 0)).unwrap_err(),
        RouteError::InvalidPosition((1, 1))
    );
    assert_eq!(
        Request::new(&grid, &products, (0, 0), (99, 0)).unwrap_err(),
        RouteError::InvalidPosition((99, 0))
    );
    assert_eq!(
        Request::new(&grid, &[], (0, 0), (0, 0)).unwrap_err(),
        RouteError::EmptyRequest
    );
}
