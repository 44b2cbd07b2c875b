mod common;

use common::{
    assert_solution_invariants, clustered_instance, mutually_exclusive_instance,
    small_search_params,
};
use courier_optimizer::{
    error::{ConvergenceError, SolverError},
    solver::{
        solution::{summary::SolutionSummary, working_solution::Solution},
        two_stage::{minimize_fleet, two_stage_search},
    },
};
use rand::{rngs::SmallRng, SeedableRng};

#[test]
fn fleet_grows_to_one_vehicle_per_exclusive_request() {
    let instance = mutually_exclusive_instance(3, 1, small_search_params());
    let initial = Solution::new(&instance);

    let mut rng = SmallRng::seed_from_u64(42);
    let result = minimize_fleet(instance, initial, &mut rng).unwrap();

    // One starting vehicle plus two clones, all of them in use.
    assert_eq!(result.solution.routes().len(), 3);
    assert_eq!(result.instance.vehicles().len(), 3);
    assert!(result.solution.request_bank().is_empty());
    assert_solution_invariants(&result.instance, &result.solution);
}

#[test]
fn an_unservable_request_raises_a_convergence_error() {
    // The delivery window closes before any vehicle can reach it.
    use common::{build_instance, RequestSpec};

    let instance = build_instance(
        (0.0, 0.0),
        (0.0, 1000.0),
        1,
        50.0,
        1.0,
        &[RequestSpec {
            pickup: (10.0, 0.0, 0.0, 1000.0, 1.0),
            delivery: (500.0, 0.0, 0.0, 5.0, 1.0),
            load: 1.0,
        }],
        small_search_params(),
    );
    let initial = Solution::new(&instance);

    let mut rng = SmallRng::seed_from_u64(42);
    let result = minimize_fleet(instance, initial, &mut rng);

    assert!(matches!(
        result,
        Err(SolverError::Convergence(ConvergenceError::StuckRequest(1)))
    ));
}

#[test]
fn shrinking_reduces_an_overprovisioned_fleet() {
    use common::spread_instance;

    let instance = spread_instance(10, small_search_params());
    let vehicle_count_before = instance.vehicles().len();
    let initial = Solution::new(&instance);

    let mut rng = SmallRng::seed_from_u64(42);
    let result = minimize_fleet(instance, initial, &mut rng).unwrap();

    assert!(result.solution.request_bank().is_empty());
    assert!(result.instance.vehicles().len() <= vehicle_count_before);
    // Capacity and pickup windows cap a vehicle at four requests, so six
    // requests need at least two active vehicles.
    assert!(result.solution.routes().len() >= 2);
    // Every request still rides exactly once.
    assert_eq!(
        result.solution.request_to_vehicle().len(),
        result.instance.requests().len()
    );
    assert_solution_invariants(&result.instance, &result.solution);
}

#[test]
fn the_full_driver_is_deterministic_under_a_fixed_seed() {
    let run = |seed: u64| {
        let instance = clustered_instance(5, small_search_params());
        let initial = Solution::new(&instance);
        let mut rng = SmallRng::seed_from_u64(seed);
        let result = two_stage_search(instance, initial, &mut rng).unwrap();
        (
            result.solution.objective(&result.instance),
            result.solution.fingerprint(),
            result.solution.routes().len(),
        )
    };

    let first = run(42);
    let second = run(42);
    assert_eq!(first, second);
}

#[test]
fn the_final_solution_reports_a_complete_summary() {
    let instance = clustered_instance(4, small_search_params());
    let initial = Solution::new(&instance);

    let mut rng = SmallRng::seed_from_u64(9);
    let result = two_stage_search(instance, initial, &mut rng).unwrap();
    let summary = SolutionSummary::of(&result.solution, &result.instance);

    assert!(summary.unassigned_requests.is_empty());
    assert_eq!(summary.routes.len(), result.solution.routes().len());

    let route_distance_total: f64 = summary.routes.iter().map(|r| r.distance).sum();
    assert!((route_distance_total - summary.total_distance).abs() < 1e-6);

    for route in &summary.routes {
        let vehicle = result
            .instance
            .vehicle(courier_optimizer::problem::vehicle::VehicleId::new(route.vehicle));
        assert_eq!(route.nodes.first(), Some(&vehicle.start_node().get()));
        assert_eq!(route.nodes.last(), Some(&vehicle.end_node().get()));
    }

    let rendered = summary.to_string();
    assert!(rendered.contains("vehicles:"));
    assert!(rendered.contains("objective:"));
}
