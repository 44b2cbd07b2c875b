#![allow(dead_code)]

use fxhash::FxHashSet;

use courier_optimizer::{
    problem::{
        instance::{ProblemInstance, ProblemInstanceBuilder},
        location::{Location, LocationIdx},
        node::{Node, NodeId},
        request::{Request, RequestId},
        vehicle::{Vehicle, VehicleId},
    },
    solver::{params::Params, solution::working_solution::Solution},
};

/// One pickup/delivery pair: `(x, y, tw_early, tw_late, service)` per end.
pub struct RequestSpec {
    pub pickup: (f64, f64, f64, f64, f64),
    pub delivery: (f64, f64, f64, f64, f64),
    pub load: f64,
}

/// Search parameters sized for the small synthetic instances used here.
pub fn small_search_params() -> Params {
    Params {
        iteration_num: 400,
        segment_num: 10,
        theta: 600,
        tau: 100,
        remove_lower_bound: 1,
        remove_upper_bound: 3,
        ..Params::default()
    }
}

/// Builds a homogeneous-fleet instance shaped like the Li & Lim reader's
/// output: customer node ids 1..=2n, one depot pair per vehicle above them,
/// every vehicle compatible with every request.
pub fn build_instance(
    depot: (f64, f64),
    depot_window: (f64, f64),
    vehicle_count: usize,
    capacity: f64,
    velocity: f64,
    requests: &[RequestSpec],
    params: Params,
) -> ProblemInstance {
    let mut locations = vec![Location::from_cartesian(depot.0, depot.1)];
    let depot_location = LocationIdx::new(0);

    let mut nodes = Vec::new();
    let mut request_rows = Vec::new();

    let vehicle_ids: FxHashSet<VehicleId> = (1..=vehicle_count).map(VehicleId::new).collect();

    for (index, spec) in requests.iter().enumerate() {
        let pickup_id = NodeId::new(2 * index + 1);
        let delivery_id = NodeId::new(2 * index + 2);

        for (node_id, end, load) in [
            (pickup_id, &spec.pickup, spec.load),
            (delivery_id, &spec.delivery, -spec.load),
        ] {
            let (x, y, early, late, service) = *end;
            let location = LocationIdx::new(locations.len());
            locations.push(Location::from_cartesian(x, y));
            nodes.push(Node::new(node_id, location, early, late, service, load));
        }

        request_rows.push(Request::new(
            RequestId::new(index + 1),
            pickup_id,
            delivery_id,
            spec.load,
            vehicle_ids.clone(),
        ));
    }

    let mut vehicles = Vec::new();
    let first_depot_node = 2 * requests.len() + 1;
    for v in 1..=vehicle_count {
        let start_id = NodeId::new(first_depot_node + 2 * (v - 1));
        let end_id = NodeId::new(first_depot_node + 2 * (v - 1) + 1);
        for node_id in [start_id, end_id] {
            nodes.push(Node::new(
                node_id,
                depot_location,
                depot_window.0,
                depot_window.1,
                0.0,
                0.0,
            ));
        }
        vehicles.push(Vehicle::new(
            VehicleId::new(v),
            capacity,
            velocity,
            start_id,
            end_id,
        ));
    }

    let mut builder = ProblemInstanceBuilder::default();
    builder
        .set_locations(locations)
        .set_nodes(nodes)
        .set_requests(request_rows)
        .set_vehicles(vehicles)
        .set_params(params);
    builder.build().expect("test instance must validate")
}

/// Eight loosely-windowed requests along a line; enough structure for the
/// search to have real work without being fragile.
pub fn clustered_instance(vehicle_count: usize, params: Params) -> ProblemInstance {
    let mut requests = Vec::new();
    for k in 0..8u32 {
        let base = 10.0 + 10.0 * f64::from(k);
        requests.push(RequestSpec {
            pickup: (base, 5.0, 0.0, 800.0, 2.0),
            delivery: (base + 5.0, 15.0, 0.0, 900.0, 2.0),
            load: 5.0 + f64::from(k % 3),
        });
    }

    build_instance(
        (0.0, 0.0),
        (0.0, 2000.0),
        vehicle_count,
        20.0,
        1.0,
        &requests,
        params,
    )
}

/// Six requests whose pickup windows close early enough that one vehicle
/// can hold at most four of them (capacity 20, load 5 each): any full
/// assignment needs at least two vehicles.
pub fn spread_instance(vehicle_count: usize, params: Params) -> ProblemInstance {
    let requests: Vec<RequestSpec> = (0..6)
        .map(|k| {
            let x = 10.0 + 2.0 * k as f64;
            RequestSpec {
                pickup: (x, 0.0, 0.0, 50.0, 5.0),
                delivery: (x, 10.0, 0.0, 90.0, 5.0),
                load: 5.0,
            }
        })
        .collect();

    build_instance(
        (0.0, 0.0),
        (0.0, 1000.0),
        vehicle_count,
        20.0,
        1.0,
        &requests,
        params,
    )
}

/// Requests with identical tight windows so that each vehicle can serve at
/// most one of them.
pub fn mutually_exclusive_instance(count: usize, vehicle_count: usize, params: Params) -> ProblemInstance {
    let requests: Vec<RequestSpec> = (0..count)
        .map(|_| RequestSpec {
            pickup: (10.0, 0.0, 10.0, 12.0, 1.0),
            delivery: (20.0, 0.0, 20.0, 22.0, 1.0),
            load: 1.0,
        })
        .collect();

    build_instance(
        (0.0, 0.0),
        (0.0, 1000.0),
        vehicle_count,
        50.0,
        1.0,
        &requests,
        params,
    )
}

/// A fully-assigned starting solution, built the deterministic way the
/// two-stage driver drains the bank.
pub fn assigned_solution(instance: &ProblemInstance) -> Solution {
    let mut solution = Solution::new(instance);
    let mut banked: Vec<RequestId> = solution.request_bank().iter().copied().collect();
    banked.sort_unstable();
    for request_id in banked {
        assert!(
            solution.insert_optimal_into_any(instance, request_id),
            "fixture instances must admit a greedy assignment"
        );
    }
    solution
}

/// Checks the §-invariants every solution must keep: the request and vehicle
/// partitions, index consistency, and cached-versus-recomputed costs.
pub fn assert_solution_invariants(instance: &ProblemInstance, solution: &Solution) {
    let assigned: usize = solution.request_to_vehicle().len();
    assert_eq!(
        assigned + solution.request_bank().len(),
        instance.requests().len(),
        "requests must split between bank and assignment"
    );

    assert_eq!(
        solution.routes().len() + solution.vehicle_bank().len(),
        instance.vehicles().len(),
        "vehicles must split between routes and bank"
    );
    for vehicle_id in solution.routes().keys() {
        assert!(!solution.vehicle_bank().contains(vehicle_id));
    }

    for (request_id, vehicle_id) in solution.request_to_vehicle() {
        let request = instance.request(*request_id);
        let route = &solution.routes()[vehicle_id];
        let nodes = route.nodes();
        let pickup_pos = nodes.iter().position(|&n| n == request.pickup()).unwrap();
        let delivery_pos = nodes.iter().position(|&n| n == request.delivery()).unwrap();
        assert!(pickup_pos < delivery_pos, "pickup must precede delivery");
    }

    let (distance, duration) = solution.recompute_costs();
    assert!((distance - solution.distance_cost()).abs() < 1e-6);
    assert!((duration - solution.time_cost()).abs() < 1e-6);

    let params = instance.params();
    let expected_objective = params.alpha * distance
        + params.beta * duration
        + params.gama * solution.request_bank().len() as f64;
    assert!((solution.objective(instance) - expected_objective).abs() < 1e-6);
}
