use fxhash::FxHashSet;

use crate::{
    problem::{
        instance::{ProblemInstance, ProblemInstanceBuilder},
        location::{Location, LocationIdx},
        node::{Node, NodeId},
        request::{Request, RequestId},
        vehicle::{Vehicle, VehicleId},
    },
    solver::params::Params,
};

/// One pickup/delivery pair: `(x, y, tw_early, tw_late, service)` per end.
pub struct RequestSpec {
    pub pickup: (f64, f64, f64, f64, f64),
    pub delivery: (f64, f64, f64, f64, f64),
    pub load: f64,
}

/// Builds a homogeneous-fleet instance the way the Li & Lim reader does:
/// customer node ids 1..=2n (pickup then delivery per request), one depot
/// pair per vehicle at ids above the customers, all vehicles compatible
/// with every request.
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

    let vehicle_ids: FxHashSet<VehicleId> =
        (1..=vehicle_count).map(VehicleId::new).collect();

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

/// One vehicle (capacity 50, speed 1), one request: pickup at (10,10) in
/// [0,100], delivery at (20,20) in [0,200], load 10, service 5 at both ends.
pub fn single_vehicle_instance() -> ProblemInstance {
    build_instance(
        (0.0, 0.0),
        (0.0, 1000.0),
        1,
        50.0,
        1.0,
        &[RequestSpec {
            pickup: (10.0, 10.0, 0.0, 100.0, 5.0),
            delivery: (20.0, 20.0, 0.0, 200.0, 5.0),
            load: 10.0,
        }],
        Params::default(),
    )
}

/// Two requests of load 40 on a capacity-50 vehicle: only fully serialized
/// routes are feasible.
pub fn capacity_block_instance() -> ProblemInstance {
    let wide = (0.0, 1000.0, 0.0);
    build_instance(
        (0.0, 0.0),
        (0.0, 1000.0),
        1,
        50.0,
        1.0,
        &[
            RequestSpec {
                pickup: (10.0, 0.0, wide.0, wide.1, wide.2),
                delivery: (20.0, 0.0, wide.0, wide.1, wide.2),
                load: 40.0,
            },
            RequestSpec {
                pickup: (30.0, 0.0, wide.0, wide.1, wide.2),
                delivery: (40.0, 0.0, wide.0, wide.1, wide.2),
                load: 40.0,
            },
        ],
        Params::default(),
    )
}

