use crate::problem::{
    instance::ProblemInstance,
    node::NodeId,
    request::RequestId,
    vehicle::VehicleId,
};

/// Cost change of a route mutation, in raw distance and duration units.
/// Insertion deltas are non-negative; removal deltas are normally negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteDelta {
    pub distance: f64,
    pub duration: f64,
}

impl RouteDelta {
    pub fn weighted(&self, alpha: f64, beta: f64) -> f64 {
        alpha * self.distance + beta * self.duration
    }
}

/// One vehicle's visit sequence, bracketed by its depot pair, with prefix
/// arrays that make per-position feasibility checks O(|route|):
///
/// - `start_services[k]`: service start time at `nodes[k]`
/// - `loads[k]`: cumulative load after visiting `nodes[k]`
/// - `distances[k]`: distance traveled to reach `nodes[k]`
#[derive(Debug, Clone)]
pub struct Route {
    vehicle_id: VehicleId,
    nodes: Vec<NodeId>,
    start_services: Vec<f64>,
    loads: Vec<f64>,
    distances: Vec<f64>,
    duration: f64,
}

impl Route {
    /// An empty route: just the vehicle's start and end depot.
    pub fn new(instance: &ProblemInstance, vehicle_id: VehicleId) -> Self {
        let vehicle = instance.vehicle(vehicle_id);
        let start = instance.node(vehicle.start_node());
        let end = instance.node(vehicle.end_node());

        let depart = start.earliest_service();
        let arrival =
            depart + start.service_duration() + instance.travel_time(vehicle_id, start.id(), end.id());
        let end_service = arrival.max(end.earliest_service());
        assert!(
            end_service <= end.latest_service(),
            "state violation: depot pair of vehicle {vehicle_id} is infeasible on its own"
        );

        let end_distance = instance.distance(start.id(), end.id());

        Route {
            vehicle_id,
            nodes: vec![start.id(), end.id()],
            start_services: vec![depart, end_service],
            loads: vec![start.load(), start.load() + end.load()],
            distances: vec![0.0, end_distance],
            duration: end_service - depart,
        }
    }

    pub fn vehicle_id(&self) -> VehicleId {
        self.vehicle_id
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the depot pair remains.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 2
    }

    pub fn start_services(&self) -> &[f64] {
        &self.start_services
    }

    pub fn loads(&self) -> &[f64] {
        &self.loads
    }

    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    /// Total distance traveled over the whole route.
    pub fn whole_distance(&self) -> f64 {
        *self.distances.last().expect("route is never empty")
    }

    /// Time between leaving the start depot and starting service at the end
    /// depot.
    pub fn whole_duration(&self) -> f64 {
        self.duration
    }

    pub fn contains(&self, node_id: NodeId) -> bool {
        self.nodes.contains(&node_id)
    }

    /// O(|route|) lookup of the service start time at a node.
    pub fn start_service_of(&self, node_id: NodeId) -> f64 {
        let position = self
            .nodes
            .iter()
            .position(|&n| n == node_id)
            .unwrap_or_else(|| panic!("state violation: node {node_id} not on this route"));
        self.start_services[position]
    }

    /// Inserts the request's pickup at index `i` and delivery at index `j`
    /// (`1 <= i < j <= |route|`, indices in the post-insertion sequence) and
    /// rebuilds the prefix arrays. Returns `None` when a time window breaks
    /// at any index from `i` onward or the capacity bound breaks between `i`
    /// and `j`; the route contents are unspecified after a failure, so
    /// callers evaluate on a scratch clone.
    pub fn try_insert_at(
        &mut self,
        instance: &ProblemInstance,
        request_id: RequestId,
        i: usize,
        j: usize,
    ) -> Option<RouteDelta> {
        debug_assert!(1 <= i && i < j && j <= self.nodes.len());

        let request = instance.request(request_id);
        self.nodes.insert(i, request.pickup());
        self.nodes.insert(j, request.delivery());

        // Service start recurrence: waiting is free, tardiness is fatal.
        self.start_services.insert(i, 0.0);
        self.start_services.insert(j, 0.0);
        for k in i..self.nodes.len() {
            let prev = instance.node(self.nodes[k - 1]);
            let current = instance.node(self.nodes[k]);
            let arrival = self.start_services[k - 1]
                + prev.service_duration()
                + instance.travel_time(self.vehicle_id, prev.id(), current.id());
            let start = arrival.max(current.earliest_service());
            if start > current.latest_service() {
                return None;
            }
            self.start_services[k] = start;
        }

        let previous_duration = self.duration;
        self.duration = self.start_services[self.start_services.len() - 1] - self.start_services[0];
        let duration_delta = self.duration - previous_duration;

        // Outside [i, j] the prefix loads are unchanged by the insertion.
        let capacity = instance.vehicle(self.vehicle_id).capacity();
        self.loads.insert(i, 0.0);
        self.loads.insert(j, 0.0);
        for k in i..=j {
            let load = self.loads[k - 1] + instance.node(self.nodes[k]).load();
            if load < 0.0 || load > capacity {
                return None;
            }
            self.loads[k] = load;
        }

        let previous_distance = self.whole_distance();
        self.distances.insert(i, 0.0);
        self.distances.insert(j, 0.0);
        for k in i..self.nodes.len() {
            self.distances[k] =
                self.distances[k - 1] + instance.distance(self.nodes[k - 1], self.nodes[k]);
        }
        let distance_delta = self.whole_distance() - previous_distance;

        Some(RouteDelta {
            distance: distance_delta,
            duration: duration_delta,
        })
    }

    /// Scans every position pair and returns the feasible insertion that
    /// minimizes `alpha * distance + beta * duration`, as a new route by
    /// value. Ties go to the first position pair found, in lexicographic
    /// `(i, j)` order. `None` when the vehicle is incompatible or no pair is
    /// feasible.
    pub fn try_insert_optimal(
        &self,
        instance: &ProblemInstance,
        request_id: RequestId,
    ) -> Option<(RouteDelta, Route)> {
        if !instance.request(request_id).is_compatible_with(self.vehicle_id) {
            return None;
        }

        let alpha = instance.params().alpha;
        let beta = instance.params().beta;
        let len = self.nodes.len();

        let mut best: Option<(f64, RouteDelta, Route)> = None;
        for i in 1..len {
            for j in (i + 1)..=len {
                let mut candidate = self.clone();
                if let Some(delta) = candidate.try_insert_at(instance, request_id, i, j) {
                    let cost = delta.weighted(alpha, beta);
                    if best.as_ref().is_none_or(|(best_cost, _, _)| cost < *best_cost) {
                        best = Some((cost, delta, candidate));
                    }
                }
            }
        }

        best.map(|(_, delta, route)| (delta, route))
    }

    /// Deletes the request's pickup and delivery and rebuilds the prefix
    /// arrays. Panics when the request is not on this route or the vehicle
    /// is not in its compatible set: both indicate an engine bug.
    pub fn remove_pair(&mut self, instance: &ProblemInstance, request_id: RequestId) -> RouteDelta {
        let request = instance.request(request_id);
        assert!(
            request.is_compatible_with(self.vehicle_id),
            "state violation: removing request {request_id} from an incompatible vehicle"
        );

        let pickup_index = self
            .nodes
            .iter()
            .position(|&n| n == request.pickup())
            .unwrap_or_else(|| {
                panic!("state violation: pickup of request {request_id} not on this route")
            });
        let delivery_index = self
            .nodes
            .iter()
            .position(|&n| n == request.delivery())
            .unwrap_or_else(|| {
                panic!("state violation: delivery of request {request_id} not on this route")
            });
        assert!(pickup_index > 0 && pickup_index < delivery_index);

        let previous_distance = self.whole_distance();
        let previous_duration = self.duration;

        self.nodes.remove(delivery_index);
        self.nodes.remove(pickup_index);
        self.start_services.remove(delivery_index);
        self.start_services.remove(pickup_index);
        self.loads.remove(delivery_index);
        self.loads.remove(pickup_index);
        self.distances.remove(delivery_index);
        self.distances.remove(pickup_index);

        let capacity = instance.vehicle(self.vehicle_id).capacity();
        for k in pickup_index..self.nodes.len() {
            let prev = instance.node(self.nodes[k - 1]);
            let current = instance.node(self.nodes[k]);
            let arrival = self.start_services[k - 1]
                + prev.service_duration()
                + instance.travel_time(self.vehicle_id, prev.id(), current.id());
            let start = arrival.max(current.earliest_service());
            assert!(
                start <= current.latest_service(),
                "state violation: removal broke a time window at node {}",
                current.id()
            );
            self.start_services[k] = start;

            let load = self.loads[k - 1] + current.load();
            assert!(
                load >= 0.0 && load <= capacity,
                "state violation: removal broke the capacity bound at node {}",
                current.id()
            );
            self.loads[k] = load;

            self.distances[k] =
                self.distances[k - 1] + instance.distance(self.nodes[k - 1], self.nodes[k]);
        }

        self.duration =
            self.start_services[self.start_services.len() - 1] - self.start_services[0];

        RouteDelta {
            distance: self.whole_distance() - previous_distance,
            duration: self.duration - previous_duration,
        }
    }
}
