use fxhash::FxHashMap;

use crate::{error::DataError, solver::params::Params};

use super::{
    location::Location,
    node::{Node, NodeId},
    request::{Request, RequestId},
    travel_matrix::TravelMatrix,
    vehicle::{Vehicle, VehicleId},
};

/// The immutable problem data: nodes, paired requests, the fleet, and the
/// distance matrix, plus the run parameters.
///
/// The only mutations are the fleet extension used by the two-stage driver:
/// cloning the reference vehicle kind under a fresh depot pair, and deleting
/// a vehicle together with its depot pair. Neither touches the distance
/// matrix because depot clones share the original depot location.
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemInstance {
    locations: Vec<Location>,
    matrix: TravelMatrix,
    nodes: FxHashMap<NodeId, Node>,
    requests: FxHashMap<RequestId, Request>,
    vehicles: FxHashMap<VehicleId, Vehicle>,
    params: Params,
}

impl ProblemInstance {
    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn matrix(&self) -> &TravelMatrix {
        &self.matrix
    }

    pub fn nodes(&self) -> &FxHashMap<NodeId, Node> {
        &self.nodes
    }

    pub fn requests(&self) -> &FxHashMap<RequestId, Request> {
        &self.requests
    }

    pub fn vehicles(&self) -> &FxHashMap<VehicleId, Vehicle> {
        &self.vehicles
    }

    pub fn node(&self, id: NodeId) -> &Node {
        self.nodes
            .get(&id)
            .unwrap_or_else(|| panic!("state violation: unknown node id {id}"))
    }

    pub fn request(&self, id: RequestId) -> &Request {
        self.requests
            .get(&id)
            .unwrap_or_else(|| panic!("state violation: unknown request id {id}"))
    }

    pub fn vehicle(&self, id: VehicleId) -> &Vehicle {
        self.vehicles
            .get(&id)
            .unwrap_or_else(|| panic!("state violation: unknown vehicle id {id}"))
    }

    #[inline]
    pub fn distance(&self, from: NodeId, to: NodeId) -> f64 {
        self.matrix
            .distance(self.node(from).location(), self.node(to).location())
    }

    #[inline]
    pub fn travel_time(&self, vehicle_id: VehicleId, from: NodeId, to: NodeId) -> f64 {
        self.distance(from, to) / self.vehicle(vehicle_id).velocity()
    }

    pub fn max_distance(&self) -> f64 {
        self.matrix.max_distance()
    }

    pub fn max_vehicle_id(&self) -> Option<VehicleId> {
        self.vehicles.keys().max().copied()
    }

    fn max_node_id(&self) -> NodeId {
        self.nodes
            .keys()
            .max()
            .copied()
            .expect("state violation: instance has no nodes")
    }

    /// Clones the reference vehicle (lowest id) into a new vehicle of the
    /// same kind with a fresh depot pair, and makes every request compatible
    /// with it. Returns the new vehicle id.
    pub fn add_clone_vehicle(&mut self) -> VehicleId {
        let reference_id = self
            .vehicles
            .keys()
            .min()
            .copied()
            .expect("state violation: cannot clone a vehicle in an empty fleet");
        let reference = self.vehicles[&reference_id].clone();

        let new_vehicle_id = VehicleId::new(self.max_vehicle_id().unwrap().get() + 1);
        let start_node_id = NodeId::new(self.max_node_id().get() + 1);
        let end_node_id = NodeId::new(start_node_id.get() + 1);

        let start_depot = self.node(reference.start_node()).clone_with_id(start_node_id);
        let end_depot = self.node(reference.end_node()).clone_with_id(end_node_id);
        self.nodes.insert(start_node_id, start_depot);
        self.nodes.insert(end_node_id, end_depot);

        self.vehicles.insert(
            new_vehicle_id,
            Vehicle::new(
                new_vehicle_id,
                reference.capacity(),
                reference.velocity(),
                start_node_id,
                end_node_id,
            ),
        );

        for request in self.requests.values_mut() {
            request.add_compatible_vehicle(new_vehicle_id);
        }

        new_vehicle_id
    }

    /// Removes a vehicle, its private depot pair, and its entries in every
    /// request's compatible set. The last vehicle cannot be deleted.
    pub fn delete_vehicle(&mut self, vehicle_id: VehicleId) {
        assert!(
            self.vehicles.contains_key(&vehicle_id),
            "state violation: deleting unknown vehicle {vehicle_id}"
        );
        assert!(
            self.vehicles.len() > 1,
            "state violation: cannot delete the last vehicle"
        );

        let vehicle = self.vehicles.remove(&vehicle_id).unwrap();

        let depot_shared = self.vehicles.values().any(|other| {
            other.start_node() == vehicle.start_node()
                || other.end_node() == vehicle.end_node()
                || other.start_node() == vehicle.end_node()
                || other.end_node() == vehicle.start_node()
        });
        assert!(
            !depot_shared,
            "state violation: vehicle {vehicle_id} shares depot nodes with another vehicle"
        );

        self.nodes.remove(&vehicle.start_node());
        self.nodes.remove(&vehicle.end_node());

        for request in self.requests.values_mut() {
            request.remove_compatible_vehicle(vehicle_id);
        }
    }
}

#[derive(Default)]
pub struct ProblemInstanceBuilder {
    locations: Vec<Location>,
    nodes: Vec<Node>,
    requests: Vec<Request>,
    vehicles: Vec<Vehicle>,
    params: Option<Params>,
}

impl ProblemInstanceBuilder {
    pub fn set_locations(&mut self, locations: Vec<Location>) -> &mut Self {
        self.locations = locations;
        self
    }

    pub fn set_nodes(&mut self, nodes: Vec<Node>) -> &mut Self {
        self.nodes = nodes;
        self
    }

    pub fn set_requests(&mut self, requests: Vec<Request>) -> &mut Self {
        self.requests = requests;
        self
    }

    pub fn set_vehicles(&mut self, vehicles: Vec<Vehicle>) -> &mut Self {
        self.vehicles = vehicles;
        self
    }

    pub fn set_params(&mut self, params: Params) -> &mut Self {
        self.params = Some(params);
        self
    }

    pub fn build(self) -> Result<ProblemInstance, DataError> {
        let params = self.params.unwrap_or_default();

        let matrix = TravelMatrix::from_euclidean(&self.locations);
        let nodes: FxHashMap<NodeId, Node> =
            self.nodes.into_iter().map(|n| (n.id(), n)).collect();
        let requests: FxHashMap<RequestId, Request> =
            self.requests.into_iter().map(|r| (r.id(), r)).collect();
        let vehicles: FxHashMap<VehicleId, Vehicle> =
            self.vehicles.into_iter().map(|v| (v.id(), v)).collect();

        let instance = ProblemInstance {
            locations: self.locations,
            matrix,
            nodes,
            requests,
            vehicles,
            params,
        };
        instance.validate()?;
        Ok(instance)
    }
}

impl ProblemInstance {
    fn validate(&self) -> Result<(), DataError> {
        for node in self.nodes.values() {
            if node.location().get() >= self.matrix.num_locations() {
                return Err(DataError::Invalid(format!(
                    "node {} references location {} outside the matrix",
                    node.id(),
                    node.location()
                )));
            }
            if node.earliest_service() > node.latest_service() {
                return Err(DataError::Invalid(format!(
                    "node {} has an empty time window [{}, {}]",
                    node.id(),
                    node.earliest_service(),
                    node.latest_service()
                )));
            }
        }

        let mut seen_depots = fxhash::FxHashSet::default();
        for vehicle in self.vehicles.values() {
            if vehicle.capacity() <= 0.0 || vehicle.velocity() <= 0.0 {
                return Err(DataError::Invalid(format!(
                    "vehicle {} must have positive capacity and velocity",
                    vehicle.id()
                )));
            }
            for depot in [vehicle.start_node(), vehicle.end_node()] {
                if !self.nodes.contains_key(&depot) {
                    return Err(DataError::DanglingNode {
                        referenced: depot.get(),
                        by: format!("vehicle {}", vehicle.id()),
                    });
                }
                if !seen_depots.insert(depot) {
                    return Err(DataError::Invalid(format!(
                        "depot node {depot} is shared between vehicles"
                    )));
                }
            }
        }

        for request in self.requests.values() {
            for (node_id, role) in [(request.pickup(), "pickup"), (request.delivery(), "delivery")]
            {
                if !self.nodes.contains_key(&node_id) {
                    return Err(DataError::DanglingNode {
                        referenced: node_id.get(),
                        by: format!("request {} {role}", request.id()),
                    });
                }
            }
            let pickup_load = self.node(request.pickup()).load();
            let delivery_load = self.node(request.delivery()).load();
            if request.required_capacity() <= 0.0
                || pickup_load != request.required_capacity()
                || delivery_load != -request.required_capacity()
            {
                return Err(DataError::DemandMismatch {
                    pickup: request.pickup().get(),
                    delivery: request.delivery().get(),
                });
            }
            for vehicle_id in request.compatible_vehicles() {
                if !self.vehicles.contains_key(vehicle_id) {
                    return Err(DataError::Invalid(format!(
                        "request {} is compatible with unknown vehicle {vehicle_id}",
                        request.id()
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::single_vehicle_instance;

    use super::*;

    #[test]
    fn clone_vehicle_allocates_fresh_depot_pair() {
        let mut instance = single_vehicle_instance();
        let old_max_node = instance.nodes().keys().max().copied().unwrap();

        let new_id = instance.add_clone_vehicle();
        let new_vehicle = instance.vehicle(new_id).clone();

        assert_eq!(new_vehicle.start_node().get(), old_max_node.get() + 1);
        assert_eq!(new_vehicle.end_node().get(), old_max_node.get() + 2);
        assert!(instance
            .requests()
            .values()
            .all(|r| r.is_compatible_with(new_id)));

        let reference = instance.vehicle(VehicleId::new(1));
        assert!(reference.is_same_kind(&new_vehicle));

        // The cloned depot shares the original depot location, so travel
        // from any node is identical for both vehicles.
        let pickup = NodeId::new(1);
        assert_eq!(
            instance.distance(reference.start_node(), pickup),
            instance.distance(new_vehicle.start_node(), pickup)
        );
    }

    #[test]
    fn delete_vehicle_drops_depots_and_compatibility() {
        let mut instance = single_vehicle_instance();
        let new_id = instance.add_clone_vehicle();
        let start = instance.vehicle(new_id).start_node();
        let end = instance.vehicle(new_id).end_node();

        instance.delete_vehicle(new_id);

        assert!(!instance.vehicles().contains_key(&new_id));
        assert!(!instance.nodes().contains_key(&start));
        assert!(!instance.nodes().contains_key(&end));
        assert!(instance
            .requests()
            .values()
            .all(|r| !r.is_compatible_with(new_id)));
    }

    #[test]
    #[should_panic(expected = "last vehicle")]
    fn deleting_the_last_vehicle_panics() {
        let mut instance = single_vehicle_instance();
        instance.delete_vehicle(VehicleId::new(1));
    }
}
