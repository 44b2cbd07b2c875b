use std::cell::Cell;
use std::hash::{Hash, Hasher};

use fxhash::{FxHashMap, FxHashSet, FxHasher64};

use crate::problem::{
    instance::ProblemInstance,
    node::NodeId,
    request::RequestId,
    vehicle::VehicleId,
};

use super::route::Route;

/// A (possibly partial) assignment of requests to vehicle routes.
///
/// Invariants, checked aggressively because a breach is an engine bug:
/// - every vehicle is in exactly one of `routes` / `vehicle_bank`;
/// - every request is in exactly one of `request_bank` / `request_to_vehicle`;
/// - `node_to_vehicle` mirrors the pickup/delivery placement of every
///   assigned request.
#[derive(Debug, Clone)]
pub struct Solution {
    routes: FxHashMap<VehicleId, Route>,
    request_bank: FxHashSet<RequestId>,
    vehicle_bank: FxHashSet<VehicleId>,
    request_to_vehicle: FxHashMap<RequestId, VehicleId>,
    node_to_vehicle: FxHashMap<NodeId, VehicleId>,
    distance_cost: f64,
    time_cost: f64,
    fingerprint: Cell<Option<u64>>,
}

impl Solution {
    /// The all-unassigned solution: every request banked, every vehicle idle.
    pub fn new(instance: &ProblemInstance) -> Self {
        Solution {
            routes: FxHashMap::default(),
            request_bank: instance.requests().keys().copied().collect(),
            vehicle_bank: instance.vehicles().keys().copied().collect(),
            request_to_vehicle: FxHashMap::default(),
            node_to_vehicle: FxHashMap::default(),
            distance_cost: 0.0,
            time_cost: 0.0,
            fingerprint: Cell::new(None),
        }
    }

    pub fn routes(&self) -> &FxHashMap<VehicleId, Route> {
        &self.routes
    }

    pub fn request_bank(&self) -> &FxHashSet<RequestId> {
        &self.request_bank
    }

    pub fn vehicle_bank(&self) -> &FxHashSet<VehicleId> {
        &self.vehicle_bank
    }

    pub fn request_to_vehicle(&self) -> &FxHashMap<RequestId, VehicleId> {
        &self.request_to_vehicle
    }

    pub fn distance_cost(&self) -> f64 {
        self.distance_cost
    }

    pub fn time_cost(&self) -> f64 {
        self.time_cost
    }

    pub fn has_unassigned(&self) -> bool {
        !self.request_bank.is_empty()
    }

    /// Assigned request ids in ascending order: the deterministic iteration
    /// base for every stochastic operator.
    pub fn assigned_requests_sorted(&self) -> Vec<RequestId> {
        let mut ids: Vec<RequestId> = self.request_to_vehicle.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Vehicles able to take an insertion (idle or already routed), sorted.
    pub fn insertion_vehicles_sorted(&self) -> Vec<VehicleId> {
        let mut ids: Vec<VehicleId> = self
            .vehicle_bank
            .iter()
            .chain(self.routes.keys())
            .copied()
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn fleet_size(&self) -> usize {
        self.routes.len() + self.vehicle_bank.len()
    }

    pub fn max_vehicle_id(&self) -> Option<VehicleId> {
        self.routes
            .keys()
            .chain(self.vehicle_bank.iter())
            .max()
            .copied()
    }

    /// Service start time of an assigned request's node, via the owning
    /// route. Panics on unassigned nodes: querying them is an engine bug.
    pub fn start_service_of(&self, node_id: NodeId) -> f64 {
        let vehicle_id = self
            .node_to_vehicle
            .get(&node_id)
            .unwrap_or_else(|| panic!("state violation: node {node_id} is not assigned"));
        self.routes[vehicle_id].start_service_of(node_id)
    }

    /// `alpha * distance + beta * duration + gama * |request bank|`.
    pub fn objective(&self, instance: &ProblemInstance) -> f64 {
        self.objective_sans_bank(instance)
            + instance.params().gama * self.request_bank.len() as f64
    }

    /// The objective without the unassigned penalty, used to derive the
    /// annealing start temperature.
    pub fn objective_sans_bank(&self, instance: &ProblemInstance) -> f64 {
        instance.params().alpha * self.distance_cost + instance.params().beta * self.time_cost
    }

    /// Stable 64-bit digest over `(vehicle id, route)` pairs sorted by
    /// vehicle id. Cached until the next mutation.
    pub fn fingerprint(&self) -> u64 {
        if let Some(cached) = self.fingerprint.get() {
            return cached;
        }

        let mut entries: Vec<(&VehicleId, &Route)> = self.routes.iter().collect();
        entries.sort_unstable_by_key(|(vehicle_id, _)| **vehicle_id);

        let mut hasher = FxHasher64::default();
        for (vehicle_id, route) in entries {
            vehicle_id.get().hash(&mut hasher);
            for node in route.nodes() {
                node.get().hash(&mut hasher);
            }
        }

        let digest = hasher.finish();
        self.fingerprint.set(Some(digest));
        digest
    }

    fn mark_dirty(&self) {
        self.fingerprint.set(None);
    }

    fn refresh_costs(&mut self) {
        self.distance_cost = self.routes.values().map(Route::whole_distance).sum();
        self.time_cost = self.routes.values().map(Route::whole_duration).sum();
    }

    /// Trial cost of optimally inserting a banked request into one vehicle:
    /// `Some(alpha * Δdistance + beta * Δduration)`, `None` when the vehicle
    /// is incompatible or no feasible position exists. Does not mutate.
    pub fn cost_if_insert(
        &self,
        instance: &ProblemInstance,
        request_id: RequestId,
        vehicle_id: VehicleId,
    ) -> Option<f64> {
        assert!(
            self.request_bank.contains(&request_id),
            "state violation: cost_if_insert on assigned request {request_id}"
        );
        assert!(
            self.vehicle_bank.contains(&vehicle_id) || self.routes.contains_key(&vehicle_id),
            "state violation: vehicle {vehicle_id} unknown to this solution"
        );

        if !instance.request(request_id).is_compatible_with(vehicle_id) {
            return None;
        }

        let base = match self.routes.get(&vehicle_id) {
            Some(route) => route.clone(),
            None => Route::new(instance, vehicle_id),
        };

        base.try_insert_optimal(instance, request_id)
            .map(|(delta, _)| delta.weighted(instance.params().alpha, instance.params().beta))
    }

    /// Savings magnitude of removing an assigned request,
    /// `alpha * |Δdistance| + beta * |Δduration|`. Does not mutate.
    pub fn cost_if_remove(&self, instance: &ProblemInstance, request_id: RequestId) -> f64 {
        let vehicle_id = self
            .request_to_vehicle
            .get(&request_id)
            .unwrap_or_else(|| panic!("state violation: request {request_id} is not assigned"));

        let mut trial = self.routes[vehicle_id].clone();
        let delta = trial.remove_pair(instance, request_id);

        instance.params().alpha * delta.distance.abs()
            + instance.params().beta * delta.duration.abs()
    }

    /// Optimal insertion of a banked request into one vehicle. Returns false
    /// when the vehicle is incompatible or has no feasible position.
    pub fn insert_optimal_into_vehicle(
        &mut self,
        instance: &ProblemInstance,
        request_id: RequestId,
        vehicle_id: VehicleId,
    ) -> bool {
        assert!(
            self.request_bank.contains(&request_id),
            "state violation: inserting request {request_id} that is not banked"
        );

        if !instance.request(request_id).is_compatible_with(vehicle_id) {
            return false;
        }

        let base = match self.routes.get(&vehicle_id) {
            Some(route) => route.clone(),
            None => {
                assert!(
                    self.vehicle_bank.contains(&vehicle_id),
                    "state violation: vehicle {vehicle_id} unknown to this solution"
                );
                Route::new(instance, vehicle_id)
            }
        };

        let Some((_, new_route)) = base.try_insert_optimal(instance, request_id) else {
            return false;
        };

        let request = instance.request(request_id);
        self.routes.insert(vehicle_id, new_route);
        self.vehicle_bank.remove(&vehicle_id);
        self.request_bank.remove(&request_id);
        self.request_to_vehicle.insert(request_id, vehicle_id);
        self.node_to_vehicle.insert(request.pickup(), vehicle_id);
        self.node_to_vehicle.insert(request.delivery(), vehicle_id);

        self.refresh_costs();
        self.mark_dirty();
        true
    }

    /// Tries the request's compatible vehicles in ascending id order; the
    /// first feasible insertion wins.
    pub fn insert_optimal_into_any(
        &mut self,
        instance: &ProblemInstance,
        request_id: RequestId,
    ) -> bool {
        for vehicle_id in self.insertion_vehicles_sorted() {
            if instance.request(request_id).is_compatible_with(vehicle_id)
                && self.insert_optimal_into_vehicle(instance, request_id, vehicle_id)
            {
                return true;
            }
        }

        false
    }

    /// Bulk paired removal; removed requests return to the bank, emptied
    /// routes return their vehicle to the bank.
    pub fn remove_requests(&mut self, instance: &ProblemInstance, request_ids: &[RequestId]) {
        for &request_id in request_ids {
            let vehicle_id = *self
                .request_to_vehicle
                .get(&request_id)
                .unwrap_or_else(|| panic!("state violation: request {request_id} is not assigned"));

            let route = self
                .routes
                .get_mut(&vehicle_id)
                .unwrap_or_else(|| panic!("state violation: vehicle {vehicle_id} has no route"));
            route.remove_pair(instance, request_id);

            let request = instance.request(request_id);
            self.request_bank.insert(request_id);
            self.request_to_vehicle.remove(&request_id);
            self.node_to_vehicle.remove(&request.pickup());
            self.node_to_vehicle.remove(&request.delivery());

            if route.is_empty() {
                self.routes.remove(&vehicle_id);
                self.vehicle_bank.insert(vehicle_id);
            }
        }

        self.refresh_costs();
        self.mark_dirty();
    }

    /// Clones the reference vehicle kind on the instance and banks the new
    /// vehicle.
    pub fn add_clone_vehicle(&mut self, instance: &mut ProblemInstance) -> VehicleId {
        let vehicle_id = instance.add_clone_vehicle();
        self.vehicle_bank.insert(vehicle_id);
        vehicle_id
    }

    /// Unassigns everything on the vehicle, then removes it from both the
    /// solution and the instance.
    pub fn delete_vehicle_and_route(
        &mut self,
        instance: &mut ProblemInstance,
        vehicle_id: VehicleId,
    ) {
        assert!(
            self.routes.contains_key(&vehicle_id) || self.vehicle_bank.contains(&vehicle_id),
            "state violation: deleting vehicle {vehicle_id} unknown to this solution"
        );

        let on_vehicle: Vec<RequestId> = {
            let mut ids: Vec<RequestId> = self
                .request_to_vehicle
                .iter()
                .filter(|(_, &v)| v == vehicle_id)
                .map(|(&r, _)| r)
                .collect();
            ids.sort_unstable();
            ids
        };
        self.remove_requests(instance, &on_vehicle);

        assert!(
            !self.routes.contains_key(&vehicle_id),
            "state violation: vehicle {vehicle_id} still routed after unassigning its requests"
        );
        assert!(
            self.vehicle_bank.remove(&vehicle_id),
            "state violation: vehicle {vehicle_id} missing from the bank"
        );

        instance.delete_vehicle(vehicle_id);
        self.mark_dirty();
    }

    /// Recomputed (not cached) objective pieces, for consistency checks.
    pub fn recompute_costs(&self) -> (f64, f64) {
        let distance = self.routes.values().map(Route::whole_distance).sum();
        let duration = self.routes.values().map(Route::whole_duration).sum();
        (distance, duration)
    }
}
