use fxhash::FxHashMap;
use rand::rngs::SmallRng;

use crate::{
    problem::{instance::ProblemInstance, request::RequestId, vehicle::VehicleId},
    solver::{noise::CostNoiser, solution::working_solution::Solution},
};

/// Sentinel for an infeasible or incompatible insertion. Any real cost is
/// orders of magnitude below it.
pub const UNLIMITED: f64 = 1e16;
/// The value actually stored for infeasible entries, strictly above the
/// sentinel threshold so `cost > UNLIMITED` detects them.
pub const UNLIMITED_BOUND: f64 = UNLIMITED + 100.0;

/// The request × vehicle insertion cost table shared by the repair
/// operators. Every banked request holds one entry per insertion-capable
/// vehicle; after a commit only the affected vehicle's column is refreshed.
///
/// All iteration is in ascending id order so that a fixed rng seed yields a
/// fixed trace.
pub struct InsertionCosts {
    costs: FxHashMap<RequestId, FxHashMap<VehicleId, f64>>,
}

impl InsertionCosts {
    pub fn build(
        instance: &ProblemInstance,
        solution: &Solution,
        noiser: &CostNoiser,
        rng: &mut SmallRng,
    ) -> Self {
        let vehicles = solution.insertion_vehicles_sorted();

        let mut bank: Vec<RequestId> = solution.request_bank().iter().copied().collect();
        bank.sort_unstable();

        let mut costs = FxHashMap::default();
        for request_id in bank {
            let mut row = FxHashMap::default();
            for &vehicle_id in &vehicles {
                row.insert(
                    vehicle_id,
                    Self::entry(instance, solution, request_id, vehicle_id, noiser, rng),
                );
            }
            costs.insert(request_id, row);
        }

        InsertionCosts { costs }
    }

    fn entry(
        instance: &ProblemInstance,
        solution: &Solution,
        request_id: RequestId,
        vehicle_id: VehicleId,
        noiser: &CostNoiser,
        rng: &mut SmallRng,
    ) -> f64 {
        match solution.cost_if_insert(instance, request_id, vehicle_id) {
            Some(cost) => noiser.apply(cost, rng),
            None => UNLIMITED_BOUND,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    pub fn requests_sorted(&self) -> Vec<RequestId> {
        let mut ids: Vec<RequestId> = self.costs.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Global argmin over the whole table; ties go to the lowest
    /// (request, vehicle) pair.
    pub fn best(&self) -> Option<(RequestId, VehicleId, f64)> {
        let mut best: Option<(RequestId, VehicleId, f64)> = None;

        for request_id in self.requests_sorted() {
            for (vehicle_id, cost) in self.sorted_vehicle_costs(request_id) {
                if best.is_none_or(|(_, _, best_cost)| cost < best_cost) {
                    best = Some((request_id, vehicle_id, cost));
                }
            }
        }

        best
    }

    /// This request's costs ascending, ties by vehicle id.
    pub fn sorted_vehicle_costs(&self, request_id: RequestId) -> Vec<(VehicleId, f64)> {
        let row = self
            .costs
            .get(&request_id)
            .unwrap_or_else(|| panic!("request {request_id} missing from the cost table"));

        let mut entries: Vec<(VehicleId, f64)> =
            row.iter().map(|(&v, &c)| (v, c)).collect();
        entries.sort_unstable_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .expect("insertion costs are finite")
                .then_with(|| a.0.cmp(&b.0))
        });
        entries
    }

    pub fn remove_request(&mut self, request_id: RequestId) {
        self.costs.remove(&request_id);
    }

    /// Recomputes the column of the vehicle that just absorbed an insertion
    /// for every request still in the table.
    pub fn refresh_vehicle_column(
        &mut self,
        instance: &ProblemInstance,
        solution: &Solution,
        vehicle_id: VehicleId,
        noiser: &CostNoiser,
        rng: &mut SmallRng,
    ) {
        for request_id in self.requests_sorted() {
            let cost = Self::entry(instance, solution, request_id, vehicle_id, noiser, rng);
            self.costs
                .get_mut(&request_id)
                .expect("request listed from the table")
                .insert(vehicle_id, cost);
        }
    }
}
