use fxhash::FxHashSet;

use crate::define_id_newtype;

use super::{node::NodeId, vehicle::VehicleId};

define_id_newtype!(RequestId);

/// A paired pickup and delivery that must be served by the same vehicle,
/// pickup first.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    id: RequestId,
    pickup: NodeId,
    delivery: NodeId,
    required_capacity: f64,
    compatible_vehicles: FxHashSet<VehicleId>,
}

impl Request {
    pub fn new(
        id: RequestId,
        pickup: NodeId,
        delivery: NodeId,
        required_capacity: f64,
        compatible_vehicles: FxHashSet<VehicleId>,
    ) -> Self {
        Request {
            id,
            pickup,
            delivery,
            required_capacity,
            compatible_vehicles,
        }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn pickup(&self) -> NodeId {
        self.pickup
    }

    pub fn delivery(&self) -> NodeId {
        self.delivery
    }

    pub fn required_capacity(&self) -> f64 {
        self.required_capacity
    }

    pub fn compatible_vehicles(&self) -> &FxHashSet<VehicleId> {
        &self.compatible_vehicles
    }

    pub fn is_compatible_with(&self, vehicle_id: VehicleId) -> bool {
        self.compatible_vehicles.contains(&vehicle_id)
    }

    pub(super) fn add_compatible_vehicle(&mut self, vehicle_id: VehicleId) {
        self.compatible_vehicles.insert(vehicle_id);
    }

    pub(super) fn remove_compatible_vehicle(&mut self, vehicle_id: VehicleId) {
        self.compatible_vehicles.remove(&vehicle_id);
    }
}
