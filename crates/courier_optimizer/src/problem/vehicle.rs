use crate::define_id_newtype;

use super::node::NodeId;

define_id_newtype!(VehicleId);

/// A capacitated vehicle owning its private start/end depot node pair.
/// Depot nodes are never shared between vehicles.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Vehicle {
    id: VehicleId,
    capacity: f64,
    velocity: f64,
    start_node: NodeId,
    end_node: NodeId,
}

impl Vehicle {
    pub fn new(
        id: VehicleId,
        capacity: f64,
        velocity: f64,
        start_node: NodeId,
        end_node: NodeId,
    ) -> Self {
        Vehicle {
            id,
            capacity,
            velocity,
            start_node,
            end_node,
        }
    }

    pub fn id(&self) -> VehicleId {
        self.id
    }

    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn start_node(&self) -> NodeId {
        self.start_node
    }

    pub fn end_node(&self) -> NodeId {
        self.end_node
    }

    /// True when the other vehicle is of the same kind: same capacity and
    /// velocity. Fleet growth in the two-stage driver requires this.
    pub fn is_same_kind(&self, other: &Vehicle) -> bool {
        self.capacity == other.capacity && self.velocity == other.velocity
    }
}
