use crate::define_id_newtype;

use super::location::LocationIdx;

define_id_newtype!(NodeId);

/// One visitable point of the instance: a customer pickup, a customer
/// delivery, or a depot endpoint owned by a single vehicle.
///
/// `load` is signed: positive at a pickup, negative at the paired delivery,
/// zero at depots.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Node {
    id: NodeId,
    location: LocationIdx,
    earliest_service: f64,
    latest_service: f64,
    service_duration: f64,
    load: f64,
}

impl Node {
    pub fn new(
        id: NodeId,
        location: LocationIdx,
        earliest_service: f64,
        latest_service: f64,
        service_duration: f64,
        load: f64,
    ) -> Self {
        Node {
            id,
            location,
            earliest_service,
            latest_service,
            service_duration,
            load,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn location(&self) -> LocationIdx {
        self.location
    }

    pub fn earliest_service(&self) -> f64 {
        self.earliest_service
    }

    pub fn latest_service(&self) -> f64 {
        self.latest_service
    }

    pub fn service_duration(&self) -> f64 {
        self.service_duration
    }

    pub fn load(&self) -> f64 {
        self.load
    }

    /// A clone of this node under a fresh id, used when a depot pair is
    /// duplicated for a new vehicle.
    pub fn clone_with_id(&self, id: NodeId) -> Node {
        let mut node = self.clone();
        node.id = id;
        node
    }
}
