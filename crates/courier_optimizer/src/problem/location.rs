use crate::define_id_newtype;

define_id_newtype!(LocationIdx);

/// A planar point. Nodes reference locations by index so that depot clones
/// created by fleet growth all share one location and the distance matrix
/// keeps a fixed size for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Location {
    x: f64,
    y: f64,
}

impl Location {
    pub fn from_cartesian(x: f64, y: f64) -> Self {
        Location { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn euclidean_distance(&self, other: &Location) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}
