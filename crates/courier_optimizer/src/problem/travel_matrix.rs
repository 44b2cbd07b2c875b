use super::location::{Location, LocationIdx};

pub type Distance = f64;
pub type Time = f64;

/// Symmetric distance matrix over locations, stored flat.
/// The index for a pair of locations is `from * num_locations + to`.
#[derive(Debug, Clone, PartialEq)]
pub struct TravelMatrix {
    distances: Vec<Distance>,
    num_locations: usize,
    max_distance: Distance,
}

impl TravelMatrix {
    /// Euclidean distances, quantized to three decimals the way the published
    /// benchmark optima are.
    pub fn from_euclidean(locations: &[Location]) -> Self {
        let num_locations = locations.len();
        let mut distances = vec![0.0; num_locations * num_locations];

        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate().skip(i + 1) {
                let distance = (from.euclidean_distance(to) * 1000.0).round() / 1000.0;
                distances[i * num_locations + j] = distance;
                distances[j * num_locations + i] = distance;
            }
        }

        let max_distance = distances.iter().cloned().fold(0.0, f64::max);

        TravelMatrix {
            distances,
            num_locations,
            max_distance,
        }
    }

    #[inline(always)]
    fn get_index(&self, from: LocationIdx, to: LocationIdx) -> usize {
        from.get() * self.num_locations + to.get()
    }

    #[inline(always)]
    pub fn distance(&self, from: LocationIdx, to: LocationIdx) -> Distance {
        if from == to {
            return 0.0;
        }

        self.distances[self.get_index(from, to)]
    }

    pub fn max_distance(&self) -> Distance {
        self.max_distance
    }

    pub fn num_locations(&self) -> usize {
        self.num_locations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_with_zero_diagonal() {
        let locations = vec![
            Location::from_cartesian(0.0, 0.0),
            Location::from_cartesian(3.0, 4.0),
            Location::from_cartesian(6.0, 8.0),
        ];
        let matrix = TravelMatrix::from_euclidean(&locations);

        let a = LocationIdx::new(0);
        let b = LocationIdx::new(1);
        let c = LocationIdx::new(2);

        assert_eq!(matrix.distance(a, a), 0.0);
        assert_eq!(matrix.distance(a, b), 5.0);
        assert_eq!(matrix.distance(b, a), 5.0);
        assert_eq!(matrix.distance(a, c), 10.0);
        assert_eq!(matrix.max_distance(), 10.0);
    }

    #[test]
    fn distances_are_quantized() {
        let locations = vec![
            Location::from_cartesian(0.0, 0.0),
            Location::from_cartesian(10.0, 10.0),
        ];
        let matrix = TravelMatrix::from_euclidean(&locations);

        assert_eq!(
            matrix.distance(LocationIdx::new(0), LocationIdx::new(1)),
            14.142
        );
    }
}
