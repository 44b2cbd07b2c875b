use rand::Rng;

/// Which arm of the noise choice an iteration runs with. The pair is
/// weighted and rewarded like any other operator class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoiseMode {
    Plain,
    Noised,
}

impl std::fmt::Display for NoiseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoiseMode::Plain => write!(f, "Plain"),
            NoiseMode::Noised => write!(f, "Noised"),
        }
    }
}

/// Perturbs feasible insertion costs by a uniform amount bounded by
/// `eta * max_distance`, clamped at zero. Infeasible sentinels are never
/// noised.
#[derive(Debug, Clone, Copy)]
pub struct CostNoiser {
    mode: NoiseMode,
    amplitude: f64,
}

impl CostNoiser {
    pub fn new(mode: NoiseMode, eta: f64, max_distance: f64) -> Self {
        CostNoiser {
            mode,
            amplitude: eta * max_distance,
        }
    }

    pub fn apply<R: Rng>(&self, cost: f64, rng: &mut R) -> f64 {
        match self.mode {
            NoiseMode::Plain => cost,
            NoiseMode::Noised => {
                let noise = rng.random_range(-self.amplitude..=self.amplitude);
                (cost + noise).max(0.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::SmallRng, SeedableRng};

    use super::*;

    #[test]
    fn plain_mode_is_identity() {
        let noiser = CostNoiser::new(NoiseMode::Plain, 0.025, 100.0);
        let mut rng = SmallRng::seed_from_u64(7);
        assert_eq!(noiser.apply(42.0, &mut rng), 42.0);
    }

    #[test]
    fn noised_costs_stay_bounded_and_non_negative() {
        let noiser = CostNoiser::new(NoiseMode::Noised, 0.1, 50.0);
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..1000 {
            let noised = noiser.apply(1.0, &mut rng);
            assert!(noised >= 0.0);
            assert!(noised <= 1.0 + 5.0);
        }
    }
}
