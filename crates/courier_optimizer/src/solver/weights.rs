use rand::Rng;

/// Weights below this floor are clamped back up so no operator starves out
/// of the roulette entirely.
const MIN_WEIGHT: f64 = 1e-8;

#[derive(Debug, Clone)]
struct OperatorEntry<S> {
    strategy: S,
    weight: f64,
    reward: f64,
    usage: usize,
}

/// One adaptive operator class: roulette-wheel selection over the current
/// weights, reward/usage accumulation within a segment, and the segment-end
/// mixing update.
#[derive(Debug, Clone)]
pub struct OperatorWeights<S: Copy> {
    entries: Vec<OperatorEntry<S>>,
}

impl<S: Copy> OperatorWeights<S> {
    pub fn new(strategies: Vec<S>, initial_weight: f64) -> Self {
        OperatorWeights {
            entries: strategies
                .into_iter()
                .map(|strategy| OperatorEntry {
                    strategy,
                    weight: initial_weight,
                    reward: 0.0,
                    usage: 0,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn strategy(&self, index: usize) -> S {
        self.entries[index].strategy
    }

    pub fn weight(&self, index: usize) -> f64 {
        self.entries[index].weight
    }

    /// Cumulative-weight roulette draw; counts the pick as one usage.
    /// Falls back to a uniform draw when every weight is non-positive.
    pub fn select<R: Rng>(&mut self, rng: &mut R) -> usize {
        assert!(!self.entries.is_empty(), "no operators configured");

        let total: f64 = self.entries.iter().map(|e| e.weight.max(0.0)).sum();

        let index = if total <= 0.0 {
            rng.random_range(0..self.entries.len())
        } else {
            let mut draw = rng.random_range(0.0..total);
            let mut chosen = self.entries.len() - 1;
            for (i, entry) in self.entries.iter().enumerate() {
                let weight = entry.weight.max(0.0);
                if draw < weight {
                    chosen = i;
                    break;
                }
                draw -= weight;
            }
            chosen
        };

        self.entries[index].usage += 1;
        index
    }

    pub fn credit(&mut self, index: usize, reward: f64) {
        self.entries[index].reward += reward;
    }

    /// Segment-end update: operators used this segment mix their average
    /// reward into the weight at rate `r`; unused operators keep their
    /// weight. Both are floored at `MIN_WEIGHT`, and the accumulators reset.
    pub fn update_weights(&mut self, r: f64) {
        for entry in self.entries.iter_mut() {
            if entry.usage > 0 {
                let average = entry.reward / entry.usage as f64;
                entry.weight = ((1.0 - r) * entry.weight + r * average).max(MIN_WEIGHT);
            } else {
                entry.weight = entry.weight.max(MIN_WEIGHT);
            }

            entry.reward = 0.0;
            entry.usage = 0;
        }
    }
}
