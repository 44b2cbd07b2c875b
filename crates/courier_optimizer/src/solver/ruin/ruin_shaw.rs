use fxhash::{FxHashMap, FxHashSet};
use rand::Rng;

use crate::{
    problem::{instance::ProblemInstance, request::RequestId},
    solver::solution::working_solution::Solution,
};

use super::{ruin_context::RuinContext, ruin_solution::RuinSolution};

const DEGENERATE_RANGE: f64 = 1e-6;

type PairTable = FxHashMap<(RequestId, RequestId), f64>;

/// Removes clusters of mutually related requests: close in space, served at
/// similar times, of similar size, and swappable between the same vehicles.
pub struct RuinShaw;

/// Pairwise relatedness components over the currently assigned requests,
/// keyed by `(min_id, max_id)`. The spatial, temporal, and load components
/// are min-max normalized to [0, 1]; the vehicle-overlap term already is.
struct RelatednessTables {
    pickup_distance: PairTable,
    delivery_distance: PairTable,
    pickup_time_diff: PairTable,
    delivery_time_diff: PairTable,
    load_diff: PairTable,
    vehicle_set_diff: PairTable,
}

fn normalize(table: PairTable) -> PairTable {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &value in table.values() {
        min = min.min(value);
        max = max.max(value);
    }

    if table.is_empty() {
        return table;
    }

    if (max - min).abs() < DEGENERATE_RANGE {
        return table.into_iter().map(|(key, _)| (key, 0.0)).collect();
    }

    let range = max - min;
    table
        .into_iter()
        .map(|(key, value)| (key, (value - min) / range))
        .collect()
}

impl RelatednessTables {
    fn build(instance: &ProblemInstance, solution: &Solution, assigned: &[RequestId]) -> Self {
        let mut pickup_distance = PairTable::default();
        let mut delivery_distance = PairTable::default();
        let mut pickup_time_diff = PairTable::default();
        let mut delivery_time_diff = PairTable::default();
        let mut load_diff = PairTable::default();
        let mut vehicle_set_diff = PairTable::default();

        for (i, &a) in assigned.iter().enumerate() {
            let request_a = instance.request(a);
            let pickup_time_a = solution.start_service_of(request_a.pickup());
            let delivery_time_a = solution.start_service_of(request_a.delivery());

            for &b in assigned.iter().skip(i + 1) {
                let request_b = instance.request(b);
                let key = (a, b);

                pickup_distance.insert(
                    key,
                    instance.distance(request_a.pickup(), request_b.pickup()),
                );
                delivery_distance.insert(
                    key,
                    instance.distance(request_a.delivery(), request_b.delivery()),
                );

                let pickup_time_b = solution.start_service_of(request_b.pickup());
                let delivery_time_b = solution.start_service_of(request_b.delivery());
                pickup_time_diff.insert(key, (pickup_time_a - pickup_time_b).abs());
                delivery_time_diff.insert(key, (delivery_time_a - delivery_time_b).abs());

                load_diff.insert(
                    key,
                    (request_a.required_capacity() - request_b.required_capacity()).abs(),
                );

                let overlap = request_a
                    .compatible_vehicles()
                    .intersection(request_b.compatible_vehicles())
                    .count();
                let smaller = request_a
                    .compatible_vehicles()
                    .len()
                    .min(request_b.compatible_vehicles().len());
                vehicle_set_diff.insert(key, 1.0 - overlap as f64 / smaller as f64);
            }
        }

        RelatednessTables {
            pickup_distance: normalize(pickup_distance),
            delivery_distance: normalize(delivery_distance),
            pickup_time_diff: normalize(pickup_time_diff),
            delivery_time_diff: normalize(delivery_time_diff),
            load_diff: normalize(load_diff),
            vehicle_set_diff,
        }
    }

    fn relatedness(&self, instance: &ProblemInstance, a: RequestId, b: RequestId) -> f64 {
        let key = if a <= b { (a, b) } else { (b, a) };
        let params = instance.params();

        params.shaw_distance_weight
            * (self.pickup_distance[&key] + self.delivery_distance[&key])
            + params.shaw_time_weight
                * (self.pickup_time_diff[&key] + self.delivery_time_diff[&key])
            + params.shaw_load_weight * self.load_diff[&key]
            + params.shaw_vehicle_weight * self.vehicle_set_diff[&key]
    }
}

impl RuinSolution for RuinShaw {
    fn ruin_solution<R>(&self, solution: &mut Solution, context: RuinContext<'_, R>)
    where
        R: Rng,
    {
        let assigned = solution.assigned_requests_sorted();
        if assigned.is_empty() {
            return;
        }

        let tables = RelatednessTables::build(context.instance, solution, &assigned);
        let p = context.instance.params().p;

        let seed = assigned[context.rng.random_range(0..assigned.len())];
        let mut removed: Vec<RequestId> = vec![seed];
        let mut removed_set: FxHashSet<RequestId> = removed.iter().copied().collect();

        while removed.len() < context.num_requests_to_remove {
            let reference = removed[context.rng.random_range(0..removed.len())];

            let mut remaining: Vec<RequestId> = assigned
                .iter()
                .copied()
                .filter(|id| !removed_set.contains(id))
                .collect();
            if remaining.is_empty() {
                break;
            }

            // Most related first; ties resolved by request id.
            remaining.sort_unstable_by(|&a, &b| {
                let ra = tables.relatedness(context.instance, reference, a);
                let rb = tables.relatedness(context.instance, reference, b);
                ra.partial_cmp(&rb)
                    .expect("relatedness is finite")
                    .then_with(|| a.cmp(&b))
            });

            let y: f64 = context.rng.random_range(0.0..1.0);
            let index =
                ((y.powi(p as i32) * remaining.len() as f64) as usize).min(remaining.len() - 1);

            let selected = remaining[index];
            removed.push(selected);
            removed_set.insert(selected);
        }

        solution.remove_requests(context.instance, &removed);
    }
}
