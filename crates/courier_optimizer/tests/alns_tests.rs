mod common;

use common::{
    assert_solution_invariants, assigned_solution, clustered_instance, small_search_params,
};
use courier_optimizer::{
    error::ConfigError,
    solver::{
        alns::{Alns, AlnsOptions},
        solution::working_solution::Solution,
    },
};
use rand::{rngs::SmallRng, SeedableRng};

#[test]
fn search_never_worsens_the_best_solution() {
    let instance = clustered_instance(3, small_search_params());
    let initial = assigned_solution(&instance);
    let initial_objective = initial.objective(&instance);

    let mut rng = SmallRng::seed_from_u64(7);
    let result = Alns::new(&instance)
        .run(&initial, &AlnsOptions::refinement(400), &mut rng)
        .unwrap();

    assert!(result.best.objective(&instance) <= initial_objective);
    assert_eq!(result.iterations, 400);
    assert_solution_invariants(&instance, &result.best);
}

#[test]
fn longer_budgets_keep_the_best_monotone() {
    let instance = clustered_instance(3, small_search_params());
    let initial = assigned_solution(&instance);

    // The same seed replays the same trace, so the best after 300
    // iterations can never beat the best after 100.
    let mut short_rng = SmallRng::seed_from_u64(11);
    let short = Alns::new(&instance)
        .run(&initial, &AlnsOptions::refinement(100), &mut short_rng)
        .unwrap();

    let mut long_rng = SmallRng::seed_from_u64(11);
    let long = Alns::new(&instance)
        .run(&initial, &AlnsOptions::refinement(300), &mut long_rng)
        .unwrap();

    assert!(long.best.objective(&instance) <= short.best.objective(&instance) + 1e-9);
}

#[test]
fn identical_seeds_reproduce_identical_runs() {
    let instance = clustered_instance(3, small_search_params());
    let initial = assigned_solution(&instance);

    let run = |seed: u64| {
        let mut rng = SmallRng::seed_from_u64(seed);
        let result = Alns::new(&instance)
            .run(&initial, &AlnsOptions::refinement(400), &mut rng)
            .unwrap();
        (
            result.best.objective(&instance),
            result.best.fingerprint(),
            result.iterations,
        )
    };

    let first = run(42);
    let second = run(42);
    assert_eq!(first.0, second.0, "objectives must match bit for bit");
    assert_eq!(first.1, second.1, "routes must match exactly");
    assert_eq!(first.2, second.2);
}

#[test]
fn drain_bank_stops_as_soon_as_everything_is_assigned() {
    let instance = clustered_instance(3, small_search_params());
    let mut partial = assigned_solution(&instance);
    let victim = *partial
        .request_to_vehicle()
        .keys()
        .min()
        .expect("fixture has assigned requests");
    partial.remove_requests(&instance, &[victim]);

    let mut rng = SmallRng::seed_from_u64(3);
    let result = Alns::new(&instance)
        .run(&partial, &AlnsOptions::drain_bank(400), &mut rng)
        .unwrap();

    assert!(result.best.request_bank().is_empty());
    assert!(
        result.iterations < 400,
        "the bank is drainable, so the early stop must fire"
    );
    assert_solution_invariants(&instance, &result.best);
}

#[test]
fn an_all_banked_start_cannot_seed_the_temperature() {
    let instance = clustered_instance(3, small_search_params());
    let initial = Solution::new(&instance);

    let mut rng = SmallRng::seed_from_u64(1);
    let result = Alns::new(&instance).run(&initial, &AlnsOptions::refinement(10), &mut rng);

    assert!(matches!(
        result,
        Err(ConfigError::ZeroStartObjective { .. })
    ));
}

#[test]
fn inconsistent_removal_bounds_fail_fast() {
    let mut params = small_search_params();
    params.remove_lower_bound = 3;
    params.remove_upper_bound = 3;
    // Eight requests at epsilon 0.1 cap the upper bound below the floor.
    params.epsilon = 0.1;

    let instance = clustered_instance(3, params);
    let initial = assigned_solution(&instance);

    let mut rng = SmallRng::seed_from_u64(1);
    let result = Alns::new(&instance).run(&initial, &AlnsOptions::refinement(10), &mut rng);

    assert!(matches!(
        result,
        Err(ConfigError::RemovalBounds { lower: 3, .. })
    ));
}
