use u_jobshop::encoding::{compute_makespan, decode, Solution};
use u_jobshop::kpi::ScheduleKpi;
use u_jobshop::models::Instance;
use u_jobshop::parser::{find_instance, parse_instances};
use u_jobshop::search::{
    AnnealingConfig, EvolutionConfig, EvolutionStrategy, SimulatedAnnealing,
};

const FT06: &str = "\
 +++++++++++++++++++++++++++++
 instance ft06
 +++++++++++++++++++++++++++++
 Fisher and Thompson 6x6 instance, alternate name (mt06)
 +++++++++++++++++++++++++++++
 6 6
 2  1  0  3  1  6  3  7  5  3  4  6
 1  8  2  5  4 10  5 10  0 10  3  4
 2  5  3  4  5  8  0  9  1  1  4  7
 1  5  0  5  2  5  3  3  4  8  5  9
 2  9  1  3  4  5  5  4  0  3  3  1
 1  3  3  3  5  9  0 10  4  4  2  1
 +++++++++++++++++++++++++++++
";

/// Best known makespan of ft06.
const FT06_OPTIMUM: u64 = 55;

fn ft06() -> Instance {
    let instances = parse_instances(FT06).unwrap();
    find_instance(&instances, "ft06").unwrap().clone()
}

#[test]
fn annealing_end_to_end() {
    let inst = ft06();
    let config = AnnealingConfig::default()
        .with_temperatures(50.0, 1.0)
        .with_alpha(0.95)
        .with_max_iter(200)
        .with_seed(42);
    let result = SimulatedAnnealing::new(config).run(&inst).unwrap();

    assert!(result.best_solution.is_valid_for(&inst));
    assert!(result.best_makespan >= FT06_OPTIMUM);
    assert_eq!(
        compute_makespan(&result.best_solution, &inst),
        result.best_makespan
    );

    let decoded = decode(&result.best_solution, &inst).unwrap();
    assert!(decoded.schedule.is_feasible());
    assert_eq!(decoded.schedule.len(), 36);

    let initial = result.history.records()[0].best_makespan;
    assert!(result.best_makespan <= initial);
    assert!(result.history.is_monotone());
}

#[test]
fn evolution_end_to_end() {
    let inst = ft06();
    let config = EvolutionConfig::default()
        .with_population(5, 15)
        .with_generations(40)
        .with_seed(7);
    let result = EvolutionStrategy::new(config).run(&inst).unwrap();

    assert!(result.best_solution.is_valid_for(&inst));
    assert!(result.best_makespan >= FT06_OPTIMUM);
    assert_eq!(result.population.len(), 5);
    assert_eq!(result.population[0].makespan, result.best_makespan);
    assert_eq!(result.history.len(), 41);
    assert!(result.history.is_monotone());
}

#[test]
fn seeded_runs_are_reproducible() {
    let inst = ft06();

    let sa = SimulatedAnnealing::new(AnnealingConfig::default().with_max_iter(50).with_seed(3));
    let a = sa.run(&inst).unwrap();
    let b = sa.run(&inst).unwrap();
    assert_eq!(a, b);

    let es = EvolutionStrategy::new(
        EvolutionConfig::default()
            .with_population(4, 12)
            .with_generations(20)
            .with_seed(3),
    );
    let a = es.run(&inst).unwrap();
    let b = es.run(&inst).unwrap();
    assert_eq!(a.best_solution, b.best_solution);
    assert_eq!(a.history, b.history);
}

#[test]
fn parallel_evaluation_does_not_change_results() {
    let inst = ft06();
    let base = EvolutionConfig::default()
        .with_population(4, 16)
        .with_generations(25)
        .with_seed(11);

    let par = EvolutionStrategy::new(base.clone().with_parallel(true))
        .run(&inst)
        .unwrap();
    let seq = EvolutionStrategy::new(base.with_parallel(false))
        .run(&inst)
        .unwrap();
    assert_eq!(par, seq);
}

#[test]
fn search_improves_on_random_solutions() {
    let inst = ft06();
    let config = EvolutionConfig::default()
        .with_population(10, 30)
        .with_generations(150)
        .with_seed(2024);
    let result = EvolutionStrategy::new(config).run(&inst).unwrap();

    // the best of the initial population is an upper bound on the result
    let initial_best = result.history.records()[0].best_makespan;
    assert!(result.best_makespan <= initial_best);

    let kpi = ScheduleKpi::calculate(&decode(&result.best_solution, &inst).unwrap().schedule, &inst);
    assert_eq!(kpi.makespan, result.best_makespan);
    assert!(kpi.gap >= 0.0);
}

#[test]
fn results_export_as_json() {
    let inst = ft06();
    let result = SimulatedAnnealing::new(AnnealingConfig::default().with_max_iter(20).with_seed(1))
        .run(&inst)
        .unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["best_makespan"], result.best_makespan);
    assert_eq!(
        json["best_solution"].as_array().map(Vec::len),
        Some(inst.operation_count())
    );
    assert_eq!(
        json["history"].as_array().map(Vec::len),
        Some(result.history.len())
    );

    let decoded = decode(&result.best_solution, &inst).unwrap();
    let text = serde_json::to_string(&decoded.schedule).unwrap();
    let back: u_jobshop::models::Schedule = serde_json::from_str(&text).unwrap();
    assert_eq!(back, decoded.schedule);

    let solution: Solution = serde_json::from_value(json["best_solution"].clone()).unwrap();
    assert_eq!(solution, result.best_solution);
}
