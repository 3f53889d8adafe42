//! (μ+λ) Evolution Strategy with self-adaptive mutation strength.
//!
//! # Algorithm
//!
//! 1. Create `mu` random parents and evaluate them.
//! 2. Each generation, create `lambda` offspring: pick a parent uniformly
//!    at random and apply `max(1, floor(strength))` adjacent swaps.
//! 3. Evaluate the offspring (optionally on the rayon thread pool).
//! 4. Adapt `strength` with Rechenberg's 1/5 success rule.
//! 5. Keep the best `mu` of parents ∪ offspring ("plus" selection).
//!
//! All randomness is drawn on the calling thread from a single generator
//! before the parallel evaluation starts, so seeded runs are identical
//! with or without parallelism.
//!
//! # Reference
//! - Rechenberg (1973), "Evolutionsstrategie"
//! - Beyer & Schwefel (2002), "Evolution strategies: A comprehensive introduction"

use std::time::{Duration, Instant};

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::history::{HistoryRecord, SearchHistory};
use super::seeded_rng;
use crate::encoding::{compute_makespan, mutate, Solution};
use crate::error::SearchError;
use crate::models::Instance;

/// Evolution Strategy parameters.
///
/// # Example
/// ```
/// use u_jobshop::search::EvolutionConfig;
///
/// let config = EvolutionConfig::default()
///     .with_population(20, 60)
///     .with_generations(200)
///     .with_seed(42)
///     .with_parallel(false);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Number of parents kept each generation (μ).
    pub mu: usize,
    /// Number of offspring per generation (λ).
    pub lambda: usize,
    /// Number of generations.
    pub generations: usize,
    /// Starting mutation strength (swaps per mutation).
    pub initial_strength: f64,
    /// Factor applied when more than 1/5 of offspring improve.
    pub strength_increase: f64,
    /// Factor applied when fewer than 1/5 of offspring improve.
    pub strength_decrease: f64,
    /// Upper clamp for the strength. The lower clamp is 1 swap.
    pub max_strength: f64,
    /// Evaluate offspring on the rayon thread pool.
    pub parallel: bool,
    /// Seed for the random source. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Wall-clock budget, checked between generations.
    pub time_limit: Option<Duration>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            mu: 10,
            lambda: 30,
            generations: 500,
            initial_strength: 5.0,
            strength_increase: 1.2,
            strength_decrease: 0.85,
            max_strength: 20.0,
            parallel: true,
            seed: None,
            time_limit: None,
        }
    }
}

impl EvolutionConfig {
    /// Sets μ and λ.
    pub fn with_population(mut self, mu: usize, lambda: usize) -> Self {
        self.mu = mu;
        self.lambda = lambda;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Sets the starting mutation strength.
    pub fn with_initial_strength(mut self, strength: f64) -> Self {
        self.initial_strength = strength;
        self
    }

    /// Sets the 1/5-rule factors.
    pub fn with_adaptation(mut self, increase: f64, decrease: f64) -> Self {
        self.strength_increase = increase;
        self.strength_decrease = decrease;
        self
    }

    /// Sets the strength upper clamp.
    pub fn with_max_strength(mut self, max_strength: f64) -> Self {
        self.max_strength = max_strength;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets a wall-clock budget.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Checks parameter ranges.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.mu == 0 {
            return Err(SearchError::invalid("mu", "must be at least 1"));
        }
        if !(self.max_strength.is_finite() && self.max_strength >= 1.0) {
            return Err(SearchError::invalid(
                "max_strength",
                format!("must be finite and >= 1, got {}", self.max_strength),
            ));
        }
        if !(self.initial_strength >= 1.0 && self.initial_strength <= self.max_strength) {
            return Err(SearchError::invalid(
                "initial_strength",
                format!(
                    "must be in [1, {}], got {}",
                    self.max_strength, self.initial_strength
                ),
            ));
        }
        if !(self.strength_increase.is_finite() && self.strength_increase > 1.0) {
            return Err(SearchError::invalid(
                "strength_increase",
                format!("must be finite and > 1, got {}", self.strength_increase),
            ));
        }
        if !(self.strength_decrease > 0.0 && self.strength_decrease < 1.0) {
            return Err(SearchError::invalid(
                "strength_decrease",
                format!("must be in (0, 1), got {}", self.strength_decrease),
            ));
        }
        Ok(())
    }
}

/// An evaluated member of the population.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Individual {
    /// Encoded solution.
    pub solution: Solution,
    /// Its makespan.
    pub makespan: u64,
}

impl Individual {
    /// Evaluates a solution.
    pub fn evaluate(solution: Solution, instance: &Instance) -> Self {
        let makespan = compute_makespan(&solution, instance);
        Self { solution, makespan }
    }
}

/// State of the parent pool after one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Generation index (0 = initial population).
    pub generation: usize,
    /// Best makespan in the parent pool.
    pub best_makespan: u64,
    /// Mean makespan of the parent pool.
    pub mean_makespan: f64,
    /// Mutation strength after adaptation.
    pub strength: f64,
    /// Offspring that beat their parent.
    pub successes: usize,
}

impl HistoryRecord for GenerationRecord {
    fn marker(&self) -> usize {
        self.generation
    }

    fn best_makespan(&self) -> u64 {
        self.best_makespan
    }
}

/// Outcome of an Evolution Strategy run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionResult {
    /// Best solution found.
    pub best_solution: Solution,
    /// Its makespan.
    pub best_makespan: u64,
    /// One record per generation, preceded by the initial population.
    pub history: SearchHistory<GenerationRecord>,
    /// Final parent pool, sorted by makespan.
    pub population: Vec<Individual>,
    /// Mutation strength at the end of the run.
    pub final_strength: f64,
}

/// (μ+λ) Evolution Strategy.
///
/// # Example
/// ```
/// use u_jobshop::models::Instance;
/// use u_jobshop::search::{EvolutionConfig, EvolutionStrategy};
///
/// let instance = Instance::from_pairs(2, vec![
///     vec![(0, 3), (1, 2)],
///     vec![(1, 4), (0, 1)],
/// ]);
/// let config = EvolutionConfig::default()
///     .with_population(4, 8)
///     .with_generations(10)
///     .with_initial_strength(1.0)
///     .with_seed(42);
/// let result = EvolutionStrategy::new(config).run(&instance).unwrap();
/// assert_eq!(result.population.len(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct EvolutionStrategy {
    config: EvolutionConfig,
}

impl EvolutionStrategy {
    /// Creates a search with the given parameters.
    pub fn new(config: EvolutionConfig) -> Self {
        Self { config }
    }

    /// The search parameters.
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Runs the search, seeded from `config.seed`.
    pub fn run(&self, instance: &Instance) -> Result<EvolutionResult, SearchError> {
        let mut rng = seeded_rng(self.config.seed);
        self.run_with_rng(instance, &mut rng)
    }

    /// Runs the search drawing all randomness from `rng`.
    pub fn run_with_rng<R: Rng>(
        &self,
        instance: &Instance,
        rng: &mut R,
    ) -> Result<EvolutionResult, SearchError> {
        self.config.validate()?;
        let config = &self.config;
        let started = Instant::now();

        let initial: Vec<Solution> = (0..config.mu)
            .map(|_| Solution::random_for(instance, rng))
            .collect();
        let mut population = self.evaluate(initial, instance);
        population.sort_by_key(|ind| ind.makespan);

        let mut best = population[0].clone();
        let mut strength = config.initial_strength;

        info!(
            jobs = instance.num_jobs,
            machines = instance.num_machines,
            mu = config.mu,
            lambda = config.lambda,
            generations = config.generations,
            initial_makespan = best.makespan,
            "Evolution strategy started"
        );

        let mut history = SearchHistory::new();
        history.push(GenerationRecord {
            generation: 0,
            best_makespan: population[0].makespan,
            mean_makespan: mean_makespan(&population),
            strength,
            successes: 0,
        });

        for generation in 1..=config.generations {
            if let Some(limit) = config.time_limit {
                if started.elapsed() >= limit {
                    info!(generation, "Stopping evolution as time limit has passed");
                    break;
                }
            }

            let swaps = (strength.floor() as usize).max(1);
            let mut parents = Vec::with_capacity(config.lambda);
            let mut children = Vec::with_capacity(config.lambda);
            for _ in 0..config.lambda {
                let parent = rng.random_range(0..population.len());
                children.push(mutate(&population[parent].solution, swaps, rng));
                parents.push(parent);
            }

            let offspring = self.evaluate(children, instance);
            let successes = offspring
                .iter()
                .zip(&parents)
                .filter(|&(child, &parent)| child.makespan < population[parent].makespan)
                .count();

            strength = self.adapt_strength(strength, successes);

            population.extend(offspring);
            // Stable: parents stay ahead of equally good offspring
            population.sort_by_key(|ind| ind.makespan);
            population.truncate(config.mu);

            if population[0].makespan < best.makespan {
                best = population[0].clone();
            }

            history.push(GenerationRecord {
                generation,
                best_makespan: population[0].makespan,
                mean_makespan: mean_makespan(&population),
                strength,
                successes,
            });
            debug!(
                generation,
                best = population[0].makespan,
                successes,
                strength,
                "Generation finished"
            );
        }

        info!(
            best_makespan = best.makespan,
            final_strength = strength,
            elapsed = ?started.elapsed(),
            "Evolution strategy finished"
        );

        Ok(EvolutionResult {
            best_solution: best.solution,
            best_makespan: best.makespan,
            history,
            population,
            final_strength: strength,
        })
    }

    /// Rechenberg's 1/5 success rule, clamped to `[1, max_strength]`.
    ///
    /// With no offspring the success rate is undefined and the strength
    /// is left as is.
    fn adapt_strength(&self, strength: f64, successes: usize) -> f64 {
        let config = &self.config;
        if config.lambda == 0 {
            return strength;
        }
        // successes / lambda compared with 1/5, in integers
        let adapted = match (5 * successes).cmp(&config.lambda) {
            std::cmp::Ordering::Greater => strength * config.strength_increase,
            std::cmp::Ordering::Less => strength * config.strength_decrease,
            std::cmp::Ordering::Equal => strength,
        };
        adapted.clamp(1.0, config.max_strength)
    }

    fn evaluate(&self, solutions: Vec<Solution>, instance: &Instance) -> Vec<Individual> {
        if self.config.parallel {
            solutions
                .into_par_iter()
                .map(|s| Individual::evaluate(s, instance))
                .collect()
        } else {
            solutions
                .into_iter()
                .map(|s| Individual::evaluate(s, instance))
                .collect()
        }
    }
}

fn mean_makespan(population: &[Individual]) -> f64 {
    if population.is_empty() {
        return 0.0;
    }
    population.iter().map(|ind| ind.makespan as f64).sum::<f64>() / population.len() as f64
}
