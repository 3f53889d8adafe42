//! Simulated Annealing over the operation-based encoding.
//!
//! # Algorithm
//!
//! 1. Start from a random (or caller-supplied) solution at `t_start`.
//! 2. At each temperature step, try `max_iter` adjacent-swap neighbours
//!    of the *current* solution. With `Δ = makespan(candidate) -
//!    makespan(current)`, accept if `Δ <= 0`, otherwise with probability
//!    `exp(-Δ / T)` (Metropolis criterion).
//! 3. Cool geometrically (`T ← alpha · T`) while `T > t_min`.
//!
//! The run always halts after `ceil(ln(t_min / t_start) / ln(alpha))`
//! temperature steps (or earlier if a time limit is set). With
//! `t_start <= 0` the search degenerates into greedy descent: a single
//! step in which every uphill move is rejected.
//!
//! # Reference
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - van Laarhoven, Aarts & Lenstra (1992), "Job Shop Scheduling by
//!   Simulated Annealing"

use std::time::{Duration, Instant};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::history::{HistoryRecord, SearchHistory};
use super::seeded_rng;
use crate::encoding::{compute_makespan, neighbor, Solution};
use crate::error::SearchError;
use crate::models::Instance;

/// Simulated Annealing parameters.
///
/// # Example
/// ```
/// use u_jobshop::search::AnnealingConfig;
///
/// let config = AnnealingConfig::default()
///     .with_temperatures(200.0, 0.01)
///     .with_alpha(0.997)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnealingConfig {
    /// Initial temperature. `<= 0` means greedy descent.
    pub t_start: f64,
    /// The search stops once the temperature is no longer above this.
    pub t_min: f64,
    /// Geometric cooling factor, in (0, 1).
    pub alpha: f64,
    /// Neighbour evaluations per temperature step.
    pub max_iter: usize,
    /// Seed for the random source. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Wall-clock budget, checked between temperature steps.
    pub time_limit: Option<Duration>,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            t_start: 100.0,
            t_min: 0.1,
            alpha: 0.995,
            max_iter: 1000,
            seed: None,
            time_limit: None,
        }
    }
}

impl AnnealingConfig {
    /// Sets the initial and minimum temperatures.
    pub fn with_temperatures(mut self, t_start: f64, t_min: f64) -> Self {
        self.t_start = t_start;
        self.t_min = t_min;
        self
    }

    /// Sets the cooling factor.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the number of neighbour evaluations per temperature step.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
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

    /// Whether this configuration runs as greedy descent.
    pub fn is_greedy(&self) -> bool {
        self.t_start <= 0.0
    }

    /// Checks parameter ranges.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.t_start.is_nan() || self.t_start.is_infinite() {
            return Err(SearchError::invalid("t_start", "must be finite"));
        }
        if self.is_greedy() {
            return Ok(());
        }
        if !(self.t_min.is_finite() && self.t_min > 0.0) {
            return Err(SearchError::invalid(
                "t_min",
                format!("must be finite and positive, got {}", self.t_min),
            ));
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(SearchError::invalid(
                "alpha",
                format!("must be in (0, 1), got {}", self.alpha),
            ));
        }
        Ok(())
    }

    /// Number of temperature steps a full run performs.
    ///
    /// Equals `ceil(ln(t_min / t_start) / ln(alpha))` for `t_start > t_min`,
    /// 0 for `0 < t_start <= t_min`, and 1 in greedy mode.
    pub fn temperature_steps(&self) -> usize {
        if self.is_greedy() {
            return 1;
        }
        let mut temperature = self.t_start;
        let mut steps = 0;
        while temperature > self.t_min {
            steps += 1;
            temperature *= self.alpha;
        }
        steps
    }
}

/// State at the end of one temperature step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnealingRecord {
    /// Temperature step (0 = initial solution).
    pub step: usize,
    /// Temperature the step ran at.
    pub temperature: f64,
    /// Makespan of the current solution.
    pub current_makespan: u64,
    /// Best makespan so far.
    pub best_makespan: u64,
    /// Neighbours evaluated so far.
    pub moves: u64,
    /// Uphill moves accepted so far.
    pub accepted_worse: u64,
}

impl HistoryRecord for AnnealingRecord {
    fn marker(&self) -> usize {
        self.step
    }

    fn best_makespan(&self) -> u64 {
        self.best_makespan
    }
}

/// Outcome of a Simulated Annealing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnealingResult {
    /// Best solution found.
    pub best_solution: Solution,
    /// Its makespan.
    pub best_makespan: u64,
    /// One record per temperature step, preceded by the initial state.
    pub history: SearchHistory<AnnealingRecord>,
    /// Total neighbours evaluated.
    pub total_moves: u64,
    /// Uphill moves accepted.
    pub accepted_worse: u64,
}

/// Simulated Annealing search.
///
/// # Example
/// ```
/// use u_jobshop::models::Instance;
/// use u_jobshop::search::{AnnealingConfig, SimulatedAnnealing};
///
/// let instance = Instance::from_pairs(2, vec![
///     vec![(0, 3), (1, 2)],
///     vec![(1, 4), (0, 1)],
/// ]);
/// let config = AnnealingConfig::default()
///     .with_temperatures(10.0, 1.0)
///     .with_alpha(0.9)
///     .with_max_iter(50)
///     .with_seed(42);
/// let result = SimulatedAnnealing::new(config).run(&instance).unwrap();
/// assert!(result.best_makespan >= instance.lower_bound());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimulatedAnnealing {
    config: AnnealingConfig,
}

impl SimulatedAnnealing {
    /// Creates a search with the given parameters.
    pub fn new(config: AnnealingConfig) -> Self {
        Self { config }
    }

    /// The search parameters.
    pub fn config(&self) -> &AnnealingConfig {
        &self.config
    }

    /// Runs from a random initial solution, seeded from `config.seed`.
    pub fn run(&self, instance: &Instance) -> Result<AnnealingResult, SearchError> {
        let mut rng = seeded_rng(self.config.seed);
        self.run_with_rng(instance, &mut rng)
    }

    /// Runs from a random initial solution drawn from `rng`.
    ///
    /// The same generator drives neighbour selection and acceptance.
    pub fn run_with_rng<R: Rng>(
        &self,
        instance: &Instance,
        rng: &mut R,
    ) -> Result<AnnealingResult, SearchError> {
        self.config.validate()?;
        let initial = Solution::random_for(instance, rng);
        Ok(self.anneal(instance, initial, rng))
    }

    /// Runs from a caller-supplied initial solution.
    pub fn run_from<R: Rng>(
        &self,
        instance: &Instance,
        initial: Solution,
        rng: &mut R,
    ) -> Result<AnnealingResult, SearchError> {
        self.config.validate()?;
        initial.check(instance)?;
        Ok(self.anneal(instance, initial, rng))
    }

    fn anneal<R: Rng>(&self, instance: &Instance, initial: Solution, rng: &mut R) -> AnnealingResult {
        let config = &self.config;
        let started = Instant::now();
        let greedy = config.is_greedy();

        let mut current = initial;
        let mut current_cost = compute_makespan(&current, instance);
        let mut best = current.clone();
        let mut best_cost = current_cost;
        let mut moves: u64 = 0;
        let mut accepted_worse: u64 = 0;

        info!(
            jobs = instance.num_jobs,
            machines = instance.num_machines,
            steps = config.temperature_steps(),
            initial_makespan = current_cost,
            greedy,
            "Simulated annealing started"
        );

        let mut history = SearchHistory::new();
        history.push(AnnealingRecord {
            step: 0,
            temperature: config.t_start.max(0.0),
            current_makespan: current_cost,
            best_makespan: best_cost,
            moves,
            accepted_worse,
        });

        let mut temperature = if greedy { 0.0 } else { config.t_start };
        let mut step = 0;

        loop {
            let more = if greedy { step == 0 } else { temperature > config.t_min };
            if !more {
                break;
            }
            if let Some(limit) = config.time_limit {
                trace!(elapsed = ?started.elapsed(), "Checking time limit");
                if started.elapsed() >= limit {
                    info!(step, "Stopping annealing as time limit has passed");
                    break;
                }
            }

            for _ in 0..config.max_iter {
                let candidate = neighbor(&current, rng);
                let candidate_cost = compute_makespan(&candidate, instance);
                let delta = candidate_cost as f64 - current_cost as f64;

                if accept(delta, temperature, rng) {
                    if delta > 0.0 {
                        accepted_worse += 1;
                    }
                    current = candidate;
                    current_cost = candidate_cost;
                }
                moves += 1;

                if current_cost < best_cost {
                    best = current.clone();
                    best_cost = current_cost;
                }
            }

            step += 1;
            history.push(AnnealingRecord {
                step,
                temperature,
                current_makespan: current_cost,
                best_makespan: best_cost,
                moves,
                accepted_worse,
            });
            debug!(
                step,
                temperature,
                current = current_cost,
                best = best_cost,
                "Temperature step finished"
            );

            temperature *= config.alpha;
        }

        info!(
            best_makespan = best_cost,
            moves,
            accepted_worse,
            elapsed = ?started.elapsed(),
            "Simulated annealing finished"
        );

        AnnealingResult {
            best_solution: best,
            best_makespan: best_cost,
            history,
            total_moves: moves,
            accepted_worse,
        }
    }
}

/// Metropolis acceptance.
///
/// Non-worsening moves are always taken; a worsening move is taken with
/// probability `exp(-delta / temperature)`, never at zero temperature.
fn accept<R: Rng>(delta: f64, temperature: f64, rng: &mut R) -> bool {
    if delta <= 0.0 {
        return true;
    }
    if temperature <= 0.0 {
        return false;
    }
    rng.random::<f64>() < (-delta / temperature).exp()
}
