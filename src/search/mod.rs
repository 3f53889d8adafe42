//! Metaheuristic search over the operation-based encoding.
//!
//! Both searches score candidates only through
//! [`compute_makespan`](crate::encoding::compute_makespan) and perturb
//! them only through the neighbourhood operators, so they work for any
//! valid instance without further knowledge of the problem.
//!
//! - [`SimulatedAnnealing`]: single-solution trajectory search
//! - [`EvolutionStrategy`]: (μ+λ) population search with 1/5-rule
//!   strength adaptation
//!
//! Every run returns its best solution, its makespan and a
//! [`SearchHistory`] for convergence plots. A single seeded generator
//! drives all randomness of a run, so equal seeds give equal results.
//!
//! Logging levels:
//! - **INFO**: search start/end with problem size and best makespan
//! - **DEBUG**: one line per temperature step or generation
//! - **TRACE**: time-limit checks

mod annealing;
mod evolution;
mod history;

pub use annealing::{AnnealingConfig, AnnealingRecord, AnnealingResult, SimulatedAnnealing};
pub use evolution::{
    EvolutionConfig, EvolutionResult, EvolutionStrategy, GenerationRecord, Individual,
};
pub use history::{HistoryRecord, SearchHistory};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Builds the generator for a run: seeded if a seed is given, from OS
/// entropy otherwise.
pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}
