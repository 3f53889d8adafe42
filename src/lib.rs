//! Job shop scheduling by metaheuristic search.
//!
//! Solutions use the operation-based encoding: a permutation with
//! repetition of job ids where the k-th occurrence of job `j` stands for
//! the k-th operation of `j`. A greedy decoder turns any such sequence
//! into a feasible semi-active schedule, and two searches look for short
//! makespans over that space.
//!
//! # Modules
//!
//! - **`models`**: Problem and result types: `Instance`, `Operation`,
//!   `Schedule`, `ScheduledOperation`
//! - **`encoding`**: `Solution`, the decoder, and the neighbourhood
//!   operators (adjacent swap, k-fold mutation)
//! - **`search`**: Simulated annealing and the (μ+λ) evolution strategy
//! - **`parser`**: OR-Library instance files
//! - **`validation`**: Structural checks on instances
//! - **`kpi`**: Makespan, lower-bound gap, and machine utilization
//!
//! # Example
//!
//! ```
//! use u_jobshop::models::Instance;
//! use u_jobshop::search::{AnnealingConfig, SimulatedAnnealing};
//!
//! let instance = Instance::from_pairs(
//!     2,
//!     vec![vec![(0, 3), (1, 2)], vec![(1, 4), (0, 1)]],
//! );
//! let config = AnnealingConfig::default().with_seed(7);
//! let result = SimulatedAnnealing::new(config).run(&instance).unwrap();
//!
//! assert!(result.best_makespan >= instance.lower_bound());
//! assert!(result.best_solution.is_valid_for(&instance));
//! ```
//!
//! # References
//!
//! - Bierwirth (1995), "A generalized permutation approach to job shop
//!   scheduling with genetic algorithms"
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Beyer & Schwefel (2002), "Evolution strategies: A comprehensive introduction"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod encoding;
pub mod error;
pub mod kpi;
pub mod models;
pub mod parser;
pub mod search;
pub mod validation;
