//! Solution encoding for job shop search.
//!
//! Uses the operation-based representation (permutation with repetition
//! of job ids) decoded by a greedy left-to-right scheduler.
//!
//! # Submodules
//!
//! - [`Solution`]: the encoded solution and its invariant checks
//! - [`decode`] / [`compute_makespan`]: the greedy decoder
//! - [`neighbor`] / [`mutate`]: invariant-preserving perturbations
//!
//! # Reference
//! - Bierwirth (1995), "A generalized permutation approach to JSSP"
//! - Cheng et al. (1996), "A Tutorial Survey of JSSP using GA"

mod decode;
mod operators;
mod solution;

pub use decode::{compute_makespan, decode, DecodedSchedule};
pub use operators::{mutate, neighbor, neighbor_move};
pub use solution::Solution;
