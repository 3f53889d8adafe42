//! Neighbourhood and mutation operators on encoded solutions.
//!
//! Both operators return a new [`Solution`] and leave their input
//! untouched. They only ever exchange two positions of the sequence, so
//! the permutation-with-repetition invariant holds by construction.
//!
//! # Reference
//! van Laarhoven, Aarts & Lenstra (1992), "Job Shop Scheduling by
//! Simulated Annealing"

use rand::Rng;

use super::Solution;

/// Adjacent swap of two differing jobs.
///
/// Picks uniformly random adjacent pairs `(i, i + 1)` until the two
/// positions hold different job ids, then swaps them. Swapping equal ids
/// would leave the decoded schedule unchanged, so such pairs are skipped.
///
/// If no adjacent pair differs (a single job, or fewer than two
/// positions) the input is returned unchanged.
pub fn neighbor<R: Rng>(solution: &Solution, rng: &mut R) -> Solution {
    match neighbor_move(solution, rng) {
        Some(i) => {
            let mut sequence = solution.as_slice().to_vec();
            sequence.swap(i, i + 1);
            Solution::from_sequence(sequence)
        }
        None => solution.clone(),
    }
}

/// Chooses the left index of the adjacent pair [`neighbor`] would swap.
///
/// Returns `None` when no adjacent pair holds different job ids.
pub fn neighbor_move<R: Rng>(solution: &Solution, rng: &mut R) -> Option<usize> {
    let seq = solution.as_slice();
    if !seq.windows(2).any(|w| w[0] != w[1]) {
        return None;
    }
    loop {
        let i = rng.random_range(0..seq.len() - 1);
        if seq[i] != seq[i + 1] {
            return Some(i);
        }
    }
}

/// Applies [`neighbor`] `strength` times in sequence.
///
/// A larger strength moves further away from the input. `strength == 0`
/// returns an unchanged copy.
pub fn mutate<R: Rng>(solution: &Solution, strength: usize, rng: &mut R) -> Solution {
    let mut sequence = solution.as_slice().to_vec();
    for _ in 0..strength {
        let current = Solution::from_sequence(sequence);
        match neighbor_move(&current, rng) {
            Some(i) => {
                sequence = current.into_inner();
                sequence.swap(i, i + 1);
            }
            None => return current,
        }
    }
    Solution::from_sequence(sequence)
}
