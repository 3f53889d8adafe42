//! Operation-based (permutation with repetition) solution encoding.
//!
//! # Encoding
//!
//! A solution is a sequence of job ids of length `num_jobs * num_machines`
//! in which every job id occurs exactly `num_machines` times. The k-th
//! occurrence of job `j` stands for the k-th operation of `j`. The sequence
//! is a priority list for the greedy decoder, not a machine assignment, so
//! every such sequence decodes to a feasible schedule.
//!
//! # Reference
//! Bierwirth (1995), "A generalized permutation approach to JSSP"

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::models::Instance;

/// An encoded job shop solution.
///
/// Immutable once built: search operators return new solutions.
///
/// Serializes as a plain JSON array of job ids. Deserializing does not
/// know the instance and therefore does not validate; call
/// [`Solution::check`] on the result, or pass it through [`decode`], which
/// checks first.
///
/// [`decode`]: crate::encoding::decode
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Solution {
    sequence: Vec<usize>,
}

impl Solution {
    /// Builds a solution from a job id sequence, checking it against the
    /// instance.
    pub fn new(sequence: Vec<usize>, instance: &Instance) -> Result<Self, DecodeError> {
        check_sequence(&sequence, instance.num_jobs, instance.num_machines)?;
        Ok(Self { sequence })
    }

    /// Creates a uniformly random solution.
    ///
    /// Each job id is repeated `num_machines` times and the list is
    /// shuffled.
    pub fn random<R: Rng>(num_jobs: usize, num_machines: usize, rng: &mut R) -> Self {
        let mut sequence: Vec<usize> = (0..num_jobs)
            .flat_map(|job| std::iter::repeat(job).take(num_machines))
            .collect();
        sequence.shuffle(rng);
        Self { sequence }
    }

    /// Creates a random solution sized for an instance.
    pub fn random_for<R: Rng>(instance: &Instance, rng: &mut R) -> Self {
        Self::random(instance.num_jobs, instance.num_machines, rng)
    }

    /// Wraps a sequence produced by an invariant-preserving operator.
    pub(crate) fn from_sequence(sequence: Vec<usize>) -> Self {
        Self { sequence }
    }

    /// The job id sequence.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.sequence
    }

    /// Consumes the solution, returning the job id sequence.
    pub fn into_inner(self) -> Vec<usize> {
        self.sequence
    }

    /// Number of positions (= number of operations).
    #[inline]
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Whether the solution has no positions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Whether this solution is a valid encoding for the instance.
    pub fn is_valid_for(&self, instance: &Instance) -> bool {
        self.check(instance).is_ok()
    }

    /// Like [`Solution::is_valid_for`], reporting what is wrong.
    pub fn check(&self, instance: &Instance) -> Result<(), DecodeError> {
        check_sequence(&self.sequence, instance.num_jobs, instance.num_machines)
    }

    /// The `(job, op_index)` pairs designated by each position.
    pub fn operation_order(&self) -> Vec<(usize, usize)> {
        let num_jobs = self.sequence.iter().max().map_or(0, |&j| j + 1);
        let mut counters = vec![0usize; num_jobs];
        self.sequence
            .iter()
            .map(|&job| {
                let k = counters[job];
                counters[job] += 1;
                (job, k)
            })
            .collect()
    }
}

impl AsRef<[usize]> for Solution {
    fn as_ref(&self) -> &[usize] {
        &self.sequence
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, job) in self.sequence.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{job}")?;
        }
        write!(f, "]")
    }
}

fn check_sequence(
    sequence: &[usize],
    num_jobs: usize,
    num_machines: usize,
) -> Result<(), DecodeError> {
    let expected_len = num_jobs * num_machines;
    if sequence.len() != expected_len {
        return Err(DecodeError::malformed(format!(
            "length {} does not match {num_jobs} jobs x {num_machines} machines = {expected_len}",
            sequence.len()
        )));
    }

    let mut counts = vec![0usize; num_jobs];
    for (pos, &job) in sequence.iter().enumerate() {
        match counts.get_mut(job) {
            Some(count) => *count += 1,
            None => {
                return Err(DecodeError::malformed(format!(
                    "job id {job} at position {pos} is out of range 0..{num_jobs}"
                )))
            }
        }
    }

    if let Some((job, &count)) = counts.iter().enumerate().find(|&(_, &c)| c != num_machines) {
        return Err(DecodeError::malformed(format!(
            "job {job} occurs {count} times, expected {num_machines}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sample_instance() -> Instance {
        Instance::from_pairs(2, vec![vec![(0, 3), (1, 2)], vec![(1, 4), (0, 1)]])
    }

    fn occurrences(solution: &Solution, num_jobs: usize) -> Vec<usize> {
        let mut counts = vec![0; num_jobs];
        for &job in solution.as_slice() {
            counts[job] += 1;
        }
        counts
    }

    #[test]
    fn test_random_solution_invariant() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..50 {
            let sol = Solution::random(6, 4, &mut rng);
            assert_eq!(sol.len(), 24);
            assert_eq!(occurrences(&sol, 6), vec![4; 6]);
        }
    }

    #[test]
    fn test_random_for_instance() {
        let inst = sample_instance();
        let mut rng = SmallRng::seed_from_u64(42);
        let sol = Solution::random_for(&inst, &mut rng);
        assert!(sol.is_valid_for(&inst));
    }

    #[test]
    fn test_new_accepts_valid_sequence() {
        let inst = sample_instance();
        let sol = Solution::new(vec![0, 1, 0, 1], &inst).unwrap();
        assert_eq!(sol.as_slice(), &[0, 1, 0, 1]);
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        let inst = sample_instance();
        let err = Solution::new(vec![0, 1, 0], &inst).unwrap_err();
        assert!(err.to_string().contains("length 3"));
    }

    #[test]
    fn test_new_rejects_unknown_job() {
        let inst = sample_instance();
        let err = Solution::new(vec![0, 1, 2, 1], &inst).unwrap_err();
        assert!(err.to_string().contains("job id 2"));
    }

    #[test]
    fn test_new_rejects_wrong_counts() {
        let inst = sample_instance();
        let err = Solution::new(vec![0, 0, 0, 1], &inst).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedSolution { .. }));
        assert!(err.to_string().contains("job 0 occurs 3 times"));
    }

    #[test]
    fn test_operation_order() {
        let sol = Solution::from_sequence(vec![1, 0, 1, 2, 0, 2]);
        assert_eq!(
            sol.operation_order(),
            vec![(1, 0), (0, 0), (1, 1), (2, 0), (0, 1), (2, 1)]
        );
    }

    #[test]
    fn test_display() {
        let sol = Solution::from_sequence(vec![0, 1, 0, 1]);
        assert_eq!(sol.to_string(), "[0, 1, 0, 1]");
        assert_eq!(Solution::from_sequence(Vec::new()).to_string(), "[]");
    }

    #[test]
    fn test_empty_solution() {
        let inst = Instance::new(0, Vec::new());
        let mut rng = SmallRng::seed_from_u64(1);
        let sol = Solution::random_for(&inst, &mut rng);
        assert!(sol.is_empty());
        assert!(sol.is_valid_for(&inst));
    }

    #[test]
    fn test_deserialized_solution_needs_check() {
        let inst = sample_instance();

        let short: Solution = serde_json::from_str("[0]").unwrap();
        assert!(!short.is_valid_for(&inst));
        assert!(crate::encoding::decode(&short, &inst).is_err());

        let full: Solution = serde_json::from_str("[1, 0, 0, 1]").unwrap();
        assert!(full.check(&inst).is_ok());
    }
}
