//! Job shop instance model.
//!
//! An instance is a set of jobs, each an ordered list of operations.
//! Every operation is bound to exactly one machine with a fixed
//! processing time. In the classic JSSP every job visits every machine
//! exactly once, so the number of operations per job equals the number
//! of machines.
//!
//! # Time Representation
//! Durations are dimensionless non-negative integers (the OR-Library
//! benchmarks use abstract time units).
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 7

use serde::{Deserialize, Serialize};

/// A single operation: one processing step of a job on one machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operation {
    /// Machine that processes this operation (`0..num_machines`).
    pub machine: usize,
    /// Processing time.
    pub duration: u64,
}

impl Operation {
    /// Creates a new operation.
    pub fn new(machine: usize, duration: u64) -> Self {
        Self { machine, duration }
    }
}

impl From<(usize, u64)> for Operation {
    fn from((machine, duration): (usize, u64)) -> Self {
        Self { machine, duration }
    }
}

/// A job shop scheduling problem instance.
///
/// `jobs[j][k]` is the k-th operation of job `j`. The core search
/// algorithms assume the instance is structurally consistent; use
/// [`crate::validation::validate_instance`] to check instances that
/// come from untrusted sources.
///
/// # Example
/// ```
/// use u_jobshop::models::Instance;
///
/// let instance = Instance::from_pairs(2, vec![
///     vec![(0, 3), (1, 2)],
///     vec![(1, 4), (0, 1)],
/// ]);
/// assert_eq!(instance.num_jobs, 2);
/// assert_eq!(instance.operation_count(), 4);
/// assert_eq!(instance.lower_bound(), 6);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Number of jobs.
    pub num_jobs: usize,
    /// Number of machines (= operations per job).
    pub num_machines: usize,
    /// Operation sequence of each job, indexed by job id.
    pub jobs: Vec<Vec<Operation>>,
}

impl Instance {
    /// Creates an instance from its job operation lists.
    ///
    /// `num_jobs` is taken from `jobs.len()`.
    pub fn new(num_machines: usize, jobs: Vec<Vec<Operation>>) -> Self {
        Self {
            num_jobs: jobs.len(),
            num_machines,
            jobs,
        }
    }

    /// Creates an instance from `(machine, duration)` pairs.
    pub fn from_pairs(num_machines: usize, jobs: Vec<Vec<(usize, u64)>>) -> Self {
        let jobs = jobs
            .into_iter()
            .map(|ops| ops.into_iter().map(Operation::from).collect())
            .collect();
        Self::new(num_machines, jobs)
    }

    /// Total number of operations (= length of an encoded solution).
    #[inline]
    pub fn operation_count(&self) -> usize {
        self.num_jobs * self.num_machines
    }

    /// Returns the k-th operation of job `job`, if it exists.
    pub fn operation(&self, job: usize, op_index: usize) -> Option<&Operation> {
        self.jobs.get(job).and_then(|ops| ops.get(op_index))
    }

    /// Sum of processing times of a job's operations.
    ///
    /// Saturates at `u64::MAX`; validated instances never get there.
    pub fn job_load(&self, job: usize) -> u64 {
        self.jobs
            .get(job)
            .map(|ops| ops.iter().fold(0u64, |acc, op| acc.saturating_add(op.duration)))
            .unwrap_or(0)
    }

    /// Sum of processing times of all operations assigned to a machine.
    pub fn machine_load(&self, machine: usize) -> u64 {
        self.jobs
            .iter()
            .flatten()
            .filter(|op| op.machine == machine)
            .fold(0u64, |acc, op| acc.saturating_add(op.duration))
    }

    /// Trivial makespan lower bound.
    ///
    /// The larger of the longest job (sum of its durations) and the most
    /// loaded machine. No feasible schedule can finish earlier.
    pub fn lower_bound(&self) -> u64 {
        let job_bound = (0..self.num_jobs)
            .map(|j| self.job_load(j))
            .max()
            .unwrap_or(0);

        let mut machine_loads = vec![0u64; self.num_machines];
        for op in self.jobs.iter().flatten() {
            if let Some(load) = machine_loads.get_mut(op.machine) {
                *load = load.saturating_add(op.duration);
            }
        }
        let machine_bound = machine_loads.into_iter().max().unwrap_or(0);

        job_bound.max(machine_bound)
    }

    /// Whether the instance has no operations at all.
    pub fn is_empty(&self) -> bool {
        self.operation_count() == 0
    }
}
