//! Schedule (decoded solution) model.
//!
//! A schedule is the timed result of decoding an encoded solution: every
//! operation of every job placed on its machine with a start and an end
//! time. Entries are kept in the order the decoder placed them, which is
//! not necessarily start-time order.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};

/// A complete job shop schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Operations in scheduling order.
    pub operations: Vec<ScheduledOperation>,
}

/// An operation placed on its machine in time.
///
/// Occupies the half-open interval `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduledOperation {
    /// Job id.
    pub job: usize,
    /// Position of the operation within its job (0-indexed).
    pub op_index: usize,
    /// Machine id.
    pub machine: usize,
    /// Start time.
    pub start: u64,
    /// End time.
    pub end: u64,
}

impl ScheduledOperation {
    /// Creates a new scheduled operation.
    pub fn new(job: usize, op_index: usize, machine: usize, start: u64, end: u64) -> Self {
        Self {
            job,
            op_index,
            machine,
            start,
            end,
        }
    }

    /// Processing time (end - start), 0 if `end < start`.
    #[inline]
    pub fn duration(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Whether two operations overlap in time.
    #[inline]
    pub fn overlaps(&self, other: &ScheduledOperation) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty schedule with room for `capacity` operations.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            operations: Vec::with_capacity(capacity),
        }
    }

    /// Appends a scheduled operation.
    pub fn push(&mut self, operation: ScheduledOperation) {
        self.operations.push(operation);
    }

    /// Makespan: latest end time across all operations.
    pub fn makespan(&self) -> u64 {
        self.operations.iter().map(|op| op.end).max().unwrap_or(0)
    }

    /// Number of scheduled operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Whether the schedule is empty.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Operations of a job, ordered by operation index.
    pub fn operations_for_job(&self, job: usize) -> Vec<&ScheduledOperation> {
        let mut ops: Vec<_> = self.operations.iter().filter(|op| op.job == job).collect();
        ops.sort_by_key(|op| op.op_index);
        ops
    }

    /// Operations processed on a machine, ordered by start time.
    ///
    /// This is the per-machine row of a Gantt chart.
    pub fn machine_timeline(&self, machine: usize) -> Vec<&ScheduledOperation> {
        let mut ops: Vec<_> = self
            .operations
            .iter()
            .filter(|op| op.machine == machine)
            .collect();
        ops.sort_by_key(|op| (op.start, op.end));
        ops
    }

    /// Completion time of a job (end of its latest operation).
    pub fn job_completion_time(&self, job: usize) -> Option<u64> {
        self.operations
            .iter()
            .filter(|op| op.job == job)
            .map(|op| op.end)
            .max()
    }

    /// Total processing time on a machine.
    pub fn machine_busy_time(&self, machine: usize) -> u64 {
        self.operations
            .iter()
            .filter(|op| op.machine == machine)
            .map(|op| op.duration())
            .sum()
    }

    /// Machine utilization: busy time / makespan.
    ///
    /// Returns `None` if the makespan is zero.
    pub fn machine_utilization(&self, machine: usize) -> Option<f64> {
        let horizon = self.makespan();
        if horizon == 0 {
            return None;
        }
        Some(self.machine_busy_time(machine) as f64 / horizon as f64)
    }

    /// Checks that every operation ends no earlier than it starts, that no
    /// two operations on the same machine overlap, and that every job's
    /// operations run in index order.
    pub fn is_feasible(&self) -> bool {
        if self.operations.iter().any(|op| op.end < op.start) {
            return false;
        }
        for (i, a) in self.operations.iter().enumerate() {
            for b in &self.operations[i + 1..] {
                if a.machine == b.machine && a.overlaps(b) {
                    return false;
                }
                if a.job == b.job {
                    let (first, second) = if a.op_index < b.op_index { (a, b) } else { (b, a) };
                    if second.start < first.end {
                        return false;
                    }
                }
            }
        }
        true
    }
}
