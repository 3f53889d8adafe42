//! Greedy decoder: encoded solution → timed schedule.
//!
//! # Algorithm
//!
//! Single left-to-right pass over the sequence (discrete-event
//! simulation). For each position holding job `j`:
//!
//! 1. `k` = number of earlier occurrences of `j` (next operation index).
//! 2. `(machine, duration) = jobs[j][k]`.
//! 3. `start = max(job_ready[j], machine_ready[machine])`.
//! 4. `end = start + duration`; both ready times become `end`.
//!
//! Operations competing for a machine are ordered solely by their
//! position in the sequence. The result is a semi-active schedule.
//!
//! # Complexity
//! O(n · m) for n jobs and m machines.
//!
//! # Reference
//! Cheng et al. (1996), "A Tutorial Survey of JSSP using GA"

use serde::{Deserialize, Serialize};

use super::Solution;
use crate::error::DecodeError;
use crate::models::{Instance, Schedule, ScheduledOperation};

/// A decoded schedule together with its makespan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedSchedule {
    /// Operations in scheduling order.
    pub schedule: Schedule,
    /// Latest end time (0 for an empty schedule).
    pub makespan: u64,
}

/// Decodes a solution into a timed schedule.
///
/// The solution is checked against the instance first; a sequence that
/// is not a permutation with repetition of the job ids yields
/// [`DecodeError::MalformedSolution`] instead of a wrong makespan.
///
/// # Example
/// ```
/// use u_jobshop::encoding::{decode, Solution};
/// use u_jobshop::models::Instance;
///
/// let instance = Instance::from_pairs(2, vec![
///     vec![(0, 3), (1, 2)],
///     vec![(1, 4), (0, 1)],
/// ]);
/// let solution = Solution::new(vec![0, 1, 0, 1], &instance).unwrap();
/// let decoded = decode(&solution, &instance).unwrap();
/// assert_eq!(decoded.makespan, 6);
/// ```
pub fn decode(solution: &Solution, instance: &Instance) -> Result<DecodedSchedule, DecodeError> {
    solution.check(instance)?;

    let mut schedule = Schedule::with_capacity(solution.len());
    let makespan = simulate(solution.as_slice(), instance, |op| schedule.push(op));

    Ok(DecodedSchedule { schedule, makespan })
}

/// Computes the makespan of a solution without building the schedule.
///
/// Same algorithm as [`decode`], used in the search inner loops. The
/// solution is not checked in full: a length other than
/// `instance.operation_count()`, or an out-of-range job, machine or
/// operation index, panics rather than producing a wrong value.
///
/// Times cannot overflow for instances accepted by
/// [`validate_instance`](crate::validation::validate_instance), since no
/// end time exceeds the sum of all durations.
///
/// # Panics
/// If `solution` is not a valid encoding for `instance`.
pub fn compute_makespan(solution: &Solution, instance: &Instance) -> u64 {
    simulate(solution.as_slice(), instance, |_| {})
}

fn simulate<F>(sequence: &[usize], instance: &Instance, mut emit: F) -> u64
where
    F: FnMut(ScheduledOperation),
{
    assert_eq!(
        sequence.len(),
        instance.operation_count(),
        "solution length does not match the instance's operation count"
    );
    let mut op_count = vec![0usize; instance.num_jobs];
    let mut job_ready = vec![0u64; instance.num_jobs];
    let mut machine_ready = vec![0u64; instance.num_machines];
    let mut makespan = 0;

    for &job in sequence {
        let k = op_count[job];
        let op = instance.jobs[job][k];

        let start = job_ready[job].max(machine_ready[op.machine]);
        let end = start + op.duration;

        emit(ScheduledOperation::new(job, k, op.machine, start, end));

        job_ready[job] = end;
        machine_ready[op.machine] = end;
        op_count[job] = k + 1;
        makespan = makespan.max(end);
    }

    makespan
}
