//! Input validation for job shop instances.
//!
//! Checks structural integrity of an [`Instance`] before it is handed to
//! the search algorithms, which assume consistency and do not re-check.
//! Detects:
//! - Job count mismatch (`num_jobs` vs. number of job lists)
//! - Jobs with the wrong number of operations
//! - Machine ids outside `0..num_machines`
//! - Jobs visiting the same machine twice
//! - Total processing time exceeding `u64::MAX`
//!
//! All problems are collected; validation does not stop at the first one.

use std::collections::HashSet;

use crate::models::Instance;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// `num_jobs` disagrees with the number of job lists.
    JobCountMismatch,
    /// A job does not have exactly `num_machines` operations.
    OperationCountMismatch,
    /// An operation references a machine outside `0..num_machines`.
    MachineOutOfRange,
    /// A job visits the same machine more than once.
    RepeatedMachine,
    /// The sum of all durations does not fit in a `u64`.
    LoadOverflow,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a job shop instance.
///
/// Checks:
/// 1. `num_jobs == jobs.len()`
/// 2. Every job has exactly `num_machines` operations
/// 3. Every machine id is in `0..num_machines`
/// 4. No job visits a machine twice
/// 5. The sum of all durations fits in a `u64`, which bounds every start
///    and end time of a decoded schedule
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_instance(instance: &Instance) -> ValidationResult {
    let mut errors = Vec::new();

    if instance.num_jobs != instance.jobs.len() {
        errors.push(ValidationError::new(
            ValidationErrorKind::JobCountMismatch,
            format!(
                "Instance declares {} jobs but lists {}",
                instance.num_jobs,
                instance.jobs.len()
            ),
        ));
    }

    for (job, ops) in instance.jobs.iter().enumerate() {
        if ops.len() != instance.num_machines {
            errors.push(ValidationError::new(
                ValidationErrorKind::OperationCountMismatch,
                format!(
                    "Job {job} has {} operations, expected {}",
                    ops.len(),
                    instance.num_machines
                ),
            ));
        }

        let mut visited = HashSet::with_capacity(ops.len());
        for (k, op) in ops.iter().enumerate() {
            if op.machine >= instance.num_machines {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MachineOutOfRange,
                    format!(
                        "Job {job} operation {k} uses machine {} (machines: 0..{})",
                        op.machine, instance.num_machines
                    ),
                ));
            } else if !visited.insert(op.machine) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::RepeatedMachine,
                    format!("Job {job} visits machine {} more than once", op.machine),
                ));
            }
        }
    }

    let total = instance
        .jobs
        .iter()
        .flatten()
        .try_fold(0u64, |acc, op| acc.checked_add(op.duration));
    if total.is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::LoadOverflow,
            "Total processing time exceeds u64::MAX",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Operation;

    fn sample_instance() -> Instance {
        Instance::from_pairs(
            3,
            vec![
                vec![(0, 3), (1, 2), (2, 2)],
                vec![(0, 2), (2, 1), (1, 4)],
                vec![(1, 4), (2, 3), (0, 1)],
            ],
        )
    }

    #[test]
    fn test_valid_instance() {
        assert!(validate_instance(&sample_instance()).is_ok());
    }

    #[test]
    fn test_empty_instance_is_valid() {
        assert!(validate_instance(&Instance::new(0, Vec::new())).is_ok());
    }

    #[test]
    fn test_job_count_mismatch() {
        let mut inst = sample_instance();
        inst.num_jobs = 4;

        let errors = validate_instance(&inst).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::JobCountMismatch));
    }

    #[test]
    fn test_operation_count_mismatch() {
        let mut inst = sample_instance();
        inst.jobs[1].pop();

        let errors = validate_instance(&inst).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::OperationCountMismatch);
        assert!(errors[0].message.contains("Job 1"));
    }

    #[test]
    fn test_machine_out_of_range() {
        let mut inst = sample_instance();
        inst.jobs[2][1] = Operation::new(5, 3);

        let errors = validate_instance(&inst).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::MachineOutOfRange));
    }

    #[test]
    fn test_repeated_machine() {
        let mut inst = sample_instance();
        inst.jobs[0][2] = Operation::new(0, 2);

        let errors = validate_instance(&inst).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::RepeatedMachine));
    }

    #[test]
    fn test_multiple_errors() {
        let mut inst = sample_instance();
        inst.num_jobs = 7;
        inst.jobs[0].pop();
        inst.jobs[1][0] = Operation::new(9, 1);

        let errors = validate_instance(&inst).unwrap_err();
        assert!(errors.len() >= 3);
    }

    #[test]
    fn test_huge_machine_count() {
        let inst = Instance::from_pairs(usize::MAX, vec![vec![(0, 1)]]);

        let errors = validate_instance(&inst).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::OperationCountMismatch);
    }

    #[test]
    fn test_load_overflow() {
        let inst = Instance::from_pairs(
            2,
            vec![vec![(0, u64::MAX), (1, 1)], vec![(1, 1), (0, 1)]],
        );

        let errors = validate_instance(&inst).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::LoadOverflow);
    }

    #[test]
    fn test_largest_representable_load_is_valid() {
        let inst = Instance::from_pairs(1, vec![vec![(0, u64::MAX)]]);
        assert!(validate_instance(&inst).is_ok());
    }
}
