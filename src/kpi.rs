//! Schedule quality metrics (KPIs).
//!
//! Computes standard indicators from a decoded schedule and its instance.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest completion time |
//! | Lower bound | max(longest job, most loaded machine) |
//! | Gap | (C_max - LB) / LB |
//! | Utilization | Busy time / C_max, per machine |
//! | Idle time | Sum over machines of C_max - busy time |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use serde::{Deserialize, Serialize};

use crate::models::{Instance, Schedule};

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleKpi {
    /// Latest completion time.
    pub makespan: u64,
    /// Trivial lower bound of the instance.
    pub lower_bound: u64,
    /// Relative distance to the lower bound; 0.0 when the bound is 0.
    pub gap: f64,
    /// Utilization indexed by machine id (0.0..=1.0).
    pub utilization_by_machine: Vec<f64>,
    /// Mean of `utilization_by_machine`.
    pub avg_utilization: f64,
    /// Total time machines sit idle before the makespan.
    pub total_idle_time: u64,
}

impl ScheduleKpi {
    /// Computes KPIs from a schedule and the instance it was built for.
    pub fn calculate(schedule: &Schedule, instance: &Instance) -> Self {
        let makespan = schedule.makespan();
        let lower_bound = instance.lower_bound();

        let gap = if lower_bound == 0 {
            0.0
        } else {
            makespan.saturating_sub(lower_bound) as f64 / lower_bound as f64
        };

        let busy: Vec<u64> = (0..instance.num_machines)
            .map(|m| schedule.machine_busy_time(m))
            .collect();

        let utilization_by_machine: Vec<f64> = (0..instance.num_machines)
            .map(|m| schedule.machine_utilization(m).unwrap_or(0.0))
            .collect();
        let avg_utilization = if utilization_by_machine.is_empty() {
            0.0
        } else {
            utilization_by_machine.iter().sum::<f64>() / utilization_by_machine.len() as f64
        };

        let total_idle_time = busy.iter().map(|&b| makespan.saturating_sub(b)).sum();

        Self {
            makespan,
            lower_bound,
            gap,
            utilization_by_machine,
            avg_utilization,
            total_idle_time,
        }
    }

    /// Whether the schedule is within `max_gap` of the lower bound and
    /// keeps machines at least `min_utilization` busy on average.
    pub fn meets_thresholds(&self, max_gap: f64, min_utilization: f64) -> bool {
        self.gap <= max_gap && self.avg_utilization >= min_utilization
    }

    /// Whether the makespan reaches the lower bound, which proves optimality.
    pub fn is_provably_optimal(&self) -> bool {
        self.makespan == self.lower_bound
    }
}
