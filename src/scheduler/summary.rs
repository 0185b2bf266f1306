//! Result summary and utilization metrics.
//!
//! Builds the [`ScheduleSummary`] consumed by reporting collaborators from
//! a final order and its schedule.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan (C_max) | Latest completion time |
//! | Utilization[t][r] | usage / capacity where capacity > 0, else 0 |
//! | Total utilization | Mean of utilization over cells with capacity > 0 |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use crate::models::{Problem, Schedule, ScheduleSummary};

/// Summarizes a schedule.
///
/// Usage is recomputed from start times and demands of positive-duration
/// jobs, and capacities are read through the horizon extension, so both
/// matrices are exactly `makespan` rows long.
pub fn summarize(problem: &Problem, order: &[usize], schedule: &Schedule) -> ScheduleSummary {
    let resources = problem.resource_count();
    let makespan = problem
        .durations
        .iter()
        .enumerate()
        .filter_map(|(j, &d)| schedule.start(j).map(|s| s + d))
        .max()
        .unwrap_or(0)
        .max(0);
    let rows = makespan as usize;

    let mut usage = vec![vec![0i32; resources]; rows];
    for (job, &duration) in problem.durations.iter().enumerate() {
        let Some(start) = schedule.start(job) else {
            continue;
        };
        if duration <= 0 {
            continue;
        }
        for row in &mut usage[start as usize..(start + duration) as usize] {
            for (slot, &units) in row.iter_mut().zip(&problem.needs[job]) {
                *slot += units;
            }
        }
    }

    let capacities: Vec<Vec<i32>> = (0..makespan)
        .map(|t| problem.capacity_at(t).to_vec())
        .collect();

    let (utilization, total_utilization) = utilization(&usage, &capacities);

    ScheduleSummary {
        makespan,
        order: order.to_vec(),
        starts: schedule.starts.clone(),
        resource_names: problem.resource_names.clone(),
        usage,
        capacities,
        utilization,
        total_utilization,
        durations: problem.durations.clone(),
        needs: problem.needs.clone(),
        synthetic_dummies: problem.has_synthetic_dummies,
    }
}

/// Elementwise utilization and its mean over cells with positive capacity.
///
/// Returns a total of 0.0 when no cell has positive capacity.
pub fn utilization(usage: &[Vec<i32>], capacities: &[Vec<i32>]) -> (Vec<Vec<f64>>, f64) {
    let mut sum = 0.0;
    let mut cells = 0usize;

    let matrix: Vec<Vec<f64>> = usage
        .iter()
        .zip(capacities)
        .map(|(used, cap)| {
            used.iter()
                .zip(cap)
                .map(|(&u, &c)| {
                    if c > 0 {
                        let ratio = u as f64 / c as f64;
                        sum += ratio;
                        cells += 1;
                        ratio
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect();

    let total = if cells == 0 { 0.0 } else { sum / cells as f64 };
    (matrix, total)
}
