//! Problem construction from tabular records.
//!
//! Front-ends (CSV readers, JSON files, UIs) hand over one record per task
//! and one record per capacity period. The builder normalizes them into a
//! [`Problem`]:
//!
//! 1. Task IDs must be the contiguous range `0..n`.
//! 2. Capacity rows are sorted by time and forward-filled over gaps, then
//!    extended to a safe horizon (`max(sum of durations, last time) + 1`).
//! 3. If the tasks do not already carry a dummy source/sink, both are
//!    synthesized: real IDs shift by one, roots hang off the source, and
//!    leaves feed the sink.
//! 4. The result is validated before it is returned.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::Problem;
use crate::error::{RcpspError, RcpspResult};
use crate::validation::validate_problem;

/// One task row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Task identifier (contiguous from 0).
    pub id: usize,
    /// Duration (periods).
    pub duration: i64,
    /// Direct predecessor IDs.
    #[serde(default)]
    pub predecessors: Vec<usize>,
    /// Demand per resource name. Missing resources default to 0.
    #[serde(default)]
    pub needs: HashMap<String, i32>,
}

impl TaskRecord {
    /// Creates a task record without predecessors or demands.
    pub fn new(id: usize, duration: i64) -> Self {
        Self {
            id,
            duration,
            predecessors: Vec::new(),
            needs: HashMap::new(),
        }
    }

    /// Adds a predecessor.
    pub fn with_predecessor(mut self, id: usize) -> Self {
        self.predecessors.push(id);
        self
    }

    /// Sets the demand for a resource.
    pub fn with_need(mut self, resource: impl Into<String>, units: i32) -> Self {
        self.needs.insert(resource.into(), units);
        self
    }
}

/// One capacity row, valid from `time` until the next row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapacityRecord {
    /// First period this row applies to.
    pub time: i64,
    /// Capacity per resource name. Every resource must be present.
    pub capacities: HashMap<String, i32>,
}

impl CapacityRecord {
    /// Creates an empty capacity row.
    pub fn new(time: i64) -> Self {
        Self {
            time,
            capacities: HashMap::new(),
        }
    }

    /// Sets the capacity of a resource.
    pub fn with_capacity(mut self, resource: impl Into<String>, units: i32) -> Self {
        self.capacities.insert(resource.into(), units);
        self
    }
}

/// Serialized instance: resources, tasks and capacity rows in one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemInstance {
    pub resources: Vec<String>,
    pub tasks: Vec<TaskRecord>,
    pub capacities: Vec<CapacityRecord>,
}

impl ProblemInstance {
    /// Builds and validates the problem.
    pub fn into_problem(self) -> RcpspResult<Problem> {
        ProblemBuilder::new(self.resources)
            .with_tasks(self.tasks)
            .with_capacities(self.capacities)
            .build()
    }
}

/// Builder that turns task and capacity records into a [`Problem`].
///
/// # Example
/// ```
/// use u_rcpsp::models::{CapacityRecord, ProblemBuilder, TaskRecord};
///
/// let problem = ProblemBuilder::new(vec!["R".into()])
///     .with_task(TaskRecord::new(0, 2).with_need("R", 1))
///     .with_task(TaskRecord::new(1, 3).with_need("R", 1).with_predecessor(0))
///     .with_capacity(CapacityRecord::new(0).with_capacity("R", 1))
///     .build()
///     .unwrap();
///
/// // Dummy source and sink were added around the two tasks.
/// assert_eq!(problem.job_count(), 4);
/// assert!(problem.has_synthetic_dummies);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProblemBuilder {
    resource_names: Vec<String>,
    tasks: Vec<TaskRecord>,
    capacities: Vec<CapacityRecord>,
}

impl ProblemBuilder {
    /// Creates a builder for the given resource axis.
    pub fn new(resource_names: Vec<String>) -> Self {
        Self {
            resource_names,
            tasks: Vec::new(),
            capacities: Vec::new(),
        }
    }

    /// Adds a task record.
    pub fn with_task(mut self, task: TaskRecord) -> Self {
        self.tasks.push(task);
        self
    }

    /// Adds several task records.
    pub fn with_tasks(mut self, tasks: impl IntoIterator<Item = TaskRecord>) -> Self {
        self.tasks.extend(tasks);
        self
    }

    /// Adds a capacity record.
    pub fn with_capacity(mut self, record: CapacityRecord) -> Self {
        self.capacities.push(record);
        self
    }

    /// Adds several capacity records.
    pub fn with_capacities(mut self, records: impl IntoIterator<Item = CapacityRecord>) -> Self {
        self.capacities.extend(records);
        self
    }

    /// Whether the task records already contain a dummy source or sink.
    ///
    /// Task 0 counts as a source if it has no predecessors and zero
    /// duration. A sink is assumed when some task has zero duration and the
    /// largest ID is `n - 1`.
    pub fn has_dummies(&self) -> bool {
        let Some(max_id) = self.tasks.iter().map(|t| t.id).max() else {
            return false;
        };

        let has_source = self
            .tasks
            .iter()
            .any(|t| t.id == 0 && t.predecessors.is_empty() && t.duration == 0);
        let has_sink =
            self.tasks.iter().any(|t| t.duration == 0) && max_id == self.tasks.len() - 1;

        has_source || has_sink
    }

    /// Normalizes the records and returns a validated problem.
    pub fn build(self) -> RcpspResult<Problem> {
        if self.resource_names.is_empty() {
            return Err(RcpspError::InvalidInput(
                "at least one resource is required".into(),
            ));
        }

        let add_dummies = !self.has_dummies();
        if add_dummies {
            info!("No dummies detected, adding dummy source/sink");
        } else {
            info!("Detected dummy start/sink, using input as is");
        }

        let mut tasks = self.tasks;
        tasks.sort_by_key(|t| t.id);
        if let Some((pos, task)) = tasks.iter().enumerate().find(|(i, t)| t.id != *i) {
            return Err(RcpspError::InvalidInput(format!(
                "task IDs must be contiguous from 0: expected {pos}, found {}",
                task.id
            )));
        }

        let n = tasks.len();
        let mut durations = Vec::with_capacity(n);
        let mut predecessors = Vec::with_capacity(n);
        let mut needs = Vec::with_capacity(n);

        for task in &tasks {
            for name in task.needs.keys() {
                if !self.resource_names.contains(name) {
                    return Err(RcpspError::InvalidInput(format!(
                        "task {} needs unknown resource '{name}'",
                        task.id
                    )));
                }
            }
            if let Some(&p) = task.predecessors.iter().find(|&&p| p >= n) {
                return Err(RcpspError::InvalidInput(format!(
                    "task {} references unknown predecessor {p}",
                    task.id
                )));
            }

            durations.push(task.duration);
            predecessors.push(task.predecessors.clone());
            needs.push(
                self.resource_names
                    .iter()
                    .map(|name| task.needs.get(name).copied().unwrap_or(0))
                    .collect::<Vec<i32>>(),
            );
        }

        let safe_horizon = durations.iter().sum::<i64>();
        let capacity = normalize_capacities(&self.resource_names, self.capacities, safe_horizon)?;

        let (durations, predecessors, needs) = if add_dummies {
            add_dummy_jobs(durations, predecessors, needs, self.resource_names.len())
        } else {
            (durations, predecessors, needs)
        };

        let problem = Problem::new(durations, predecessors, needs, capacity, self.resource_names)
            .with_synthetic_dummies(add_dummies);

        validate_problem(&problem).map_err(RcpspError::Validation)?;

        info!(
            jobs = problem.job_count(),
            resources = problem.resource_count(),
            names = ?problem.resource_names,
            "Loaded problem"
        );
        info!(
            horizon = problem.horizon(),
            constant = problem.has_constant_capacity(),
            "Capacity horizon"
        );

        Ok(problem)
    }
}

/// Sorts, de-duplicates, and forward-fills capacity rows into a dense table
/// covering `0..=max(safe_horizon, last time)`.
///
/// Periods before the first row take the first row's values.
fn normalize_capacities(
    resource_names: &[String],
    mut records: Vec<CapacityRecord>,
    safe_horizon: i64,
) -> RcpspResult<Vec<Vec<i32>>> {
    if records.is_empty() {
        return Err(RcpspError::InvalidInput(
            "capacity table must have at least one row".into(),
        ));
    }

    records.sort_by_key(|r| r.time);
    records.dedup_by_key(|r| r.time);

    let mut rows: Vec<(i64, Vec<i32>)> = Vec::with_capacity(records.len());
    for record in &records {
        if record.time < 0 {
            return Err(RcpspError::InvalidInput(format!(
                "capacity row has negative time {}",
                record.time
            )));
        }
        if let Some(name) = record
            .capacities
            .keys()
            .find(|name| !resource_names.contains(name))
        {
            return Err(RcpspError::InvalidInput(format!(
                "capacity row at time {} names unknown resource '{name}'",
                record.time
            )));
        }
        let mut row = Vec::with_capacity(resource_names.len());
        for name in resource_names {
            match record.capacities.get(name) {
                Some(&units) => row.push(units),
                None => {
                    return Err(RcpspError::InvalidInput(format!(
                        "capacity row at time {} is missing resource '{name}'",
                        record.time
                    )))
                }
            }
        }
        rows.push((record.time, row));
    }

    let last_time = rows.last().map(|(t, _)| *t).unwrap_or(0);
    let horizon = safe_horizon.max(last_time) + 1;

    let mut table = Vec::with_capacity(horizon as usize);
    let mut next = 0;
    let mut current = rows[0].1.clone();
    for t in 0..horizon {
        while next < rows.len() && rows[next].0 <= t {
            current = rows[next].1.clone();
            next += 1;
        }
        table.push(current.clone());
    }

    Ok(table)
}

/// Shifts real jobs by one and wraps them with a zero-duration source
/// (ID 0) and sink (ID n+1).
fn add_dummy_jobs(
    durations: Vec<i64>,
    predecessors: Vec<Vec<usize>>,
    needs: Vec<Vec<i32>>,
    resource_count: usize,
) -> (Vec<i64>, Vec<Vec<usize>>, Vec<Vec<i32>>) {
    let n_real = durations.len();
    let sink = n_real + 1;

    let mut durations_aug = Vec::with_capacity(n_real + 2);
    durations_aug.push(0);
    durations_aug.extend(durations);
    durations_aug.push(0);

    let mut needs_aug = Vec::with_capacity(n_real + 2);
    needs_aug.push(vec![0; resource_count]);
    needs_aug.extend(needs);
    needs_aug.push(vec![0; resource_count]);

    let mut preds_aug: Vec<Vec<usize>> = Vec::with_capacity(n_real + 2);
    preds_aug.push(Vec::new());
    let mut has_successor = vec![false; n_real + 2];
    for preds in predecessors {
        let shifted: Vec<usize> = if preds.is_empty() {
            vec![0]
        } else {
            preds.into_iter().map(|p| p + 1).collect()
        };
        for &p in &shifted {
            has_successor[p] = true;
        }
        preds_aug.push(shifted);
    }

    let terminals: Vec<usize> = (1..=n_real).filter(|&j| !has_successor[j]).collect();
    preds_aug.push(terminals);
    debug_assert_eq!(preds_aug.len(), sink + 1);

    (durations_aug, preds_aug, needs_aug)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(time: i64, r: i32) -> CapacityRecord {
        CapacityRecord::new(time).with_capacity("R", r)
    }

    #[test]
    fn test_dummies_synthesized() {
        let problem = ProblemBuilder::new(vec!["R".into()])
            .with_task(TaskRecord::new(0, 2).with_need("R", 1))
            .with_task(TaskRecord::new(1, 3).with_need("R", 1))
            .with_task(TaskRecord::new(2, 1).with_need("R", 1).with_predecessor(0))
            .with_capacity(caps(0, 1))
            .build()
            .unwrap();

        assert!(problem.has_synthetic_dummies);
        assert_eq!(problem.job_count(), 5);
        assert_eq!(problem.durations, vec![0, 2, 3, 1, 0]);
        assert_eq!(problem.predecessors[1], vec![0]);
        assert_eq!(problem.predecessors[2], vec![0]);
        assert_eq!(problem.predecessors[3], vec![1]);
        // Leaves are tasks 2 and 3 after the shift.
        assert_eq!(problem.predecessors[4], vec![2, 3]);
        assert_eq!(problem.successors[0], vec![1, 2]);
        assert_eq!(problem.needs[0], vec![0]);
        assert_eq!(problem.needs[4], vec![0]);
    }

    #[test]
    fn test_existing_dummies_kept() {
        let problem = ProblemBuilder::new(vec!["R".into()])
            .with_task(TaskRecord::new(0, 0))
            .with_task(TaskRecord::new(1, 4).with_need("R", 1).with_predecessor(0))
            .with_task(TaskRecord::new(2, 0).with_predecessor(1))
            .with_capacity(caps(0, 2))
            .build()
            .unwrap();

        assert!(!problem.has_synthetic_dummies);
        assert_eq!(problem.job_count(), 3);
    }

    #[test]
    fn test_capacity_forward_fill_and_safe_horizon() {
        let problem = ProblemBuilder::new(vec!["R".into()])
            .with_task(TaskRecord::new(0, 3).with_need("R", 1))
            .with_task(TaskRecord::new(1, 2).with_need("R", 1))
            .with_capacity(caps(2, 5))
            .with_capacity(caps(0, 1))
            .build()
            .unwrap();

        // Sum of durations is 5, so rows cover 0..=5.
        assert_eq!(problem.horizon(), 6);
        let column: Vec<i32> = problem.capacity.iter().map(|row| row[0]).collect();
        assert_eq!(column, vec![1, 1, 5, 5, 5, 5]);
    }

    #[test]
    fn test_capacity_duplicates_keep_first() {
        let problem = ProblemBuilder::new(vec!["R".into()])
            .with_task(TaskRecord::new(0, 1).with_need("R", 1))
            .with_capacity(caps(0, 3))
            .with_capacity(caps(0, 9))
            .build()
            .unwrap();
        assert_eq!(problem.capacity[0], vec![3]);
    }

    #[test]
    fn test_non_contiguous_ids_rejected() {
        let result = ProblemBuilder::new(vec!["R".into()])
            .with_task(TaskRecord::new(0, 1))
            .with_task(TaskRecord::new(2, 1))
            .with_capacity(caps(0, 1))
            .build();
        assert!(matches!(result, Err(RcpspError::InvalidInput(_))));
    }

    #[test]
    fn test_unknown_resource_rejected() {
        let result = ProblemBuilder::new(vec!["R".into()])
            .with_task(TaskRecord::new(0, 1).with_need("X", 1))
            .with_capacity(caps(0, 1))
            .build();
        assert!(matches!(result, Err(RcpspError::InvalidInput(_))));

        let result = ProblemBuilder::new(vec!["R".into()])
            .with_task(TaskRecord::new(0, 1))
            .with_capacity(CapacityRecord::new(0))
            .build();
        assert!(matches!(result, Err(RcpspError::InvalidInput(_))));
    }

    #[test]
    fn test_missing_capacity_table_rejected() {
        let result = ProblemBuilder::new(vec!["R".into()])
            .with_task(TaskRecord::new(0, 1))
            .build();
        assert!(matches!(result, Err(RcpspError::InvalidInput(_))));
    }

    #[test]
    fn test_cycle_fails_validation() {
        let result = ProblemBuilder::new(vec!["R".into()])
            .with_task(TaskRecord::new(0, 1).with_predecessor(1))
            .with_task(TaskRecord::new(1, 1).with_predecessor(0))
            .with_capacity(caps(0, 1))
            .build();
        assert!(matches!(result, Err(RcpspError::Validation(_))));
    }

    #[test]
    fn test_instance_from_json() {
        let json = r#"{
            "resources": ["R"],
            "tasks": [
                {"id": 0, "duration": 2, "needs": {"R": 1}},
                {"id": 1, "duration": 1, "predecessors": [0], "needs": {"R": 1}}
            ],
            "capacities": [{"time": 0, "capacities": {"R": 1}}]
        }"#;
        let instance: ProblemInstance = serde_json::from_str(json).unwrap();
        let problem = instance.into_problem().unwrap();
        assert_eq!(problem.job_count(), 4);
        assert_eq!(problem.predecessors[2], vec![1]);
    }
}
