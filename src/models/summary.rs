//! Result summary handed to reporting and visualization.

use serde::{Deserialize, Serialize};

/// Structured result of a solver run.
///
/// Matrices are indexed `[period][resource]` and cropped to the makespan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// Finish time of the last job.
    pub makespan: i64,
    /// Final job order.
    pub order: Vec<usize>,
    /// Start period per job.
    pub starts: Vec<Option<i64>>,
    /// Resource labels.
    pub resource_names: Vec<String>,
    /// Used units per period per resource.
    pub usage: Vec<Vec<i32>>,
    /// Capacity per period per resource.
    pub capacities: Vec<Vec<i32>>,
    /// `usage / capacity` where capacity is positive, else 0.
    pub utilization: Vec<Vec<f64>>,
    /// Mean utilization over cells with positive capacity.
    pub total_utilization: f64,
    /// Per-job durations (pass-through).
    pub durations: Vec<i64>,
    /// Per-job demands (pass-through).
    pub needs: Vec<Vec<i32>>,
    /// Whether the dummy source/sink were synthesized during ingestion.
    #[serde(default)]
    pub synthetic_dummies: bool,
}

impl ScheduleSummary {
    /// Finish period of a job.
    pub fn finish(&self, job: usize) -> Option<i64> {
        let start = self.starts.get(job).copied().flatten()?;
        Some(start + self.durations.get(job).copied().unwrap_or(0))
    }

    /// Number of jobs.
    pub fn job_count(&self) -> usize {
        self.durations.len()
    }
}
