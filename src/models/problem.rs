//! Problem model.
//!
//! An RCPSP instance with renewable resources whose capacity varies per
//! period. The model is immutable for the duration of a run and shared
//! read-only between all search states.
//!
//! # Time Representation
//! Time is discrete: period `t` covers `[t, t+1)`. A job with duration `d`
//! started at `s` occupies periods `s..s+d`.
//!
//! # Horizon
//! The capacity table covers periods `0..T`. Any period at or past `T`
//! behaves as a copy of the last row, so the horizon is a soft limit.
//!
//! # Reference
//! Kolisch & Sprecher (1997), "PSPLIB - A project scheduling problem library"

use serde::{Deserialize, Serialize};

/// A resource-constrained project scheduling problem.
///
/// Job and resource axes are positional: `needs[j][r]` and `capacity[t][r]`
/// both index resource `r` as named by `resource_names[r]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    /// Duration per job (periods).
    pub durations: Vec<i64>,
    /// Direct predecessors per job.
    pub predecessors: Vec<Vec<usize>>,
    /// Direct successors per job (mirror of `predecessors`).
    pub successors: Vec<Vec<usize>>,
    /// Demand per job per resource, held for the whole job window.
    pub needs: Vec<Vec<i32>>,
    /// Capacity per period per resource.
    pub capacity: Vec<Vec<i32>>,
    /// Resource labels, aligned with the resource axis.
    pub resource_names: Vec<String>,
    /// Whether the dummy source/sink were synthesized during ingestion.
    #[serde(default)]
    pub has_synthetic_dummies: bool,
}

impl Problem {
    /// Creates a problem, deriving successor lists from `predecessors`.
    ///
    /// Predecessor indices are not range-checked here; run
    /// [`validate_problem`](crate::validation::validate_problem) on untrusted input.
    /// Out-of-range predecessors are skipped when building successors.
    pub fn new(
        durations: Vec<i64>,
        predecessors: Vec<Vec<usize>>,
        needs: Vec<Vec<i32>>,
        capacity: Vec<Vec<i32>>,
        resource_names: Vec<String>,
    ) -> Self {
        let mut successors = vec![Vec::new(); durations.len()];
        for (job, preds) in predecessors.iter().enumerate() {
            for &p in preds {
                if let Some(succ) = successors.get_mut(p) {
                    succ.push(job);
                }
            }
        }

        Self {
            durations,
            predecessors,
            successors,
            needs,
            capacity,
            resource_names,
            has_synthetic_dummies: false,
        }
    }

    /// Marks whether the dummy source/sink were synthesized.
    pub fn with_synthetic_dummies(mut self, synthesized: bool) -> Self {
        self.has_synthetic_dummies = synthesized;
        self
    }

    /// Number of jobs (including dummies).
    #[inline]
    pub fn job_count(&self) -> usize {
        self.durations.len()
    }

    /// Number of renewable resources.
    #[inline]
    pub fn resource_count(&self) -> usize {
        self.resource_names.len()
    }

    /// Known capacity horizon `T` (rows in the capacity table).
    #[inline]
    pub fn horizon(&self) -> usize {
        self.capacity.len()
    }

    /// Capacity row for period `t`.
    ///
    /// Periods past the known horizon repeat the last row. Returns an empty
    /// slice only when the capacity table itself is empty.
    #[inline]
    pub fn capacity_at(&self, t: i64) -> &[i32] {
        let t = usize::try_from(t).unwrap_or(0);
        match self.capacity.get(t).or_else(|| self.capacity.last()) {
            Some(row) => row,
            None => &[],
        }
    }

    /// Capacity of resource `r` at period `t` (0 for an unknown resource).
    #[inline]
    pub fn capacity_of(&self, t: i64, r: usize) -> i32 {
        self.capacity_at(t).get(r).copied().unwrap_or(0)
    }

    /// Largest capacity of resource `r` anywhere in the table.
    pub fn max_capacity(&self, r: usize) -> i32 {
        self.capacity
            .iter()
            .filter_map(|row| row.get(r).copied())
            .max()
            .unwrap_or(0)
    }

    /// Sum of all job durations; an upper bound on any serial makespan
    /// under constant capacity.
    pub fn total_duration(&self) -> i64 {
        self.durations.iter().sum()
    }

    /// Whether every capacity column is constant over the known horizon.
    pub fn has_constant_capacity(&self) -> bool {
        (0..self.resource_count()).all(|r| {
            let mut column = self.capacity.iter().filter_map(|row| row.get(r));
            match column.next() {
                Some(first) => column.all(|c| c == first),
                None => true,
            }
        })
    }

    /// Index of a resource by name.
    pub fn resource_index(&self, name: &str) -> Option<usize> {
        self.resource_names.iter().position(|n| n == name)
    }

    /// Jobs without predecessors.
    pub fn sources(&self) -> Vec<usize> {
        (0..self.job_count())
            .filter(|&j| self.predecessors[j].is_empty())
            .collect()
    }

    /// Jobs without successors.
    pub fn sinks(&self) -> Vec<usize> {
        (0..self.job_count())
            .filter(|&j| self.successors[j].is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> Problem {
        Problem::new(
            vec![0, 2, 3, 0],
            vec![vec![], vec![0], vec![1], vec![2]],
            vec![vec![0], vec![1], vec![2], vec![0]],
            vec![vec![2], vec![2], vec![3]],
            vec!["R".into()],
        )
    }

    #[test]
    fn test_successors_derived() {
        let p = chain();
        assert_eq!(p.successors, vec![vec![1], vec![2], vec![3], vec![]]);
        assert_eq!(p.sources(), vec![0]);
        assert_eq!(p.sinks(), vec![3]);
    }

    #[test]
    fn test_capacity_past_horizon_repeats_last_row() {
        let p = chain();
        assert_eq!(p.horizon(), 3);
        assert_eq!(p.capacity_at(0), &[2]);
        assert_eq!(p.capacity_at(2), &[3]);
        assert_eq!(p.capacity_at(100), &[3]);
        assert_eq!(p.capacity_of(7, 0), 3);
        assert_eq!(p.capacity_of(7, 5), 0);
    }

    #[test]
    fn test_aggregates() {
        let p = chain();
        assert_eq!(p.job_count(), 4);
        assert_eq!(p.resource_count(), 1);
        assert_eq!(p.total_duration(), 5);
        assert_eq!(p.max_capacity(0), 3);
        assert!(!p.has_constant_capacity());
        assert_eq!(p.resource_index("R"), Some(0));
        assert_eq!(p.resource_index("X"), None);
    }

    #[test]
    fn test_synthetic_flag() {
        let p = chain().with_synthetic_dummies(true);
        assert!(p.has_synthetic_dummies);
    }
}
