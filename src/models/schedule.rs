//! Schedule (solution) model.
//!
//! A schedule is derived from a job order by the serial schedule generation
//! scheme. It is never patched incrementally; every order change produces a
//! new schedule from scratch.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};

/// Start times and resource usage realized for one job order.
///
/// Jobs absent from the order (or not yet placed) have no start time.
/// The usage matrix is indexed `[period][resource]` and cropped to the
/// makespan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Start period per job (`None` = unset).
    pub starts: Vec<Option<i64>>,
    /// Finish period per job (`None` = unset).
    pub finishes: Vec<Option<i64>>,
    /// Resource usage per period, `makespan` rows long.
    pub usage: Vec<Vec<i32>>,
}

/// A constraint violation found when checking a schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Offending job.
    pub job: usize,
    /// Human-readable description.
    pub message: String,
}

/// Classification of constraint violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Resource used beyond its capacity in some period.
    CapacityExceeded,
    /// Job started before a predecessor finished.
    PrecedenceViolation,
    /// Positive-duration job without a start time.
    Unscheduled,
}

impl Violation {
    /// Creates a capacity exceeded violation.
    pub fn capacity_exceeded(job: usize, message: impl Into<String>) -> Self {
        Self {
            violation_type: ViolationType::CapacityExceeded,
            job,
            message: message.into(),
        }
    }

    /// Creates a precedence violation.
    pub fn precedence_violation(job: usize, message: impl Into<String>) -> Self {
        Self {
            violation_type: ViolationType::PrecedenceViolation,
            job,
            message: message.into(),
        }
    }

    /// Creates an unscheduled-job violation.
    pub fn unscheduled(job: usize, message: impl Into<String>) -> Self {
        Self {
            violation_type: ViolationType::Unscheduled,
            job,
            message: message.into(),
        }
    }
}

impl Schedule {
    /// Creates an empty schedule for `job_count` jobs.
    pub fn new(job_count: usize) -> Self {
        Self {
            starts: vec![None; job_count],
            finishes: vec![None; job_count],
            usage: Vec::new(),
        }
    }

    /// Start period of a job.
    #[inline]
    pub fn start(&self, job: usize) -> Option<i64> {
        self.starts.get(job).copied().flatten()
    }

    /// Finish period of a job.
    #[inline]
    pub fn finish(&self, job: usize) -> Option<i64> {
        self.finishes.get(job).copied().flatten()
    }

    /// Whether a job has been placed.
    #[inline]
    pub fn is_scheduled(&self, job: usize) -> bool {
        self.start(job).is_some()
    }

    /// Number of placed jobs.
    pub fn scheduled_count(&self) -> usize {
        self.starts.iter().filter(|s| s.is_some()).count()
    }

    /// Makespan: latest finish over placed jobs (0 if none).
    pub fn makespan(&self) -> i64 {
        self.finishes.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Usage row at period `t`; `None` past the cropped matrix.
    #[inline]
    pub fn usage_at(&self, t: i64) -> Option<&[i32]> {
        usize::try_from(t)
            .ok()
            .and_then(|t| self.usage.get(t))
            .map(Vec::as_slice)
    }

    /// Usage of resource `r` at period `t` (0 outside the matrix).
    #[inline]
    pub fn usage_of(&self, t: i64, r: usize) -> i32 {
        self.usage_at(t)
            .and_then(|row| row.get(r))
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schedule() -> Schedule {
        let mut s = Schedule::new(3);
        s.starts[0] = Some(0);
        s.finishes[0] = Some(2);
        s.starts[1] = Some(2);
        s.finishes[1] = Some(5);
        s.usage = vec![vec![1], vec![1], vec![2], vec![2], vec![2]];
        s
    }

    #[test]
    fn test_schedule_makespan() {
        let s = sample_schedule();
        assert_eq!(s.makespan(), 5);
        assert_eq!(s.scheduled_count(), 2);
    }

    #[test]
    fn test_unset_job() {
        let s = sample_schedule();
        assert!(!s.is_scheduled(2));
        assert_eq!(s.start(2), None);
        assert_eq!(s.finish(2), None);
        assert_eq!(s.start(99), None);
    }

    #[test]
    fn test_usage_lookup() {
        let s = sample_schedule();
        assert_eq!(s.usage_of(0, 0), 1);
        assert_eq!(s.usage_of(4, 0), 2);
        assert_eq!(s.usage_of(5, 0), 0);
        assert_eq!(s.usage_of(-1, 0), 0);
        assert!(s.usage_at(5).is_none());
    }

    #[test]
    fn test_empty_schedule() {
        let s = Schedule::new(0);
        assert_eq!(s.makespan(), 0);
        assert_eq!(s.scheduled_count(), 0);
    }

    #[test]
    fn test_violation_factories() {
        let v1 = Violation::capacity_exceeded(3, "Over capacity");
        assert_eq!(v1.violation_type, ViolationType::CapacityExceeded);
        assert_eq!(v1.job, 3);

        let v2 = Violation::precedence_violation(4, "Started before 2");
        assert_eq!(v2.violation_type, ViolationType::PrecedenceViolation);

        let v3 = Violation::unscheduled(5, "No start");
        assert_eq!(v3.violation_type, ViolationType::Unscheduled);
    }
}
