//! Search state: a job order with its eagerly computed schedule.

use std::sync::Arc;

use crate::error::RcpspResult;
use crate::models::{Problem, Schedule};
use crate::scheduler::schedule_order;

/// Objective assigned to states with unscheduled positive-duration jobs,
/// before adding the number of such jobs.
pub const INFEASIBLE_PENALTY: f64 = 1e12;

/// A job order together with the schedule it produces.
///
/// The schedule is built when the state is created and never changes;
/// operators always produce new states. Cloning shares the problem.
#[derive(Debug, Clone)]
pub struct RcpspState {
    order: Vec<usize>,
    problem: Arc<Problem>,
    schedule: Schedule,
}

impl RcpspState {
    /// Creates a state and schedules `order` immediately.
    pub fn new(order: Vec<usize>, problem: Arc<Problem>) -> RcpspResult<Self> {
        let schedule = schedule_order(&order, &problem)?;
        Ok(Self {
            order,
            problem,
            schedule,
        })
    }

    /// The job order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// The shared problem.
    pub fn problem(&self) -> &Arc<Problem> {
        &self.problem
    }

    /// The schedule derived from the order.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Start period per job (`None` = unset).
    pub fn starts(&self) -> &[Option<i64>] {
        &self.schedule.starts
    }

    /// Makespan of the derived schedule.
    pub fn makespan(&self) -> i64 {
        self.schedule.makespan()
    }

    /// Number of positive-duration jobs without a start time.
    pub fn unscheduled_count(&self) -> usize {
        self.unscheduled().count()
    }

    /// Positive-duration jobs without a start time, ascending.
    pub fn unscheduled_jobs(&self) -> Vec<usize> {
        self.unscheduled().collect()
    }

    /// Whether the order is a permutation of every job in the problem.
    pub fn is_full_order(&self) -> bool {
        let n = self.problem.job_count();
        let mut seen = vec![false; n];
        self.order.len() == n
            && self
                .order
                .iter()
                .all(|&job| job < n && !std::mem::replace(&mut seen[job], true))
    }

    fn unscheduled(&self) -> impl Iterator<Item = usize> + '_ {
        self.problem
            .durations
            .iter()
            .enumerate()
            .filter(|&(j, &d)| d > 0 && !self.schedule.is_scheduled(j))
            .map(|(j, _)| j)
    }

    /// Whether every positive-duration job is scheduled.
    pub fn is_complete(&self) -> bool {
        self.unscheduled_count() == 0
    }

    /// Objective value (lower is better).
    ///
    /// The makespan for complete states; otherwise
    /// [`INFEASIBLE_PENALTY`] plus the number of unscheduled jobs.
    pub fn objective(&self) -> f64 {
        match self.unscheduled_count() {
            0 => self.makespan() as f64,
            missing => INFEASIBLE_PENALTY + missing as f64,
        }
    }
}
