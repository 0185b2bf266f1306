//! Serial schedule generation scheme (SGS) with time-varying capacities.
//!
//! # Algorithm
//!
//! 1. Precedence is enforced only among jobs present in the order, so
//!    partial (destroyed) orders can be scheduled as well.
//! 2. Repeatedly pick the *first* job in list order whose present
//!    predecessors are all placed. List position is the only tie-break.
//! 3. Its earliest start is the latest finish of its present predecessors.
//! 4. Zero-duration jobs are placed at the earliest start without a
//!    resource check.
//! 5. Other jobs scan forward one period at a time until every period of
//!    the window has room for the job's demand on every resource. Earlier
//!    placements are never revisited.
//!
//! Periods past the known horizon repeat the last capacity row. Once the
//! scan passes both the horizon and the latest placed finish, every later
//! window looks identical, so a job that does not fit there can never fit.
//! Such a job is left unset, as is every job that depends on it; the
//! remaining jobs are still placed. Callers see the gap as unscheduled
//! jobs rather than as an error.
//!
//! # Complexity
//! O(n² + n · H · d · R) where H is the realized horizon, d the duration
//! and R the number of resources.
//!
//! # Reference
//! Kolisch (1996), "Serial and parallel resource-constrained project
//! scheduling methods revisited: Theory and computation"

use tracing::{debug, trace};

use crate::error::{RcpspError, RcpspResult};
use crate::models::{Problem, Schedule};

/// Schedules `order` on `problem` and returns start times and usage.
///
/// `order` may be partial; jobs absent from it stay unset. Jobs with no
/// feasible window, and their dependents, stay unset as well.
///
/// # Errors
/// [`RcpspError::NoEligibleJob`] if the order contains a precedence cycle.
///
/// # Example
/// ```
/// use u_rcpsp::models::Problem;
/// use u_rcpsp::scheduler::schedule_order;
///
/// // Two unit-demand jobs on a resource of capacity 1.
/// let problem = Problem::new(
///     vec![2, 3],
///     vec![vec![], vec![]],
///     vec![vec![1], vec![1]],
///     vec![vec![1]],
///     vec!["R".into()],
/// );
/// let schedule = schedule_order(&[1, 0], &problem).unwrap();
/// assert_eq!(schedule.start(1), Some(0));
/// assert_eq!(schedule.start(0), Some(3));
/// assert_eq!(schedule.makespan(), 5);
/// ```
pub fn schedule_order(order: &[usize], problem: &Problem) -> RcpspResult<Schedule> {
    let n = problem.job_count();
    let resources = problem.resource_count();

    let mut schedule = Schedule::new(n);
    let mut present = vec![false; n];
    for &job in order {
        present[job] = true;
    }

    let mut done = vec![false; n];
    let mut remaining: Vec<usize> = order.to_vec();
    let mut latest_finish: i64 = 0;

    while !remaining.is_empty() {
        let idx = remaining
            .iter()
            .position(|&job| {
                problem.predecessors[job]
                    .iter()
                    .all(|&p| !present[p] || done[p])
            })
            .ok_or(RcpspError::NoEligibleJob {
                remaining: remaining.len(),
            })?;
        let job = remaining.remove(idx);
        done[job] = true;

        if problem.predecessors[job]
            .iter()
            .any(|&p| present[p] && schedule.finishes[p].is_none())
        {
            trace!(job, "Left unset behind an unscheduled predecessor");
            continue;
        }

        let earliest = problem.predecessors[job]
            .iter()
            .filter(|&&p| present[p])
            .filter_map(|&p| schedule.finishes[p])
            .max()
            .unwrap_or(0)
            .max(0);

        let duration = problem.durations[job];
        if duration == 0 {
            schedule.starts[job] = Some(earliest);
            schedule.finishes[job] = Some(earliest);
            continue;
        }

        let Some(start) =
            earliest_feasible_start(problem, &schedule.usage, job, earliest, latest_finish)
        else {
            debug!(job, earliest, "No feasible window, job left unset");
            continue;
        };
        let finish = start + duration;
        occupy(&mut schedule.usage, resources, &problem.needs[job], start, finish);

        trace!(job, start, finish, "Placed job");
        schedule.starts[job] = Some(start);
        schedule.finishes[job] = Some(finish);
        latest_finish = latest_finish.max(finish);
    }

    let makespan = schedule.makespan() as usize;
    schedule.usage.resize(makespan, vec![0; resources]);

    Ok(schedule)
}

/// First start `t >= earliest` at which `job` fits for its whole duration,
/// or `None` once the scan reaches the steady region without a fit.
fn earliest_feasible_start(
    problem: &Problem,
    usage: &[Vec<i32>],
    job: usize,
    earliest: i64,
    latest_finish: i64,
) -> Option<i64> {
    let steady_from = (problem.horizon() as i64).max(latest_finish);
    let mut t = earliest;

    loop {
        if fits(problem, usage, job, t) {
            return Some(t);
        }
        if t >= steady_from {
            return None;
        }
        t += 1;
    }
}

fn fits(problem: &Problem, usage: &[Vec<i32>], job: usize, start: i64) -> bool {
    let demand = &problem.needs[job];
    (start..start + problem.durations[job]).all(|tau| {
        let capacity = problem.capacity_at(tau);
        let used = usage.get(tau as usize);
        demand.iter().enumerate().all(|(r, &units)| {
            let current = used.and_then(|row| row.get(r)).copied().unwrap_or(0);
            let available = capacity.get(r).copied().unwrap_or(0);
            current + units <= available
        })
    })
}

fn occupy(usage: &mut Vec<Vec<i32>>, resources: usize, demand: &[i32], start: i64, finish: i64) {
    let finish = finish as usize;
    if usage.len() < finish {
        usage.resize(finish, vec![0; resources]);
    }
    for row in &mut usage[start as usize..finish] {
        for (slot, &units) in row.iter_mut().zip(demand) {
            *slot += units;
        }
    }
}
