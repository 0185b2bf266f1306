//! Independent feasibility check for a schedule.
//!
//! Recomputes resource usage from start times and demands rather than
//! trusting the schedule's own usage matrix, then reports every precedence
//! or capacity breach.

use crate::models::{Problem, Schedule, Violation};

/// Checks precedence and capacity feasibility of a schedule.
///
/// Unset positive-duration jobs are reported as
/// [`ViolationType::Unscheduled`](crate::models::ViolationType::Unscheduled);
/// precedence is only checked between jobs that are both placed.
///
/// Returns an empty vector for a feasible, complete schedule.
pub fn verify_schedule(problem: &Problem, schedule: &Schedule) -> Vec<Violation> {
    let mut violations = Vec::new();
    let n = problem.job_count();
    let resources = problem.resource_count();

    for job in 0..n {
        if problem.durations[job] > 0 && !schedule.is_scheduled(job) {
            violations.push(Violation::unscheduled(job, format!("Job {job} has no start")));
        }
    }

    for job in 0..n {
        let Some(start) = schedule.start(job) else {
            continue;
        };
        for &p in &problem.predecessors[job] {
            if let Some(pred_finish) = schedule.finish(p) {
                if start < pred_finish {
                    violations.push(Violation::precedence_violation(
                        job,
                        format!("Job {job} starts at {start} before predecessor {p} finishes at {pred_finish}"),
                    ));
                }
            }
        }
    }

    let makespan = schedule.makespan().max(0) as usize;
    let mut usage = vec![vec![0i32; resources]; makespan];
    for job in 0..n {
        let (Some(start), Some(finish)) = (schedule.start(job), schedule.finish(job)) else {
            continue;
        };
        for t in start.max(0) as usize..(finish.max(0) as usize).min(makespan) {
            for (r, &units) in problem.needs[job].iter().enumerate() {
                usage[t][r] += units;
            }
        }
    }

    for job in 0..n {
        let (Some(start), Some(finish)) = (schedule.start(job), schedule.finish(job)) else {
            continue;
        };
        let breach = (start..finish).find_map(|t| {
            let capacity = problem.capacity_at(t);
            (0..resources)
                .find(|&r| usage[t as usize][r] > capacity.get(r).copied().unwrap_or(0))
                .map(|r| (t, r))
        });
        if let Some((t, r)) = breach {
            violations.push(Violation::capacity_exceeded(
                job,
                format!(
                    "Resource '{}' over capacity at period {t} while job {job} runs",
                    problem.resource_names[r]
                ),
            ));
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ViolationType;

    fn two_jobs() -> Problem {
        Problem::new(
            vec![2, 2],
            vec![vec![], vec![0]],
            vec![vec![1], vec![1]],
            vec![vec![1]],
            vec!["R".into()],
        )
    }

    fn placed(starts: [Option<i64>; 2], durations: [i64; 2]) -> Schedule {
        let mut s = Schedule::new(2);
        for j in 0..2 {
            s.starts[j] = starts[j];
            s.finishes[j] = starts[j].map(|st| st + durations[j]);
        }
        s
    }

    #[test]
    fn test_feasible() {
        let s = placed([Some(0), Some(2)], [2, 2]);
        assert!(verify_schedule(&two_jobs(), &s).is_empty());
    }

    #[test]
    fn test_precedence_and_capacity_breach() {
        let s = placed([Some(0), Some(1)], [2, 2]);
        let v = verify_schedule(&two_jobs(), &s);
        assert!(v
            .iter()
            .any(|v| v.violation_type == ViolationType::PrecedenceViolation && v.job == 1));
        assert!(v
            .iter()
            .any(|v| v.violation_type == ViolationType::CapacityExceeded));
    }

    #[test]
    fn test_unscheduled() {
        let s = placed([Some(0), None], [2, 2]);
        let v = verify_schedule(&two_jobs(), &s);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].violation_type, ViolationType::Unscheduled);
        assert_eq!(v[0].job, 1);
    }
}
