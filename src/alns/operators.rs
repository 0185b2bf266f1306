//! Destroy and repair operators.
//!
//! Operators are tagged variants rather than trait objects so the solver can
//! keep them in plain vectors alongside their adaptive weights. Each one is a
//! pure function of the input state, the removed jobs and the random
//! generator; the input state is never modified.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use u_rcpsp::alns::{DestroyOperator, RcpspState, RepairOperator};
//! use u_rcpsp::models::Problem;
//!
//! let problem = Arc::new(Problem::new(
//!     vec![0, 2, 3, 0],
//!     vec![vec![], vec![0], vec![0], vec![1, 2]],
//!     vec![vec![0], vec![1], vec![1], vec![0]],
//!     vec![vec![1]],
//!     vec!["R".into()],
//! ));
//! let state = RcpspState::new(vec![0, 1, 2, 3], problem).unwrap();
//! let mut rng = StdRng::seed_from_u64(7);
//!
//! let destroyed = DestroyOperator::RandomRemoval { fraction: 0.5 }
//!     .apply(&state, &mut rng)
//!     .unwrap();
//! assert_eq!(destroyed.removed.len(), 2);
//!
//! let repaired = RepairOperator::RandomInsertion
//!     .apply(&destroyed.state, &destroyed.removed, &mut rng)
//!     .unwrap();
//! assert!(repaired.is_complete());
//! assert_eq!(repaired.makespan(), 5);
//! ```

use std::sync::Arc;

use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

use super::state::RcpspState;
use crate::error::RcpspResult;

/// A partial state produced by a destroy operator.
#[derive(Debug, Clone)]
pub struct Destroyed {
    /// The state over the surviving jobs.
    pub state: RcpspState,
    /// Removed job ids, in removal order.
    pub removed: Vec<usize>,
}

/// Moves that take jobs out of a full order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DestroyOperator {
    /// Removes a uniformly random subset of jobs.
    RandomRemoval { fraction: f64 },
    /// Removes the jobs sitting in the least contended windows.
    NonPeakRemoval { fraction: f64 },
}

impl DestroyOperator {
    /// Operator name used in logs and statistics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RandomRemoval { .. } => "random_removal",
            Self::NonPeakRemoval { .. } => "non_peak_removal",
        }
    }

    /// Applies the operator.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        state: &RcpspState,
        rng: &mut R,
    ) -> RcpspResult<Destroyed> {
        match *self {
            Self::RandomRemoval { fraction } => random_removal(state, fraction, rng),
            Self::NonPeakRemoval { fraction } => non_peak_removal(state, fraction),
        }
    }
}

/// Moves that put removed jobs back into an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepairOperator {
    /// Inserts each removed job at a uniformly random position.
    RandomInsertion,
    /// Restores the removed jobs, then reorders every job by descending
    /// finish time.
    Justify,
}

impl RepairOperator {
    /// Operator name used in logs and statistics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RandomInsertion => "random_insertion",
            Self::Justify => "justify",
        }
    }

    /// Applies the operator. The result always holds the full job set.
    ///
    /// An empty `removed` set returns the input state unchanged.
    pub fn apply<R: Rng + ?Sized>(
        &self,
        state: &RcpspState,
        removed: &[usize],
        rng: &mut R,
    ) -> RcpspResult<RcpspState> {
        if removed.is_empty() {
            return Ok(state.clone());
        }
        match self {
            Self::RandomInsertion => random_insertion(state, removed, rng),
            Self::Justify => justify_with(state, removed),
        }
    }
}

/// Number of jobs to remove from an order of `len` jobs.
///
/// `max(1, round(fraction * len))`, capped at `len`. Zero for an empty order.
pub fn removal_count(len: usize, fraction: f64) -> usize {
    if len == 0 {
        return 0;
    }
    let k = (fraction * len as f64).round().max(1.0) as usize;
    k.min(len)
}

/// Removes a uniformly random subset of jobs without replacement.
///
/// Survivors keep their relative order. An empty order is returned as is.
pub fn random_removal<R: Rng + ?Sized>(
    state: &RcpspState,
    fraction: f64,
    rng: &mut R,
) -> RcpspResult<Destroyed> {
    let order = state.order();
    let k = removal_count(order.len(), fraction);
    if k == 0 {
        return Ok(unchanged(state));
    }

    let positions = index::sample(rng, order.len(), k).into_vec();
    let mut taken = vec![false; order.len()];
    for &pos in &positions {
        taken[pos] = true;
    }

    let removed: Vec<usize> = positions.iter().map(|&pos| order[pos]).collect();
    let survivors: Vec<usize> = order
        .iter()
        .zip(&taken)
        .filter(|&(_, &gone)| !gone)
        .map(|(&job, _)| job)
        .collect();

    rebuild(state, survivors, removed)
}

/// Removes the `k` jobs with the lowest mean utilization over their window.
///
/// A job's score is the mean of `usage / max(capacity, 1)` over every
/// period it occupies and every resource. Zero-duration and unscheduled
/// jobs score 0. Ties keep ascending job id.
pub fn non_peak_removal(state: &RcpspState, fraction: f64) -> RcpspResult<Destroyed> {
    let order = state.order();
    let k = removal_count(order.len(), fraction);
    if k == 0 {
        return Ok(unchanged(state));
    }

    let mut jobs = order.to_vec();
    jobs.sort_unstable();
    let mut scored: Vec<(usize, f64)> = jobs
        .into_iter()
        .map(|job| (job, window_utilization(state, job)))
        .collect();
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));

    let removed: Vec<usize> = scored.iter().take(k).map(|&(job, _)| job).collect();
    let mut gone = vec![false; state.problem().job_count()];
    for &job in &removed {
        gone[job] = true;
    }
    let survivors: Vec<usize> = order.iter().copied().filter(|&job| !gone[job]).collect();

    rebuild(state, survivors, removed)
}

/// Inserts each removed job, in removal order, at a random position.
pub fn random_insertion<R: Rng + ?Sized>(
    state: &RcpspState,
    removed: &[usize],
    rng: &mut R,
) -> RcpspResult<RcpspState> {
    let mut order = state.order().to_vec();
    for &job in removed {
        let pos = rng.random_range(0..=order.len());
        order.insert(pos, job);
    }
    RcpspState::new(order, Arc::clone(state.problem()))
}

/// Right-justification: re-emits the current jobs by descending finish
/// time, then descending start time.
///
/// Unscheduled jobs go last; equal keys keep their list position.
pub fn justify(state: &RcpspState) -> RcpspResult<RcpspState> {
    let schedule = state.schedule();
    let mut order = state.order().to_vec();
    order.sort_by(|&a, &b| {
        schedule
            .finish(b)
            .cmp(&schedule.finish(a))
            .then_with(|| schedule.start(b).cmp(&schedule.start(a)))
    });
    RcpspState::new(order, Arc::clone(state.problem()))
}

/// Appends `removed` to the current order, schedules the full order, then
/// right-justifies it with [`justify`].
pub fn justify_with(state: &RcpspState, removed: &[usize]) -> RcpspResult<RcpspState> {
    let mut order = state.order().to_vec();
    order.extend_from_slice(removed);
    let full = RcpspState::new(order, Arc::clone(state.problem()))?;
    justify(&full)
}

fn window_utilization(state: &RcpspState, job: usize) -> f64 {
    let problem = state.problem();
    let duration = problem.durations[job];
    let Some(start) = state.schedule().start(job) else {
        return 0.0;
    };
    if duration <= 0 {
        return 0.0;
    }

    let resources = problem.resource_count();
    let mut sum = 0.0;
    for t in start..start + duration {
        let capacity = problem.capacity_at(t);
        for r in 0..resources {
            let cap = capacity.get(r).copied().unwrap_or(0).max(1);
            sum += state.schedule().usage_of(t, r) as f64 / cap as f64;
        }
    }
    let cells = duration as usize * resources;
    if cells == 0 { 0.0 } else { sum / cells as f64 }
}

fn unchanged(state: &RcpspState) -> Destroyed {
    Destroyed {
        state: state.clone(),
        removed: Vec::new(),
    }
}

fn rebuild(
    state: &RcpspState,
    survivors: Vec<usize>,
    removed: Vec<usize>,
) -> RcpspResult<Destroyed> {
    Ok(Destroyed {
        state: RcpspState::new(survivors, Arc::clone(state.problem()))?,
        removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alns::SimulatedAnnealing;
    use crate::models::Problem;
    use crate::scheduler::verify_schedule;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Source, five jobs on two resources with a small precedence chain, sink.
    fn problem() -> Arc<Problem> {
        Arc::new(Problem::new(
            vec![0, 3, 2, 4, 1, 2, 0],
            vec![
                vec![],
                vec![0],
                vec![0],
                vec![1],
                vec![2],
                vec![0],
                vec![3, 4, 5],
            ],
            vec![
                vec![0, 0],
                vec![2, 1],
                vec![1, 1],
                vec![1, 2],
                vec![2, 0],
                vec![1, 1],
                vec![0, 0],
            ],
            vec![vec![3, 2]],
            vec!["A".into(), "B".into()],
        ))
    }

    fn full_state() -> RcpspState {
        RcpspState::new(vec![0, 1, 2, 3, 4, 5, 6], problem()).unwrap()
    }

    fn empty_state() -> RcpspState {
        RcpspState::new(vec![], problem()).unwrap()
    }

    #[test]
    fn test_removal_count() {
        assert_eq!(removal_count(0, 0.5), 0);
        assert_eq!(removal_count(10, 0.2), 2);
        assert_eq!(removal_count(10, 0.25), 3);
        assert_eq!(removal_count(3, 0.01), 1);
        assert_eq!(removal_count(3, 5.0), 3);
    }

    #[test]
    fn test_random_removal_keeps_survivor_order() {
        let state = full_state();
        let mut rng = StdRng::seed_from_u64(3);
        let d = random_removal(&state, 0.4, &mut rng).unwrap();

        assert_eq!(d.removed.len(), 3);
        assert_eq!(d.state.order().len(), 4);
        let positions: Vec<usize> = d
            .state
            .order()
            .iter()
            .map(|j| state.order().iter().position(|x| x == j).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        for job in &d.removed {
            assert!(!d.state.order().contains(job));
        }
    }

    #[test]
    fn test_destroy_on_empty_order_is_noop() {
        let state = empty_state();
        let mut rng = StdRng::seed_from_u64(1);
        for op in [
            DestroyOperator::RandomRemoval { fraction: 0.3 },
            DestroyOperator::NonPeakRemoval { fraction: 0.3 },
        ] {
            let d = op.apply(&state, &mut rng).unwrap();
            assert!(d.removed.is_empty());
            assert!(d.state.order().is_empty());
        }
    }

    #[test]
    fn test_repair_with_nothing_removed_is_noop() {
        let state = RcpspState::new(vec![0, 2, 1, 4, 3, 5, 6], problem()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for op in [RepairOperator::RandomInsertion, RepairOperator::Justify] {
            let repaired = op.apply(&state, &[], &mut rng).unwrap();
            assert_eq!(repaired.order(), state.order());
        }
    }

    #[test]
    fn test_non_peak_prefers_zero_duration_jobs() {
        let state = full_state();
        let d = non_peak_removal(&state, 2.0 / 7.0).unwrap();
        assert_eq!(d.removed, vec![0, 6]);
        assert_eq!(d.state.order(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_non_peak_scores_by_window_utilization() {
        // Job 1 runs alone at full load on A; job 2 runs alone at half load.
        let p = Arc::new(Problem::new(
            vec![2, 2],
            vec![vec![], vec![0]],
            vec![vec![2], vec![1]],
            vec![vec![2]],
            vec!["A".into()],
        ));
        let state = RcpspState::new(vec![0, 1], p).unwrap();
        let d = non_peak_removal(&state, 0.5).unwrap();
        assert_eq!(d.removed, vec![1]);
    }

    #[test]
    fn test_random_insertion_restores_job_set() {
        let state = full_state();
        let mut rng = StdRng::seed_from_u64(11);
        let d = random_removal(&state, 0.5, &mut rng).unwrap();
        let repaired = random_insertion(&d.state, &d.removed, &mut rng).unwrap();

        let mut jobs = repaired.order().to_vec();
        jobs.sort_unstable();
        assert_eq!(jobs, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_justify_orders_by_finish_descending() {
        let state = full_state();
        let justified = justify(&state).unwrap();
        let s = state.schedule();
        let finishes: Vec<i64> = justified
            .order()
            .iter()
            .map(|&j| s.finish(j).unwrap())
            .collect();
        assert!(finishes.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(justified.order()[0], 6);
        assert!(justified.is_complete());
    }

    #[test]
    fn test_justify_restores_removed_jobs() {
        let base = full_state();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            for destroy in [
                DestroyOperator::RandomRemoval { fraction: 0.15 },
                DestroyOperator::NonPeakRemoval { fraction: 0.15 },
            ] {
                let d = destroy.apply(&base, &mut rng).unwrap();
                let justified = RepairOperator::Justify
                    .apply(&d.state, &d.removed, &mut rng)
                    .unwrap();
                assert!(justified.is_full_order(), "seed {seed}");
                assert!(justified.is_complete(), "seed {seed}");
                assert!(verify_schedule(justified.problem(), justified.schedule()).is_empty());
            }
        }
    }

    #[test]
    fn test_justify_tightens_loose_schedule() {
        // Chain 1 -> 2 queued behind two independent jobs 3 and 4 on a
        // resource of capacity 2.
        let p = Arc::new(Problem::new(
            vec![0, 1, 3, 3, 3, 0],
            vec![vec![], vec![0], vec![1], vec![0], vec![0], vec![2, 3, 4]],
            vec![vec![0], vec![1], vec![1], vec![1], vec![1], vec![0]],
            vec![vec![2]],
            vec!["R".into()],
        ));
        let loose = RcpspState::new(vec![0, 3, 4, 1, 2, 5], p).unwrap();
        assert_eq!(loose.makespan(), 7);

        let d = non_peak_removal(&loose, 0.1).unwrap();
        assert_eq!(d.removed, vec![0]);

        let mut rng = StdRng::seed_from_u64(0);
        let repaired = RepairOperator::Justify
            .apply(&d.state, &d.removed, &mut rng)
            .unwrap();
        assert!(repaired.is_full_order());
        assert_eq!(repaired.makespan(), 6);
        assert!(repaired.objective() < loose.objective());

        let mut annealing = SimulatedAnnealing::new(1.0, 1.0, 1);
        assert!(annealing.accept(loose.objective(), repaired.objective(), &mut rng));
    }

    #[test]
    fn test_removal_then_insertion_stays_feasible() {
        let base = full_state();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut state = base.clone();
            for _ in 0..5 {
                let d = random_removal(&state, 0.4, &mut rng).unwrap();
                state = random_insertion(&d.state, &d.removed, &mut rng).unwrap();
                assert!(state.is_complete(), "seed {seed}");
                assert!(state.objective() < 1e6, "seed {seed}");
                assert!(verify_schedule(state.problem(), state.schedule()).is_empty());
            }
        }
    }

    #[test]
    fn test_operator_names() {
        assert_eq!(
            DestroyOperator::NonPeakRemoval { fraction: 0.1 }.name(),
            "non_peak_removal"
        );
        assert_eq!(RepairOperator::Justify.name(), "justify");
    }
}
