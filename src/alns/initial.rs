//! Initial order: longest-remaining-path topological sort.
//!
//! Jobs are emitted with Kahn's algorithm. Among ready jobs the one with the
//! largest tail goes first, ties to the smaller id. The tail of a job is its
//! duration plus the largest tail among its successors, i.e. the longest
//! duration-weighted path from the job to a sink, ignoring resources.
//!
//! # Reference
//! Kolisch (1996), "Efficient priority rules for the resource-constrained
//! project scheduling problem" (LST/LFT family)

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::{RcpspError, RcpspResult};
use crate::models::Problem;

/// Longest duration-weighted path from each job to any sink.
///
/// Jobs on a precedence cycle are never reached and keep their own duration.
pub fn tails(problem: &Problem) -> Vec<i64> {
    let n = problem.job_count();
    let mut indegree: Vec<usize> = problem.predecessors.iter().map(Vec::len).collect();
    let mut topo: Vec<usize> = (0..n).filter(|&j| indegree[j] == 0).collect();

    let mut idx = 0;
    while idx < topo.len() {
        let u = topo[idx];
        idx += 1;
        for &v in &problem.successors[u] {
            indegree[v] -= 1;
            if indegree[v] == 0 {
                topo.push(v);
            }
        }
    }

    let mut tail = problem.durations.clone();
    for &u in topo.iter().rev() {
        let longest = problem.successors[u]
            .iter()
            .map(|&v| tail[v])
            .max()
            .unwrap_or(0);
        tail[u] = problem.durations[u] + longest;
    }
    tail
}

/// Topological order prioritizing the largest tail.
///
/// # Errors
/// [`RcpspError::NoEligibleJob`] if the precedence graph has a cycle.
///
/// # Example
/// ```
/// use u_rcpsp::alns::topological_lrp_order;
/// use u_rcpsp::models::Problem;
///
/// // 0 → {1, 2} → 3, with job 2 on the longer path.
/// let problem = Problem::new(
///     vec![0, 1, 4, 0],
///     vec![vec![], vec![0], vec![0], vec![1, 2]],
///     vec![vec![0], vec![1], vec![1], vec![0]],
///     vec![vec![1]],
///     vec!["R".into()],
/// );
/// assert_eq!(topological_lrp_order(&problem).unwrap(), vec![0, 2, 1, 3]);
/// ```
pub fn topological_lrp_order(problem: &Problem) -> RcpspResult<Vec<usize>> {
    let n = problem.job_count();
    let tail = tails(problem);
    let mut indegree: Vec<usize> = problem.predecessors.iter().map(Vec::len).collect();

    let mut ready: BinaryHeap<(i64, Reverse<usize>)> = (0..n)
        .filter(|&j| indegree[j] == 0)
        .map(|j| (tail[j], Reverse(j)))
        .collect();

    let mut order = Vec::with_capacity(n);
    while let Some((_, Reverse(job))) = ready.pop() {
        order.push(job);
        for &v in &problem.successors[job] {
            indegree[v] -= 1;
            if indegree[v] == 0 {
                ready.push((tail[v], Reverse(v)));
            }
        }
    }

    if order.len() < n {
        return Err(RcpspError::NoEligibleJob {
            remaining: n - order.len(),
        });
    }
    Ok(order)
}
