//! Input validation for RCPSP instances.
//!
//! Checks structural integrity of a [`Problem`] before scheduling. Detects:
//! - Misaligned job and resource axes
//! - Duplicate resource names
//! - Out-of-range or asymmetric precedence lists
//! - Circular precedence dependencies (DAG validation)
//! - Negative durations, demands, or capacities
//! - Demands that no period of the capacity table can ever satisfy
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::HashSet;

use crate::models::Problem;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Per-job arrays or resource axes have different lengths.
    DimensionMismatch,
    /// Two resources share the same name.
    DuplicateResourceName,
    /// The capacity table has no rows.
    EmptyCapacity,
    /// A predecessor index is out of range.
    InvalidPredecessor,
    /// A successor index is out of range.
    InvalidSuccessor,
    /// Predecessor and successor lists do not mirror each other.
    InconsistentAdjacency,
    /// Precedence graph contains a cycle.
    CyclicDependency,
    /// A duration, demand, or capacity is negative.
    NegativeValue,
    /// A job demands more of a resource than any period provides.
    DemandExceedsCapacity,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a problem instance.
///
/// Checks:
/// 1. Per-job arrays have the same length
/// 2. Every demand and capacity row spans all resources
/// 3. The capacity table is not empty
/// 4. Resource names are unique
/// 5. Adjacency indices are in range and mirror each other
/// 6. No circular precedence dependencies
/// 7. No negative durations, demands, or capacities
/// 8. No demand above the resource's maximum capacity
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_problem(problem: &Problem) -> ValidationResult {
    let mut errors = Vec::new();
    let n = problem.job_count();
    let r = problem.resource_count();

    for (what, len) in [
        ("predecessors", problem.predecessors.len()),
        ("successors", problem.successors.len()),
        ("needs", problem.needs.len()),
    ] {
        if len != n {
            errors.push(ValidationError::new(
                ValidationErrorKind::DimensionMismatch,
                format!("{what} has {len} entries but there are {n} jobs"),
            ));
        }
    }

    for (job, row) in problem.needs.iter().enumerate() {
        if row.len() != r {
            errors.push(ValidationError::new(
                ValidationErrorKind::DimensionMismatch,
                format!("Job {job} has {} demands but there are {r} resources", row.len()),
            ));
        }
    }

    if problem.capacity.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyCapacity,
            "Capacity table has no rows",
        ));
    }
    for (t, row) in problem.capacity.iter().enumerate() {
        if row.len() != r {
            errors.push(ValidationError::new(
                ValidationErrorKind::DimensionMismatch,
                format!("Capacity row {t} has {} entries but there are {r} resources", row.len()),
            ));
        }
    }

    let mut names = HashSet::new();
    for name in &problem.resource_names {
        if !names.insert(name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateResourceName,
                format!("Duplicate resource name: {name}"),
            ));
        }
    }

    // Structural errors above make the graph checks meaningless.
    if !errors.is_empty() {
        return Err(errors);
    }

    check_adjacency(problem, &mut errors);
    if errors.is_empty() {
        if let Some(cycle_err) = detect_cycles(problem) {
            errors.push(cycle_err);
        }
    }

    check_values(problem, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_adjacency(problem: &Problem, errors: &mut Vec<ValidationError>) {
    let n = problem.job_count();

    for (job, preds) in problem.predecessors.iter().enumerate() {
        for &p in preds {
            if p >= n {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidPredecessor,
                    format!("Job {job} references unknown predecessor {p}"),
                ));
            } else if !problem.successors[p].contains(&job) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InconsistentAdjacency,
                    format!("Job {p} precedes {job} but does not list it as a successor"),
                ));
            }
        }
    }

    for (job, succs) in problem.successors.iter().enumerate() {
        for &s in succs {
            if s >= n {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidSuccessor,
                    format!("Job {job} references unknown successor {s}"),
                ));
            } else if !problem.predecessors[s].contains(&job) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InconsistentAdjacency,
                    format!("Job {job} lists successor {s} which does not list it as a predecessor"),
                ));
            }
        }
    }
}

fn check_values(problem: &Problem, errors: &mut Vec<ValidationError>) {
    for (job, &d) in problem.durations.iter().enumerate() {
        if d < 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NegativeValue,
                format!("Job {job} has negative duration {d}"),
            ));
        }
    }

    for (job, row) in problem.needs.iter().enumerate() {
        for (r, &units) in row.iter().enumerate() {
            if units < 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NegativeValue,
                    format!(
                        "Job {job} has negative demand {units} for '{}'",
                        problem.resource_names[r]
                    ),
                ));
            }
        }
    }

    for (t, row) in problem.capacity.iter().enumerate() {
        for (r, &units) in row.iter().enumerate() {
            if units < 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NegativeValue,
                    format!(
                        "Period {t} has negative capacity {units} for '{}'",
                        problem.resource_names[r]
                    ),
                ));
            }
        }
    }

    let max_caps: Vec<i32> = (0..problem.resource_count())
        .map(|r| problem.max_capacity(r))
        .collect();
    for (job, row) in problem.needs.iter().enumerate() {
        if problem.durations[job] <= 0 {
            continue;
        }
        for (r, &units) in row.iter().enumerate() {
            if units > max_caps[r] {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DemandExceedsCapacity,
                    format!(
                        "Job {job} needs {units} of '{}' but capacity never exceeds {}",
                        problem.resource_names[r], max_caps[r]
                    ),
                ));
            }
        }
    }
}

/// Detects cycles in the precedence graph using DFS.
///
/// # Algorithm
/// Topological sort via DFS. If a back-edge is found (visiting a node
/// currently in the recursion stack), a cycle exists.
///
/// # Reference
/// Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4
fn detect_cycles(problem: &Problem) -> Option<ValidationError> {
    let n = problem.job_count();
    let mut visited = vec![false; n];
    let mut in_stack = vec![false; n];

    for node in 0..n {
        if !visited[node] && has_cycle_dfs(node, &problem.successors, &mut visited, &mut in_stack)
        {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                format!("Circular dependency detected involving job {node}"),
            ));
        }
    }

    None
}

fn has_cycle_dfs(
    node: usize,
    adj: &[Vec<usize>],
    visited: &mut [bool],
    in_stack: &mut [bool],
) -> bool {
    visited[node] = true;
    in_stack[node] = true;

    for &next in &adj[node] {
        if in_stack[next] {
            return true; // Back edge → cycle
        }
        if !visited[next] && has_cycle_dfs(next, adj, visited, in_stack) {
            return true;
        }
    }

    in_stack[node] = false;
    false
}
