//! Crate error type.
//!
//! Structural input problems are reported as [`RcpspError::Validation`] or
//! [`RcpspError::InvalidInput`] before solving starts. During solving the
//! only fatal condition is a malformed order ([`RcpspError::NoEligibleJob`]).
//! Jobs that cannot be placed only penalize a search state; a run whose best
//! state still misses jobs ends with [`RcpspError::IncompleteSchedule`].

use thiserror::Error;

use crate::validation::ValidationError;

/// Errors produced by problem construction, scheduling, and the CLI.
#[derive(Error, Debug)]
pub enum RcpspError {
    /// The eligibility scan found no job whose present predecessors have all
    /// been processed. Indicates a precedence cycle or a defective operator.
    #[error("no eligible job found with {remaining} jobs remaining (precedence cycle or invalid order)")]
    NoEligibleJob { remaining: usize },

    /// The best schedule found still leaves positive-duration jobs unset.
    #[error("no complete schedule found: jobs {unscheduled:?} could not be placed")]
    IncompleteSchedule { unscheduled: Vec<usize> },

    /// The problem failed structural validation.
    #[error("invalid problem: {}", summarize_validation(.0))]
    Validation(Vec<ValidationError>),

    /// Malformed ingestion records or configuration values.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type RcpspResult<T> = Result<T, RcpspError>;

fn summarize_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_no_eligible_message() {
        let err = RcpspError::NoEligibleJob { remaining: 3 };
        assert!(err.to_string().contains("3 jobs remaining"));
    }

    #[test]
    fn test_incomplete_schedule_message() {
        let err = RcpspError::IncompleteSchedule {
            unscheduled: vec![2, 5],
        };
        assert!(err.to_string().contains("[2, 5]"));
    }

    #[test]
    fn test_validation_message_joins_errors() {
        let err = RcpspError::Validation(vec![
            ValidationError::new(ValidationErrorKind::CyclicDependency, "cycle at 2"),
            ValidationError::new(ValidationErrorKind::EmptyCapacity, "no rows"),
        ]);
        let msg = err.to_string();
        assert!(msg.contains("cycle at 2"));
        assert!(msg.contains("no rows"));
    }
}
