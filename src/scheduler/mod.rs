//! Schedule construction and evaluation.
//!
//! Turns a job order into a concrete schedule and derives quality metrics.
//!
//! # Algorithm
//!
//! [`schedule_order`] is a serial schedule generation scheme: jobs are
//! placed one at a time, in list order, at the earliest period where
//! precedence and every resource's time-varying capacity allow. It is not
//! optimal on its own; the search in [`crate::alns`] explores orders.
//!
//! # Metrics
//!
//! [`summarize`] computes makespan, usage, capacity and utilization
//! matrices. [`verify_schedule`] independently re-checks feasibility.
//!
//! # References
//!
//! - Kolisch (1996), "Serial and parallel resource-constrained project
//!   scheduling methods revisited"
//! - Hartmann & Kolisch (2000), "Experimental evaluation of state-of-the-art
//!   heuristics for the RCPSP"

mod check;
mod sgs;
mod summary;

pub use check::verify_schedule;
pub use sgs::schedule_order;
pub use summary::{summarize, utilization};
