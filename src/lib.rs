//! Resource-constrained project scheduling with time-varying capacities.
//!
//! Minimizes the makespan of a precedence graph of jobs sharing renewable
//! resources whose capacity may change per period. Orders are turned into
//! schedules by a serial schedule generation scheme and improved by an
//! adaptive large neighborhood search.
//!
//! # Modules
//!
//! - **`models`**: `Problem`, `Schedule`, `ScheduleSummary` and the
//!   record-level `ProblemBuilder`
//! - **`validation`**: Input integrity checks (dimensions, DAG cycles, demands)
//! - **`scheduler`**: Serial schedule generation, feasibility check, summary
//! - **`alns`**: State, destroy/repair operators, selection, acceptance, driver
//! - **`error`**: `RcpspError` and `RcpspResult`
//!
//! # Example
//!
//! ```
//! use u_rcpsp::{AlnsConfig, ProblemBuilder, TaskRecord, CapacityRecord, solve};
//!
//! let problem = ProblemBuilder::new(vec!["R".into()])
//!     .with_task(TaskRecord::new(0, 2).with_need("R", 1))
//!     .with_task(TaskRecord::new(1, 3).with_need("R", 1))
//!     .with_task(TaskRecord::new(2, 1).with_need("R", 1).with_predecessor(0))
//!     .with_capacity(CapacityRecord::new(0).with_capacity("R", 1))
//!     .build()
//!     .unwrap();
//!
//! let summary = solve(problem, &AlnsConfig::default().with_iterations(50)).unwrap();
//! assert_eq!(summary.makespan, 6);
//! ```
//!
//! # References
//!
//! - Kolisch (1996), "Serial and parallel resource-constrained project
//!   scheduling methods revisited"
//! - Ropke & Pisinger (2006), "An Adaptive Large Neighborhood Search Heuristic"
//! - Hartmann & Briskorn (2010), "A survey of variants and extensions of the
//!   resource-constrained project scheduling problem"

pub mod alns;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use alns::{AlnsConfig, AlnsResult, AlnsSolver, solve};
pub use error::{RcpspError, RcpspResult};
pub use models::{CapacityRecord, Problem, ProblemBuilder, ScheduleSummary, TaskRecord};
