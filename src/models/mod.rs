//! RCPSP domain models.
//!
//! Provides the data types describing a project scheduling problem with
//! time-varying renewable capacities and the artifacts derived from it.
//!
//! # Domain Mappings
//!
//! | u-rcpsp | Construction | Manufacturing | IT Operations |
//! |---------|--------------|---------------|---------------|
//! | Job | Work package | Operation | Change task |
//! | Resource | Crew / crane | Machine pool | Engineer pool |
//! | Capacity row | Daily crew size | Shift plan | On-call roster |
//! | Schedule | Site plan | Production plan | Rollout plan |

mod builder;
mod problem;
mod schedule;
mod summary;

pub use builder::{CapacityRecord, ProblemBuilder, ProblemInstance, TaskRecord};
pub use problem::Problem;
pub use schedule::{Schedule, Violation, ViolationType};
pub use summary::ScheduleSummary;
