//! Adaptive large neighborhood search over job orders.
//!
//! A state is a job order; its schedule comes from the serial schedule
//! generation scheme in [`crate::scheduler`]. Each iteration destroys part
//! of the order and repairs it, and simulated annealing decides whether the
//! result replaces the current state.
//!
//! # Submodules
//!
//! - [`operators`]: Destroy and repair moves
//!
//! # Components
//!
//! | Component | Type |
//! |-----------|------|
//! | State and objective | [`RcpspState`] |
//! | Operator selection | [`RouletteWheel`] |
//! | Acceptance | [`SimulatedAnnealing`] |
//! | Initial order | [`topological_lrp_order`] |
//! | Driver | [`AlnsSolver`], [`solve`] |
//!
//! # Reference
//! - Ropke & Pisinger (2006), "An Adaptive Large Neighborhood Search
//!   Heuristic for the Pickup and Delivery Problem with Time Windows"
//! - Pisinger & Ropke (2010), "Large Neighborhood Search"

mod accept;
mod initial;
pub mod operators;
mod select;
mod solver;
mod state;

pub use accept::{AcceptanceConfig, SimulatedAnnealing};
pub use initial::{tails, topological_lrp_order};
pub use operators::{
    Destroyed, DestroyOperator, RepairOperator, justify, justify_with, non_peak_removal,
    random_insertion, random_removal, removal_count,
};
pub use select::{Outcome, RouletteWheel, SelectionConfig};
pub use solver::{AlnsConfig, AlnsResult, AlnsSolver, OperatorStats, solve};
pub use state::{INFEASIBLE_PENALTY, RcpspState};
