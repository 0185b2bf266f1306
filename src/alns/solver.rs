//! Adaptive large neighborhood search driver.
//!
//! # Iteration
//!
//! 1. Pick a destroy and a repair operator with the [`RouletteWheel`].
//! 2. Destroy the current state, then repair the partial result.
//! 3. Let [`SimulatedAnnealing`] decide whether the candidate becomes the
//!    current state.
//! 4. A candidate strictly better than the best so far becomes both best
//!    and current.
//! 5. Reward the two operators according to the [`Outcome`].
//!
//! A single [`StdRng`] seeded from the configuration drives every random
//! decision, so runs with equal inputs are identical.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::accept::{AcceptanceConfig, SimulatedAnnealing};
use super::initial::topological_lrp_order;
use super::operators::{DestroyOperator, RepairOperator};
use super::select::{Outcome, RouletteWheel, SelectionConfig};
use super::state::RcpspState;
use crate::error::{RcpspError, RcpspResult};
use crate::models::{Problem, ScheduleSummary};
use crate::scheduler::summarize;
use crate::validation::validate_problem;

/// Search configuration.
///
/// # Example
/// ```
/// use u_rcpsp::alns::AlnsConfig;
///
/// let config = AlnsConfig::default().with_iterations(200).with_seed(7);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.destroy_fraction, 0.2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlnsConfig {
    /// Iteration budget.
    pub iterations: usize,
    /// Random seed.
    pub seed: u64,
    /// Share of the order removed by destroy operators, in (0, 1].
    pub destroy_fraction: f64,
    /// Operator selection parameters.
    pub selection: SelectionConfig,
    /// Acceptance parameters.
    pub acceptance: AcceptanceConfig,
}

impl Default for AlnsConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            seed: 42,
            destroy_fraction: 0.2,
            selection: SelectionConfig::default(),
            acceptance: AcceptanceConfig::default(),
        }
    }
}

impl AlnsConfig {
    /// Sets the iteration budget.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the destroy fraction.
    pub fn with_destroy_fraction(mut self, fraction: f64) -> Self {
        self.destroy_fraction = fraction;
        self
    }

    /// Sets the selection parameters.
    pub fn with_selection(mut self, selection: SelectionConfig) -> Self {
        self.selection = selection;
        self
    }

    /// Sets the acceptance parameters.
    pub fn with_acceptance(mut self, acceptance: AcceptanceConfig) -> Self {
        self.acceptance = acceptance;
        self
    }

    /// Rejects out-of-range parameters.
    pub fn validate(&self) -> RcpspResult<()> {
        let invalid = |msg: String| Err(RcpspError::InvalidInput(msg));

        if !(self.destroy_fraction > 0.0 && self.destroy_fraction <= 1.0) {
            return invalid(format!(
                "destroy_fraction must be in (0, 1], got {}",
                self.destroy_fraction
            ));
        }
        if !(0.0..=1.0).contains(&self.selection.decay) {
            return invalid(format!(
                "selection decay must be in [0, 1], got {}",
                self.selection.decay
            ));
        }
        if self.selection.scores.iter().any(|s| !s.is_finite() || *s < 0.0) {
            return invalid("selection scores must be finite and non-negative".into());
        }
        let acceptance = &self.acceptance;
        if !(acceptance.accept_prob > 0.0 && acceptance.accept_prob < 1.0) {
            return invalid(format!(
                "accept_prob must be in (0, 1), got {}",
                acceptance.accept_prob
            ));
        }
        if !(acceptance.worse >= 0.0) {
            return invalid(format!("worse must be non-negative, got {}", acceptance.worse));
        }
        if !(acceptance.end_temperature > 0.0) {
            return invalid(format!(
                "end_temperature must be positive, got {}",
                acceptance.end_temperature
            ));
        }
        Ok(())
    }
}

/// Per-operator usage counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatorStats {
    /// Operator name.
    pub name: String,
    /// Times the operator was selected.
    pub selected: usize,
    /// Outcome counts indexed by [`Outcome::index`].
    pub outcomes: [usize; 4],
}

impl OperatorStats {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            selected: 0,
            outcomes: [0; 4],
        }
    }

    fn record(&mut self, outcome: Outcome) {
        self.selected += 1;
        self.outcomes[outcome.index()] += 1;
    }
}

/// Result of a search run.
#[derive(Debug, Clone)]
pub struct AlnsResult {
    /// Best state found.
    pub best: RcpspState,
    /// Objective of the initial state.
    pub initial_objective: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Number of new global bests.
    pub improvements: usize,
    /// Final destroy weights.
    pub destroy_weights: Vec<f64>,
    /// Final repair weights.
    pub repair_weights: Vec<f64>,
    /// Destroy operator counters.
    pub destroy_stats: Vec<OperatorStats>,
    /// Repair operator counters.
    pub repair_stats: Vec<OperatorStats>,
}

/// ALNS solver over job orders.
#[derive(Debug, Clone)]
pub struct AlnsSolver {
    config: AlnsConfig,
    destroy: Vec<DestroyOperator>,
    repair: Vec<RepairOperator>,
}

impl AlnsSolver {
    /// Creates a solver with the default operator set: random and non-peak
    /// removal, random insertion and justify.
    pub fn new(config: AlnsConfig) -> Self {
        let fraction = config.destroy_fraction;
        Self {
            config,
            destroy: vec![
                DestroyOperator::RandomRemoval { fraction },
                DestroyOperator::NonPeakRemoval { fraction },
            ],
            repair: vec![RepairOperator::RandomInsertion, RepairOperator::Justify],
        }
    }

    /// Replaces the operator set.
    pub fn with_operators(
        mut self,
        destroy: Vec<DestroyOperator>,
        repair: Vec<RepairOperator>,
    ) -> Self {
        self.destroy = destroy;
        self.repair = repair;
        self
    }

    /// The configuration.
    pub fn config(&self) -> &AlnsConfig {
        &self.config
    }

    /// Runs the search from the longest-tail initial order.
    ///
    /// # Errors
    /// Invalid configuration, an empty operator set, or any fatal
    /// scheduling error raised while evaluating a state.
    pub fn run(&self, problem: Arc<Problem>) -> RcpspResult<AlnsResult> {
        let order = topological_lrp_order(&problem)?;
        let initial = RcpspState::new(order, problem)?;
        self.run_from(initial)
    }

    /// Runs the search from a given initial state.
    pub fn run_from(&self, initial: RcpspState) -> RcpspResult<AlnsResult> {
        self.config.validate()?;
        if self.destroy.is_empty() || self.repair.is_empty() {
            return Err(RcpspError::InvalidInput(
                "at least one destroy and one repair operator are required".into(),
            ));
        }

        let iterations = self.config.iterations;
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut wheel = RouletteWheel::new(
            self.config.selection.clone(),
            self.destroy.len(),
            self.repair.len(),
        );

        let initial_objective = initial.objective();
        let mut annealing =
            SimulatedAnnealing::autofit(&self.config.acceptance, initial_objective, iterations);
        let mut destroy_stats: Vec<OperatorStats> =
            self.destroy.iter().map(|op| OperatorStats::new(op.name())).collect();
        let mut repair_stats: Vec<OperatorStats> =
            self.repair.iter().map(|op| OperatorStats::new(op.name())).collect();

        info!(
            iterations,
            seed = self.config.seed,
            initial_objective,
            start_temperature = annealing.temperature(),
            "Starting ALNS"
        );

        let mut current = initial;
        let mut best = current.clone();
        let mut improvements = 0;

        for iteration in 0..iterations {
            let (d, r) = wheel.select(&mut rng);
            let destroyed = self.destroy[d].apply(&current, &mut rng)?;
            let candidate = self.repair[r].apply(&destroyed.state, &destroyed.removed, &mut rng)?;

            let current_objective = current.objective();
            let candidate_objective = candidate.objective();

            let mut outcome =
                if annealing.accept(current_objective, candidate_objective, &mut rng) {
                    let tier = if candidate_objective < current_objective {
                        Outcome::Better
                    } else {
                        Outcome::Accepted
                    };
                    current = candidate.clone();
                    tier
                } else {
                    Outcome::Rejected
                };

            if candidate_objective < best.objective() {
                info!(iteration, makespan = candidate.makespan(), "New best");
                best = candidate.clone();
                current = candidate;
                improvements += 1;
                outcome = Outcome::Best;
            }

            debug!(
                iteration,
                destroy = self.destroy[d].name(),
                repair = self.repair[r].name(),
                candidate = candidate_objective,
                ?outcome,
                temperature = annealing.temperature(),
                "Iteration"
            );

            wheel.update(d, r, outcome);
            destroy_stats[d].record(outcome);
            repair_stats[r].record(outcome);
            trace!(
                destroy_weights = ?wheel.destroy_weights(),
                repair_weights = ?wheel.repair_weights(),
                "Operator weights"
            );
        }

        info!(
            best_objective = best.objective(),
            makespan = best.makespan(),
            improvements,
            "ALNS finished"
        );

        Ok(AlnsResult {
            best,
            initial_objective,
            iterations,
            improvements,
            destroy_weights: wheel.destroy_weights().to_vec(),
            repair_weights: wheel.repair_weights().to_vec(),
            destroy_stats,
            repair_stats,
        })
    }
}

/// Validates the problem, runs the search and summarizes the best state.
///
/// # Example
/// ```
/// use u_rcpsp::alns::{solve, AlnsConfig};
/// use u_rcpsp::models::Problem;
///
/// let problem = Problem::new(
///     vec![0, 2, 3, 1, 0],
///     vec![vec![], vec![0], vec![0], vec![0], vec![1, 2, 3]],
///     vec![vec![0], vec![1], vec![1], vec![1], vec![0]],
///     vec![vec![1]],
///     vec!["R".into()],
/// );
/// let summary = solve(problem, &AlnsConfig::default().with_iterations(50)).unwrap();
/// assert_eq!(summary.makespan, 6);
/// ```
///
/// # Errors
/// [`RcpspError::Validation`] for a malformed problem, and
/// [`RcpspError::IncompleteSchedule`] if no order placing every job was found.
pub fn solve(problem: Problem, config: &AlnsConfig) -> RcpspResult<ScheduleSummary> {
    validate_problem(&problem).map_err(RcpspError::Validation)?;
    let problem = Arc::new(problem);
    let result = AlnsSolver::new(config.clone()).run(Arc::clone(&problem))?;
    let best = &result.best;
    if !best.is_complete() {
        return Err(RcpspError::IncompleteSchedule {
            unscheduled: best.unscheduled_jobs(),
        });
    }
    Ok(summarize(&problem, best.order(), best.schedule()))
}
