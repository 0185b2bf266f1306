//! Simulated annealing acceptance with automatic temperature calibration.
//!
//! # Calibration
//!
//! The start temperature is chosen so that a candidate worse than the
//! initial objective by the relative margin `worse` is accepted with
//! probability `accept_prob`:
//!
//! ```text
//! T₀ = −worse · f(initial) / ln(accept_prob)
//! ```
//!
//! The temperature then decays exponentially and reaches the end
//! temperature after the iteration budget: `T ← max(T_end, T · step)` with
//! `step = (T_end / T₀)^(1 / iterations)`.
//!
//! # Reference
//! Santini, Ropke & Hvattum (2018), "A comparison of acceptance criteria
//! for the adaptive large neighbourhood search metaheuristic"

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Acceptance parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptanceConfig {
    /// Relative objective margin used for calibration.
    pub worse: f64,
    /// Probability of accepting a candidate `worse` times worse, at start.
    pub accept_prob: f64,
    /// Final temperature.
    pub end_temperature: f64,
}

impl Default for AcceptanceConfig {
    fn default() -> Self {
        Self {
            worse: 0.05,
            accept_prob: 0.8,
            end_temperature: 1.0,
        }
    }
}

/// Simulated annealing acceptance criterion.
#[derive(Debug, Clone)]
pub struct SimulatedAnnealing {
    temperature: f64,
    end_temperature: f64,
    step: f64,
}

impl SimulatedAnnealing {
    /// Creates a criterion from explicit start/end temperatures.
    ///
    /// A start below the end temperature is raised to it.
    pub fn new(start_temperature: f64, end_temperature: f64, iterations: usize) -> Self {
        let start = start_temperature.max(end_temperature);
        let step = if iterations == 0 || start <= 0.0 {
            1.0
        } else {
            (end_temperature / start).powf(1.0 / iterations as f64)
        };
        Self {
            temperature: start,
            end_temperature,
            step,
        }
    }

    /// Calibrates the start temperature from the initial objective.
    pub fn autofit(config: &AcceptanceConfig, initial_objective: f64, iterations: usize) -> Self {
        let start = -config.worse * initial_objective / config.accept_prob.ln();
        Self::new(start, config.end_temperature, iterations)
    }

    /// Current temperature.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Decides whether `candidate` replaces `current`, then cools down.
    ///
    /// Never-worse candidates are always accepted. One uniform draw is taken
    /// on every call.
    pub fn accept<R: Rng + ?Sized>(&mut self, current: f64, candidate: f64, rng: &mut R) -> bool {
        let probability = if candidate <= current {
            1.0
        } else {
            (-(candidate - current) / self.temperature).exp()
        };
        let draw = rng.random::<f64>();
        self.temperature = (self.temperature * self.step).max(self.end_temperature);
        draw < probability
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_autofit_start_temperature() {
        let sa = SimulatedAnnealing::autofit(&AcceptanceConfig::default(), 100.0, 10);
        let expected = -0.05 * 100.0 / 0.8f64.ln();
        assert!((sa.temperature() - expected).abs() < 1e-9);
        // A 5% worse candidate is accepted with probability 0.8 at start.
        assert!(((-5.0 / sa.temperature()).exp() - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_reaches_end_temperature() {
        let mut sa = SimulatedAnnealing::new(50.0, 1.0, 20);
        let mut rng = StdRng::seed_from_u64(0);
        let mut previous = sa.temperature();
        for _ in 0..20 {
            sa.accept(10.0, 11.0, &mut rng);
            assert!(sa.temperature() <= previous);
            previous = sa.temperature();
        }
        assert!((sa.temperature() - 1.0).abs() < 1e-9);
        sa.accept(10.0, 11.0, &mut rng);
        assert_eq!(sa.temperature(), 1.0);
    }

    #[test]
    fn test_improvements_always_accepted() {
        let mut sa = SimulatedAnnealing::new(1.0, 1.0, 5);
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..50 {
            assert!(sa.accept(10.0, 9.0, &mut rng));
            assert!(sa.accept(10.0, 10.0, &mut rng));
        }
    }

    #[test]
    fn test_much_worse_rejected_when_cold() {
        let mut sa = SimulatedAnnealing::new(1.0, 1.0, 5);
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..50 {
            assert!(!sa.accept(10.0, 1e12, &mut rng));
        }
    }

    #[test]
    fn test_low_start_is_clamped() {
        let sa = SimulatedAnnealing::autofit(&AcceptanceConfig::default(), 0.0, 100);
        assert_eq!(sa.temperature(), 1.0);
        let sa = SimulatedAnnealing::new(5.0, 1.0, 0);
        assert_eq!(sa.temperature(), 5.0);
    }
}
