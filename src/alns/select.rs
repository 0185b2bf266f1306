//! Adaptive roulette-wheel operator selection.
//!
//! Every destroy and repair operator carries a weight. After each iteration
//! the weights of the two operators used are blended toward the score of the
//! observed [`Outcome`]:
//!
//! ```text
//! w ← decay · w + (1 − decay) · score[outcome]
//! ```
//!
//! A smaller decay lets recent performance dominate faster.
//!
//! # Reference
//! Ropke & Pisinger (2006), "An Adaptive Large Neighborhood Search Heuristic
//! for the Pickup and Delivery Problem with Time Windows"

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Outcome tier of one iteration, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// New global best.
    Best,
    /// Accepted and better than the current state.
    Better,
    /// Accepted without improving the current state.
    Accepted,
    /// Rejected.
    Rejected,
}

impl Outcome {
    /// Index into [`SelectionConfig::scores`].
    pub fn index(self) -> usize {
        match self {
            Self::Best => 0,
            Self::Better => 1,
            Self::Accepted => 2,
            Self::Rejected => 3,
        }
    }
}

/// Roulette-wheel parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Scores for best, better, accepted and rejected outcomes.
    pub scores: [f64; 4],
    /// Weight retention per update, in [0, 1].
    pub decay: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            scores: [1.0, 0.8, 0.5, 0.3],
            decay: 0.8,
        }
    }
}

/// Adaptive weights over destroy and repair operators.
#[derive(Debug, Clone)]
pub struct RouletteWheel {
    config: SelectionConfig,
    destroy_weights: Vec<f64>,
    repair_weights: Vec<f64>,
}

impl RouletteWheel {
    /// Creates a wheel with unit weights.
    pub fn new(config: SelectionConfig, destroy_count: usize, repair_count: usize) -> Self {
        Self {
            config,
            destroy_weights: vec![1.0; destroy_count],
            repair_weights: vec![1.0; repair_count],
        }
    }

    /// Picks a (destroy, repair) index pair proportionally to the weights.
    pub fn select<R: Rng + ?Sized>(&self, rng: &mut R) -> (usize, usize) {
        let destroy = spin(&self.destroy_weights, rng);
        let repair = spin(&self.repair_weights, rng);
        (destroy, repair)
    }

    /// Blends the weights of the operators used toward the outcome's score.
    pub fn update(&mut self, destroy: usize, repair: usize, outcome: Outcome) {
        let score = self.config.scores[outcome.index()];
        let decay = self.config.decay;
        for w in [
            &mut self.destroy_weights[destroy],
            &mut self.repair_weights[repair],
        ] {
            *w = *w * decay + (1.0 - decay) * score;
        }
    }

    /// Current destroy operator weights.
    pub fn destroy_weights(&self) -> &[f64] {
        &self.destroy_weights
    }

    /// Current repair operator weights.
    pub fn repair_weights(&self) -> &[f64] {
        &self.repair_weights
    }
}

/// Cumulative-weight sampling. Falls back to uniform when all weights are 0.
fn spin<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().sum();
    if weights.len() <= 1 {
        return 0;
    }
    if total <= 0.0 {
        return rng.random_range(0..weights.len());
    }

    let target = rng.random::<f64>() * total;
    let mut acc = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        acc += w;
        if target < acc {
            return i;
        }
    }
    weights.len() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_update_blends_toward_score() {
        let mut wheel = RouletteWheel::new(SelectionConfig::default(), 2, 2);
        wheel.update(0, 1, Outcome::Rejected);
        assert!((wheel.destroy_weights()[0] - (0.8 + 0.2 * 0.3)).abs() < 1e-12);
        assert_eq!(wheel.destroy_weights()[1], 1.0);
        assert!((wheel.repair_weights()[1] - 0.86).abs() < 1e-12);

        wheel.update(0, 1, Outcome::Best);
        assert!((wheel.destroy_weights()[0] - (0.86 * 0.8 + 0.2)).abs() < 1e-12);
    }

    #[test]
    fn test_select_favors_heavier_weight() {
        let mut wheel = RouletteWheel::new(
            SelectionConfig {
                scores: [1.0, 0.8, 0.5, 0.0],
                decay: 0.0,
            },
            2,
            1,
        );
        wheel.update(1, 0, Outcome::Rejected);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            assert_eq!(wheel.select(&mut rng), (0, 0));
        }
    }

    #[test]
    fn test_select_covers_all_operators() {
        let wheel = RouletteWheel::new(SelectionConfig::default(), 3, 2);
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = [[false; 2]; 3];
        for _ in 0..500 {
            let (d, r) = wheel.select(&mut rng);
            seen[d][r] = true;
        }
        assert!(seen.iter().flatten().all(|&s| s));
    }

    #[test]
    fn test_zero_weights_fall_back_to_uniform() {
        let mut rng = StdRng::seed_from_u64(4);
        let picks: Vec<usize> = (0..200).map(|_| spin(&[0.0, 0.0], &mut rng)).collect();
        assert!(picks.contains(&0));
        assert!(picks.contains(&1));
    }

    #[test]
    fn test_outcome_index() {
        assert_eq!(Outcome::Best.index(), 0);
        assert_eq!(Outcome::Rejected.index(), 3);
    }
}
