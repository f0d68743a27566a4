//! Weighted outcome tables for stochastic productions

use rand::Rng;
use tracing::warn;

/// Slack allowed on the running probability total before it is reported
const PROBABILITY_EPSILON: f64 = 1e-9;

/// One possible successor of a stochastic production
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<M> {
    pub successor: Vec<M>,
    pub probability: f64,
}

/// Ordered outcome table. Insertion order is the accumulation order.
///
/// Probabilities are not required to sum to 1.0. The last registered outcome
/// is the catch-all: it absorbs any draw the running total does not cover,
/// so an under-specified table skews towards it and an over-specified one
/// saturates before reaching the later entries.
#[derive(Debug, Clone, PartialEq)]
pub struct StochasticOutcomes<M> {
    outcomes: Vec<Outcome<M>>,
}

impl<M> Default for StochasticOutcomes<M> {
    fn default() -> Self {
        Self {
            outcomes: Vec::new(),
        }
    }
}

impl<M> StochasticOutcomes<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an outcome drawn with probability `probability`.
    pub fn add_outcome(&mut self, successor: Vec<M>, probability: f64) {
        let total = self.total_probability() + probability;
        if probability < 0.0 {
            warn!(
                "Stochastic outcome registered with negative probability {}",
                probability
            );
        } else if total > 1.0 + PROBABILITY_EPSILON {
            warn!(
                "Stochastic outcome probabilities sum to {} (> 1.0); later outcomes are only reachable as the fallback",
                total
            );
        }
        self.outcomes.push(Outcome {
            successor,
            probability,
        });
    }

    pub fn with_outcome(mut self, successor: Vec<M>, probability: f64) -> Self {
        self.add_outcome(successor, probability);
        self
    }

    pub fn outcomes(&self) -> &[Outcome<M>] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn total_probability(&self) -> f64 {
        self.outcomes.iter().map(|o| o.probability).sum()
    }

    /// Index of the outcome selected by the draw `roll` in `[0, 1)`.
    ///
    /// The first outcome whose cumulative probability strictly exceeds
    /// `roll` wins; when none does, the last outcome is returned. `None`
    /// only for an empty table.
    pub fn select(&self, roll: f64) -> Option<usize> {
        let mut total = 0.0;
        for (index, outcome) in self.outcomes.iter().enumerate() {
            total += outcome.probability;
            if roll < total {
                return Some(index);
            }
        }
        self.outcomes.len().checked_sub(1)
    }

    /// Draw one successor. An empty table yields an empty successor.
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> &[M] {
        let roll: f64 = rng.gen();
        match self.select(roll) {
            Some(index) => &self.outcomes[index].successor,
            None => &[],
        }
    }
}
