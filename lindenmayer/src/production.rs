//! Context-sensitive productions
//!
//! A production binds an optional left context, a required match module and
//! an optional right context to a successor. Each of the three slots can
//! override default equality with its own comparator.

use crate::error::{LSystemError, Result};
use crate::module::Module;
use crate::stochastic::StochasticOutcomes;
use itertools::Itertools;
use rand::Rng;
use std::fmt;

/// Slot predicate `(expected, actual) -> bool`.
///
/// `expected` is the production's stored module, `actual` the live
/// neighbour or current module. Context slots pass `None` when the
/// neighbour is off the end of the generation; a comparator may accept that.
pub type Comparator<M> = Box<dyn Fn(&M, Option<&M>) -> bool>;

/// How a matched production produces its replacement
#[derive(Debug, Clone, PartialEq)]
pub enum Successor<M> {
    /// Fixed templates; an empty list deletes the matched module
    Deterministic(Vec<M>),
    /// Weighted draw among registered outcomes
    Stochastic(StochasticOutcomes<M>),
}

impl<M> Successor<M> {
    /// Template sequence for one application of the production.
    ///
    /// The generator is only consulted by stochastic successors.
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> &[M] {
        match self {
            Successor::Deterministic(templates) => templates,
            Successor::Stochastic(outcomes) => outcomes.resolve(rng),
        }
    }
}

pub struct Production<M> {
    left: Option<M>,
    matched: M,
    right: Option<M>,
    left_compare: Option<Comparator<M>>,
    match_compare: Option<Comparator<M>>,
    right_compare: Option<Comparator<M>>,
    successor: Successor<M>,
}

impl<M: Module> Production<M> {
    /// Context-free production `matched -> successor`
    pub fn new(matched: M, successor: Vec<M>) -> Self {
        Self::context(None, matched, None, successor)
    }

    /// Context-sensitive production `left < matched > right -> successor`
    pub fn context(left: Option<M>, matched: M, right: Option<M>, successor: Vec<M>) -> Self {
        Self::with_successor(left, matched, right, Successor::Deterministic(successor))
    }

    /// Production whose successor is drawn from `outcomes`
    pub fn stochastic(
        left: Option<M>,
        matched: M,
        right: Option<M>,
        outcomes: StochasticOutcomes<M>,
    ) -> Self {
        Self::with_successor(left, matched, right, Successor::Stochastic(outcomes))
    }

    fn with_successor(
        left: Option<M>,
        matched: M,
        right: Option<M>,
        successor: Successor<M>,
    ) -> Self {
        Self {
            left,
            matched,
            right,
            left_compare: None,
            match_compare: None,
            right_compare: None,
            successor,
        }
    }

    pub fn builder() -> ProductionBuilder<M> {
        ProductionBuilder::new()
    }

    pub fn left(&self) -> Option<&M> {
        self.left.as_ref()
    }

    pub fn matched(&self) -> &M {
        &self.matched
    }

    pub fn right(&self) -> Option<&M> {
        self.right.as_ref()
    }

    pub fn successor(&self) -> &Successor<M> {
        &self.successor
    }

    pub fn is_stochastic(&self) -> bool {
        matches!(self.successor, Successor::Stochastic(_))
    }

    pub fn is_context_free(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Whether the production applies to `current` between the given
    /// neighbours. Empty context slots are satisfied by anything.
    pub fn is_match(&self, left: Option<&M>, current: &M, right: Option<&M>) -> bool {
        if let Some(expected) = &self.left {
            if !slot_matches(expected, left, self.left_compare.as_ref()) {
                return false;
            }
        }

        if let Some(expected) = &self.right {
            if !slot_matches(expected, right, self.right_compare.as_ref()) {
                return false;
            }
        }

        slot_matches(&self.matched, Some(current), self.match_compare.as_ref())
    }

    /// Successor templates for one application. Callers clone the result
    /// before splicing it anywhere.
    pub fn resolve_successor<R: Rng + ?Sized>(&self, rng: &mut R) -> &[M] {
        self.successor.resolve(rng)
    }
}

fn slot_matches<M: PartialEq>(
    expected: &M,
    actual: Option<&M>,
    compare: Option<&Comparator<M>>,
) -> bool {
    match compare {
        Some(compare) => compare(expected, actual),
        None => actual == Some(expected),
    }
}

impl<M: fmt::Debug> fmt::Debug for Production<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Production")
            .field("left", &self.left)
            .field("matched", &self.matched)
            .field("right", &self.right)
            .field("left_compare", &self.left_compare.is_some())
            .field("match_compare", &self.match_compare.is_some())
            .field("right_compare", &self.right_compare.is_some())
            .field("successor", &self.successor)
            .finish()
    }
}

impl<M: Module> fmt::Display for Production<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(left) = &self.left {
            write!(f, "{} < ", left)?;
        }
        write!(f, "{}", self.matched)?;
        if let Some(right) = &self.right {
            write!(f, " > {}", right)?;
        }
        match &self.successor {
            Successor::Deterministic(templates) => {
                write!(f, " -> {}", crate::module::render(templates))
            }
            Successor::Stochastic(outcomes) => write!(
                f,
                " -> {{{}}}",
                outcomes
                    .outcomes()
                    .iter()
                    .map(|o| format!("{}: {}", o.probability, crate::module::render(&o.successor)))
                    .join(" | ")
            ),
        }
    }
}

/// Fluent interface for assembling a production.
///
/// The match module is the one required field; `build` fails with
/// [`LSystemError::MissingMatch`] without it.
pub struct ProductionBuilder<M> {
    left: Option<M>,
    matched: Option<M>,
    right: Option<M>,
    left_compare: Option<Comparator<M>>,
    match_compare: Option<Comparator<M>>,
    right_compare: Option<Comparator<M>>,
    successor: Vec<M>,
    outcomes: Option<StochasticOutcomes<M>>,
}

impl<M: Module> Default for ProductionBuilder<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Module> ProductionBuilder<M> {
    pub fn new() -> Self {
        Self {
            left: None,
            matched: None,
            right: None,
            left_compare: None,
            match_compare: None,
            right_compare: None,
            successor: Vec::new(),
            outcomes: None,
        }
    }

    /// Set the left context
    pub fn with_left(mut self, left: M) -> Self {
        self.left = Some(left);
        self
    }

    /// Set the module to rewrite
    pub fn matching(mut self, matched: M) -> Self {
        self.matched = Some(matched);
        self
    }

    /// Set the right context
    pub fn with_right(mut self, right: M) -> Self {
        self.right = Some(right);
        self
    }

    /// Append one module to the deterministic successor
    pub fn with_module(mut self, module: M) -> Self {
        self.successor.push(module);
        self
    }

    /// Append modules to the deterministic successor
    pub fn with_successor(mut self, modules: Vec<M>) -> Self {
        self.successor.extend(modules);
        self
    }

    /// Register a stochastic outcome; the built production becomes stochastic
    pub fn with_outcome(mut self, successor: Vec<M>, probability: f64) -> Self {
        self.outcomes
            .get_or_insert_with(StochasticOutcomes::new)
            .add_outcome(successor, probability);
        self
    }

    pub fn compare_left<F>(mut self, compare: F) -> Self
    where
        F: Fn(&M, Option<&M>) -> bool + 'static,
    {
        self.left_compare = Some(Box::new(compare));
        self
    }

    pub fn compare_match<F>(mut self, compare: F) -> Self
    where
        F: Fn(&M, Option<&M>) -> bool + 'static,
    {
        self.match_compare = Some(Box::new(compare));
        self
    }

    pub fn compare_right<F>(mut self, compare: F) -> Self
    where
        F: Fn(&M, Option<&M>) -> bool + 'static,
    {
        self.right_compare = Some(Box::new(compare));
        self
    }

    pub fn build(self) -> Result<Production<M>> {
        let matched = self.matched.ok_or(LSystemError::MissingMatch)?;

        let successor = match self.outcomes {
            Some(_) if !self.successor.is_empty() => {
                return Err(LSystemError::Config(format!(
                    "production for '{}' has both a fixed successor and stochastic outcomes",
                    matched
                )));
            }
            Some(outcomes) => Successor::Stochastic(outcomes),
            None => Successor::Deterministic(self.successor),
        };

        Ok(Production {
            left: self.left,
            matched,
            right: self.right,
            left_compare: self.left_compare,
            match_compare: self.match_compare,
            right_compare: self.right_compare,
            successor,
        })
    }
}
