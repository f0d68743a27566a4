//! The rewriting engine
//!
//! `LSystem` owns an ordered production set and the current generation.
//! Each call to [`LSystem::step`] rewrites every module of the current
//! generation in parallel: for every position the first matching production
//! (in registration order) supplies a successor, which is cloned, offered to
//! the goal and constraint hooks, spliced in place of the module and then
//! reported to the tracking hook one module at a time.
//!
//! Context lookups always read the previous generation, so a neighbour is
//! seen with its pre-rewrite identity even when it has already been
//! rewritten earlier in the same pass.

use crate::config::EngineConfig;
use crate::error::{LSystemError, Result};
use crate::module::{render, Module};
use crate::production::Production;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use tracing::{debug, trace};

/// Hook that may edit a freshly cloned successor before it is spliced in.
///
/// Arguments: the generation as it stands before the current module is
/// replaced, the index of the current module in that view, and the
/// successor clone.
pub type SuccessorHook<M> = Box<dyn FnMut(&StepView<'_, M>, usize, &mut Vec<M>)>;

/// Hook called once per module emitted into the next generation
pub type TrackHook<M> = Box<dyn FnMut(&M)>;

/// Read-only view of a generation in the middle of a step.
///
/// The view is the already rewritten prefix followed by the not yet
/// rewritten suffix, whose first module is the one being replaced.
#[derive(Debug, Clone, Copy)]
pub struct StepView<'a, M> {
    rewritten: &'a [M],
    pending: &'a [M],
}

impl<'a, M> StepView<'a, M> {
    /// Index of the module being replaced
    pub fn position(&self) -> usize {
        self.rewritten.len()
    }

    pub fn current(&self) -> &'a M {
        &self.pending[0]
    }

    pub fn len(&self) -> usize {
        self.rewritten.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<&'a M> {
        if index < self.rewritten.len() {
            self.rewritten.get(index)
        } else {
            self.pending.get(index - self.rewritten.len())
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a M> + 'a {
        self.rewritten.iter().chain(self.pending.iter())
    }

    /// Modules already produced for the next generation
    pub fn rewritten(&self) -> &'a [M] {
        self.rewritten
    }

    /// Current module and the rest of the previous generation
    pub fn pending(&self) -> &'a [M] {
        self.pending
    }
}

pub struct LSystem<M> {
    productions: Vec<Production<M>>,
    axiom: Option<Vec<M>>,
    state: Vec<M>,
    generation: usize,
    goal_hook: Option<SuccessorHook<M>>,
    constraint_hook: Option<SuccessorHook<M>>,
    track_hook: Option<TrackHook<M>>,
    rng: StdRng,
    config: EngineConfig,
}

impl<M: Module> Default for LSystem<M> {
    fn default() -> Self {
        LSystem::new()
    }
}

impl<M: Module> LSystem<M> {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        LSystem {
            productions: Vec::new(),
            axiom: None,
            state: Vec::new(),
            generation: 0,
            goal_hook: None,
            constraint_hook: None,
            track_hook: None,
            rng: config.make_rng(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register a production. Registration order is match priority; the
    /// first production that matches a module wins.
    pub fn add_production(&mut self, production: Production<M>) {
        trace!("Registered production #{}: {}", self.productions.len(), production);
        self.productions.push(production);
    }

    pub fn productions(&self) -> &[Production<M>] {
        &self.productions
    }

    /// Set the initial generation from a copy of `axiom` and reset the
    /// generation counter.
    pub fn set_axiom(&mut self, axiom: &[M]) {
        self.axiom = Some(axiom.to_vec());
        self.state = axiom.to_vec();
        self.generation = 0;
    }

    pub fn axiom(&self) -> Option<&[M]> {
        self.axiom.as_deref()
    }

    /// Restore the stored axiom as the current generation
    pub fn reset(&mut self) -> Result<()> {
        let axiom = self.axiom.as_ref().ok_or(LSystemError::AxiomNotSet)?;
        self.state = axiom.clone();
        self.generation = 0;
        Ok(())
    }

    /// Current generation
    pub fn state(&self) -> &[M] {
        &self.state
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Number of steps applied since the axiom was set
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Replace the generator used by stochastic productions
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn set_goal_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&StepView<'_, M>, usize, &mut Vec<M>) + 'static,
    {
        self.goal_hook = Some(Box::new(hook));
    }

    /// Constraint hooks run after the goal hook, on its result
    pub fn set_constraint_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&StepView<'_, M>, usize, &mut Vec<M>) + 'static,
    {
        self.constraint_hook = Some(Box::new(hook));
    }

    pub fn set_track_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&M) + 'static,
    {
        self.track_hook = Some(Box::new(hook));
    }

    pub fn clear_hooks(&mut self) {
        self.goal_hook = None;
        self.constraint_hook = None;
        self.track_hook = None;
    }

    /// Advance the system by one generation.
    ///
    /// An empty generation is left untouched. The next generation is built
    /// aside and committed only once complete, so a failed step leaves the
    /// current generation as it was.
    ///
    /// With `max_symbols` set, the step fails as soon as a successor would
    /// push the next generation past the limit. Hook calls already made for
    /// earlier positions are not rolled back. The goal and constraint hooks
    /// still run for the failing position, since they may resize its
    /// successor, but the tracking hook never sees a symbol past the limit.
    pub fn step(&mut self) -> Result<()> {
        if self.axiom.is_none() {
            return Err(LSystemError::AxiomNotSet);
        }
        if self.state.is_empty() {
            return Ok(());
        }

        let previous = std::mem::take(&mut self.state);
        let mut next: Vec<M> = Vec::with_capacity(previous.len());
        let mut rewrites = 0usize;

        for (i, current) in previous.iter().enumerate() {
            let left = if i == 0 { None } else { previous.get(i - 1) };
            let right = previous.get(i + 1);
            let position = next.len();

            let production = self
                .productions
                .iter()
                .find(|p| p.is_match(left, current, right));

            match production {
                Some(production) => {
                    trace!("Position {}: {} rewritten by {}", position, current, production);
                    let mut successor = production.resolve_successor(&mut self.rng).to_vec();

                    let view = StepView {
                        rewritten: &next,
                        pending: &previous[i..],
                    };
                    if let Some(goal) = self.goal_hook.as_mut() {
                        goal(&view, position, &mut successor);
                    }
                    if let Some(constraint) = self.constraint_hook.as_mut() {
                        constraint(&view, position, &mut successor);
                    }

                    if let Err(err) = self.check_limit(position + successor.len()) {
                        self.state = previous;
                        return Err(err);
                    }
                    next.extend(successor);
                    rewrites += 1;
                }
                None => {
                    if let Err(err) = self.check_limit(position + 1) {
                        self.state = previous;
                        return Err(err);
                    }
                    next.push(current.clone());
                }
            }

            if let Some(track) = self.track_hook.as_mut() {
                for module in &next[position..] {
                    track(module);
                }
            }
        }

        self.state = next;
        self.generation += 1;
        debug!(
            "Generation {} complete: {} symbols, {} rewrites",
            self.generation,
            self.state.len(),
            rewrites
        );
        Ok(())
    }

    fn check_limit(&self, attempted: usize) -> Result<()> {
        match self.config.max_symbols {
            Some(limit) if attempted > limit => {
                Err(LSystemError::SymbolLimitExceeded { limit, attempted })
            }
            _ => Ok(()),
        }
    }

    /// Apply `count` steps, stopping at the first failure
    pub fn step_n(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            self.step()?;
        }
        Ok(())
    }
}

impl<M: Module> fmt::Display for LSystem<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(&self.state))
    }
}

impl<M: Module> fmt::Debug for LSystem<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LSystem")
            .field("productions", &self.productions)
            .field("axiom", &self.axiom)
            .field("state", &self.state)
            .field("generation", &self.generation)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
