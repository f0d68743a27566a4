//! Lindenmayer system rewriting engine
//!
//! Parallel, rule-based rewriting of module sequences with context-sensitive
//! and stochastic productions, custom slot comparators, and hooks for goal
//! adjustment, constraint adjustment and incremental position tracking.
//!
//! ```
//! use lindenmayer::{plain_symbols, LSystem, Production, Symbol};
//!
//! let mut system = LSystem::new();
//! system.add_production(Production::new(Symbol::plain('A'), plain_symbols("AB")));
//! system.add_production(Production::new(Symbol::plain('B'), plain_symbols("A")));
//! system.set_axiom(&plain_symbols("A"));
//!
//! system.step_n(4).unwrap();
//! assert_eq!(system.to_string(), "ABAABABA");
//! ```

pub mod config;
pub mod error;
pub mod module;
#[cfg(feature = "notation")]
pub mod notation;
pub mod production;
pub mod stochastic;
pub mod system;

pub use config::EngineConfig;
#[cfg(feature = "notation")]
pub use config::SystemDefinition;
pub use error::{LSystemError, Result};
pub use module::{plain_symbols, render, Module, Param, Symbol};
pub use production::{Comparator, Production, ProductionBuilder, Successor};
pub use stochastic::{Outcome, StochasticOutcomes};
pub use system::{LSystem, StepView, SuccessorHook, TrackHook};
