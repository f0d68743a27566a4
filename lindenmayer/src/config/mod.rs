//! Configuration types for the rewriting engine
//!
//! `EngineConfig` carries the runtime knobs of a single system (seed, size
//! limit). `SystemDefinition` describes a whole system in TOML and needs the
//! `notation` feature, since its rules and axiom are written in rule
//! notation.

#[cfg(feature = "notation")]
pub mod definition;
pub mod engine;

#[cfg(feature = "notation")]
pub use definition::*;
pub use engine::*;
