use super::EngineConfig;
use crate::error::{LSystemError, Result};
use crate::module::Symbol;
use crate::notation::{parse_rule, parse_symbols};
use crate::production::Production;
use crate::stochastic::StochasticOutcomes;
use crate::system::LSystem;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Description of a system over [`Symbol`]s, typically loaded from TOML:
///
/// ```toml
/// axiom = "A"
/// generations = 5
///
/// [engine]
/// seed = 7
///
/// [[rules]]
/// rule = "A -> AB"
///
/// [[rules]]
/// rule = "B"
/// outcomes = [
///   { successor = "A", probability = 0.5 },
///   { successor = "BB", probability = 0.5 },
/// ]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemDefinition {
    /// Initial generation in symbol notation
    pub axiom: String,
    /// Default number of steps for consumers that run the system
    #[serde(default)]
    pub generations: Option<usize>,
    #[serde(default)]
    pub engine: EngineConfig,
    /// Productions in priority order
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    /// Rule notation; must omit `-> successor` when `outcomes` is given
    pub rule: String,
    #[serde(default)]
    pub outcomes: Option<Vec<OutcomeDefinition>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeDefinition {
    pub successor: String,
    pub probability: f64,
}

impl RuleDefinition {
    pub fn to_production(&self) -> Result<Production<Symbol>> {
        let pattern = parse_rule(&self.rule)?;

        let Some(outcomes) = &self.outcomes else {
            if pattern.successor.is_none() {
                return Err(LSystemError::Config(format!(
                    "rule '{}' has neither a successor nor outcomes",
                    self.rule
                )));
            }
            return pattern.into_production();
        };

        if pattern.successor.is_some() {
            return Err(LSystemError::Config(format!(
                "rule '{}' has both a successor and outcomes",
                self.rule
            )));
        }
        let matched = pattern.matched.ok_or(LSystemError::MissingMatch)?;
        let mut table = StochasticOutcomes::new();
        for outcome in outcomes {
            table.add_outcome(parse_symbols(&outcome.successor)?, outcome.probability);
        }
        Ok(Production::stochastic(pattern.left, matched, pattern.right, table))
    }
}

impl SystemDefinition {
    /// Load a definition from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let definition = Self::from_toml_str(&content)?;
        info!(
            "Loaded system definition from {} ({} rules)",
            path.display(),
            definition.rules.len()
        );
        Ok(definition)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn axiom_symbols(&self) -> Result<Vec<Symbol>> {
        parse_symbols(&self.axiom)
    }

    pub fn productions(&self) -> Result<Vec<Production<Symbol>>> {
        self.rules.iter().map(RuleDefinition::to_production).collect()
    }

    /// Construct the system with its productions registered and the axiom set
    pub fn build(&self) -> Result<LSystem<Symbol>> {
        let mut system = LSystem::with_config(self.engine.clone());
        for production in self.productions()? {
            system.add_production(production);
        }
        system.set_axiom(&self.axiom_symbols()?);
        Ok(system)
    }
}
