use crate::error::{LSystemError, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Environment variable overriding [`EngineConfig::seed`]
pub const SEED_ENV: &str = "LSYSTEM_SEED";
/// Environment variable overriding [`EngineConfig::max_symbols`]
pub const MAX_SYMBOLS_ENV: &str = "LSYSTEM_MAX_SYMBOLS";

/// Runtime settings of an [`LSystem`](crate::LSystem)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for the generator behind stochastic productions; entropy when unset
    pub seed: Option<u64>,
    /// Largest generation a step may produce
    pub max_symbols: Option<usize>,
}

impl EngineConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn with_max_symbols(mut self, max_symbols: usize) -> Self {
        self.max_symbols = Some(max_symbols);
        self
    }

    /// Apply `LSYSTEM_SEED` / `LSYSTEM_MAX_SYMBOLS` on top of this config
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(
            std::env::var(SEED_ENV).ok().as_deref(),
            std::env::var(MAX_SYMBOLS_ENV).ok().as_deref(),
        )
    }

    fn with_overrides(mut self, seed: Option<&str>, max_symbols: Option<&str>) -> Result<Self> {
        if let Some(raw) = seed {
            let seed = raw.trim().parse::<u64>().map_err(|e| {
                LSystemError::Config(format!("{} must be an unsigned integer: {}", SEED_ENV, e))
            })?;
            self.seed = Some(seed);
        }
        if let Some(raw) = max_symbols {
            let limit = raw.trim().parse::<usize>().map_err(|e| {
                LSystemError::Config(format!(
                    "{} must be an unsigned integer: {}",
                    MAX_SYMBOLS_ENV, e
                ))
            })?;
            self.max_symbols = Some(limit);
        }
        Ok(self)
    }

    pub(crate) fn make_rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => {
                debug!("No seed configured, seeding stochastic generator from entropy");
                StdRng::from_entropy()
            }
        }
    }
}
