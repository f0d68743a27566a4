//! Error types for the rewriting engine

/// Errors surfaced by production construction, stepping and system loading.
///
/// Per-step soft conditions (an empty generation, a symbol no production
/// matches, a stochastic production without outcomes) are not errors; they
/// resolve to no-op, identity and deletion respectively.
#[derive(Debug, thiserror::Error)]
pub enum LSystemError {
    #[error("A match module must be given")]
    MissingMatch,

    #[error("No axiom has been set; call set_axiom before stepping")]
    AxiomNotSet,

    #[error("Generation would hold {attempted} symbols, exceeding the limit of {limit}")]
    SymbolLimitExceeded { limit: usize, attempted: usize },

    #[error("Failed to parse '{input}': {message}")]
    Parse { input: String, message: String },

    #[error("Invalid system definition: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, LSystemError>;
