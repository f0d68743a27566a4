// Lindenmayer system CLI
// Loads a system from a TOML definition or from inline rules, steps it and
// prints the resulting generations.

use anyhow::{bail, Context};
use clap::Parser;
use lindenmayer::config::{RuleDefinition, SystemDefinition};
use lindenmayer::{LSystem, Symbol};
use std::path::PathBuf;
use tracing::info;

const DEFAULT_GENERATIONS: usize = 5;

#[derive(Parser, Debug)]
#[command(name = "lsystem")]
#[command(about = "Step a Lindenmayer system and print its generations")]
#[command(version)]
struct Args {
    /// TOML system definition
    #[arg(short = 'd', long = "definition", value_name = "FILE", conflicts_with_all = ["axiom", "rules"])]
    definition: Option<PathBuf>,

    /// Axiom in symbol notation (when not using --definition)
    #[arg(short, long)]
    axiom: Option<String>,

    /// Production in rule notation, e.g. "A > B -> DC"; repeat in priority order
    #[arg(short = 'r', long = "rule", value_name = "RULE")]
    rules: Vec<String>,

    /// Number of generations to compute (defaults to the definition's value, then 5)
    #[arg(short = 'n', long)]
    generations: Option<usize>,

    /// Seed for stochastic productions
    #[arg(long)]
    seed: Option<u64>,

    /// Fail when a generation would exceed this many symbols
    #[arg(long)]
    max_symbols: Option<usize>,

    /// Print every generation instead of only the last one
    #[arg(long)]
    all: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Definition from --definition or the inline flags, with environment
    /// overrides and then command-line overrides applied to the engine config
    fn definition(&self) -> anyhow::Result<SystemDefinition> {
        let mut definition = self.base_definition()?;
        definition.engine = definition.engine.with_env_overrides()?;
        Ok(self.with_flag_overrides(definition))
    }

    fn base_definition(&self) -> anyhow::Result<SystemDefinition> {
        match &self.definition {
            Some(path) => SystemDefinition::from_file(path)
                .with_context(|| format!("Failed to load definition {}", path.display())),
            None => {
                let Some(axiom) = &self.axiom else {
                    bail!("Either --definition or --axiom is required");
                };
                Ok(SystemDefinition {
                    axiom: axiom.clone(),
                    rules: self
                        .rules
                        .iter()
                        .map(|rule| RuleDefinition {
                            rule: rule.clone(),
                            outcomes: None,
                        })
                        .collect(),
                    ..SystemDefinition::default()
                })
            }
        }
    }

    fn with_flag_overrides(&self, mut definition: SystemDefinition) -> SystemDefinition {
        if let Some(seed) = self.seed {
            definition.engine.seed = Some(seed);
        }
        if let Some(max_symbols) = self.max_symbols {
            definition.engine.max_symbols = Some(max_symbols);
        }
        definition
    }
}

fn print_generation(system: &LSystem<Symbol>, all: bool) {
    if all {
        println!("{}: {}", system.generation(), system);
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let directive = if args.verbose {
        "lindenmayer=debug"
    } else {
        "lindenmayer=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse()?),
        )
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let definition = args.definition()?;
    let generations = args
        .generations
        .or(definition.generations)
        .unwrap_or(DEFAULT_GENERATIONS);
    let mut system = definition.build().context("Invalid system definition")?;

    info!(
        "Stepping {} generations over {} productions",
        generations,
        system.productions().len()
    );

    print_generation(&system, args.all);
    for _ in 0..generations {
        system
            .step()
            .with_context(|| format!("Generation {} failed", system.generation() + 1))?;
        print_generation(&system, args.all);
    }

    if !args.all {
        println!("{}", system);
    }
    Ok(())
}
