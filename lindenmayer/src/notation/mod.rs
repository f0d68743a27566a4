//! Textual notation for symbols and productions
//!
//! Symbols are written as their signature character followed by an optional
//! parenthesised parameter list: `A(1,2.5)B[+F]`. Productions follow the
//! usual `left < match > right -> successor` form, with both contexts and the
//! arrow optional:
//!
//! ```text
//! A -> AB          context-free
//! A > B -> DC      A followed by B becomes DC
//! C < B -> A       B preceded by C becomes A
//! A(0) -> A(1)B    parametric
//! X -> ε           deletion (an empty successor works too)
//! ```

use crate::error::{LSystemError, Result};
use crate::module::Symbol;
use crate::production::{Production, ProductionBuilder};
use pest::iterators::Pair;
use pest::Parser;

#[derive(pest_derive::Parser)]
#[grammar = "notation/lsystem.pest"]
struct NotationParser;

/// Slots of a parsed rule, before validation.
///
/// `successor` is `None` when the rule has no arrow, which is how stochastic
/// rules are written before their outcomes are attached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RulePattern {
    pub left: Option<Symbol>,
    pub matched: Option<Symbol>,
    pub right: Option<Symbol>,
    pub successor: Option<Vec<Symbol>>,
}

impl RulePattern {
    /// Builder carrying the parsed slots and successor
    pub fn into_builder(self) -> ProductionBuilder<Symbol> {
        let mut builder = ProductionBuilder::new();
        if let Some(left) = self.left {
            builder = builder.with_left(left);
        }
        if let Some(matched) = self.matched {
            builder = builder.matching(matched);
        }
        if let Some(right) = self.right {
            builder = builder.with_right(right);
        }
        if let Some(successor) = self.successor {
            builder = builder.with_successor(successor);
        }
        builder
    }

    pub fn into_production(self) -> Result<Production<Symbol>> {
        self.into_builder().build()
    }
}

impl Production<Symbol> {
    /// Parse a production written in rule notation
    pub fn parse(rule: &str) -> Result<Self> {
        parse_rule(rule)?.into_production()
    }
}

/// Parse a run of symbols such as an axiom
pub fn parse_symbols(input: &str) -> Result<Vec<Symbol>> {
    let mut pairs =
        NotationParser::parse(Rule::symbols, input).map_err(|e| parse_error(input, e))?;
    let root = pairs.next().ok_or_else(|| LSystemError::Parse {
        input: input.to_string(),
        message: "No symbols found".to_string(),
    })?;

    root.into_inner()
        .filter(|p| p.as_rule() == Rule::symbol)
        .map(|p| build_symbol(p, input))
        .collect()
}

/// Parse a rule into its slots. A rule without a match symbol parses; it is
/// rejected when turned into a production.
pub fn parse_rule(input: &str) -> Result<RulePattern> {
    let mut pairs = NotationParser::parse(Rule::rule, input).map_err(|e| parse_error(input, e))?;
    let root = pairs.next().ok_or_else(|| LSystemError::Parse {
        input: input.to_string(),
        message: "No rule found".to_string(),
    })?;

    let mut pattern = RulePattern::default();
    for pair in root.into_inner() {
        match pair.as_rule() {
            Rule::left_context => pattern.left = Some(build_slot(pair, input)?),
            Rule::match_symbol => pattern.matched = Some(build_slot(pair, input)?),
            Rule::right_context => pattern.right = Some(build_slot(pair, input)?),
            Rule::successor => pattern.successor = Some(build_successor(pair, input)?),
            _ => {}
        }
    }
    Ok(pattern)
}

fn parse_error(input: &str, error: pest::error::Error<Rule>) -> LSystemError {
    LSystemError::Parse {
        input: input.to_string(),
        message: error.to_string(),
    }
}

fn build_slot(pair: Pair<Rule>, input: &str) -> Result<Symbol> {
    let symbol = pair.into_inner().next().ok_or_else(|| LSystemError::Parse {
        input: input.to_string(),
        message: "Expected a symbol".to_string(),
    })?;
    build_symbol(symbol, input)
}

fn build_successor(pair: Pair<Rule>, input: &str) -> Result<Vec<Symbol>> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::symbol)
        .map(|p| build_symbol(p, input))
        .collect()
}

fn build_symbol(pair: Pair<Rule>, input: &str) -> Result<Symbol> {
    let mut inner = pair.into_inner();
    let signature = inner
        .next()
        .and_then(|p| p.as_str().chars().next())
        .ok_or_else(|| LSystemError::Parse {
            input: input.to_string(),
            message: "Symbol without a signature".to_string(),
        })?;

    match inner.next() {
        None => Ok(Symbol::Plain(signature)),
        Some(params) => {
            let values = params
                .into_inner()
                .map(|n| {
                    n.as_str().parse::<f64>().map_err(|e| LSystemError::Parse {
                        input: input.to_string(),
                        message: format!("Invalid parameter '{}': {}", n.as_str(), e),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Symbol::parametric(signature, values))
        }
    }
}
