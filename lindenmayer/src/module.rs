//! Symbols rewritten by the engine
//!
//! A module is one position in a generation: a signature character plus
//! whatever payload its variant carries. The engine is generic over the
//! [`Module`] capability trait so callers can bring their own symbol types;
//! [`Symbol`] is the ready-made plain/parametric implementation.

use itertools::Itertools;
use ordered_float::OrderedFloat;
use std::fmt;
use std::hash::Hash;

/// Capability interface shared by every symbol type the engine rewrites.
///
/// Equality is the default matching predicate for productions and must cover
/// the variant plus every defining field. `Hash` must agree with `Eq`.
/// `Clone` must produce a fully independent copy: the engine clones
/// successor templates into the live generation and relies on that copy
/// never sharing state with the template.
pub trait Module: Clone + Eq + Hash + fmt::Display + fmt::Debug {
    /// Alphabet letter identifying the module's class
    fn signature(&self) -> char;
}

/// Parameter value carried by a parametric symbol
pub type Param = OrderedFloat<f64>;

/// Default module type: a bare letter, or a letter with numeric parameters.
///
/// A parametric symbol never equals a plain one, even with the same
/// signature and an empty parameter list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Symbol {
    Plain(char),
    Parametric { signature: char, params: Vec<Param> },
}

impl Symbol {
    pub fn plain(signature: char) -> Self {
        Symbol::Plain(signature)
    }

    pub fn parametric<I>(signature: char, params: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        Symbol::Parametric {
            signature,
            params: params.into_iter().map(OrderedFloat).collect(),
        }
    }

    pub fn is_parametric(&self) -> bool {
        matches!(self, Symbol::Parametric { .. })
    }

    /// Parameters of the symbol; empty for plain symbols
    pub fn params(&self) -> &[Param] {
        match self {
            Symbol::Plain(_) => &[],
            Symbol::Parametric { params, .. } => params,
        }
    }

    pub fn param(&self, index: usize) -> Option<f64> {
        self.params().get(index).map(|p| p.into_inner())
    }

    /// Overwrite one parameter in place.
    ///
    /// Returns false when the symbol is plain or `index` is out of range.
    pub fn set_param(&mut self, index: usize, value: f64) -> bool {
        match self {
            Symbol::Plain(_) => false,
            Symbol::Parametric { params, .. } => match params.get_mut(index) {
                Some(slot) => {
                    *slot = OrderedFloat(value);
                    true
                }
                None => false,
            },
        }
    }
}

impl Module for Symbol {
    fn signature(&self) -> char {
        match self {
            Symbol::Plain(signature) => *signature,
            Symbol::Parametric { signature, .. } => *signature,
        }
    }
}

impl From<char> for Symbol {
    fn from(signature: char) -> Self {
        Symbol::Plain(signature)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Plain(signature) => write!(f, "{}", signature),
            Symbol::Parametric { signature, params } => {
                write!(f, "{}({})", signature, params.iter().join(","))
            }
        }
    }
}

/// One plain symbol per character of `word`, whitespace skipped
pub fn plain_symbols(word: &str) -> Vec<Symbol> {
    word.chars()
        .filter(|c| !c.is_whitespace())
        .map(Symbol::Plain)
        .collect()
}

/// Concatenated textual form of a module sequence
pub fn render<M: Module>(modules: &[M]) -> String {
    modules.iter().map(|m| m.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::Hasher;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_plain_equality() {
        let m1 = Symbol::plain('A');
        let m2 = Symbol::plain('A');
        let m3 = Symbol::plain('B');

        assert_eq!(m1, m2);
        assert_ne!(m1, m3);
        assert_eq!(hash_of(&m1), hash_of(&m2));
    }

    #[test]
    fn test_variant_participates_in_equality() {
        let plain = Symbol::plain('A');
        let empty_params = Symbol::parametric('A', Vec::new());
        assert_ne!(plain, empty_params);
        assert_eq!(plain.signature(), empty_params.signature());
    }

    #[test]
    fn test_parametric_equality_covers_params() {
        assert_eq!(Symbol::parametric('B', [10.0]), Symbol::parametric('B', [10.0]));
        assert_ne!(Symbol::parametric('B', [10.0]), Symbol::parametric('B', [11.0]));
        assert_ne!(Symbol::parametric('B', [10.0]), Symbol::parametric('C', [10.0]));
        assert_eq!(
            hash_of(&Symbol::parametric('B', [1.5, 2.0])),
            hash_of(&Symbol::parametric('B', [1.5, 2.0]))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Symbol::plain('F').to_string(), "F");
        assert_eq!(Symbol::parametric('A', [4.0]).to_string(), "A(4)");
        assert_eq!(Symbol::parametric('F', [1.0, 2.5]).to_string(), "F(1,2.5)");
        assert_eq!(render(&plain_symbols("AB A")), "ABA");
    }

    #[test]
    fn test_set_param() {
        let mut b = Symbol::parametric('B', [10.0]);
        assert!(b.set_param(0, 21.0));
        assert_eq!(b.param(0), Some(21.0));
        assert!(!b.set_param(1, 3.0));

        let mut plain = Symbol::plain('A');
        assert!(!plain.set_param(0, 1.0));
        assert_eq!(plain.param(0), None);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Symbol::parametric('A', [10.0]);
        let mut copy = original.clone();
        copy.set_param(0, 15.0);
        assert_eq!(original.param(0), Some(10.0));
        assert_eq!(copy.param(0), Some(15.0));
    }
}
