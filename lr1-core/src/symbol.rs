// Copyright 2026 the lr1-studio authors

use std::fmt;
use std::rc::Rc;

/// A symbol name, cheaply cloneable: grammars are built once and then
/// shared across every item, state and table cell that mentions a symbol.
pub type SymName = Rc<str>;

pub fn sym_name(s: &str) -> SymName {
    Rc::from(s)
}

/// A grammar symbol: terminal or non-terminal. `ε` is never represented as a
/// `Symbol` — an empty right-hand side *is* the ε production (see
/// `Production::is_epsilon`) — and `$` is never a `Symbol` either, since it
/// can only occur as a [`Lookahead`], never on a production's right-hand
/// side.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Terminal(SymName),
    NonTerminal(SymName),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Terminal(name) | Symbol::NonTerminal(name) => name,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }

    pub fn is_non_terminal(&self) -> bool {
        matches!(self, Symbol::NonTerminal(_))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A parser lookahead token: one grammar terminal, or the end-of-input
/// marker `$`. Kept as its own type (rather than folding `$` into
/// [`Symbol`]) so that the type system rules out ever pushing `$` onto a
/// parse stack or treating it as an ordinary terminal during FIRST
/// computation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lookahead {
    Terminal(SymName),
    EndOfInput,
}

impl Lookahead {
    pub fn as_terminal(&self) -> Option<&SymName> {
        match self {
            Lookahead::Terminal(name) => Some(name),
            Lookahead::EndOfInput => None,
        }
    }
}

impl fmt::Display for Lookahead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookahead::Terminal(name) => write!(f, "{}", name),
            Lookahead::EndOfInput => write!(f, "$"),
        }
    }
}

impl From<&SymName> for Lookahead {
    fn from(name: &SymName) -> Self {
        Lookahead::Terminal(name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_display_round_trips_name() {
        let s = Symbol::Terminal(sym_name("id"));
        assert_eq!(s.to_string(), "id");
        assert!(s.is_terminal());
        assert!(!s.is_non_terminal());
    }

    #[test]
    fn end_of_input_displays_as_dollar() {
        assert_eq!(Lookahead::EndOfInput.to_string(), "$");
    }
}
