// Copyright 2026 the lr1-studio authors
//
// No `GrammarNotLr1` variant here: a grammar with shift/reduce or
// reduce/reduce conflicts still builds a full report, with conflicts
// surfaced as data in the ACTION table.

use std::fmt;

/// Errors an adapter can map onto a client-error vs. server-error
/// distinction: `EmptyGrammar` is caller input, `StepLimitExceeded` is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// No productions were accepted from the grammar text.
    EmptyGrammar,
    /// The parse driver exceeded its step ceiling without accepting or
    /// erroring out — an internal invariant violation, not a rejection.
    StepLimitExceeded { limit: usize },
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::EmptyGrammar => write!(f, "empty grammar"),
            CoreError::StepLimitExceeded { limit } => {
                write!(f, "parser internal error: exceeded step limit of {}", limit)
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<crate::grammar::EmptyGrammarError> for CoreError {
    fn from(_: crate::grammar::EmptyGrammarError) -> Self {
        CoreError::EmptyGrammar
    }
}
