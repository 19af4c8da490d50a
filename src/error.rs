//! Error types for pattern parsing and automaton construction.
//!
//! Only [`SyntaxError`] is ever returned to callers. The other two kinds
//! describe misuse and are raised with `panic!` at the point of failure.

use thiserror::Error;

/// The pattern does not match the grammar.
///
/// `offset` is a character (not byte) index into the pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Syntax error at offset {offset}: {message}")]
pub struct SyntaxError {
    pub message: String,
    pub offset: usize,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

/// A character range with malformed bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error("Invalid character range: {lo:?} is greater than {hi:?}")]
    Reversed { lo: char, hi: char },
    #[error("Invalid character range: {lo:?} and {hi:?} differ in case")]
    MixedCase { lo: char, hi: char },
}

/// Invalid use of an automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("Cannot search an empty automaton")]
    EmptyAutomaton,
    #[error("DFA state {state} already has a transition overlapping {lo:?}-{hi:?}")]
    DuplicateTransition { state: usize, lo: char, hi: char },
}
