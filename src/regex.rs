//! A compiled pattern, ready to search.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use crate::dfa::Dfa;
use crate::error::SyntaxError;
use crate::nfa::Nfa;
use crate::nfa::compiler::compile;
use crate::nfa::matcher::{Match, MatchMode, Matcher};
use crate::pattern::parse;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regex {
    pattern: String,
    nfa: Nfa,
}

impl Regex {
    /// Parse and compile `pattern`.
    ///
    /// # Panics
    ///
    /// When a character class range has malformed bounds, such as `[z-a]`.
    pub fn new(pattern: &str) -> Result<Self, SyntaxError> {
        let ast = parse(pattern)?;
        Ok(Self {
            pattern: pattern.to_string(),
            nfa: compile(&ast),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn nfa(&self) -> &Nfa {
        &self.nfa
    }

    /// Number of capture slots, including group 0.
    pub fn group_count(&self) -> usize {
        self.nfa.group_count()
    }

    /// One leftmost match per end offset, ascending by end offset.
    pub fn search(&self, subject: &str) -> Vec<Match> {
        Matcher::new(&self.nfa).search(subject, MatchMode::BestOnly)
    }

    /// Every accepting thread at every offset, one per distinct start.
    pub fn search_exhaustive(&self, subject: &str) -> Vec<Match> {
        Matcher::new(&self.nfa).search(subject, MatchMode::Exhaustive)
    }

    /// End offsets of [`search`](Self::search).
    pub fn end_offsets(&self, subject: &str) -> Vec<isize> {
        self.search(subject).iter().map(|m| m.end).collect()
    }

    /// The leftmost-longest match.
    pub fn find(&self, subject: &str) -> Option<Match> {
        self.search(subject)
            .into_iter()
            .min_by_key(|m| (m.start(), Reverse(m.end)))
    }

    pub fn is_match(&self, subject: &str) -> bool {
        !self.search(subject).is_empty()
    }

    pub fn to_dfa(&self) -> Dfa {
        Dfa::from_nfa(&self.nfa)
    }
}

impl FromStr for Regex {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}
