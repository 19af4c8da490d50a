//! Character ranges: validation, merging and complement over the full
//! code-point domain.

use itertools::Itertools;

use crate::error::ConstructionError;

use super::ast::{ClassItem, ClassSet};

/// Characters matched by `\s`. NUL counts as whitespace.
pub const WHITESPACE: [char; 7] = ['\0', '\t', '\n', '\x0B', '\x0C', '\r', ' '];

/// An inclusive range of characters, `lo..=hi`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassRange {
    lo: char,
    hi: char,
}

impl ClassRange {
    /// Validate a range written in a pattern.
    ///
    /// Both endpoints must be in the same case class (digits and punctuation
    /// are caseless and pair with anything caseless) and `lo <= hi`.
    pub fn try_new(lo: char, hi: char) -> Result<Self, ConstructionError> {
        let same_case = (is_lower_invariant(lo) && is_lower_invariant(hi))
            || (is_upper_invariant(lo) && is_upper_invariant(hi));
        if !same_case {
            return Err(ConstructionError::MixedCase { lo, hi });
        }
        if lo > hi {
            return Err(ConstructionError::Reversed { lo, hi });
        }
        Ok(Self { lo, hi })
    }

    /// Like [`ClassRange::try_new`], for bounds the caller guarantees.
    ///
    /// # Panics
    ///
    /// When the bounds are reversed or differ in case.
    pub fn new(lo: char, hi: char) -> Self {
        match Self::try_new(lo, hi) {
            Ok(range) => range,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn single(ch: char) -> Self {
        Self { lo: ch, hi: ch }
    }

    /// Ranges computed by merging or complementing are exempt from the case
    /// rule, which only applies to ranges written in a pattern.
    pub(crate) fn spanning(lo: char, hi: char) -> Self {
        debug_assert!(lo <= hi);
        Self { lo, hi }
    }

    pub fn lo(&self) -> char {
        self.lo
    }

    pub fn hi(&self) -> char {
        self.hi
    }

    pub fn contains(&self, ch: char) -> bool {
        self.lo <= ch && ch <= self.hi
    }

    /// True when `other` starts immediately after `self` ends.
    pub fn abuts(&self, other: &ClassRange) -> bool {
        next_char(self.hi) == Some(other.lo)
    }
}

impl std::fmt::Display for ClassRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.lo == self.hi {
            write!(f, "{}", self.lo.escape_debug())
        } else {
            write!(f, "{}-{}", self.lo.escape_debug(), self.hi.escape_debug())
        }
    }
}

fn is_lower_invariant(ch: char) -> bool {
    let mut lower = ch.to_lowercase();
    lower.next() == Some(ch) && lower.next().is_none()
}

fn is_upper_invariant(ch: char) -> bool {
    let mut upper = ch.to_uppercase();
    upper.next() == Some(ch) && upper.next().is_none()
}

/// The code point after `ch`, skipping the surrogate gap.
pub fn next_char(ch: char) -> Option<char> {
    match ch {
        '\u{D7FF}' => Some('\u{E000}'),
        char::MAX => None,
        _ => char::from_u32(ch as u32 + 1),
    }
}

/// The code point before `ch`, skipping the surrogate gap.
pub fn prev_char(ch: char) -> Option<char> {
    match ch {
        '\u{E000}' => Some('\u{D7FF}'),
        '\0' => None,
        _ => char::from_u32(ch as u32 - 1),
    }
}

/// Sort `ranges` and merge overlapping or adjacent ones.
pub fn merge(ranges: impl IntoIterator<Item = ClassRange>) -> Vec<ClassRange> {
    ranges
        .into_iter()
        .sorted()
        .coalesce(|a, b| {
            if b.lo <= a.hi || a.abuts(&b) {
                Ok(ClassRange::spanning(a.lo, a.hi.max(b.hi)))
            } else {
                Err((a, b))
            }
        })
        .collect()
}

/// Complement a merged, sorted range list against `'\0'..=char::MAX`.
pub fn complement(merged: &[ClassRange]) -> Vec<ClassRange> {
    let mut out = Vec::with_capacity(merged.len() + 1);
    let mut cursor = Some('\0');
    for range in merged {
        let Some(from) = cursor else {
            break;
        };
        if from < range.lo
            && let Some(to) = prev_char(range.lo)
        {
            out.push(ClassRange::spanning(from, to));
        }
        cursor = next_char(range.hi);
    }
    if let Some(from) = cursor {
        out.push(ClassRange::spanning(from, char::MAX));
    }
    out
}

impl ClassSet {
    /// The disjoint, sorted ranges this class matches.
    ///
    /// # Panics
    ///
    /// When a written range has malformed bounds (see [`ClassRange::try_new`]).
    pub fn to_ranges(&self) -> Vec<ClassRange> {
        let merged = merge(self.items.iter().flat_map(item_ranges));
        if self.negated {
            complement(&merged)
        } else {
            merged
        }
    }
}

fn item_ranges(item: &ClassItem) -> Vec<ClassRange> {
    match *item {
        ClassItem::Single(ch) => vec![ClassRange::single(ch)],
        ClassItem::Range(lo, hi) => vec![ClassRange::new(lo, hi)],
        ClassItem::Whitespace => WHITESPACE.into_iter().map(ClassRange::single).collect(),
        ClassItem::NotWhitespace => {
            complement(&merge(WHITESPACE.into_iter().map(ClassRange::single)))
        }
    }
}
