//! Recursive descent parser for regular expression patterns.
//!
//! Every production saves the cursor on entry and puts it back when it
//! fails, so a failed attempt never consumes input.

use phf::{Map, phf_map};

use crate::error::SyntaxError;

use super::ast::*;

/// Escapes that stand for a class rather than the escaped character itself.
const CLASS_ESCAPES: Map<char, ClassItem> = phf_map! {
    's' => ClassItem::Whitespace,
    'S' => ClassItem::NotWhitespace,
};

/// Characters that can never be a bare literal.
const RESERVED: &[char] = &['\\', '(', ')', '[', ']', '|', '^', '$'];

/// Parse a pattern into an [`Ast::Anchored`] tree.
pub fn parse(pattern: &str) -> Result<Ast, SyntaxError> {
    let chars: Vec<char> = pattern.chars().collect();
    let end = chars.len();
    Parser {
        chars,
        pos: 0,
        end,
        last_group: 0,
        failure: None,
    }
    .parse_top_level()
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    /// End of the parse window. A trailing `$` anchor sits outside it.
    end: usize,
    /// Number of the most recently opened group.
    last_group: usize,
    /// The failure that got furthest into the pattern.
    failure: Option<SyntaxError>,
}

impl Parser {
    fn parse_top_level(mut self) -> Result<Ast, SyntaxError> {
        let left = self.eat('^');
        let right = self.has_trailing_anchor();
        if right {
            self.end -= 1;
        }

        match self.parse_union() {
            Some(inner) if self.at_end() => Ok(Ast::Anchored {
                inner: Box::new(inner),
                left,
                right,
            }),
            _ => {
                if let Some(ch) = self.peek() {
                    self.fail(format!("unexpected character {ch:?}"), self.pos);
                }
                Err(self
                    .failure
                    .unwrap_or_else(|| SyntaxError::new("invalid pattern", self.pos)))
            }
        }
    }

    /// `union := concat ('|' union)?`
    fn parse_union(&mut self) -> Option<Ast> {
        let start = self.pos;
        let mut branches = vec![self.parse_concat()?];
        while self.eat('|') {
            match self.parse_concat() {
                Some(branch) => branches.push(branch),
                None => {
                    self.pos = start;
                    return None;
                }
            }
        }
        branches
            .into_iter()
            .rev()
            .reduce(|rest, branch| Ast::union(branch, rest))
    }

    /// `concat := term concat?`
    ///
    /// A branch with no terms is `Empty`, but only at the end of the window or
    /// right before `|`.
    fn parse_concat(&mut self) -> Option<Ast> {
        let start = self.pos;
        let Some(first) = self.parse_term() else {
            if self.at_end() || self.peek() == Some('|') {
                return Some(Ast::Empty);
            }
            self.pos = start;
            return None;
        };

        let mut terms = vec![first];
        while !self.at_end() {
            match self.parse_term() {
                Some(term) => terms.push(term),
                None => break,
            }
        }
        terms
            .into_iter()
            .rev()
            .reduce(|rest, term| Ast::concat(term, rest))
    }

    /// `term := atom quantifier*`
    fn parse_term(&mut self) -> Option<Ast> {
        let mut node = self.parse_atom()?;
        while let Some(kind) = self.parse_quantifier() {
            node = Ast::repeat(node, kind);
        }
        Some(node)
    }

    fn parse_quantifier(&mut self) -> Option<RepeatKind> {
        let kind = match self.peek()? {
            '*' => RepeatKind::Star,
            '+' => RepeatKind::Plus,
            '?' => RepeatKind::Optional,
            _ => return None,
        };
        self.pos += 1;
        Some(kind)
    }

    fn parse_atom(&mut self) -> Option<Ast> {
        match self.peek()? {
            '(' => self.parse_group(),
            '[' => self.parse_class(),
            '.' => {
                self.pos += 1;
                Some(Ast::any_char())
            }
            '\\' => self.parse_escape().map(|item| match item {
                ClassItem::Single(ch) => Ast::Literal(ch),
                other => Ast::CharClass(ClassSet {
                    items: vec![other],
                    negated: false,
                }),
            }),
            ch => match self.parse_literal() {
                Some(lit) => Some(Ast::Literal(lit)),
                None => {
                    self.fail(format!("unexpected character {ch:?}"), self.pos);
                    None
                }
            },
        }
    }

    /// `'(' union ')'`. The group number is taken before the body is parsed.
    fn parse_group(&mut self) -> Option<Ast> {
        let start = self.pos;
        self.pos += 1; // consume '('
        self.last_group += 1;
        let group = self.last_group;

        let Some(inner) = self.parse_union() else {
            self.pos = start;
            return None;
        };
        if !self.eat(')') {
            self.fail("expected ')'", self.pos);
            self.pos = start;
            return None;
        }
        Some(Ast::group(group, inner))
    }

    /// `'[' ['^'] (range | escape | literal)+ ']'`
    fn parse_class(&mut self) -> Option<Ast> {
        let start = self.pos;
        self.pos += 1; // consume '['
        let negated = self.eat('^');

        let mut items = Vec::new();
        while let Some(item) = self.parse_class_item() {
            items.push(item);
        }
        if items.is_empty() {
            self.fail("expected a character class item", self.pos);
            self.pos = start;
            return None;
        }
        if !self.eat(']') {
            self.fail("expected ']'", self.pos);
            self.pos = start;
            return None;
        }
        Some(Ast::CharClass(ClassSet { items, negated }))
    }

    fn parse_class_item(&mut self) -> Option<ClassItem> {
        self.parse_range()
            .or_else(|| self.parse_escape())
            .or_else(|| self.parse_literal().map(ClassItem::Single))
    }

    /// `literal '-' literal`. Bounds are checked later, by the compiler.
    fn parse_range(&mut self) -> Option<ClassItem> {
        let start = self.pos;
        let lo = self.parse_literal()?;
        if !self.eat('-') {
            self.pos = start;
            return None;
        }
        let Some(hi) = self.parse_literal() else {
            self.pos = start;
            return None;
        };
        Some(ClassItem::Range(lo, hi))
    }

    /// `'\' any`. `\s` and `\S` are classes; anything else is itself.
    fn parse_escape(&mut self) -> Option<ClassItem> {
        let start = self.pos;
        if !self.eat('\\') {
            return None;
        }
        let Some(ch) = self.peek() else {
            self.fail("dangling escape at end of pattern", start);
            self.pos = start;
            return None;
        };
        self.pos += 1;
        Some(
            CLASS_ESCAPES
                .get(&ch)
                .copied()
                .unwrap_or(ClassItem::Single(ch)),
        )
    }

    fn parse_literal(&mut self) -> Option<char> {
        let ch = self.peek()?;
        if RESERVED.contains(&ch) {
            return None;
        }
        self.pos += 1;
        Some(ch)
    }

    /// True when the pattern ends in a `$` that is not itself escaped.
    fn has_trailing_anchor(&self) -> bool {
        if self.chars.len() <= self.pos || self.chars.last() != Some(&'$') {
            return false;
        }
        let backslashes = self.chars[self.pos..self.chars.len() - 1]
            .iter()
            .rev()
            .take_while(|&&c| c == '\\')
            .count();
        backslashes % 2 == 0
    }

    fn peek(&self) -> Option<char> {
        if self.pos < self.end {
            Some(self.chars[self.pos])
        } else {
            None
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.end
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn fail(&mut self, message: impl Into<String>, offset: usize) {
        if self.failure.as_ref().is_none_or(|f| offset > f.offset) {
            self.failure = Some(SyntaxError::new(message, offset));
        }
    }
}
