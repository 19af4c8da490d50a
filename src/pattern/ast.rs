//! AST types for regular expression patterns.

/// A parsed pattern node.
///
/// The parser always returns an [`Ast::Anchored`] root wrapping the rest of
/// the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    /// Matches the empty string. Produced only for truly empty branches.
    Empty,
    Literal(char),
    CharClass(ClassSet),
    Union(Box<Ast>, Box<Ast>),
    Concat(Box<Ast>, Box<Ast>),
    Repeat(Box<Ast>, RepeatKind),
    /// A capturing group. Group numbers start at 1; 0 is the whole pattern.
    Group(usize, Box<Ast>),
    Anchored {
        inner: Box<Ast>,
        left: bool,
        right: bool,
    },
}

impl Ast {
    /// The `.` wildcard: any character except newline.
    pub fn any_char() -> Self {
        Ast::CharClass(ClassSet {
            items: vec![ClassItem::Single('\n')],
            negated: true,
        })
    }

    pub fn union(lhs: Ast, rhs: Ast) -> Self {
        Ast::Union(Box::new(lhs), Box::new(rhs))
    }

    pub fn concat(lhs: Ast, rhs: Ast) -> Self {
        Ast::Concat(Box::new(lhs), Box::new(rhs))
    }

    pub fn repeat(inner: Ast, kind: RepeatKind) -> Self {
        Ast::Repeat(Box::new(inner), kind)
    }

    pub fn group(n: usize, inner: Ast) -> Self {
        Ast::Group(n, Box::new(inner))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepeatKind {
    /// `*`
    Star,
    /// `+`
    Plus,
    /// `?`
    Optional,
}

/// The contents of a `[...]` class, or a single escape such as `\s`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSet {
    pub items: Vec<ClassItem>,
    pub negated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassItem {
    Single(char),
    /// Endpoints as written; validated when the class is compiled.
    Range(char, char),
    /// `\s`
    Whitespace,
    /// `\S`
    NotWhitespace,
}
