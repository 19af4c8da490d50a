//! Pattern syntax: parsing pattern strings into an [`Ast`].
//!
//! # Pattern syntax
//!
//! | Token     | Meaning                                            |
//! |-----------|----------------------------------------------------|
//! | `c`       | The literal character `c`                          |
//! | `.`       | Any character except newline                       |
//! | `[abc]`   | One of the listed characters                       |
//! | `[a-z]`   | A range (both ends in the same case)               |
//! | `[^...]`  | Any character not in the class                     |
//! | `\s`      | Whitespace                                         |
//! | `\S`      | Anything but whitespace                            |
//! | `\c`      | The character `c` itself, for any other `c`        |
//! | `X\|Y`    | Alternation                                        |
//! | `X*`      | Zero or more                                       |
//! | `X+`      | One or more                                        |
//! | `X?`      | Zero or one                                        |
//! | `(X)`     | Capturing group, numbered by its `(` from the left |
//! | `^`       | At the start of the pattern: anchor to input start |
//! | `$`       | At the end of the pattern: anchor to input end     |

pub mod ast;
pub mod char_class;
pub mod parser;

pub use ast::{Ast, ClassItem, ClassSet, RepeatKind};
pub use char_class::ClassRange;
pub use parser::parse;
