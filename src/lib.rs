//! A regular expression engine built on Thompson's construction.
//!
//! Patterns are parsed into an [`Ast`], compiled into an epsilon-[`Nfa`] and
//! searched by simulating every NFA thread in parallel, so search time is
//! polynomial in the pattern and input sizes. Capture groups are tracked per
//! thread. An [`Nfa`] can also be turned into a [`Dfa`] by subset
//! construction.
//!
//! # Example
//!
//! ```rust
//! use regexp_nfa::Regex;
//!
//! let re = Regex::new("^https?://([^/]+)(/(.*))?").unwrap();
//! let subject = "https://ddg.gg/search/?q=regular%20expressions";
//!
//! let found = re.find(subject).unwrap();
//! assert_eq!(found.captures.get(1).unwrap().extract(subject), "ddg.gg");
//!
//! // End offsets are character indices; -1 is an empty match before the input.
//! assert_eq!(Regex::new("(a|(bc))*").unwrap().end_offsets("abc"), vec![-1, 0, 2]);
//! ```

pub mod dfa;
pub mod error;
pub mod graph;
pub mod nfa;
pub mod pattern;
mod regex;

pub use dfa::{Dfa, DfaState, DfaStateId};
pub use error::{ConstructionError, SyntaxError, UsageError};
pub use graph::{Automaton, CoalescedEdge, Edge, EdgeLabel, NodeView};
pub use nfa::captures::{Captures, Span};
pub use nfa::compiler::compile;
pub use nfa::matcher::{Match, MatchMode, Matcher};
pub use nfa::{Marker, Nfa, Node, NodeId, Role};
pub use pattern::{Ast, ClassRange, parse};
pub use regex::Regex;
