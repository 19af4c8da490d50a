//! Epsilon-NFA built by Thompson's construction.
//!
//! Nodes live in an arena and refer to each other by [`NodeId`], so the
//! cycles introduced by `*` and `+` need no shared ownership. The arena is
//! immutable once [`compiler::compile`] has numbered it; matchers and the
//! subset constructor only ever read it.

pub mod captures;
pub mod compiler;
pub mod matcher;
pub(crate) mod visited;

#[cfg(test)]
mod tests;

use crate::pattern::ClassRange;

/// Index of a node in an [`Nfa`].
pub type NodeId = usize;

/// What a marker node records when a thread passes through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    CaptureStart,
    CaptureEnd,
}

/// Capture bookkeeping attached to a node that consumes no input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Marker {
    pub group: usize,
    pub role: Role,
}

/// An edge taken on any character in `range`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub range: ClassRange,
    pub targets: Vec<NodeId>,
}

/// A node of the NFA.
///
/// The ranges of `transitions` are pairwise disjoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) transitions: Vec<Transition>,
    pub(crate) epsilons: Vec<NodeId>,
    pub(crate) is_final: bool,
    pub(crate) marker: Option<Marker>,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn epsilons(&self) -> &[NodeId] {
        &self.epsilons
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    pub fn marker(&self) -> Option<Marker> {
        self.marker
    }

    /// Targets reached by consuming `ch`.
    pub fn step(&self, ch: char) -> impl Iterator<Item = NodeId> + '_ {
        self.transitions
            .iter()
            .filter(move |t| t.range.contains(ch))
            .flat_map(|t| t.targets.iter().copied())
    }
}

/// A compiled automaton.
///
/// `Nfa::default()` is the empty automaton, which has no nodes and cannot be
/// searched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Nfa {
    pub(crate) nodes: Vec<Node>,
    pub(crate) entry: NodeId,
    pub(crate) final_id: NodeId,
    /// Number of capture slots, including group 0.
    pub(crate) group_count: usize,
    /// Accept only once the whole input has been consumed (`$`).
    pub(crate) anchored_end: bool,
}

impl Nfa {
    pub fn entry(&self) -> NodeId {
        self.entry
    }

    pub fn final_id(&self) -> NodeId {
        self.final_id
    }

    pub fn group_count(&self) -> usize {
        self.group_count
    }

    pub fn anchored_end(&self) -> bool {
        self.anchored_end
    }

    /// Returns the node with the given id.
    ///
    /// # Panics
    ///
    /// When the id does not exist in the NFA.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
