//! Subset construction: [`Nfa`] to [`Dfa`].
//!
//! Each DFA state stands for the epsilon closure of a set of NFA nodes. The
//! alphabet of a state is the set of transition ranges of its members, cut
//! into disjoint pieces so that every piece moves to a single target set.
//! There is no minimization and no explicit dead state: a character with no
//! transition rejects.

use std::collections::{HashMap, VecDeque};

use itertools::Itertools;
use log::debug;

use crate::error::UsageError;
use crate::nfa::visited::Visited;
use crate::nfa::{Nfa, NodeId};
use crate::pattern::ClassRange;
use crate::pattern::char_class::{next_char, prev_char};

/// Index of a state in a [`Dfa`].
pub type DfaStateId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaState {
    id: DfaStateId,
    nfa_nodes: Vec<NodeId>,
    transitions: Vec<(ClassRange, DfaStateId)>,
    is_final: bool,
}

impl DfaState {
    fn new(id: DfaStateId, nfa_nodes: Vec<NodeId>, is_final: bool) -> Self {
        Self {
            id,
            nfa_nodes,
            transitions: Vec::new(),
            is_final,
        }
    }

    pub fn id(&self) -> DfaStateId {
        self.id
    }

    /// The NFA nodes this state stands for, sorted and deduplicated.
    pub fn nfa_nodes(&self) -> &[NodeId] {
        &self.nfa_nodes
    }

    pub fn transitions(&self) -> &[(ClassRange, DfaStateId)] {
        &self.transitions
    }

    pub fn is_final(&self) -> bool {
        self.is_final
    }

    /// The state reached on `ch`, if any.
    pub fn next(&self, ch: char) -> Option<DfaStateId> {
        self.transitions
            .iter()
            .find(|(range, _)| range.contains(ch))
            .map(|&(_, to)| to)
    }

    /// Registers a transition on `range`.
    ///
    /// # Panics
    ///
    /// When `range` overlaps a transition already registered on this state.
    pub fn add_transition(&mut self, range: ClassRange, to: DfaStateId) {
        let overlaps = self
            .transitions
            .iter()
            .any(|(r, _)| r.lo() <= range.hi() && range.lo() <= r.hi());
        if overlaps {
            panic!(
                "{}",
                UsageError::DuplicateTransition {
                    state: self.id,
                    lo: range.lo(),
                    hi: range.hi(),
                }
            );
        }
        self.transitions.push((range, to));
    }
}

/// A deterministic automaton accepting the same whole strings as the NFA it
/// was built from. The end anchor plays no part: acceptance is always
/// decided after the last character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    states: Vec<DfaState>,
    start: DfaStateId,
}

impl Dfa {
    /// # Panics
    ///
    /// When `nfa` is the empty automaton.
    pub fn from_nfa(nfa: &Nfa) -> Self {
        if nfa.is_empty() {
            panic!("{}", UsageError::EmptyAutomaton);
        }
        let mut visited = Visited::new(nfa.len());
        let mut discovered: HashMap<Vec<NodeId>, DfaStateId> = HashMap::new();
        let mut queue = VecDeque::new();
        let mut states = Vec::new();

        let initial = closure(nfa, &mut visited, [nfa.entry()]);
        states.push(DfaState::new(0, initial.clone(), is_final(nfa, &initial)));
        discovered.insert(initial, 0);
        queue.push_back(0);

        while let Some(current) = queue.pop_front() {
            for symbol in symbols(nfa, &states[current].nfa_nodes) {
                let moved: Vec<NodeId> = states[current]
                    .nfa_nodes
                    .iter()
                    .flat_map(|&id| nfa.node(id).step(symbol.lo()))
                    .collect();
                if moved.is_empty() {
                    continue;
                }
                let set = closure(nfa, &mut visited, moved);
                let target = match discovered.get(&set) {
                    Some(&id) => id,
                    None => {
                        let id = states.len();
                        states.push(DfaState::new(id, set.clone(), is_final(nfa, &set)));
                        discovered.insert(set, id);
                        queue.push_back(id);
                        id
                    }
                };
                states[current].add_transition(symbol, target);
            }
        }

        debug!(
            "subset construction: {} NFA nodes -> {} DFA states",
            nfa.len(),
            states.len()
        );
        Self { states, start: 0 }
    }

    /// True when the whole of `subject` is accepted.
    pub fn accepts(&self, subject: &str) -> bool {
        let mut state = self.start;
        for ch in subject.chars() {
            match self.states[state].next(ch) {
                Some(to) => state = to,
                None => return false,
            }
        }
        self.states[state].is_final
    }

    pub fn start(&self) -> DfaStateId {
        self.start
    }

    pub fn states(&self) -> &[DfaState] {
        &self.states
    }

    /// # Panics
    ///
    /// When the id does not exist in the DFA.
    pub fn state(&self, id: DfaStateId) -> &DfaState {
        &self.states[id]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

/// Every node reachable from `seeds` through epsilons, sorted.
fn closure(
    nfa: &Nfa,
    visited: &mut Visited,
    seeds: impl IntoIterator<Item = NodeId>,
) -> Vec<NodeId> {
    visited.next_epoch();
    let mut stack: Vec<NodeId> = seeds.into_iter().collect();
    let mut set = Vec::new();
    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        set.push(id);
        stack.extend(nfa.node(id).epsilons().iter().copied());
    }
    set.sort_unstable();
    set
}

fn is_final(nfa: &Nfa, set: &[NodeId]) -> bool {
    set.iter().any(|&id| nfa.node(id).is_final())
}

/// The transition ranges of `members`, refined into disjoint pieces.
///
/// Each piece lies entirely inside or entirely outside every member range,
/// so its first character stands for all of it.
fn symbols(nfa: &Nfa, members: &[NodeId]) -> Vec<ClassRange> {
    let ranges: Vec<ClassRange> = members
        .iter()
        .flat_map(|&id| nfa.node(id).transitions().iter().map(|t| t.range))
        .collect();
    let bounds: Vec<char> = ranges
        .iter()
        .flat_map(|r| [Some(r.lo()), next_char(r.hi())])
        .flatten()
        .sorted_unstable()
        .dedup()
        .collect();

    let mut pieces = Vec::with_capacity(bounds.len());
    for (i, &lo) in bounds.iter().enumerate() {
        let hi = match bounds.get(i + 1) {
            Some(&next) => prev_char(next).unwrap_or(lo),
            None => char::MAX,
        };
        if ranges.iter().any(|r| r.contains(lo)) {
            pieces.push(ClassRange::spanning(lo, hi));
        }
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nfa::compiler::compile;
    use crate::pattern::parse;

    fn dfa(pattern: &str) -> Dfa {
        Dfa::from_nfa(&compile(&parse(pattern).expect("pattern should parse")))
    }

    #[test]
    fn start_state_is_zero() {
        let dfa = dfa("^ab");
        assert_eq!(dfa.start(), 0);
        assert_eq!(dfa.state(0).id(), 0);
    }

    #[test]
    fn anchored_literal_accepts_exactly() {
        let dfa = dfa("^ab");
        assert!(dfa.accepts("ab"));
        assert!(!dfa.accepts("a"));
        assert!(!dfa.accepts("abc"));
        assert!(!dfa.accepts("xab"));
    }

    #[test]
    fn unanchored_accepts_any_prefix() {
        let dfa = dfa("ab");
        assert!(dfa.accepts("xxab"));
        assert!(!dfa.accepts("xxa"));
        assert!(!dfa.accepts("x\nab"));
    }

    #[test]
    fn star_accepts_empty() {
        let dfa = dfa("^(a|(bc))*");
        assert!(dfa.accepts(""));
        assert!(dfa.accepts("abcbca"));
        assert!(!dfa.accepts("ab"));
    }

    #[test]
    fn transitions_are_disjoint() {
        let dfa = dfa("[a-m]x|[f-z]y");
        for state in dfa.states() {
            let ranges: Vec<_> = state.transitions().iter().map(|(r, _)| *r).sorted().collect();
            for pair in ranges.windows(2) {
                assert!(pair[0].hi() < pair[1].lo());
            }
        }
    }

    #[test]
    fn overlapping_classes_split_into_pieces() {
        let dfa = dfa("^([a-m]x|[f-z]y)");
        let start = dfa.state(dfa.start());
        let ranges: Vec<_> = start.transitions().iter().map(|(r, _)| *r).collect();
        assert_eq!(
            ranges,
            vec![
                ClassRange::new('a', 'e'),
                ClassRange::new('f', 'm'),
                ClassRange::new('n', 'z'),
            ]
        );
        assert!(dfa.accepts("gx"));
        assert!(dfa.accepts("gy"));
        assert!(!dfa.accepts("by"));
        assert!(!dfa.accepts("px"));
    }

    #[test]
    fn node_sets_are_sorted_and_unique() {
        let dfa = dfa("(a|ab)*b");
        for state in dfa.states() {
            assert!(state.nfa_nodes().windows(2).all(|w| w[0] < w[1]));
        }
        let sets: Vec<_> = dfa.states().iter().map(|s| s.nfa_nodes()).collect();
        assert_eq!(sets.iter().unique().count(), sets.len());
    }

    #[test]
    fn right_anchor_is_ignored() {
        let dfa = dfa("^a$");
        assert!(dfa.accepts("a"));
        assert!(!dfa.accepts("aa"));
    }

    #[test]
    fn negated_class_reaches_char_max() {
        let dfa = dfa("^[^a]");
        assert!(dfa.accepts("\u{10FFFF}"));
        assert!(dfa.accepts("\u{E000}"));
        assert!(!dfa.accepts("a"));
    }

    #[test]
    #[should_panic(expected = "already has a transition overlapping")]
    fn overlapping_transition_is_fatal() {
        let mut state = DfaState::new(0, vec![0], false);
        state.add_transition(ClassRange::new('a', 'f'), 1);
        state.add_transition(ClassRange::new('d', 'k'), 2);
    }

    #[test]
    #[should_panic(expected = "empty automaton")]
    fn empty_automaton_is_rejected() {
        Dfa::from_nfa(&Nfa::default());
    }
}
