//! Read-only graph view of an automaton, for renderers.
//!
//! No text is produced here. A renderer asks for nodes and edges and formats
//! them however it likes; the binary turns them into graphviz dot.

use itertools::Itertools;

use crate::dfa::Dfa;
use crate::nfa::{Marker, Nfa};
use crate::pattern::ClassRange;
use crate::pattern::char_class::merge;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeView {
    pub id: usize,
    pub is_final: bool,
    /// Always `None` for DFA states.
    pub marker: Option<Marker>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeLabel {
    Epsilon,
    Range(ClassRange),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: usize,
    pub to: usize,
    pub label: EdgeLabel,
}

/// All edges between one pair of nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoalescedEdge {
    pub from: usize,
    pub to: usize,
    /// Sorted, with touching ranges merged.
    pub ranges: Vec<ClassRange>,
    pub epsilon: bool,
}

pub trait Automaton {
    fn start_id(&self) -> usize;

    fn node_views(&self) -> Vec<NodeView>;

    /// One edge per transition range or epsilon, in node order.
    fn raw_edges(&self) -> Vec<Edge>;

    /// [`raw_edges`](Automaton::raw_edges) grouped by `(from, to)`.
    fn coalesced_edges(&self) -> Vec<CoalescedEdge> {
        self.raw_edges()
            .into_iter()
            .sorted_by_key(|edge| (edge.from, edge.to))
            .chunk_by(|edge| (edge.from, edge.to))
            .into_iter()
            .map(|((from, to), edges)| {
                let mut epsilon = false;
                let mut ranges = Vec::new();
                for edge in edges {
                    match edge.label {
                        EdgeLabel::Epsilon => epsilon = true,
                        EdgeLabel::Range(range) => ranges.push(range),
                    }
                }
                CoalescedEdge {
                    from,
                    to,
                    ranges: merge(ranges),
                    epsilon,
                }
            })
            .collect()
    }
}

impl Automaton for Nfa {
    fn start_id(&self) -> usize {
        self.entry()
    }

    fn node_views(&self) -> Vec<NodeView> {
        self.nodes()
            .iter()
            .map(|node| NodeView {
                id: node.id(),
                is_final: node.is_final(),
                marker: node.marker(),
            })
            .collect()
    }

    fn raw_edges(&self) -> Vec<Edge> {
        let mut edges = Vec::new();
        for node in self.nodes() {
            for transition in node.transitions() {
                edges.extend(transition.targets.iter().map(|&to| Edge {
                    from: node.id(),
                    to,
                    label: EdgeLabel::Range(transition.range),
                }));
            }
            edges.extend(node.epsilons().iter().map(|&to| Edge {
                from: node.id(),
                to,
                label: EdgeLabel::Epsilon,
            }));
        }
        edges
    }
}

impl Automaton for Dfa {
    fn start_id(&self) -> usize {
        self.start()
    }

    fn node_views(&self) -> Vec<NodeView> {
        self.states()
            .iter()
            .map(|state| NodeView {
                id: state.id(),
                is_final: state.is_final(),
                marker: None,
            })
            .collect()
    }

    fn raw_edges(&self) -> Vec<Edge> {
        self.states()
            .iter()
            .flat_map(|state| {
                state.transitions().iter().map(|&(range, to)| Edge {
                    from: state.id(),
                    to,
                    label: EdgeLabel::Range(range),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nfa::compiler::compile;
    use crate::nfa::{Marker, Role};
    use crate::pattern::parse;

    fn nfa(pattern: &str) -> Nfa {
        compile(&parse(pattern).expect("pattern should parse"))
    }

    #[test]
    fn nfa_views_cover_every_node() {
        let nfa = nfa("^(a)");
        let views = nfa.node_views();
        assert_eq!(views.len(), nfa.len());
        assert_eq!(views.iter().filter(|v| v.is_final).count(), 1);
        assert!(views.iter().any(|v| v.marker
            == Some(Marker {
                group: 1,
                role: Role::CaptureStart
            })));
        assert_eq!(nfa.start_id(), 0);
    }

    #[test]
    fn nfa_raw_edges_include_epsilons() {
        let nfa = nfa("^a");
        let edges = nfa.raw_edges();
        let ranges = edges
            .iter()
            .filter(|e| matches!(e.label, EdgeLabel::Range(_)))
            .count();
        assert_eq!(ranges, 1);
        assert!(edges.iter().any(|e| e.label == EdgeLabel::Epsilon));
    }

    #[test]
    fn distinct_targets_stay_separate_edges() {
        let dfa = Dfa::from_nfa(&nfa("^([a-m]x|[f-z]y)"));
        let from_start: Vec<_> = dfa
            .coalesced_edges()
            .into_iter()
            .filter(|e| e.from == dfa.start_id())
            .collect();
        // a-e and f-m go to different states, n-z to a third.
        assert_eq!(from_start.len(), 3);
        assert!(from_start.iter().all(|e| !e.epsilon && e.ranges.len() == 1));
    }

    #[test]
    fn coalescing_collects_ranges_with_a_common_target() {
        // The prefix wildcard is cut around 'a', but three of its pieces
        // still lead to the same state.
        let dfa = Dfa::from_nfa(&nfa("a"));
        let wildcard = dfa
            .coalesced_edges()
            .into_iter()
            .find(|e| e.from == dfa.start_id() && e.ranges.iter().any(|r| r.contains('b')))
            .expect("start state should move on 'b'");
        assert_eq!(
            wildcard.ranges,
            vec![
                ClassRange::spanning('\0', '\t'),
                ClassRange::spanning('\x0B', '`'),
                ClassRange::spanning('b', char::MAX),
            ]
        );
    }

    #[test]
    fn coalescing_keeps_epsilon_and_ranges_apart() {
        let nfa = nfa("^a*");
        let coalesced = nfa.coalesced_edges();
        assert_eq!(
            coalesced.iter().filter(|e| !e.ranges.is_empty()).count(),
            1
        );
        assert!(coalesced.iter().all(|e| e.epsilon || !e.ranges.is_empty()));
        assert_eq!(
            coalesced.len(),
            nfa.raw_edges().iter().map(|e| (e.from, e.to)).unique().count()
        );
    }

    #[test]
    fn dfa_has_no_markers() {
        let dfa = Dfa::from_nfa(&nfa("(a)(b)"));
        assert!(dfa.node_views().iter().all(|v| v.marker.is_none()));
        assert!(dfa.raw_edges().iter().all(|e| e.label != EdgeLabel::Epsilon));
    }
}
