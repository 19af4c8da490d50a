//! Thompson's construction: [`Ast`] to [`Nfa`].
//!
//! Every AST node becomes a [`Fragment`], an entry/exit pair of builder
//! nodes with all its internal edges wired. Fragments are only ever combined
//! by adding epsilon edges between their entry and exit nodes. Node ids are
//! not final while building; a single numbering pass at the end assigns them.

use log::debug;

use crate::pattern::{Ast, ClassRange, RepeatKind};

use super::{Marker, Nfa, Node, NodeId, Role, Transition};

/// Compile a parsed pattern into an NFA.
///
/// A root that is not [`Ast::Anchored`] is compiled as if it were anchored at
/// the start and not at the end.
///
/// # Panics
///
/// When a character class contains a range with malformed bounds.
pub fn compile(ast: &Ast) -> Nfa {
    let mut compiler = Compiler::default();
    let (root, anchored_end) = match ast {
        Ast::Anchored { right, .. } => (compiler.fragment(ast), *right),
        other => (compiler.group(0, other), false),
    };
    let nfa = compiler.number(root, anchored_end);
    debug!(
        "compiled NFA: {} nodes ({} built), {} capture groups",
        nfa.len(),
        compiler.nodes.len(),
        nfa.group_count
    );
    nfa
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fragment {
    entry: usize,
    exit: usize,
}

#[derive(Debug, Default)]
struct BuildNode {
    ranges: Vec<(ClassRange, usize)>,
    epsilons: Vec<usize>,
    marker: Option<Marker>,
}

#[derive(Debug, Default)]
struct Compiler {
    nodes: Vec<BuildNode>,
    /// One more than the highest group number seen.
    group_count: usize,
}

impl Compiler {
    fn fragment(&mut self, ast: &Ast) -> Fragment {
        match ast {
            Ast::Empty => {
                let frag = self.pair();
                self.epsilon(frag.entry, frag.exit);
                frag
            }
            Ast::Literal(ch) => self.ranges(&[ClassRange::single(*ch)]),
            Ast::CharClass(set) => self.ranges(&set.to_ranges()),
            Ast::Union(lhs, rhs) => {
                let lhs = self.fragment(lhs);
                let rhs = self.fragment(rhs);
                let frag = self.pair();
                self.epsilon(frag.entry, lhs.entry);
                self.epsilon(frag.entry, rhs.entry);
                self.epsilon(lhs.exit, frag.exit);
                self.epsilon(rhs.exit, frag.exit);
                frag
            }
            Ast::Concat(lhs, rhs) => {
                let lhs = self.fragment(lhs);
                let rhs = self.fragment(rhs);
                self.epsilon(lhs.exit, rhs.entry);
                Fragment {
                    entry: lhs.entry,
                    exit: rhs.exit,
                }
            }
            Ast::Repeat(inner, kind) => self.repeat(inner, *kind),
            Ast::Group(n, inner) => self.group(*n, inner),
            Ast::Anchored { inner, left, .. } => {
                let body = self.group(0, inner);
                if *left {
                    return body;
                }
                // Unanchored search is anchored search behind a `.*` prefix.
                let prefix = self.fragment(&Ast::repeat(Ast::any_char(), RepeatKind::Star));
                self.epsilon(prefix.exit, body.entry);
                Fragment {
                    entry: prefix.entry,
                    exit: body.exit,
                }
            }
        }
    }

    /// entry --[range]--> exit for each of the disjoint `ranges`.
    fn ranges(&mut self, ranges: &[ClassRange]) -> Fragment {
        let frag = self.pair();
        self.nodes[frag.entry]
            .ranges
            .extend(ranges.iter().map(|&range| (range, frag.exit)));
        frag
    }

    fn repeat(&mut self, inner: &Ast, kind: RepeatKind) -> Fragment {
        let inner = self.fragment(inner);
        let frag = self.pair();
        self.epsilon(frag.entry, inner.entry);
        if matches!(kind, RepeatKind::Star | RepeatKind::Optional) {
            self.epsilon(frag.entry, frag.exit);
        }
        if matches!(kind, RepeatKind::Star | RepeatKind::Plus) {
            self.epsilon(inner.exit, inner.entry);
        }
        self.epsilon(inner.exit, frag.exit);
        frag
    }

    /// entry -> captureStart(n) -> inner -> captureEnd(n) -> exit
    fn group(&mut self, n: usize, inner: &Ast) -> Fragment {
        self.group_count = self.group_count.max(n + 1);
        let open = self.marker(n, Role::CaptureStart);
        let inner = self.fragment(inner);
        let close = self.marker(n, Role::CaptureEnd);
        let frag = self.pair();
        self.epsilon(frag.entry, open);
        self.epsilon(open, inner.entry);
        self.epsilon(inner.exit, close);
        self.epsilon(close, frag.exit);
        frag
    }

    fn marker(&mut self, group: usize, role: Role) -> usize {
        let id = self.add_node();
        self.nodes[id].marker = Some(Marker { group, role });
        id
    }

    fn pair(&mut self) -> Fragment {
        Fragment {
            entry: self.add_node(),
            exit: self.add_node(),
        }
    }

    fn add_node(&mut self) -> usize {
        self.nodes.push(BuildNode::default());
        self.nodes.len() - 1
    }

    fn epsilon(&mut self, from: usize, to: usize) {
        self.nodes[from].epsilons.push(to);
    }

    /// Assign final ids depth-first from the root entry, then from the root
    /// exit, and mark the exit final. Nodes reachable from neither are
    /// dropped.
    fn number(&self, root: Fragment, anchored_end: bool) -> Nfa {
        let mut ids: Vec<Option<NodeId>> = vec![None; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());

        for start in [root.entry, root.exit] {
            let mut stack = vec![start];
            while let Some(b) = stack.pop() {
                if ids[b].is_some() {
                    continue;
                }
                ids[b] = Some(order.len());
                order.push(b);

                let node = &self.nodes[b];
                let successors = node
                    .ranges
                    .iter()
                    .map(|&(_, to)| to)
                    .chain(node.epsilons.iter().copied());
                // Reversed so the first successor is numbered first.
                stack.extend(successors.collect::<Vec<_>>().into_iter().rev());
            }
        }

        let id_of = |b: usize| ids[b].expect("successor of a numbered node is numbered");
        let nodes = order
            .iter()
            .enumerate()
            .map(|(id, &b)| {
                let built = &self.nodes[b];
                Node {
                    id,
                    transitions: built
                        .ranges
                        .iter()
                        .map(|&(range, to)| Transition {
                            range,
                            targets: vec![id_of(to)],
                        })
                        .collect(),
                    epsilons: built.epsilons.iter().map(|&to| id_of(to)).collect(),
                    is_final: b == root.exit,
                    marker: built.marker,
                }
            })
            .collect();

        Nfa {
            nodes,
            entry: id_of(root.entry),
            final_id: id_of(root.exit),
            group_count: self.group_count,
            anchored_end,
        }
    }
}
