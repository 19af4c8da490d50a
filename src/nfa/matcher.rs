//! Parallel NFA simulation with capture tracking.
//!
//! Every live thread is a node plus its own [`Captures`]. A step moves the
//! whole frontier over one input character, so each character is looked at
//! once regardless of how ambiguous the pattern is. Nothing ever backtracks.

use std::collections::BTreeSet;

use log::trace;

use super::captures::{Captures, Span};
use super::visited::Visited;
use super::{Nfa, NodeId, Role};
use crate::error::UsageError;

/// Which accepting threads a search reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MatchMode {
    /// At most one match per end offset: the accepting thread that started
    /// leftmost. A match is dropped while a match from an earlier start may
    /// still grow over it, and held back while an earlier start that has not
    /// matched yet is still alive.
    #[default]
    BestOnly,
    /// Every accepting thread at every end offset, one per distinct start.
    Exhaustive,
}

/// One accepting thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Offset of the last character consumed, `-1` for an empty match
    /// before the first character.
    pub end: isize,
    pub captures: Captures,
}

impl Match {
    /// Where the match began, in the same convention as [`Span::start`].
    pub fn start(&self) -> isize {
        self.captures
            .get(0)
            .map(|span| span.start)
            .or_else(|| self.captures.match_start())
            .unwrap_or(-1)
    }

    pub fn span(&self) -> Span {
        Span {
            start: self.start(),
            end: self.end,
        }
    }
}

#[derive(Debug, Clone)]
struct Thread {
    node: NodeId,
    captures: Captures,
}

impl Thread {
    /// Sort key: earliest start first, threads still in the prefix last.
    fn start_key(&self) -> isize {
        self.captures.match_start().unwrap_or(isize::MAX)
    }
}

/// Maps a thread to its mark in the [`Visited`] table.
///
/// Best-only keeps one thread per node. Exhaustive keeps one per node and
/// start, so threads that started at different offsets never merge.
#[derive(Debug, Clone, Copy)]
struct Slots {
    starts: usize,
}

impl Slots {
    fn new(mode: MatchMode, input_len: usize) -> Self {
        let starts = match mode {
            MatchMode::BestOnly => 1,
            // -1 ..= input_len - 1, plus "not started".
            MatchMode::Exhaustive => input_len + 2,
        };
        Self { starts }
    }

    fn len(&self, nodes: usize) -> usize {
        nodes * self.starts
    }

    fn of(&self, node: NodeId, start: Option<isize>) -> usize {
        if self.starts == 1 {
            return node;
        }
        let slot = start.map_or(self.starts - 1, |s| (s + 1) as usize);
        node * self.starts + slot
    }
}

/// Best-only bookkeeping across offsets.
#[derive(Debug, Default)]
struct Leftmost {
    /// Starts that already produced a reported match.
    reported: BTreeSet<isize>,
    /// Matches waiting for every earlier start to either die or match.
    held: Vec<Match>,
}

impl Leftmost {
    fn settle(
        &mut self,
        nfa: &Nfa,
        threads: &[Thread],
        winner: Option<Match>,
        matches: &mut Vec<Match>,
    ) {
        let live_before = move |start| live_starts_before(nfa, threads, start);

        if let Some(found) = winner {
            let start = found.start();
            self.held.retain(|m| m.start() <= start);
            let mut blockers = live_before(start).peekable();
            if blockers.peek().is_none() {
                self.report(found, matches);
            } else if !blockers.any(|s| self.reported.contains(&s)) {
                self.held.push(found);
            }
        }

        let (ready, waiting): (Vec<Match>, Vec<Match>) = std::mem::take(&mut self.held)
            .into_iter()
            .partition(|m: &Match| live_before(m.start()).next().is_none());
        self.held = waiting;
        for found in ready {
            self.report(found, matches);
        }
    }

    /// Input is exhausted: nothing is alive to block what is held.
    fn finish(&mut self, matches: &mut Vec<Match>) {
        for found in std::mem::take(&mut self.held) {
            self.report(found, matches);
        }
    }

    fn report(&mut self, found: Match, matches: &mut Vec<Match>) {
        self.reported.insert(found.start());
        matches.push(found);
    }
}

/// Starts of threads that are still consuming input and began before `start`.
fn live_starts_before<'t>(
    nfa: &'t Nfa,
    threads: &'t [Thread],
    start: isize,
) -> impl Iterator<Item = isize> + 't {
    threads
        .iter()
        .filter(move |t| !nfa.node(t.node).is_final)
        .filter_map(|t| t.captures.match_start())
        .filter(move |&s| s < start)
}

/// Runs searches against a borrowed [`Nfa`].
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'a> {
    nfa: &'a Nfa,
}

impl<'a> Matcher<'a> {
    /// # Panics
    ///
    /// When `nfa` is the empty automaton.
    pub fn new(nfa: &'a Nfa) -> Self {
        if nfa.is_empty() {
            panic!("{}", UsageError::EmptyAutomaton);
        }
        Self { nfa }
    }

    /// All matches in `subject`, ascending by end offset. Matches sharing an
    /// end offset are ordered by start.
    pub fn search(&self, subject: &str, mode: MatchMode) -> Vec<Match> {
        let nfa = self.nfa;
        let input_len = subject.chars().count();
        let last = input_len as isize - 1;
        let slots = Slots::new(mode, input_len);
        let mut visited = Visited::new(slots.len(nfa.len()));
        let mut leftmost = Leftmost::default();
        let mut current = Vec::new();
        let mut next = Vec::new();
        let mut matches = Vec::new();

        let initial = Captures::new(nfa.group_count);
        add_thread(nfa, slots, &mut visited, &mut current, nfa.entry, initial, -1);
        self.accept(&current, -1, last, mode, &mut leftmost, &mut matches);

        for (offset, ch) in (0..).zip(subject.chars()) {
            if current.is_empty() {
                break;
            }
            current.sort_by_key(Thread::start_key);

            visited.next_epoch();
            for thread in current.drain(..) {
                for target in nfa.node(thread.node).step(ch) {
                    add_thread(
                        nfa,
                        slots,
                        &mut visited,
                        &mut next,
                        target,
                        thread.captures.clone(),
                        offset,
                    );
                }
            }
            std::mem::swap(&mut current, &mut next);
            trace!("offset {offset} ({ch:?}): {} threads", current.len());
            self.accept(&current, offset, last, mode, &mut leftmost, &mut matches);
        }

        leftmost.finish(&mut matches);
        matches
    }

    fn accept(
        &self,
        threads: &[Thread],
        offset: isize,
        last: isize,
        mode: MatchMode,
        leftmost: &mut Leftmost,
        matches: &mut Vec<Match>,
    ) {
        let at_end = !self.nfa.anchored_end || offset == last;
        let mut accepting: Vec<Match> = threads
            .iter()
            .filter(|t| at_end && self.nfa.node(t.node).is_final)
            .map(|t| Match {
                end: offset,
                captures: t.captures.clone(),
            })
            .collect();
        accepting.sort_by_key(Match::start);

        match mode {
            MatchMode::Exhaustive => matches.extend(accepting),
            MatchMode::BestOnly => {
                let winner = accepting.into_iter().next();
                leftmost.settle(self.nfa, threads, winner, matches);
            }
        }
    }
}

/// Add `start` and its epsilon closure at `offset` to `list`.
///
/// Marker nodes update the travelling captures as they are passed. Only
/// nodes that can consume input or accept become threads.
fn add_thread(
    nfa: &Nfa,
    slots: Slots,
    visited: &mut Visited,
    list: &mut Vec<Thread>,
    start: NodeId,
    captures: Captures,
    offset: isize,
) {
    let mut stack = vec![(start, captures)];
    while let Some((id, mut captures)) = stack.pop() {
        if !visited.insert(slots.of(id, captures.match_start())) {
            continue;
        }
        let node = nfa.node(id);
        if let Some(marker) = node.marker {
            match marker.role {
                Role::CaptureStart => captures.open(marker.group, offset),
                Role::CaptureEnd => captures.close(marker.group, offset),
            }
        }
        if !node.transitions.is_empty() || node.is_final {
            list.push(Thread {
                node: id,
                captures: captures.clone(),
            });
        }
        // Reversed so the first epsilon is explored first.
        for &to in node.epsilons.iter().rev() {
            stack.push((to, captures.clone()));
        }
    }
}
