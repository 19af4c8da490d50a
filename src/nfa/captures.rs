//! Capture snapshots carried by simulation threads.
//!
//! Offsets follow the search result convention: an offset is the index of the
//! last character consumed, `-1` before any input. A span's `start` is the
//! offset just before its first character and `end` the offset of its last,
//! so an empty capture has `start == end`.

/// The extent of one completed capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: isize,
    pub end: isize,
}

impl Span {
    /// Number of characters captured.
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The captured text of `subject`, which must be the searched input.
    pub fn extract<'s>(&self, subject: &'s str) -> &'s str {
        let first = (self.start + 1) as usize;
        let mut indices = subject
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(subject.len()));
        let Some(from) = indices.nth(first) else {
            return "";
        };
        let to = if self.is_empty() {
            from
        } else {
            indices.nth(self.len() - 1).unwrap_or(subject.len())
        };
        &subject[from..to]
    }
}

/// One slot per group (group 0 is the whole match), plus the tentative start
/// of every group that has been entered.
///
/// A value type: a thread that forks hands each branch its own copy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Captures {
    open: Vec<Option<isize>>,
    spans: Vec<Option<Span>>,
}

impl Captures {
    pub fn new(groups: usize) -> Self {
        Self {
            open: vec![None; groups],
            spans: vec![None; groups],
        }
    }

    /// Number of slots, including group 0.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// The completed span of `group`, if any.
    pub fn get(&self, group: usize) -> Option<Span> {
        self.spans.get(group).copied().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<Span>> + '_ {
        self.spans.iter().copied()
    }

    /// Where the whole match started, as soon as group 0 has been entered.
    pub fn match_start(&self) -> Option<isize> {
        self.open.first().copied().flatten()
    }

    pub(crate) fn open(&mut self, group: usize, offset: isize) {
        self.open[group] = Some(offset);
    }

    pub(crate) fn close(&mut self, group: usize, offset: isize) {
        if let Some(start) = self.open[group] {
            debug_assert!(offset >= start, "capture {group} ends before it starts");
            self.spans[group] = Some(Span { start, end: offset });
        }
    }
}
