//! Per-call visitation marks for epsilon closures.
//!
//! Each closure round takes a fresh epoch instead of clearing a flag on every
//! slot. A slot is a node id, or a node paired with a match start when the
//! matcher keeps one thread per start. A table belongs to exactly one search
//! or one subset construction and is dropped with it, so marks never carry
//! over to another call on the same [`Nfa`](super::Nfa).

#[derive(Debug, Clone)]
pub(crate) struct Visited {
    stamps: Vec<u32>,
    epoch: u32,
}

impl Visited {
    /// A table for `len` slots, ready for its first round.
    pub fn new(len: usize) -> Self {
        Self {
            stamps: vec![0; len],
            epoch: 1,
        }
    }

    /// Start a new round. Every slot becomes unvisited.
    pub fn next_epoch(&mut self) {
        if self.epoch == u32::MAX {
            self.stamps.fill(0);
            self.epoch = 0;
        }
        self.epoch += 1;
    }

    /// Mark `slot` visited in this round. Returns false if it already was.
    pub fn insert(&mut self, slot: usize) -> bool {
        if self.stamps[slot] == self.epoch {
            return false;
        }
        self.stamps[slot] = self.epoch;
        true
    }

    #[cfg(test)]
    pub fn contains(&self, slot: usize) -> bool {
        self.stamps[slot] == self.epoch
    }
}
