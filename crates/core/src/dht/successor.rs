//! Successor list for PeerRing
use crate::dht::Did;

/// A sequence of successors for a node on the ring, following `finger[0]`.
/// It's necessary to have multiple successors to prevent a single point of failure.
/// Slot `k` should hold the `(k + 2)`-th node clockwise from the owner.
/// The sequence always has exactly `max` slots, unknown ones are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessorSeq {
    /// Max successor num, `r - 1`
    max: usize,
    /// Successors
    successors: Vec<Option<Did>>,
}

impl SuccessorSeq {
    /// Create a sequence of `max` unknown slots.
    pub fn new(max: usize) -> Self {
        Self {
            max,
            successors: vec![None; max],
        }
    }

    /// All slots in ring order, `None` for unknown ones.
    pub fn list(&self) -> Vec<Option<Did>> {
        self.successors.clone()
    }

    /// Rebuild from the chosen successor's view: its own `finger[0]` followed
    /// by its successor list with the last slot dropped.
    pub fn shift_in(&mut self, head: Option<Did>, tail: &[Option<Did>]) {
        let mut succs = Vec::with_capacity(self.max);
        succs.push(head);
        succs.extend(tail.iter().take(self.max.saturating_sub(1)).copied());
        succs.truncate(self.max);
        succs.resize(self.max, None);
        self.successors = succs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_in() {
        let mut succ = SuccessorSeq::new(2);
        assert_eq!(succ.list(), vec![None, None]);

        succ.shift_in(Some(30), &[None, None]);
        assert_eq!(succ.list(), vec![Some(30), None]);

        // the last slot of the successor's view falls off
        succ.shift_in(Some(30), &[Some(40), Some(50)]);
        assert_eq!(succ.list(), vec![Some(30), Some(40)]);
    }

    #[test]
    fn test_empty_sequence() {
        // r = 1 keeps no successor beyond finger[0]
        let mut succ = SuccessorSeq::new(0);
        succ.shift_in(Some(7), &[]);
        assert_eq!(succ.list(), vec![]);
    }

    #[test]
    fn test_short_tail_is_padded() {
        let mut succ = SuccessorSeq::new(3);
        succ.shift_in(Some(1), &[Some(2)]);
        assert_eq!(succ.list(), vec![Some(1), Some(2), None]);
    }
}
