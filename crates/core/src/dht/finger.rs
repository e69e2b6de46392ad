#![warn(missing_docs)]
use serde::Deserialize;
use serde::Serialize;

use crate::dht::did::between_exclusive;
use crate::dht::Did;

/// Finger table of Chord DHT.
/// Entry `i` should point to the first live node at or after `(did + 2^i) mod 2^m`.
/// Entry 0 is the immediate successor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerTable {
    did: Did,
    finger: Vec<Option<Did>>,
    /// Next entry repaired by `fix_fingers`.
    pub(super) fix_finger_index: usize,
}

impl FingerTable {
    /// builder
    pub fn new(did: Did, size: usize) -> Self {
        Self {
            did,
            finger: vec![None; size],
            fix_finger_index: 0,
        }
    }

    /// getter
    pub fn get(&self, index: usize) -> Option<Did> {
        self.finger.get(index).copied().flatten()
    }

    /// The immediate successor.
    pub fn successor(&self) -> Option<Did> {
        self.get(0)
    }

    /// setter, returns the replaced value
    pub fn set(&mut self, index: usize, did: Did) -> Option<Did> {
        tracing::debug!("set finger table index: {} did: {}", index, did);
        match self.finger.get_mut(index) {
            Some(slot) => slot.replace(did),
            None => {
                tracing::error!("set finger index out of range, index: {}", index);
                None
            }
        }
    }

    /// Take the next index to repair, rotating through `0..size`.
    pub fn next_fix_index(&mut self) -> usize {
        let index = self.fix_finger_index;
        self.fix_finger_index = (index + 1) % self.finger.len();
        index
    }

    /// Closest preceding finger of `key`: scanning from the farthest entry down,
    /// the first one accepted by `live` that lies strictly in `(did, key)`.
    pub fn closest_preceding(&self, key: Did, live: impl Fn(Did) -> bool) -> Option<Did> {
        self.finger
            .iter()
            .rev()
            .flatten()
            .copied()
            .find(|&f| live(f) && between_exclusive(self.did, key, f))
    }

    /// get finger list
    pub fn list(&self) -> &Vec<Option<Did>> {
        &self.finger
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_finger_table_get_set() {
        let mut table = FingerTable::new(10, 3);
        assert_eq!(table.get(0), None);
        assert_eq!(table.get(3), None);

        assert_eq!(table.set(0, 20), None);
        assert_eq!(table.successor(), Some(20));
        assert_eq!(table.set(0, 15), Some(20));
        assert_eq!(table.get(0), Some(15));

        // out of range is ignored
        assert_eq!(table.set(3, 99), None);
        assert_eq!(table.list(), &vec![Some(15), None, None]);

        // a node may point at itself, e.g. the first node of a ring
        table.set(2, 10);
        assert_eq!(table.list(), &vec![Some(15), None, Some(10)]);
    }

    #[test]
    fn test_fix_index_rotates() {
        let mut table = FingerTable::new(0, 3);
        let seen: Vec<usize> = (0..7).map(|_| table.next_fix_index()).collect();
        assert_eq!(seen, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn test_closest_preceding() {
        // node 10 on a ring of 256, fingers at 11, 12, 14, 18, 26, 42, 74, 138
        let mut table = FingerTable::new(10, 8);
        for (i, did) in [20, 20, 20, 20, 30, 50, 80, 150].into_iter().enumerate() {
            table.set(i, did);
        }

        assert_eq!(table.closest_preceding(100, |_| true), Some(80));
        assert_eq!(table.closest_preceding(200, |_| true), Some(150));
        // 80 is dead, fall back to a nearer finger
        assert_eq!(table.closest_preceding(100, |d| d != 80), Some(50));
        // nothing strictly inside (10, 20)
        assert_eq!(table.closest_preceding(20, |_| true), None);
        // wrapping key
        assert_eq!(table.closest_preceding(5, |_| true), Some(150));
        assert_eq!(table.closest_preceding(5, |_| false), None);
    }
}
