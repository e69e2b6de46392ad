use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::dht::Did;
use crate::error::Error;
use crate::error::Result;
use crate::swarm::Swarm;

/// One mismatch between a node's view and the ground truth ring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Discrepancy {
    /// The node's predecessor is not its ring predecessor.
    Predecessor {
        did: Did,
        expected: Did,
        actual: Option<Did>,
    },
    /// Finger `index` is not the ring successor of `(did + 2^index) mod 2^m`.
    Finger {
        did: Did,
        index: usize,
        expected: Did,
        actual: Option<Did>,
    },
    /// Successor list slot `index` is not the `(index + 2)`-th ring successor.
    Successor {
        did: Did,
        index: usize,
        expected: Did,
        actual: Option<Did>,
    },
    /// The node stores a key owned by another node.
    MisplacedItem { did: Did, key: Did, expected: Did },
    /// A key is stored on more than one node.
    DuplicateItem { key: Did, holders: Vec<Did> },
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Discrepancy::Predecessor {
                did,
                expected,
                actual,
            } => write!(
                f,
                "Node {} has wrong predecessor. Expected: {}, Actual: {:?}",
                did, expected, actual
            ),
            Discrepancy::Finger {
                did,
                index,
                expected,
                actual,
            } => write!(
                f,
                "Node {} has wrong finger table {} value. Expected: {}, Actual: {:?}",
                did, index, expected, actual
            ),
            Discrepancy::Successor {
                did,
                index,
                expected,
                actual,
            } => write!(
                f,
                "Node {} has wrong successor list value at index {}. Expected: {}, Actual: {:?}",
                did, index, expected, actual
            ),
            Discrepancy::MisplacedItem { did, key, expected } => write!(
                f,
                "Node {} incorrectly possesses item with key {}. Expected Node: {}",
                did, key, expected
            ),
            Discrepancy::DuplicateItem { key, holders } => {
                write!(f, "Item with key {} is stored on nodes {:?}", key, holders)
            }
        }
    }
}

/// Every discrepancy found by [Swarm::check_correctness].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectnessReport {
    pub discrepancies: Vec<Discrepancy>,
}

impl CorrectnessReport {
    /// True if every node matches the ground truth.
    pub fn is_clean(&self) -> bool {
        self.discrepancies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.discrepancies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discrepancies.is_empty()
    }

    /// Discrepancies concerning node `did`.
    pub fn of_node(&self, did: Did) -> Vec<&Discrepancy> {
        self.discrepancies
            .iter()
            .filter(|d| match d {
                Discrepancy::Predecessor { did: x, .. }
                | Discrepancy::Finger { did: x, .. }
                | Discrepancy::Successor { did: x, .. }
                | Discrepancy::MisplacedItem { did: x, .. } => *x == did,
                Discrepancy::DuplicateItem { holders, .. } => holders.contains(&did),
            })
            .collect()
    }
}

impl fmt::Display for CorrectnessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return write!(f, "No errors in Chord Ring");
        }
        for d in &self.discrepancies {
            writeln!(f, "{}", d)?;
        }
        Ok(())
    }
}

impl Swarm {
    /// Compare every node's predecessor, finger table, successor list and
    /// stored keys against values derived from the sorted live dids.
    /// Reports every mismatch and never mutates the ring.
    pub fn check_correctness(&self) -> Result<CorrectnessReport> {
        let ring = self.dids();
        let n = ring.len();
        let mut report = CorrectnessReport::default();
        let mut holders: BTreeMap<Did, Vec<Did>> = BTreeMap::new();

        for (i, did) in ring.iter().copied().enumerate() {
            let peer = self.directory.get(did).ok_or(Error::NodeNotFound(did))?;

            let expected = ring[(i + n - 1) % n];
            let actual = peer.predecessor()?;
            if actual != Some(expected) {
                report.discrepancies.push(Discrepancy::Predecessor {
                    did,
                    expected,
                    actual,
                });
            }

            for key in peer.storage.keys() {
                holders.entry(key).or_default().push(did);
                let expected = self.ring_successor(key).ok_or(Error::EmptyRing)?;
                if expected != did {
                    report
                        .discrepancies
                        .push(Discrepancy::MisplacedItem { did, key, expected });
                }
            }

            let finger = peer.lock_finger()?.list().clone();
            for (index, actual) in finger.into_iter().enumerate() {
                let start = self.space.finger_start(did, index);
                let expected = self.ring_successor(start).ok_or(Error::EmptyRing)?;
                if actual != Some(expected) {
                    report.discrepancies.push(Discrepancy::Finger {
                        did,
                        index,
                        expected,
                        actual,
                    });
                }
            }

            for (index, actual) in peer.successors()?.into_iter().enumerate() {
                let expected = ring[(i + index + 2) % n];
                if actual != Some(expected) {
                    report.discrepancies.push(Discrepancy::Successor {
                        did,
                        index,
                        expected,
                        actual,
                    });
                }
            }
        }

        for (key, holders) in holders {
            if holders.len() > 1 {
                report
                    .discrepancies
                    .push(Discrepancy::DuplicateItem { key, holders });
            }
        }

        for d in &report.discrepancies {
            tracing::warn!("{}", d);
        }
        if report.is_clean() {
            tracing::info!("No errors in Chord Ring");
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::config::RingConfig;
    use crate::dht::Chord;
    use crate::storage::KvStorageInterface;
    use crate::swarm::SwarmBuilder;

    #[test]
    fn test_fresh_nodes_are_reported() -> Result<()> {
        let mut swarm = SwarmBuilder::new(RingConfig {
            ring_size: 4,
            successor_list_size: 2,
            ..Default::default()
        })
        .seed(1)
        .build()?;
        assert!(swarm.check_correctness()?.is_clean());

        swarm.add_node(3)?;
        swarm.add_node(9)?;
        let report = swarm.check_correctness()?;
        // predecessor, 4 fingers and 1 successor slot per node
        assert_eq!(report.len(), 12);
        assert_eq!(report.of_node(3).len(), 6);
        assert!(report.discrepancies.contains(&Discrepancy::Successor {
            did: 9,
            index: 0,
            expected: 9,
            actual: None,
        }));
        Ok(())
    }

    #[test]
    fn test_single_node_and_items() -> Result<()> {
        let mut swarm = SwarmBuilder::new(RingConfig {
            ring_size: 3,
            successor_list_size: 2,
            ..Default::default()
        })
        .seed(1)
        .build()?;
        swarm.add_node(5)?;
        swarm.add_item(1, Bytes::new())?;

        let node = swarm.dht(5).unwrap();
        node.create()?;
        for i in 0..3 {
            node.set_finger(i, 5)?;
        }
        node.notify(5)?;
        node.lock_successors()?.shift_in(Some(5), &[]);
        assert!(swarm.check_correctness()?.is_clean());

        swarm.add_node(7)?;
        swarm.dht(7).unwrap().storage.put(1, &Bytes::new())?;
        let report = swarm.check_correctness()?;
        assert!(report.discrepancies.contains(&Discrepancy::DuplicateItem {
            key: 1,
            holders: vec![5, 7],
        }));
        assert!(report.discrepancies.contains(&Discrepancy::MisplacedItem {
            did: 7,
            key: 1,
            expected: 5,
        }));
        Ok(())
    }
}
