use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::dht::Did;
use crate::dht::PeerRing;
use crate::error::Error;
use crate::error::Result;
use crate::swarm::Swarm;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwarmInspect {
    pub seed: u64,
    pub ticks: u64,
    /// Nodes in ring order.
    pub nodes: Vec<DHTInspect>,
    pub item_keys: Vec<Did>,
    pub hop_counts: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DHTInspect {
    pub did: Did,
    /// `finger[0]` followed by the successor list.
    pub successors: Vec<Option<Did>>,
    #[serde(default)]
    pub predecessor: Option<Did>,
    /// Runs of equal entries as `(entry, first index, last index)`.
    pub finger_table: Vec<(Option<Did>, u64, u64)>,
    pub storage: Vec<Did>,
    pub joined: bool,
    pub offset: u64,
    pub message_count: u64,
}

impl SwarmInspect {
    pub fn inspect(swarm: &Swarm) -> Result<Self> {
        Ok(Self {
            seed: swarm.seed(),
            ticks: swarm.ticks(),
            nodes: swarm.inspect_nodes()?,
            item_keys: swarm.item_keys().iter().copied().collect(),
            hop_counts: swarm.hop_counts()?,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|_| Error::EncodeError)
    }

    pub fn from_json(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| Error::DecodeError(e.to_string()))
    }
}

impl DHTInspect {
    pub fn inspect(dht: &PeerRing) -> Result<Self> {
        let did = dht.did;
        let successors = {
            let mut successors = vec![dht.successor()?];
            successors.extend(dht.successors()?);
            successors
        };

        let predecessor = dht.predecessor()?;

        let finger_table = {
            let ft = dht.lock_finger()?;
            compress_iter(ft.list().iter().copied())
        };

        Ok(Self {
            did,
            successors,
            predecessor,
            finger_table,
            storage: dht.storage.keys(),
            joined: dht.is_joined(),
            offset: dht.offset(),
            message_count: dht.message_count(),
        })
    }
}

impl fmt::Display for DHTInspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Node {}", self.did)?;
        writeln!(f, "{}", "-".repeat(40))?;
        writeln!(f, "Successor List: {:?}", self.successors)?;
        writeln!(f, "Predecessor: {:?}", self.predecessor)?;
        for (entry, start, end) in &self.finger_table {
            if start == end {
                writeln!(f, "Finger Table Entry {}: {:?}", start, entry)?;
            } else {
                writeln!(f, "Finger Table Entry {}..={}: {:?}", start, end, entry)?;
            }
        }
        writeln!(f, "Stored keys: {:?}", self.storage)
    }
}

pub fn compress_iter<T>(iter: impl Iterator<Item = T>) -> Vec<(T, u64, u64)>
where T: PartialEq {
    let mut result = vec![];
    let mut start = 0u64;
    let mut count = 0u64;
    let mut prev: Option<T> = None;

    for (i, x) in iter.enumerate() {
        match prev {
            Some(p) if p == x => {
                count += 1;
                prev = Some(p);
            }
            _ => {
                if let Some(p) = prev {
                    result.push((p, start, start + count - 1));
                }
                start = i as u64;
                count = 1;
                prev = Some(x);
            }
        }
    }

    if let Some(p) = prev {
        result.push((p, start, start + count - 1));
    }

    result
}
