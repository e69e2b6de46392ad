//! Ring membership and the tick-stepped scheduler.
//!
//! A [Swarm] owns every simulated node through a [Directory], advances simulated
//! time one global tick at a time and offers the bootstrap shortcuts used by
//! experiments: direct item placement and query injection. It also keeps the
//! sorted set of live dids, the ground truth that only the correctness checker
//! and item placement consult. The protocol itself routes purely through finger
//! tables and successor lists.

mod builder;
/// Cross-validation of every node's view against the ground truth ring
pub mod correctness;
mod directory;

use std::collections::BTreeSet;
use std::fmt;

use bytes::Bytes;
pub use builder::SwarmBuilder;
pub use correctness::CorrectnessReport;
pub use correctness::Discrepancy;
pub use directory::Directory;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::RingConfig;
use crate::dht::ChordStorage;
use crate::dht::Did;
use crate::dht::IdSpace;
use crate::dht::PeerRing;
use crate::dht::Stabilizer;
use crate::error::Error;
use crate::error::Result;
use crate::inspect::DHTInspect;
use crate::inspect::SwarmInspect;
use crate::measure::QueryReport;
use crate::measure::QueryTracker;
use crate::message::FindSuccessorSend;
use crate::message::LookupTarget;
use crate::message::MessageHandler;
use crate::message::Operation;
use crate::storage::KvStorageInterface;

/// The simulated ring.
pub struct Swarm {
    config: RingConfig,
    space: IdSpace,
    directory: Directory,
    /// Live dids in ring order.
    ring: BTreeSet<Did>,
    item_keys: BTreeSet<Did>,
    tracker: QueryTracker,
    stabilizer: Stabilizer,
    rng: StdRng,
    seed: u64,
    ticks: u64,
}

impl Swarm {
    /// The configuration the swarm was built with.
    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    /// Seed of the swarm RNG.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Global ticks elapsed.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.directory.len()
    }

    /// True if the ring has no node.
    pub fn is_empty(&self) -> bool {
        self.directory.is_empty()
    }

    /// Get the node of `did`, if it is live.
    pub fn dht(&self, did: Did) -> Option<&PeerRing> {
        self.directory.get(did)
    }

    /// Live dids in ring order.
    pub fn dids(&self) -> Vec<Did> {
        self.ring.iter().copied().collect()
    }

    fn check_did(&self, did: Did) -> Result<()> {
        if !self.space.contains(did) {
            return Err(Error::DidOutOfRange {
                did,
                modulus: self.space.modulus(),
            });
        }
        Ok(())
    }

    fn peer(&self, did: Did) -> Result<&PeerRing> {
        self.directory.get(did).ok_or(Error::NodeNotFound(did))
    }

    /// Ground truth owner of `key`: the first live did at or after it, clockwise.
    pub(crate) fn ring_successor(&self, key: Did) -> Option<Did> {
        self.ring
            .range(key..)
            .next()
            .or_else(|| self.ring.iter().next())
            .copied()
    }

    /// Add a node. The first node creates the ring, every later one joins
    /// through a uniformly chosen live node. Adding a present did is a no-op.
    pub fn add_node(&mut self, did: Did) -> Result<()> {
        self.check_did(did)?;
        if self.directory.contains(did) {
            tracing::warn!("node {} already exists on the ring, skip", did);
            return Ok(());
        }

        let offset = self.rng.gen_range(0..=self.config.max_offset);
        let peer = PeerRing::new(
            did,
            self.space,
            self.config.successor_list_size - 1,
            offset,
        );
        let op = match self.directory.order().choose(&mut self.rng) {
            Some(via) => Operation::Join { via: *via },
            None => Operation::Create,
        };
        tracing::info!("add node {}, offset: {}, bootstrap: {}", did, offset, op);
        peer.push_message(op.into())?;

        self.directory.insert(peer);
        self.ring.insert(did);
        Ok(())
    }

    /// Remove a node without any handoff, as if it crashed.
    /// The rest of the ring detects the absence reactively.
    pub fn remove_node_abrupt(&mut self, did: Did) -> Result<()> {
        self.directory.remove(did).ok_or(Error::NodeNotFound(did))?;
        self.ring.remove(&did);
        tracing::info!("remove node {} by failure", did);
        Ok(())
    }

    /// Forward the node's items to its first live successor, then remove it.
    /// Fails if the node holds items but knows no live successor.
    pub fn remove_node_graceful(&mut self, did: Did) -> Result<()> {
        let peer = self.peer(did)?;
        let act = peer.send_successor_items(&self.directory)?;
        MessageHandler::new(peer, &self.directory).handle_dht_events(act)?;

        self.directory.remove(did);
        self.ring.remove(&did);
        tracing::info!("remove node {} gracefully", did);
        Ok(())
    }

    /// Advance every live node by one tick: bump its clock, enqueue due
    /// maintenance, then process at most one message from its inbox.
    pub fn advance_one_step(&mut self) -> Result<()> {
        self.ticks += 1;
        // The directory is not mutated during a tick, so this iterates the
        // membership as of the start of the tick.
        for peer in self.directory.iter() {
            self.stabilizer.maintain(peer)?;
            MessageHandler::new(peer, &self.directory).process_incoming()?;
        }
        Ok(())
    }

    /// Advance `ticks` ticks.
    pub fn advance(&mut self, ticks: u64) -> Result<()> {
        for _ in 0..ticks {
            self.advance_one_step()?;
        }
        Ok(())
    }

    /// Shortcut: store an item directly on its ground truth owner,
    /// bypassing the lookup protocol.
    pub fn add_item(&mut self, key: Did, value: Bytes) -> Result<()> {
        self.check_did(key)?;
        let owner = self.ring_successor(key).ok_or(Error::EmptyRing)?;
        self.peer(owner)?.storage.put(key, &value)?;
        self.item_keys.insert(key);
        tracing::debug!("item {} placed on node {}", key, owner);
        Ok(())
    }

    /// Launch a lookup of `key` from a uniformly chosen live node.
    /// The result shows up in [Swarm::hop_counts] once the lookup completes.
    /// Returns the entry node.
    pub fn query_item(&mut self, key: Did) -> Result<Did> {
        self.check_did(key)?;
        let entry = *self
            .directory
            .order()
            .choose(&mut self.rng)
            .ok_or(Error::EmptyRing)?;
        tracing::debug!("query key {} from node {}", key, entry);
        self.peer(entry)?.push_message(
            Operation::FindSuccessor(FindSuccessorSend {
                dest: entry,
                target: LookupTarget::Client(self.tracker.clone()),
                key,
                steps: 0,
            })
            .into(),
        )?;
        Ok(entry)
    }

    /// Every key ever inserted with [Swarm::add_item].
    pub fn item_keys(&self) -> &BTreeSet<Did> {
        &self.item_keys
    }

    /// Hop counts of successful lookups, in completion order.
    pub fn hop_counts(&self) -> Result<Vec<u32>> {
        self.tracker.hop_counts()
    }

    /// Every terminal lookup report, failed ones included.
    pub fn query_reports(&self) -> Result<Vec<QueryReport>> {
        self.tracker.reports()
    }

    /// Number of items stored on node `did`.
    pub fn key_count(&self, did: Did) -> Result<u32> {
        self.peer(did)?.key_count()
    }

    /// `(did, number of items)` of every live node, in ring order.
    pub fn key_distribution(&self) -> Result<Vec<(Did, u32)>> {
        self.ring
            .iter()
            .map(|did| Ok((*did, self.key_count(*did)?)))
            .collect()
    }

    /// Messages sent by node `did`.
    pub fn message_count(&self, did: Did) -> Result<u64> {
        Ok(self.peer(did)?.message_count())
    }

    /// Messages sent by all live nodes.
    pub fn total_messages(&self) -> u64 {
        self.directory.iter().map(|p| p.message_count()).sum()
    }

    /// Serializable snapshot of the whole ring.
    pub fn inspect(&self) -> Result<SwarmInspect> {
        SwarmInspect::inspect(self)
    }

    /// Snapshots of every live node, in ring order.
    pub(crate) fn inspect_nodes(&self) -> Result<Vec<DHTInspect>> {
        self.ring
            .iter()
            .filter_map(|did| self.directory.get(*did))
            .map(DHTInspect::inspect)
            .collect()
    }
}

impl fmt::Display for Swarm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in self.inspect_nodes().map_err(|_| fmt::Error)? {
            writeln!(f, "{}", node)?;
        }
        Ok(())
    }
}
