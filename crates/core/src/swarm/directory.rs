use std::collections::HashMap;

use crate::dht::Did;
use crate::dht::PeerRing;

/// Registry of live nodes.
/// Iteration follows insertion order, which is the scheduling order of the swarm,
/// not the ring order. Removing a node keeps the relative order of the rest.
#[derive(Default)]
pub struct Directory {
    peers: HashMap<Did, PeerRing>,
    order: Vec<Did>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, did: Did) -> Option<&PeerRing> {
        self.peers.get(&did)
    }

    /// A node is live as long as it is in the directory.
    pub fn contains(&self, did: Did) -> bool {
        self.peers.contains_key(&did)
    }

    /// Insert a node at the end of the scheduling order.
    /// Returns false and leaves the directory untouched if the did is taken.
    pub fn insert(&mut self, peer: PeerRing) -> bool {
        if self.contains(peer.did) {
            return false;
        }
        self.order.push(peer.did);
        self.peers.insert(peer.did, peer);
        true
    }

    pub fn remove(&mut self, did: Did) -> Option<PeerRing> {
        let peer = self.peers.remove(&did)?;
        self.order.retain(|d| *d != did);
        Some(peer)
    }

    /// Dids in scheduling order.
    pub fn order(&self) -> &[Did] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Nodes in scheduling order.
    pub fn iter(&self) -> impl Iterator<Item = &PeerRing> {
        self.order.iter().filter_map(|did| self.peers.get(did))
    }
}
