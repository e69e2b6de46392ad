//! DHT traits naming the protocol operation set of `PeerRing`.
#![warn(missing_docs)]
use bytes::Bytes;

use super::did::Did;
use crate::error::Result;
use crate::message::FindSuccessorSend;
use crate::swarm::Directory;

/// Chord is a distributed hash table (DHT) algorithm that is designed to efficiently
/// distribute data across peer-to-peer network nodes. You may want to browse its
/// [wiki](https://en.wikipedia.org/wiki/Chord_(peer-to-peer)) before you read this.
///
/// Every node keeps a finger table of `m` routing shortcuts, entry `i` pointing at
/// the successor of `(did + 2^i) mod 2^m`, so a lookup reaches the owner of any key
/// in O(log n) hops with high probability.
///
/// Methods never touch another node's inbox. They return an `Action` which tells the
/// caller which messages to deliver, and the caller drops messages addressed to nodes
/// that have left. The [Directory] is only read, for liveness checks and for the
/// explicitly named shortcuts that peek at a peer's state.
pub trait Chord<Action> {
    /// Start a new ring, the node becomes its own successor.
    fn create(&self) -> Result<Action>;

    /// Join a ring containing the node identified by `via`, by asking it to resolve
    /// the successor of this node.
    fn join(&self, via: Did) -> Result<Action>;

    /// One hop of a lookup: answer it if the key falls between this node and its
    /// successor, otherwise forward it to the closest live preceding finger.
    /// A lookup with nowhere to go is dropped.
    fn find_successor(&self, directory: &Directory, msg: FindSuccessorSend) -> Result<Action>;

    /// Verify the immediate successor, refresh the successor list from its view,
    /// and notify it.
    /// According to the paper, this method should be called periodically.
    fn stabilize(&self, directory: &Directory) -> Result<Action>;

    /// Notify the DHT that a node may be its predecessor.
    /// This method returns the predecessor after updating.
    fn notify(&self, candidate: Did) -> Result<Option<Did>>;

    /// Fix finger table by finding the successor for one finger.
    /// According to the paper, only one finger should be fixed at a time.
    fn fix_fingers(&self, directory: &Directory) -> Result<Action>;

    /// Forget the predecessor if it has left the ring.
    /// This method returns the predecessor after checking.
    fn check_predecessor(&self, directory: &Directory) -> Result<Option<Did>>;
}

/// ChordStorage moves items between nodes as ownership changes.
///
/// A node owns every key in `(predecessor, did]`. When a node joins it asks its
/// successor for the keys it now owns, and when it leaves gracefully it hands all of
/// its items to the first live successor.
pub trait ChordStorage<Action>: Chord<Action> {
    /// Ask the successor to send the items this node now owns.
    fn request_items(&self) -> Result<Action>;

    /// Remove every item that does not belong in `(dest, did]` and send it to `dest`.
    fn send_items(&self, dest: Did) -> Result<Action>;

    /// Send the whole storage to the first live successor. Used on graceful departure.
    fn send_successor_items(&self, directory: &Directory) -> Result<Action>;

    /// Merge received items into local storage.
    fn store_items(&self, items: Vec<(Did, Bytes)>) -> Result<()>;
}
