#![warn(missing_docs)]
//! Implementation of a simulated Chord DHT
//! which is based on CHORD, ref: <https://pdos.csail.mit.edu/papers/ton:chord/paper-ton.pdf>
//! With high probability, the number of nodes that must be contacted to find a successor in an N-node network is O(log N).

mod chord;
pub mod did;
/// Finger table for PeerRing
pub mod finger;
mod stabilization;
/// Successor list for PeerRing
pub mod successor;
pub mod types;

pub use chord::PeerRing;
pub use chord::PeerRingAction;
pub use did::between;
pub use did::between_exclusive;
pub use did::Did;
pub use did::IdSpace;
pub use finger::FingerTable;
pub use stabilization::Stabilizer;
pub use successor::SuccessorSeq;
pub use types::Chord;
pub use types::ChordStorage;
