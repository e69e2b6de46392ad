//! chord-sim: a discrete-event simulator of the Chord DHT.
//! --------------
//! - [Chord](crate::dht::PeerRing) holds the per-node state machine: finger table, successor list, predecessor and item storage.
//! - [Swarm](crate::swarm::Swarm) owns every node, steps simulated time and checks the ring against ground truth.
//! - [Message](crate::message::Message) is the in-process message passed between node inboxes.
//!
//! # Ticks
//!
//! There is no wall clock. One call of `Swarm::advance_one_step` is one tick, in which every
//! live node, in insertion order:
//!
//! 1. bumps its own clock and enqueues the maintenance that is due
//!    (stabilize, fix finger, check predecessor), shifted by a random per-node offset;
//! 2. pops and processes at most one message from its inbox.
//!
//! A processed message may enqueue messages on other nodes, or on itself, which are
//! processed on later ticks. Operations never block, an asynchronous exchange is a chain
//! of messages across ticks.
//!
//! # Churn
//!
//! Nodes leave abruptly or gracefully, and nobody is told. Dangling references are found
//! lazily: `stabilize` falls back along the successor list, `check_predecessor` forgets a
//! departed predecessor, and lookups only forward to live fingers.
//!
//! ```rust
//! use bytes::Bytes;
//! use chord_sim::prelude::*;
//!
//! # fn main() -> chord_sim::error::Result<()> {
//! let mut swarm = SwarmBuilder::new(RingConfig::default()).seed(7).build()?;
//! swarm.add_node(42)?;
//! swarm.add_item(17, Bytes::from("value"))?;
//! swarm.advance(100)?;
//! assert!(swarm.check_correctness()?.is_clean());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod consts;
pub mod dht;
pub mod error;
pub mod inspect;
pub mod logging;
pub mod measure;
pub mod message;
pub mod prelude;
pub mod storage;
pub mod swarm;
#[cfg(test)]
mod tests;
