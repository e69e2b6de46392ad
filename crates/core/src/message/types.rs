#![warn(missing_docs)]
//! This module defines the in-process messages exchanged between simulated nodes.
//! A message either delivers a computed value into a field of the recipient
//! ([Delivery]), or asks the recipient to run one protocol operation ([Operation]).

use std::fmt;

use bytes::Bytes;

use crate::dht::Did;
use crate::measure::QueryReport;
use crate::measure::QueryTracker;

/// A message queued in a node's inbox.
#[derive(Debug, Clone)]
pub enum Message {
    /// Install a value into the recipient's state.
    Value(Delivery),
    /// Execute a protocol operation on the recipient.
    Invoke(Operation),
}

/// Values a node can receive.
#[derive(Debug, Clone)]
pub enum Delivery {
    /// The resolved successor of finger entry `index`.
    Finger {
        /// finger table index
        index: usize,
        /// resolved node
        did: Did,
    },
    /// Items to merge into the recipient's storage.
    Storage(Vec<(Did, Bytes)>),
    /// Terminal result of a client lookup, recorded into `tracker`.
    Client {
        /// the result
        report: QueryReport,
        /// where the result is recorded
        tracker: QueryTracker,
    },
}

/// Where the result of a `find_successor` chain should land.
#[derive(Debug, Clone)]
pub enum LookupTarget {
    /// Entry `i` of the destination's finger table.
    Finger(usize),
    /// A client query, recorded into the tracker.
    Client(QueryTracker),
}

/// MessageType use to find successor in a chord ring.
#[derive(Debug, Clone)]
pub struct FindSuccessorSend {
    /// Node the result is delivered to.
    pub dest: Did,
    /// Field the result is delivered into.
    pub target: LookupTarget,
    /// Key to resolve.
    pub key: Did,
    /// `find_successor` invocations so far.
    pub steps: u32,
}

/// The closed set of protocol operations.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Bootstrap a new ring.
    Create,
    /// Join the ring through node `via`.
    Join {
        /// bootstrap node
        via: Did,
    },
    /// One hop of a lookup.
    FindSuccessor(FindSuccessorSend),
    /// Hand over the items `dest` now owns.
    SendItems {
        /// the new predecessor
        dest: Did,
    },
    /// Verify the successor and notify it.
    Stabilize,
    /// `candidate` claims to be the recipient's predecessor.
    Notify {
        /// the claimed predecessor
        candidate: Did,
    },
    /// Repair one finger table entry.
    FixFinger,
    /// Forget a departed predecessor.
    CheckPredecessor,
}

impl fmt::Display for LookupTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupTarget::Finger(i) => write!(f, "finger_table_{}", i),
            LookupTarget::Client(_) => write!(f, "client"),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "create"),
            Operation::Join { via } => write!(f, "join: via-{}", via),
            Operation::FindSuccessor(m) => write!(
                f,
                "find_successor: dest-{} target-{} key-{} steps-{}",
                m.dest, m.target, m.key, m.steps
            ),
            Operation::SendItems { dest } => write!(f, "send_items: dest-{}", dest),
            Operation::Stabilize => write!(f, "stabilize"),
            Operation::Notify { candidate } => write!(f, "notify: candidate-{}", candidate),
            Operation::FixFinger => write!(f, "fix_finger"),
            Operation::CheckPredecessor => write!(f, "check_predecessor"),
        }
    }
}

impl fmt::Display for Delivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delivery::Finger { index, did } => write!(f, "finger_table_{} <- {}", index, did),
            Delivery::Storage(items) => {
                let keys: Vec<Did> = items.iter().map(|(k, _)| *k).collect();
                write!(f, "storage <- {:?}", keys)
            }
            Delivery::Client { report, .. } => write!(f, "client <- {}", report),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Value(v) => write!(f, "value {}", v),
            Message::Invoke(op) => write!(f, "invoke {}", op),
        }
    }
}

impl From<Operation> for Message {
    fn from(op: Operation) -> Self {
        Message::Invoke(op)
    }
}

impl From<Delivery> for Message {
    fn from(v: Delivery) -> Self {
        Message::Value(v)
    }
}
