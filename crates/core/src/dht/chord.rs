//! Chord algorithm implement.
#![warn(missing_docs)]
use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Mutex;
use std::sync::MutexGuard;

use bytes::Bytes;

use super::did::between;
use super::did::between_exclusive;
use super::did::IdSpace;
use super::successor::SuccessorSeq;
use super::types::Chord;
use super::types::ChordStorage;
use super::FingerTable;
use crate::dht::Did;
use crate::error::Error;
use crate::error::Result;
use crate::measure::QueryReport;
use crate::message::Delivery;
use crate::message::FindSuccessorSend;
use crate::message::LookupTarget;
use crate::message::Message;
use crate::message::Operation;
use crate::storage::KvStorageInterface;
use crate::storage::MemStorage;
use crate::swarm::Directory;

/// PeerRing holds the Chord state of one simulated node.
/// All nodes form a clockwise ring in the order of Did.
/// This struct takes its name from that.
/// PeerRing implemented [Chord] algorithm.
/// PeerRing implemented [ChordStorage] protocol.
///
/// State lives behind interior mutability so that a node can read its peers
/// through a shared [Directory] while it is being stepped.
pub struct PeerRing {
    /// The did of current node.
    pub did: Did,
    /// Identifier space the node lives in.
    pub space: IdSpace,
    /// [FingerTable] help node to find successor quickly.
    /// `finger[0]` is the immediate successor.
    pub finger: Mutex<FingerTable>,
    /// The nodes following `finger[0]` on the ring, for fault tolerance.
    pub successor_seq: Mutex<SuccessorSeq>,
    /// The did of previous node on the ring.
    pub predecessor: Mutex<Option<Did>>,
    /// Items owned by this node.
    pub storage: MemStorage<Bytes>,
    joined: AtomicBool,
    inbox: Mutex<VecDeque<Message>>,
    ticks: AtomicU64,
    offset: u64,
    message_count: AtomicU64,
}

/// Type alias is just for making the code easy to read.
type Target = Did;

/// `PeerRing` use this to describe the result of [Chord] algorithm.
/// Messages are delivered by the caller.
#[derive(Clone, Debug)]
pub enum PeerRingAction {
    /// No result, the whole manipulation is done internally.
    None,
    /// Deliver a message to the target node, if it is still live.
    RemoteAction(Target, Message),
    /// Trigger multiple remote actions.
    MultiActions(Vec<PeerRingAction>),
}

impl PeerRingAction {
    /// Returns `true` if the action is a [PeerRingAction::None] value.
    pub fn is_none(&self) -> bool {
        if let Self::None = self {
            return true;
        }
        false
    }
}

impl From<Vec<PeerRingAction>> for PeerRingAction {
    fn from(acts: Vec<PeerRingAction>) -> Self {
        if !acts.is_empty() {
            Self::MultiActions(acts)
        } else {
            Self::None
        }
    }
}

impl PeerRing {
    /// Create a node that has not joined any ring yet.
    /// `succ_max` is the successor list length `r - 1`, `offset` the fixed clock offset.
    pub fn new(did: Did, space: IdSpace, succ_max: usize, offset: u64) -> Self {
        Self {
            did,
            space,
            finger: Mutex::new(FingerTable::new(did, space.bits() as usize)),
            successor_seq: Mutex::new(SuccessorSeq::new(succ_max)),
            predecessor: Mutex::new(None),
            storage: MemStorage::new(),
            joined: AtomicBool::new(false),
            inbox: Mutex::new(VecDeque::new()),
            ticks: AtomicU64::new(0),
            offset,
            message_count: AtomicU64::new(0),
        }
    }

    /// Lock and return MutexGuard of finger table.
    pub fn lock_finger(&self) -> Result<MutexGuard<FingerTable>> {
        self.finger.lock().map_err(|_| Error::DHTSyncLockError)
    }

    /// Lock and return MutexGuard of successor sequence.
    pub fn lock_successors(&self) -> Result<MutexGuard<SuccessorSeq>> {
        self.successor_seq.lock().map_err(|_| Error::DHTSyncLockError)
    }

    /// Lock and return MutexGuard of predecessor.
    pub fn lock_predecessor(&self) -> Result<MutexGuard<Option<Did>>> {
        self.predecessor.lock().map_err(|_| Error::DHTSyncLockError)
    }

    fn lock_inbox(&self) -> Result<MutexGuard<VecDeque<Message>>> {
        self.inbox.lock().map_err(|_| Error::DHTSyncLockError)
    }

    /// The immediate successor, `finger[0]`.
    pub fn successor(&self) -> Result<Option<Did>> {
        Ok(self.lock_finger()?.successor())
    }

    /// Copy of the successor list.
    pub fn successors(&self) -> Result<Vec<Option<Did>>> {
        Ok(self.lock_successors()?.list())
    }

    /// Copy of the predecessor.
    pub fn predecessor(&self) -> Result<Option<Did>> {
        Ok(*self.lock_predecessor()?)
    }

    /// True once the first successor has been resolved.
    pub fn is_joined(&self) -> bool {
        self.joined.load(Ordering::SeqCst)
    }

    /// Append a message to the tail of the inbox.
    pub fn push_message(&self, msg: Message) -> Result<()> {
        self.lock_inbox()?.push_back(msg);
        Ok(())
    }

    /// Pop the oldest message of the inbox.
    pub fn pop_message(&self) -> Result<Option<Message>> {
        Ok(self.lock_inbox()?.pop_front())
    }

    /// Number of pending messages.
    pub fn inbox_len(&self) -> Result<usize> {
        Ok(self.lock_inbox()?.len())
    }

    /// Advance the node clock by one tick, returning the new tick count.
    pub fn tick(&self) -> u64 {
        self.ticks.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Ticks this node has lived through.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    /// Random clock offset drawn once at creation.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Messages sent by this node so far.
    pub fn message_count(&self) -> u64 {
        self.message_count.load(Ordering::SeqCst)
    }

    pub(crate) fn incr_message_count(&self) {
        self.message_count.fetch_add(1, Ordering::SeqCst);
    }

    /// Number of stored items.
    pub fn key_count(&self) -> Result<u32> {
        self.storage.count()
    }

    /// Set finger entry `index`. The first assignment of `finger[0]` is the join
    /// transition: the node is marked joined and asks its successor for items.
    pub fn set_finger(&self, index: usize, did: Did) -> Result<PeerRingAction> {
        let first_successor = {
            let mut finger = self.lock_finger()?;
            let replaced = finger.set(index, did);
            index == 0 && replaced.is_none()
        };
        if first_successor {
            self.joined.store(true, Ordering::SeqCst);
            tracing::info!("node {} joined the ring, successor: {}", self.did, did);
            return self.request_items();
        }
        Ok(PeerRingAction::None)
    }

    /// First live node among `finger[0]` and then the successor list.
    /// Returns `None` when the node knows no successor at all, which only
    /// happens before it joined.
    pub fn first_alive_successor(&self, directory: &Directory) -> Result<Option<Did>> {
        let mut candidates: Vec<Did> = self.successor()?.into_iter().collect();
        candidates.extend(self.successors()?.into_iter().flatten());
        if candidates.is_empty() {
            return Ok(None);
        }
        match candidates.iter().find(|did| directory.contains(**did)) {
            Some(did) => Ok(Some(*did)),
            None => {
                tracing::error!(
                    "node {} has no live successor, candidates: {:?}",
                    self.did,
                    candidates
                );
                Err(Error::SuccessorsExhausted(self.did))
            }
        }
    }

    /// Shortcut: read a peer's predecessor directly instead of a query round trip.
    fn peek_predecessor(&self, directory: &Directory, did: Did) -> Result<Option<Did>> {
        directory
            .get(did)
            .ok_or(Error::NodeNotFound(did))?
            .predecessor()
    }

    /// Shortcut: read a peer's `finger[0]` and successor list directly.
    fn peek_successors(
        &self,
        directory: &Directory,
        did: Did,
    ) -> Result<(Option<Did>, Vec<Option<Did>>)> {
        let peer = directory.get(did).ok_or(Error::NodeNotFound(did))?;
        Ok((peer.successor()?, peer.successors()?))
    }
}

impl Chord<PeerRingAction> for PeerRing {
    /// Only valid for the first node of an empty ring.
    /// Goes through [PeerRing::set_finger] like any other first successor.
    fn create(&self) -> Result<PeerRingAction> {
        tracing::info!("node {} creates a new ring", self.did);
        self.set_finger(0, self.did)
    }

    fn join(&self, via: Did) -> Result<PeerRingAction> {
        tracing::debug!("node {} joins via {}", self.did, via);
        Ok(PeerRingAction::RemoteAction(
            via,
            Operation::FindSuccessor(FindSuccessorSend {
                dest: self.did,
                target: LookupTarget::Finger(0),
                key: self.did,
                steps: 0,
            })
            .into(),
        ))
    }

    fn find_successor(
        &self,
        directory: &Directory,
        mut msg: FindSuccessorSend,
    ) -> Result<PeerRingAction> {
        msg.steps += 1;

        let succ = match self.first_alive_successor(directory)? {
            Some(succ) => succ,
            None => {
                tracing::debug!(
                    "node {} has not joined, drop lookup of key {}",
                    self.did,
                    msg.key
                );
                return Ok(PeerRingAction::None);
            }
        };

        if between(self.did, succ, msg.key) {
            let delivery = match msg.target {
                LookupTarget::Client(tracker) => {
                    // Views may be out of sync under churn, so check the owner really has it.
                    let success = directory
                        .get(succ)
                        .map(|peer| peer.storage.contains_key(msg.key))
                        .unwrap_or(false);
                    Delivery::Client {
                        report: QueryReport {
                            key: msg.key,
                            owner: succ,
                            steps: msg.steps,
                            success,
                        },
                        tracker,
                    }
                }
                LookupTarget::Finger(index) => Delivery::Finger { index, did: succ },
            };
            return Ok(PeerRingAction::RemoteAction(msg.dest, delivery.into()));
        }

        let next = self
            .lock_finger()?
            .closest_preceding(msg.key, |did| directory.contains(did));
        tracing::debug!(
            "find_successor: self: {}, key: {}, successor: {}, next: {:?}",
            self.did,
            msg.key,
            succ,
            next
        );
        match next {
            Some(next) => Ok(PeerRingAction::RemoteAction(
                next,
                Operation::FindSuccessor(msg).into(),
            )),
            None => {
                tracing::debug!(
                    "node {} found no live finger towards key {}, drop lookup",
                    self.did,
                    msg.key
                );
                Ok(PeerRingAction::None)
            }
        }
    }

    fn stabilize(&self, directory: &Directory) -> Result<PeerRingAction> {
        let Some(mut succ) = self.first_alive_successor(directory)? else {
            return Ok(PeerRingAction::None);
        };
        self.lock_finger()?.set(0, succ);

        if let Some(pred) = self.peek_predecessor(directory, succ)? {
            if directory.contains(pred) && between_exclusive(self.did, succ, pred) {
                self.lock_finger()?.set(0, pred);
                succ = pred;
            }
        }

        let (head, tail) = self.peek_successors(directory, succ)?;
        self.lock_successors()?.shift_in(head, &tail);

        Ok(PeerRingAction::RemoteAction(
            succ,
            Operation::Notify {
                candidate: self.did,
            }
            .into(),
        ))
    }

    fn notify(&self, candidate: Did) -> Result<Option<Did>> {
        let mut predecessor = self.lock_predecessor()?;
        let accept = match *predecessor {
            Some(pre) => between_exclusive(pre, self.did, candidate),
            None => true,
        };
        if accept {
            *predecessor = Some(candidate);
            let mut finger = self.lock_finger()?;
            // Alone until now, the new predecessor is the successor too.
            if finger.successor() == Some(self.did) {
                finger.set(0, candidate);
                self.joined.store(true, Ordering::SeqCst);
            }
        }
        Ok(*predecessor)
    }

    fn fix_fingers(&self, directory: &Directory) -> Result<PeerRingAction> {
        let index = self.lock_finger()?.next_fix_index();
        let key = self.space.finger_start(self.did, index);
        self.find_successor(directory, FindSuccessorSend {
            dest: self.did,
            target: LookupTarget::Finger(index),
            key,
            steps: 0,
        })
    }

    fn check_predecessor(&self, directory: &Directory) -> Result<Option<Did>> {
        let mut predecessor = self.lock_predecessor()?;
        if let Some(pre) = *predecessor {
            if !directory.contains(pre) {
                tracing::debug!("node {} lost predecessor {}", self.did, pre);
                *predecessor = None;
            }
        }
        Ok(*predecessor)
    }
}

impl ChordStorage<PeerRingAction> for PeerRing {
    fn request_items(&self) -> Result<PeerRingAction> {
        match self.successor()? {
            Some(succ) if succ != self.did => Ok(PeerRingAction::RemoteAction(
                succ,
                Operation::SendItems { dest: self.did }.into(),
            )),
            _ => Ok(PeerRingAction::None),
        }
    }

    fn send_items(&self, dest: Did) -> Result<PeerRingAction> {
        let mut items = vec![];
        for (key, value) in self.storage.get_all()? {
            if !between(dest, self.did, key) {
                self.storage.remove(key)?;
                items.push((key, value));
            }
        }
        tracing::debug!(
            "node {} hands {} items over to {}",
            self.did,
            items.len(),
            dest
        );
        Ok(PeerRingAction::RemoteAction(
            dest,
            Delivery::Storage(items).into(),
        ))
    }

    fn send_successor_items(&self, directory: &Directory) -> Result<PeerRingAction> {
        let items = self.storage.get_all()?;
        let succ = match self.first_alive_successor(directory)? {
            Some(succ) => succ,
            None if items.is_empty() => return Ok(PeerRingAction::None),
            None => return Err(Error::SuccessorsExhausted(self.did)),
        };
        Ok(PeerRingAction::RemoteAction(
            succ,
            Delivery::Storage(items).into(),
        ))
    }

    fn store_items(&self, items: Vec<(Did, Bytes)>) -> Result<()> {
        for (key, value) in items {
            self.storage.put(key, &value)?;
        }
        Ok(())
    }
}
