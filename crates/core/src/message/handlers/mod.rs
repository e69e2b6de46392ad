#![warn(missing_docs)]
//! This module implemented message handler of the simulated ring.
//! A node pops one message per tick and hands it to [MessageHandler].

use crate::dht::PeerRing;
use crate::dht::PeerRingAction;
use crate::error::Result;
use crate::message::types::Message;
use crate::swarm::Directory;

/// Handler of protocol operations
pub mod dht;
/// Handler of delivered values
pub mod value;

/// MessageHandler processes messages on behalf of one node.
/// It borrows the node and the directory of live peers for the duration of one step.
pub struct MessageHandler<'a> {
    dht: &'a PeerRing,
    directory: &'a Directory,
}

/// Generic trait for handle message ,inspired by Actor-Model.
pub trait HandleMsg<T> {
    /// Message handler.
    fn handle(&self, msg: T) -> Result<()>;
}

impl<'a> MessageHandler<'a> {
    /// Create a new MessageHandler instance.
    pub fn new(dht: &'a PeerRing, directory: &'a Directory) -> Self {
        Self { dht, directory }
    }

    /// Pop the oldest message of the node's inbox and process it.
    /// No-op if the inbox is empty.
    pub fn process_incoming(&self) -> Result<()> {
        let Some(msg) = self.dht.pop_message()? else {
            return Ok(());
        };
        tracing::debug!("node {} processes {}", self.dht.did, msg);
        match msg {
            Message::Value(v) => self.handle(v),
            Message::Invoke(op) => self.handle(op),
        }
    }

    /// Deliver the messages described by `act`. Messages addressed to nodes
    /// that have left are dropped. Every delivered message is counted for the sender.
    pub(crate) fn handle_dht_events(&self, act: PeerRingAction) -> Result<()> {
        match act {
            PeerRingAction::None => Ok(()),
            PeerRingAction::RemoteAction(target, msg) => {
                match self.directory.get(target) {
                    Some(peer) => {
                        tracing::debug!("{} -> {}: {}", self.dht.did, target, msg);
                        peer.push_message(msg)?;
                        self.dht.incr_message_count();
                    }
                    None => {
                        tracing::debug!(
                            "{} -> {}: target has left, drop {}",
                            self.dht.did,
                            target,
                            msg
                        );
                    }
                }
                Ok(())
            }
            PeerRingAction::MultiActions(acts) => {
                for act in acts {
                    self.handle_dht_events(act)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dht::IdSpace;
    use crate::message::Operation;

    #[test]
    fn test_deliver_only_to_live_nodes() -> Result<()> {
        let mut directory = Directory::new();
        directory.insert(PeerRing::new(1, IdSpace::new(4), 1, 0));
        directory.insert(PeerRing::new(5, IdSpace::new(4), 1, 0));
        let a = directory.get(1).unwrap();
        let handler = MessageHandler::new(a, &directory);

        handler.handle_dht_events(
            vec![
                PeerRingAction::RemoteAction(5, Operation::Stabilize.into()),
                PeerRingAction::RemoteAction(9, Operation::Stabilize.into()),
                PeerRingAction::RemoteAction(1, Operation::FixFinger.into()),
            ]
            .into(),
        )?;

        assert_eq!(a.message_count(), 2);
        assert_eq!(a.inbox_len()?, 1);
        assert_eq!(directory.get(5).unwrap().inbox_len()?, 1);
        Ok(())
    }

    #[test]
    fn test_process_empty_inbox() -> Result<()> {
        let mut directory = Directory::new();
        directory.insert(PeerRing::new(1, IdSpace::new(4), 1, 0));
        let a = directory.get(1).unwrap();
        MessageHandler::new(a, &directory).process_incoming()?;
        assert_eq!(a.message_count(), 0);
        Ok(())
    }
}
