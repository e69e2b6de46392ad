use crate::dht::Chord;
use crate::dht::ChordStorage;
use crate::error::Result;
use crate::message::types::Operation;
use crate::message::HandleMsg;
use crate::message::MessageHandler;

impl HandleMsg<Operation> for MessageHandler<'_> {
    fn handle(&self, op: Operation) -> Result<()> {
        let act = match op {
            Operation::Create => self.dht.create()?,
            Operation::Join { via } => {
                if !self.directory.contains(via) {
                    tracing::warn!(
                        "node {} cannot join via {}, it has left the ring",
                        self.dht.did,
                        via
                    );
                    return Ok(());
                }
                self.dht.join(via)?
            }
            Operation::FindSuccessor(msg) if !self.dht.is_joined() => {
                // Not routable yet, retry once this node has joined.
                tracing::debug!(
                    "node {} has not joined, requeue lookup of key {}",
                    self.dht.did,
                    msg.key
                );
                self.dht.push_message(Operation::FindSuccessor(msg).into())?;
                return Ok(());
            }
            Operation::FindSuccessor(msg) => self.dht.find_successor(self.directory, msg)?,
            Operation::SendItems { dest } => self.dht.send_items(dest)?,
            Operation::Stabilize => self.dht.stabilize(self.directory)?,
            Operation::Notify { candidate } => {
                let predecessor = self.dht.notify(candidate)?;
                tracing::debug!(
                    "node {} notified by {}, predecessor: {:?}",
                    self.dht.did,
                    candidate,
                    predecessor
                );
                return Ok(());
            }
            Operation::FixFinger => self.dht.fix_fingers(self.directory)?,
            Operation::CheckPredecessor => {
                self.dht.check_predecessor(self.directory)?;
                return Ok(());
            }
        };
        self.handle_dht_events(act)
    }
}
