use crate::dht::ChordStorage;
use crate::error::Result;
use crate::message::types::Delivery;
use crate::message::HandleMsg;
use crate::message::MessageHandler;

impl HandleMsg<Delivery> for MessageHandler<'_> {
    fn handle(&self, v: Delivery) -> Result<()> {
        match v {
            Delivery::Finger { index, did } => {
                let act = self.dht.set_finger(index, did)?;
                self.handle_dht_events(act)
            }
            Delivery::Storage(items) => {
                tracing::debug!("node {} storing {} items", self.dht.did, items.len());
                self.dht.store_items(items)
            }
            Delivery::Client { report, tracker } => {
                if report.success {
                    tracing::info!("query {}", report);
                } else {
                    tracing::warn!("query {}", report);
                }
                tracker.record(report)
            }
        }
    }
}
