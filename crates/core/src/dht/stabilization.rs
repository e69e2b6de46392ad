//! Stabilization triggers that keep the dht maintained.
//! Every node runs stabilize, fix finger and check predecessor on its own
//! schedule. The schedule is shifted by a random per-node clock offset so
//! that the maintenance of different nodes does not fire in lockstep.

use crate::config::RingConfig;
use crate::dht::PeerRing;
use crate::error::Result;
use crate::message::Operation;

/// The stabilization runner.
#[derive(Clone, Debug)]
pub struct Stabilizer {
    stabilize_period: u64,
    fix_finger_period: u64,
    check_predecessor_period: u64,
}

impl Stabilizer {
    /// Create a new stabilization runner from the ring periods.
    pub fn new(config: &RingConfig) -> Self {
        Self {
            stabilize_period: config.stabilize_period,
            fix_finger_period: config.fix_finger_period,
            check_predecessor_period: config.check_predecessor_period,
        }
    }

    /// Maintenance operations due at shifted time `now`.
    pub fn due(&self, now: u64) -> Vec<Operation> {
        [
            (self.stabilize_period, Operation::Stabilize),
            (self.fix_finger_period, Operation::FixFinger),
            (self.check_predecessor_period, Operation::CheckPredecessor),
        ]
        .into_iter()
        .filter(|(period, _)| now % period == 0)
        .map(|(_, op)| op)
        .collect()
    }

    /// Advance the node clock by one tick and enqueue the maintenance due.
    /// Nodes that have not joined yet run no maintenance.
    pub fn maintain(&self, dht: &PeerRing) -> Result<()> {
        let now = dht.tick() + dht.offset();
        if !dht.is_joined() {
            return Ok(());
        }
        for op in self.due(now) {
            tracing::debug!("STABILIZATION node {} schedules {}", dht.did, op);
            dht.push_message(op.into())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dht::Chord;
    use crate::dht::IdSpace;
    use crate::message::Message;

    fn stabilizer() -> Stabilizer {
        Stabilizer::new(&RingConfig {
            stabilize_period: 2,
            fix_finger_period: 3,
            check_predecessor_period: 6,
            ..Default::default()
        })
    }

    #[test]
    fn test_due() {
        let s = stabilizer();
        assert!(s.due(1).is_empty());
        assert!(matches!(s.due(2).as_slice(), [Operation::Stabilize]));
        assert!(matches!(s.due(3).as_slice(), [Operation::FixFinger]));
        assert!(matches!(s.due(6).as_slice(), [
            Operation::Stabilize,
            Operation::FixFinger,
            Operation::CheckPredecessor
        ]));
    }

    #[test]
    fn test_unjoined_node_only_ticks() -> Result<()> {
        let s = stabilizer();
        let dht = PeerRing::new(3, IdSpace::new(8), 2, 1);
        for _ in 0..12 {
            s.maintain(&dht)?;
        }
        assert_eq!(dht.ticks(), 12);
        assert_eq!(dht.inbox_len()?, 0);
        Ok(())
    }

    #[test]
    fn test_offset_shifts_schedule() -> Result<()> {
        let s = stabilizer();
        let dht = PeerRing::new(3, IdSpace::new(8), 2, 1);
        dht.create()?;

        // tick 1 with offset 1 is shifted time 2
        s.maintain(&dht)?;
        assert_eq!(dht.inbox_len()?, 1);
        assert!(matches!(
            dht.pop_message()?,
            Some(Message::Invoke(Operation::Stabilize))
        ));

        // shifted time 3
        s.maintain(&dht)?;
        assert!(matches!(
            dht.pop_message()?,
            Some(Message::Invoke(Operation::FixFinger))
        ));

        // shifted times 4 and 5, then 6 where all three fire
        s.maintain(&dht)?;
        s.maintain(&dht)?;
        s.maintain(&dht)?;
        assert_eq!(dht.inbox_len()?, 4);
        Ok(())
    }
}
