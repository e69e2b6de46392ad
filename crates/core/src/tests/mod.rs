use bytes::Bytes;
use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::SeedableRng;

use crate::config::RingConfig;
use crate::consts::DEFAULT_MAX_OFFSET;
use crate::dht::Did;
use crate::error::Result;
use crate::inspect::DHTInspect;
use crate::swarm::Swarm;
use crate::swarm::SwarmBuilder;

mod test_churn;
mod test_stabilization;

/// Ticks given to the ring to absorb one membership change.
pub const SETTLE_TICKS: u64 = 20 * DEFAULT_MAX_OFFSET;

#[allow(dead_code)]
pub fn setup_tracing() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

pub fn gen_swarm(seed: u64) -> Swarm {
    SwarmBuilder::new(RingConfig::default())
        .seed(seed)
        .build()
        .unwrap()
}

/// `n` distinct ids below `modulus`, in random order.
pub fn gen_distinct_dids(seed: u64, n: usize, modulus: u64) -> Vec<Did> {
    let mut rng = StdRng::seed_from_u64(seed);
    sample(&mut rng, modulus as usize, n)
        .into_iter()
        .map(|x| x as Did)
        .collect()
}

/// Add nodes one by one, letting the ring settle after each.
pub fn grow_ring(swarm: &mut Swarm, dids: &[Did]) -> Result<()> {
    for did in dids {
        swarm.add_node(*did)?;
        swarm.advance(SETTLE_TICKS)?;
    }
    Ok(())
}

pub fn add_items(swarm: &mut Swarm, keys: &[Did]) -> Result<()> {
    for key in keys {
        swarm.add_item(*key, Bytes::from(format!("item-{}", key)))?;
    }
    Ok(())
}

pub fn assert_clean(swarm: &Swarm) {
    let report = swarm.check_correctness().unwrap();
    assert!(report.is_clean(), "ring is not correct:\n{}\n{}", report, swarm);
}

/// Routing state and storage of every node, without counters.
pub fn ring_state(swarm: &Swarm) -> Vec<DHTInspect> {
    swarm
        .inspect()
        .unwrap()
        .nodes
        .into_iter()
        .map(|mut node| {
            node.message_count = 0;
            node
        })
        .collect()
}

pub fn total_items(swarm: &Swarm) -> u32 {
    swarm
        .key_distribution()
        .unwrap()
        .into_iter()
        .map(|(_, n)| n)
        .sum()
}
