use super::*;
use crate::error::Error;

fn converged_ring(seed: u64, n: usize) -> Result<(Swarm, Vec<Did>)> {
    let mut swarm = gen_swarm(seed);
    let dids = gen_distinct_dids(seed, n, 256);
    swarm.add_node(dids[0])?;
    swarm.advance(SETTLE_TICKS)?;
    let keys: Vec<Did> = (0..256).step_by(3).collect();
    add_items(&mut swarm, &keys)?;
    grow_ring(&mut swarm, &dids[1..])?;
    swarm.advance(50 * DEFAULT_MAX_OFFSET)?;
    assert_clean(&swarm);
    Ok((swarm, keys))
}

#[test]
fn test_abrupt_removal_heals() -> Result<()> {
    let (mut swarm, keys) = converged_ring(11, 10)?;
    let ring = swarm.dids();
    let victim = ring[4];
    let lost = swarm.key_count(victim)?;

    swarm.remove_node_abrupt(victim)?;
    assert!(swarm.dht(victim).is_none());
    assert_eq!(swarm.len(), 9);
    swarm.advance(30 * DEFAULT_MAX_OFFSET)?;
    assert_clean(&swarm);

    // nothing hands the crashed node's items over
    assert_eq!(total_items(&swarm), keys.len() as u32 - lost);
    let succ = swarm.dht(ring[3]).unwrap().successor()?;
    assert_eq!(succ, Some(ring[5]));
    assert_eq!(swarm.dht(ring[5]).unwrap().predecessor()?, Some(ring[3]));
    Ok(())
}

#[test]
fn test_neighbouring_failures_heal() -> Result<()> {
    let (mut swarm, _) = converged_ring(12, 10)?;
    let ring = swarm.dids();

    // one less than the successor list size, so every node still knows a live successor
    swarm.remove_node_abrupt(ring[6])?;
    swarm.remove_node_abrupt(ring[7])?;
    swarm.advance(30 * DEFAULT_MAX_OFFSET)?;
    assert_clean(&swarm);
    assert_eq!(swarm.dht(ring[5]).unwrap().successor()?, Some(ring[8]));
    Ok(())
}

#[test]
fn test_graceful_removal_keeps_items() -> Result<()> {
    let (mut swarm, keys) = converged_ring(13, 10)?;
    let ring = swarm.dids();
    let leaving = ring[2];
    let moved = swarm.key_count(leaving)?;
    let before = swarm.key_count(ring[3])?;

    swarm.remove_node_graceful(leaving)?;
    assert!(swarm.dht(leaving).is_none());
    swarm.advance(30 * DEFAULT_MAX_OFFSET)?;
    assert_clean(&swarm);

    assert_eq!(total_items(&swarm), keys.len() as u32);
    assert_eq!(swarm.key_count(ring[3])?, before + moved);
    Ok(())
}

#[test]
fn test_join_after_failure() -> Result<()> {
    let (mut swarm, keys) = converged_ring(14, 8)?;
    let ring = swarm.dids();
    swarm.remove_node_graceful(ring[0])?;
    swarm.advance(SETTLE_TICKS)?;

    let newcomer = (0..256).find(|d| !ring.contains(d)).unwrap();
    grow_ring(&mut swarm, &[newcomer])?;
    swarm.advance(30 * DEFAULT_MAX_OFFSET)?;
    assert_clean(&swarm);
    assert_eq!(total_items(&swarm), keys.len() as u32);
    Ok(())
}

#[test]
fn test_remove_unknown_node() {
    let mut swarm = gen_swarm(15);
    swarm.add_node(9).unwrap();
    assert!(matches!(
        swarm.remove_node_graceful(10),
        Err(Error::NodeNotFound(10))
    ));
    assert!(matches!(
        swarm.remove_node_abrupt(10),
        Err(Error::NodeNotFound(10))
    ));
    assert_eq!(swarm.len(), 1);
}

#[test]
fn test_remove_last_node() -> Result<()> {
    let mut swarm = gen_swarm(16);
    swarm.add_node(9)?;
    swarm.advance(SETTLE_TICKS)?;
    swarm.remove_node_graceful(9)?;
    assert!(swarm.is_empty());
    swarm.advance(10)?;
    assert!(swarm.check_correctness()?.is_clean());
    Ok(())
}
