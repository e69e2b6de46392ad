use super::*;

#[test]
fn test_single_node_points_to_itself() -> Result<()> {
    let mut swarm = gen_swarm(1);
    swarm.add_node(77)?;
    swarm.advance(SETTLE_TICKS)?;

    let node = swarm.dht(77).unwrap();
    assert!(node.is_joined());
    assert_eq!(node.successor()?, Some(77));
    assert_eq!(node.predecessor()?, Some(77));
    assert_eq!(node.successors()?, vec![Some(77), Some(77)]);
    assert_clean(&swarm);
    Ok(())
}

#[test]
fn test_two_nodes_bootstrap() -> Result<()> {
    let mut swarm = gen_swarm(2);
    grow_ring(&mut swarm, &[20, 200])?;
    swarm.advance(SETTLE_TICKS)?;

    let a = swarm.dht(20).unwrap();
    let b = swarm.dht(200).unwrap();
    assert_eq!(a.successor()?, Some(200));
    assert_eq!(a.predecessor()?, Some(200));
    assert_eq!(b.successor()?, Some(20));
    assert_eq!(b.predecessor()?, Some(20));
    assert_eq!(a.successors()?, vec![Some(20), Some(200)]);
    assert_clean(&swarm);
    Ok(())
}

#[test]
fn test_items_follow_joining_nodes() -> Result<()> {
    let mut swarm = gen_swarm(3);
    swarm.add_node(128)?;
    swarm.advance(SETTLE_TICKS)?;
    let keys: Vec<Did> = (0..256).step_by(5).collect();
    add_items(&mut swarm, &keys)?;
    assert_eq!(swarm.key_count(128)?, keys.len() as u32);

    grow_ring(&mut swarm, &[30, 230, 90])?;
    swarm.advance(SETTLE_TICKS)?;
    assert_clean(&swarm);
    // no item is lost or duplicated by the handoffs
    assert_eq!(total_items(&swarm), keys.len() as u32);
    assert_eq!(swarm.key_count(30)?, 12);
    Ok(())
}

#[test]
fn test_converges_and_stays_put() -> Result<()> {
    let mut swarm = gen_swarm(4);
    let dids = gen_distinct_dids(4, 12, 256);
    grow_ring(&mut swarm, &dids)?;
    swarm.advance(50 * DEFAULT_MAX_OFFSET)?;
    assert_clean(&swarm);
    assert_eq!(swarm.len(), 12);

    let before = ring_state(&swarm);
    let messages = swarm.total_messages();
    swarm.advance(30 * DEFAULT_MAX_OFFSET)?;
    assert_eq!(ring_state(&swarm), before);
    // maintenance keeps running
    assert!(swarm.total_messages() > messages);
    assert_clean(&swarm);
    Ok(())
}

#[test]
fn test_larger_successor_list() -> Result<()> {
    let mut swarm = SwarmBuilder::new(RingConfig {
        ring_size: 10,
        successor_list_size: 5,
        ..Default::default()
    })
    .seed(5)
    .build()?;
    let dids = gen_distinct_dids(5, 8, 1024);
    grow_ring(&mut swarm, &dids)?;
    swarm.advance(50 * DEFAULT_MAX_OFFSET)?;
    assert_clean(&swarm);

    let ring = swarm.dids();
    let first = swarm.dht(ring[0]).unwrap();
    assert_eq!(first.successors()?, vec![
        Some(ring[2]),
        Some(ring[3]),
        Some(ring[4]),
        Some(ring[5])
    ]);
    Ok(())
}

#[test]
fn test_back_to_back_joins() -> Result<()> {
    let mut swarm = gen_swarm(1);
    swarm.add_node(10)?;
    swarm.advance(100)?;
    // the second newcomer may bootstrap through the first before it joined
    swarm.add_node(20)?;
    swarm.add_node(30)?;
    swarm.advance(1000)?;
    assert!(swarm.dht(30).unwrap().is_joined());
    assert_clean(&swarm);
    Ok(())
}

#[test]
fn test_burst_of_joins_converges() -> Result<()> {
    let mut swarm = gen_swarm(6);
    let dids = gen_distinct_dids(6, 8, 256);
    for did in &dids {
        swarm.add_node(*did)?;
    }
    swarm.advance(200 * DEFAULT_MAX_OFFSET)?;
    assert!(dids.iter().all(|d| swarm.dht(*d).unwrap().is_joined()));
    assert_clean(&swarm);
    Ok(())
}
