#![warn(missing_docs)]
//! This module provider [SwarmBuilder] and it's interface for
//! [Swarm]

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::RingConfig;
use crate::dht::Stabilizer;
use crate::error::Result;
use crate::measure::QueryTracker;
use crate::swarm::Directory;
use crate::swarm::Swarm;

/// Creates a SwarmBuilder to configure a Swarm.
pub struct SwarmBuilder {
    config: RingConfig,
    seed: Option<u64>,
}

impl SwarmBuilder {
    /// Creates new instance of [SwarmBuilder]
    pub fn new(config: RingConfig) -> Self {
        SwarmBuilder { config, seed: None }
    }

    /// Sets up the seed of the swarm RNG, overriding the one in the config.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Try build for `Swarm`. Fails if the configuration is invalid.
    pub fn build(self) -> Result<Swarm> {
        self.config.validate()?;

        let seed = self
            .seed
            .or(self.config.seed)
            .unwrap_or_else(rand::random);
        tracing::info!(seed = seed, "swarm rng seed (set `seed: {}` to replay)", seed);

        Ok(Swarm {
            space: self.config.id_space(),
            stabilizer: Stabilizer::new(&self.config),
            config: self.config,
            directory: Directory::new(),
            ring: BTreeSet::new(),
            item_keys: BTreeSet::new(),
            tracker: QueryTracker::new(),
            rng: StdRng::seed_from_u64(seed),
            seed,
            ticks: 0,
        })
    }
}
