//! Re-exports of the types most simulations need.
pub use crate::config::RingConfig;
pub use crate::dht::between;
pub use crate::dht::between_exclusive;
pub use crate::dht::Did;
pub use crate::dht::IdSpace;
pub use crate::dht::PeerRing;
pub use crate::inspect::SwarmInspect;
pub use crate::logging::init_logging;
pub use crate::logging::LogLevel;
pub use crate::measure::QueryReport;
pub use crate::swarm::CorrectnessReport;
pub use crate::swarm::Discrepancy;
pub use crate::swarm::Swarm;
pub use crate::swarm::SwarmBuilder;
