//! Error of chord_sim

use crate::dht::Did;

/// A wrap `Result` contains custom errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors collections in chord-sim.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("Invalid ring config: {0}")]
    InvalidConfig(String),

    #[error("Did {did} is out of the identifier space [0, {modulus})")]
    DidOutOfRange { did: Did, modulus: u64 },

    #[error("The ring has no live node")]
    EmptyRing,

    #[error("Node {0} has no live successor in finger table or successor list")]
    SuccessorsExhausted(Did),

    #[error("Cannot find node {0} in directory")]
    NodeNotFound(Did),

    #[error("DHT lock failed")]
    DHTSyncLockError,

    #[error("Invalid logging level: {0}")]
    InvalidLoggingLevel(String),

    #[error("Open file error: {0}")]
    OpenFileError(String),

    #[error("Create file error: {0}")]
    CreateFileError(String),

    #[error("Cannot find home directory")]
    HomeDirError,

    #[error("Encode error.")]
    EncodeError,

    #[error("Decode error: {0}")]
    DecodeError(String),
}
