//! Module of MemStorage, the per-node item storage.

pub mod memory;

use crate::dht::Did;
use crate::error::Result;
pub use crate::storage::memory::MemStorage;

/// Key value storage interface, keyed by the item's position on the ring.
pub trait KvStorageInterface<V> {
    /// Get an entry by `key`.
    fn get(&self, key: Did) -> Result<Option<V>>;

    /// Put `value` under `key`, replacing any previous entry.
    fn put(&self, key: Did, value: &V) -> Result<()>;

    /// All entries, ordered by key.
    fn get_all(&self) -> Result<Vec<(Did, V)>>;

    /// Remove an entry by `key`, returning it.
    fn remove(&self, key: Did) -> Result<Option<V>>;

    /// Delete all values.
    fn clear(&self) -> Result<()>;

    /// Get the current storage usage.
    fn count(&self) -> Result<u32>;
}
