use dashmap::DashMap;

use crate::dht::Did;
use crate::error::Result;
use crate::storage::KvStorageInterface;

#[derive(Debug, Default)]
pub struct MemStorage<V>
where V: Clone
{
    table: DashMap<Did, V>,
}

impl<V> MemStorage<V>
where V: Clone
{
    pub fn new() -> Self {
        Self {
            table: DashMap::default(),
        }
    }

    pub fn contains_key(&self, key: Did) -> bool {
        self.table.contains_key(&key)
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> Vec<Did> {
        let mut keys: Vec<Did> = self.table.iter().map(|e| *e.key()).collect();
        keys.sort_unstable();
        keys
    }
}

impl<V> KvStorageInterface<V> for MemStorage<V>
where V: Clone
{
    fn get(&self, key: Did) -> Result<Option<V>> {
        Ok(self.table.get(&key).map(|v| v.value().clone()))
    }

    fn put(&self, key: Did, value: &V) -> Result<()> {
        self.table.insert(key, value.clone());
        Ok(())
    }

    fn get_all(&self) -> Result<Vec<(Did, V)>> {
        let mut all: Vec<(Did, V)> = self
            .table
            .iter()
            .map(|e| (*e.key(), e.value().clone()))
            .collect();
        all.sort_unstable_by_key(|(k, _)| *k);
        Ok(all)
    }

    fn remove(&self, key: Did) -> Result<Option<V>> {
        Ok(self.table.remove(&key).map(|(_, v)| v))
    }

    fn clear(&self) -> Result<()> {
        self.table.clear();
        Ok(())
    }

    fn count(&self) -> Result<u32> {
        Ok(self.table.len() as u32)
    }
}
