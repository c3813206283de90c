use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

/// Key/value store abstraction for aggregates loaded and saved whole.
///
/// Writes are last-write-wins per call; a load-mutate-save sequence is not
/// atomic across callers.
pub trait RecordStore<K, V>: Send + Sync {
    fn get(&self, key: &K) -> Option<V>;
    fn upsert(&self, key: K, value: V);
    fn remove(&self, key: &K);
    fn list(&self) -> Vec<V>;
}

impl<K, V, S> RecordStore<K, V> for Arc<S>
where
    S: RecordStore<K, V> + ?Sized,
{
    fn get(&self, key: &K) -> Option<V> {
        (**self).get(key)
    }

    fn upsert(&self, key: K, value: V) {
        (**self).upsert(key, value)
    }

    fn remove(&self, key: &K) {
        (**self).remove(key)
    }

    fn list(&self) -> Vec<V> {
        (**self).list()
    }
}

/// In-memory store for tests/dev.
#[derive(Debug)]
pub struct InMemoryRecordStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> InMemoryRecordStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryRecordStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> RecordStore<K, V> for InMemoryRecordStore<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().ok()?;
        map.get(key).cloned()
    }

    fn upsert(&self, key: K, value: V) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(key, value);
        }
    }

    fn remove(&self, key: &K) {
        if let Ok(mut map) = self.inner.write() {
            map.remove(key);
        }
    }

    fn list(&self) -> Vec<V> {
        match self.inner.read() {
            Ok(map) => map.values().cloned().collect(),
            Err(_) => vec![],
        }
    }
}
