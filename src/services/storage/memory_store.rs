use super::r#trait::{KeyValueStore, NamespaceHandle};
use crate::error::Result;
use crate::model::UserId;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

type Entries = Arc<RwLock<HashMap<String, i32>>>;

/// In-memory store: each (user, namespace) pair owns one lock-protected map.
///
/// A batch is applied under a single write lock, so readers observe either the whole
/// batch or none of it.
#[derive(Default)]
pub struct MemoryStore {
    namespaces: DashMap<(UserId, String), Entries>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Количество созданных пространств имён (для диагностики и тестов)
    pub fn namespace_count(&self) -> usize {
        self.namespaces.len()
    }
}

struct MemoryNamespace {
    entries: Entries,
}

impl NamespaceHandle for MemoryNamespace {
    fn get_int(&self, key: &str) -> Result<Option<i32>> {
        Ok(self.entries.read().get(key).copied())
    }

    fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<i32>>> {
        let map = self.entries.read();
        Ok(keys.iter().map(|key| map.get(*key).copied()).collect())
    }

    fn batch_put(&self, entries: &[(String, i32)]) -> Result<()> {
        let mut map = self.entries.write();
        for (key, value) in entries {
            map.insert(key.clone(), *value);
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryStore {
    fn open(&self, namespace: &str, user: UserId) -> Result<Box<dyn NamespaceHandle>> {
        let entries = self
            .namespaces
            .entry((user, namespace.to_string()))
            .or_default()
            .clone();
        Ok(Box::new(MemoryNamespace { entries }))
    }

    fn backend_type(&self) -> &'static str {
        "memory"
    }
}
