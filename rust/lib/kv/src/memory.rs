use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::KVError;
use crate::traits::KVStore;

/// In-process KVStore. Contents vanish with the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, BTreeMap<String, String>>, KVError> {
        self.entries
            .read()
            .map_err(|e| KVError::Storage(format!("lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, BTreeMap<String, String>>, KVError> {
        self.entries
            .write()
            .map_err(|e| KVError::Storage(format!("lock poisoned: {}", e)))
    }
}

impl KVStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, KVError> {
        Ok(self.read()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KVError> {
        self.write()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), KVError> {
        self.write()?.remove(key);
        Ok(())
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), KVError> {
        let mut map = self.write()?;
        for (key, value) in entries {
            map.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn delete_many(&self, keys: &[&str]) -> Result<(), KVError> {
        let mut map = self.write()?;
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, KVError> {
        Ok(self.read()?.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_missing_is_none() {
        let kv = MemoryStore::new();
        assert_eq!(kv.get("authorization").unwrap(), None);
    }

    #[test]
    fn set_then_get() {
        let kv = MemoryStore::new();
        kv.set("isAuthenticated", "true").unwrap();
        assert_eq!(kv.get("isAuthenticated").unwrap().as_deref(), Some("true"));
    }

    #[test]
    fn set_many_and_delete_many() {
        let kv = MemoryStore::new();
        kv.set_many(&[("a", "1"), ("b", "2"), ("c", "3")]).unwrap();
        assert_eq!(kv.keys().unwrap(), vec!["a", "b", "c"]);

        kv.delete_many(&["a", "c", "missing"]).unwrap();
        assert_eq!(kv.keys().unwrap(), vec!["b"]);
    }

    #[test]
    fn delete_missing_is_ok() {
        let kv = MemoryStore::new();
        kv.delete("userRole").unwrap();
    }
}
