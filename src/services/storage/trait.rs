use crate::config::StorageConfig;
use crate::error::Result;
use crate::model::UserId;
use std::sync::Arc;
use tracing::info;

/// Открытое пространство имён одного пользователя
pub trait NamespaceHandle: Send + Sync {
    /// Прочитать значение; `None` если ключ отсутствует
    fn get_int(&self, key: &str) -> Result<Option<i32>>;

    /// Прочитать несколько ключей из одного согласованного снимка
    fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<i32>>>;

    /// Применить все пары одной атомарной операцией
    fn batch_put(&self, entries: &[(String, i32)]) -> Result<()>;

    fn get_int_or(&self, key: &str, default: i32) -> Result<i32> {
        Ok(self.get_int(key)?.unwrap_or(default))
    }
}

/// Trait for per-user key-value stores
pub trait KeyValueStore: Send + Sync {
    /// Open a namespace for the given user. Namespaces are created lazily.
    fn open(&self, namespace: &str, user: UserId) -> Result<Box<dyn NamespaceHandle>>;

    /// Backend name for diagnostics
    fn backend_type(&self) -> &'static str;
}

/// Factory function to create the store selected in the configuration
pub fn create_key_value_store(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>> {
    info!("Создание хранилища '{}'", config.backend);

    match config.backend.as_str() {
        "memory" => Ok(Arc::new(super::memory_store::MemoryStore::new())),
        "file" => Ok(Arc::new(super::file_store::FileStore::new(&config.data_dir))),
        other => Err(crate::winmode_error!(
            internal,
            "Неизвестный backend хранилища: {}",
            other
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_factory_selects_backend() {
        let config = StorageConfig {
            backend: "memory".to_string(),
            data_dir: PathBuf::new(),
        };
        assert_eq!(create_key_value_store(&config).unwrap().backend_type(), "memory");

        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            backend: "file".to_string(),
            data_dir: dir.path().to_path_buf(),
        };
        assert_eq!(create_key_value_store(&config).unwrap().backend_type(), "file");

        let config = StorageConfig {
            backend: "leveldb".to_string(),
            data_dir: PathBuf::new(),
        };
        assert!(create_key_value_store(&config).is_err());
    }

    #[test]
    fn test_get_int_or_default() {
        let store = super::super::MemoryStore::new();
        let handle = store.open("ns", UserId(0)).unwrap();
        assert_eq!(handle.get_int_or("missing", 5).unwrap(), 5);
        handle.batch_put(&[("present".to_string(), 1)]).unwrap();
        assert_eq!(handle.get_int_or("present", 5).unwrap(), 1);
    }
}
