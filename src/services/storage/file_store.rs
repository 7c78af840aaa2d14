use super::r#trait::{KeyValueStore, NamespaceHandle};
use crate::debug_if_enabled;
use crate::error::{Result, WinModeError};
use crate::model::UserId;
use fd_lock::RwLock;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::warn;

/// File-backed store: one TOML table per `<data_dir>/<user>/<namespace>` file.
///
/// Reads always reload the file so values written by another process are visible.
/// A batch holds an advisory lock on the sidecar `.<namespace>.lock` file while it
/// merges, then writes its own temporary file and renames it over the original, so
/// readers see either the old or the new table.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Путь файла пространства имён пользователя
    pub fn namespace_path(&self, namespace: &str, user: UserId) -> PathBuf {
        self.root.join(user.to_string()).join(namespace)
    }
}

struct FileNamespace {
    path: PathBuf,
}

impl FileNamespace {
    fn parent(&self) -> Result<&Path> {
        self.path.parent().ok_or_else(|| {
            crate::winmode_error!(internal, "Файл хранилища без каталога: {:?}", self.path)
        })
    }

    fn lock_path(&self, parent: &Path) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        parent.join(format!(".{}.lock", file_name))
    }

    fn load(&self) -> Result<BTreeMap<String, i64>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(toml::from_str(&contents)?)
    }

    fn to_i32(&self, key: &str, value: i64) -> Option<i32> {
        match i32::try_from(value) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Значение {} для ключа {} в {:?} вне диапазона i32", value, key, self.path);
                None
            }
        }
    }

    // Каждая запись получает свой временный файл в том же каталоге
    fn write_atomically(&self, parent: &Path, map: &BTreeMap<String, i64>) -> Result<()> {
        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(toml::to_string(map)?.as_bytes())?;
        temp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl NamespaceHandle for FileNamespace {
    fn get_int(&self, key: &str) -> Result<Option<i32>> {
        let map = self.load()?;
        Ok(map.get(key).and_then(|value| self.to_i32(key, *value)))
    }

    fn get_many(&self, keys: &[&str]) -> Result<Vec<Option<i32>>> {
        let map = self.load()?;
        Ok(keys
            .iter()
            .map(|key| map.get(*key).and_then(|value| self.to_i32(key, *value)))
            .collect())
    }

    fn batch_put(&self, entries: &[(String, i32)]) -> Result<()> {
        let parent = self.parent()?;
        fs::create_dir_all(parent)?;

        let lock_file: File = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path(parent))?;
        let mut lock = RwLock::new(lock_file);
        // Эксклюзивная блокировка между процессами и экземплярами FileStore
        let _guard = lock.write()?;

        let mut map = match self.load() {
            Ok(map) => map,
            Err(WinModeError::StoreParse(e)) => {
                warn!("Файл {:?} повреждён ({}), он будет перезаписан", self.path, e);
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };

        for (key, value) in entries {
            map.insert(key.clone(), i64::from(*value));
        }

        self.write_atomically(parent, &map)?;
        debug_if_enabled!("Записано {} значений в {:?}", entries.len(), self.path);
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn open(&self, namespace: &str, user: UserId) -> Result<Box<dyn NamespaceHandle>> {
        Ok(Box::new(FileNamespace {
            path: self.namespace_path(namespace, user),
        }))
    }

    fn backend_type(&self) -> &'static str {
        "file"
    }
}
