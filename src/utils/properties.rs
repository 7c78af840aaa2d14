use crate::error::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Файл persist-свойств системы в формате `key=value`.
///
/// Файл читается заново при каждом запросе: свойства может менять другой процесс.
#[derive(Debug, Clone)]
pub struct PropertyFile {
    path: PathBuf,
}

impl PropertyFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Прочитать сырое значение свойства. Отсутствующий файл - это отсутствующее свойство.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        Ok(find_property(&contents, key).map(str::to_string))
    }

    /// Прочитать булево свойство; любые ошибки дают значение по умолчанию
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Ok(Some(value)) => parse_bool(&value, default),
            Ok(None) => default,
            Err(e) => {
                warn!("Не удалось прочитать свойство {} из {:?}: {}", key, self.path, e);
                default
            }
        }
    }
}

fn find_property<'a>(contents: &'a str, key: &str) -> Option<&'a str> {
    // Последнее вхождение побеждает, как при повторной записи свойства
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .filter(|(k, _)| k.trim() == key)
        .map(|(_, v)| v.trim())
        .last()
}

/// Разбор булевого значения по правилам системных свойств платформы
pub fn parse_bool(value: &str, default: bool) -> bool {
    match value.trim() {
        "1" | "y" | "yes" | "on" | "true" => true,
        "0" | "n" | "no" | "off" | "false" => false,
        _ => default,
    }
}
