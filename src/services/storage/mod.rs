//! KeyValueStore: per-user, namespaced integer storage.
//!
//! This module is responsible ONLY for persisting `key -> i32` pairs inside named
//! namespaces of a given user. It MUST NOT know anything about windowing modes,
//! readiness or policy; those decisions live in the resolver and writers.

mod file_store;
mod memory_store;
mod r#trait;

pub use self::file_store::FileStore;
pub use self::memory_store::MemoryStore;
pub use self::r#trait::{create_key_value_store, KeyValueStore, NamespaceHandle};

/// Пользовательские предпочтения режима окна
pub const PACKAGE_WINDOWING_MODE_NAME: &str = "package-windowing-mode";
/// Привилегированные закрепления режима окна
pub const PACKAGE_WINDOWING_MODE_OVERLAY_NAME: &str = "package-windowing-mode-overlay";
/// Последние известные границы окон
pub const PACKAGE_WINDOW_BOUNDS_NAME: &str = "package-window-bounds";
