use crate::error::{Result, WinModeError};
use crate::model::WindowBounds;
use crate::services::storage::PACKAGE_WINDOW_BOUNDS_NAME;
use crate::services::user_storage::{check_identifier, UserStorage};
use smallvec::SmallVec;
use tracing::{debug, error, warn};

const FIELDS: [&str; 4] = ["left", "top", "right", "bottom"];

/// Последние известные границы окна по пакету: четыре ключа `<id>-left|-top|-right|-bottom`
#[derive(Clone)]
pub struct WindowBoundsStore {
    storage: UserStorage,
}

impl WindowBoundsStore {
    pub fn new(storage: UserStorage) -> Self {
        Self { storage }
    }

    /// Прямоугольник принимается по значению: это снимок, который вызывающий уже не изменит
    pub fn set_bounds(&self, identifier: &str, bounds: WindowBounds) -> bool {
        match self.try_set_bounds(identifier, bounds) {
            Ok(()) => true,
            Err(WinModeError::NotReady(_)) => {
                error!(
                    "Вызов set_bounds для пакета {} с {} до готовности хранилища",
                    identifier, bounds
                );
                false
            }
            Err(e) => {
                error!("Не удалось сохранить границы окна {}: {}", identifier, e);
                false
            }
        }
    }

    pub fn try_set_bounds(&self, identifier: &str, bounds: WindowBounds) -> Result<()> {
        check_identifier(identifier)?;

        let values = [bounds.left, bounds.top, bounds.right, bounds.bottom];
        let entries: SmallVec<[(String, i32); 4]> = FIELDS
            .iter()
            .zip(values)
            .map(|(field, value)| (field_key(identifier, field), value))
            .collect();

        self.storage
            .namespace(PACKAGE_WINDOW_BOUNDS_NAME)?
            .batch_put(&entries)?;

        debug!("Границы {} сохранены для пакета {}", bounds, identifier);
        Ok(())
    }

    /// Пустой прямоугольник при отсутствии данных или недоступном хранилище
    pub fn get_bounds(&self, identifier: &str) -> WindowBounds {
        match self.try_get_bounds(identifier) {
            Ok(Some(bounds)) => bounds,
            Ok(None) => WindowBounds::EMPTY,
            Err(WinModeError::NotReady(_)) => {
                error!("Вызов get_bounds для пакета {} до готовности хранилища", identifier);
                WindowBounds::EMPTY
            }
            Err(e) => {
                warn!("Не удалось прочитать границы окна {}: {}", identifier, e);
                WindowBounds::EMPTY
            }
        }
    }

    pub fn try_get_bounds(&self, identifier: &str) -> Result<Option<WindowBounds>> {
        check_identifier(identifier)?;

        let keys: SmallVec<[String; 4]> = FIELDS
            .iter()
            .map(|field| field_key(identifier, field))
            .collect();
        let key_refs: SmallVec<[&str; 4]> = keys.iter().map(String::as_str).collect();

        let values = self
            .storage
            .namespace(PACKAGE_WINDOW_BOUNDS_NAME)?
            .get_many(&key_refs)?;

        match values.as_slice() {
            [Some(left), Some(top), Some(right), Some(bottom)] => {
                Ok(Some(WindowBounds::new(*left, *top, *right, *bottom)))
            }
            [None, None, None, None] => Ok(None),
            partial => {
                warn!("Неполные границы окна для {}: {:?}", identifier, partial);
                Ok(None)
            }
        }
    }
}

fn field_key(identifier: &str, field: &str) -> String {
    format!("{}-{}", identifier, field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserId;
    use crate::services::readiness::UserUnlockTracker;
    use crate::services::storage::{FileStore, KeyValueStore, MemoryStore};
    use std::sync::Arc;
    use std::thread;

    fn ready_store(store: Arc<dyn KeyValueStore>) -> (WindowBoundsStore, Arc<UserUnlockTracker>) {
        let tracker = Arc::new(UserUnlockTracker::new());
        tracker.mark_unlocking(UserId(0));
        let bounds = WindowBoundsStore::new(UserStorage::new(store, tracker.clone(), UserId(0)));
        (bounds, tracker)
    }

    #[test]
    fn test_bounds_round_trip() {
        let (store, _tracker) = ready_store(Arc::new(MemoryStore::new()));
        let rect = WindowBounds::new(100, 50, 900, 650);

        assert!(store.set_bounds("com.example.app", rect));
        assert_eq!(store.get_bounds("com.example.app"), rect);
        assert_eq!(store.get_bounds("com.example.other"), WindowBounds::EMPTY);
    }

    #[test]
    fn test_stored_snapshot_ignores_later_mutation() {
        let (store, _tracker) = ready_store(Arc::new(MemoryStore::new()));
        let mut rect = WindowBounds::new(0, 0, 640, 480);

        store.set_bounds("com.example.app", rect);
        rect.right = 1;

        assert_ne!(store.get_bounds("com.example.app"), rect);
        assert_eq!(store.get_bounds("com.example.app"), WindowBounds::new(0, 0, 640, 480));
    }

    #[test]
    fn test_not_ready_returns_empty() {
        let (store, tracker) = ready_store(Arc::new(MemoryStore::new()));
        store.set_bounds("com.example.app", WindowBounds::new(1, 2, 3, 4));
        tracker.mark_locked(UserId(0));

        assert_eq!(store.get_bounds("com.example.app"), WindowBounds::EMPTY);
        assert!(!store.set_bounds("com.example.app", WindowBounds::new(5, 6, 7, 8)));

        tracker.mark_unlocking(UserId(0));
        assert_eq!(store.get_bounds("com.example.app"), WindowBounds::new(1, 2, 3, 4));
    }

    #[test]
    fn test_keys_layout() {
        let memory = Arc::new(MemoryStore::new());
        let (store, _tracker) = ready_store(memory.clone());
        store.set_bounds("com.example.app", WindowBounds::new(1, 2, 3, 4));

        let handle = memory.open(PACKAGE_WINDOW_BOUNDS_NAME, UserId(0)).unwrap();
        assert_eq!(handle.get_int("com.example.app-left").unwrap(), Some(1));
        assert_eq!(handle.get_int("com.example.app-bottom").unwrap(), Some(4));
    }

    #[test]
    fn test_partial_fields_read_as_missing() {
        let memory = Arc::new(MemoryStore::new());
        let (store, _tracker) = ready_store(memory.clone());
        memory
            .open(PACKAGE_WINDOW_BOUNDS_NAME, UserId(0))
            .unwrap()
            .batch_put(&[("com.example.app-left".to_string(), 7)])
            .unwrap();

        assert_eq!(store.try_get_bounds("com.example.app").unwrap(), None);
        assert_eq!(store.get_bounds("com.example.app"), WindowBounds::EMPTY);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let (store, _tracker) = ready_store(Arc::new(FileStore::new(dir.path())));
        let rect = WindowBounds::new(-20, 10, 1260, 730);

        assert!(store.set_bounds("com.example.app", rect));
        assert_eq!(store.get_bounds("com.example.app"), rect);
    }

    #[test]
    fn test_extreme_coordinates_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let (store, _tracker) = ready_store(Arc::new(FileStore::new(dir.path())));
        let rect = WindowBounds::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        let inverted = WindowBounds::new(i32::MAX, i32::MAX, i32::MIN, i32::MIN);

        assert!(store.set_bounds("com.example.app", rect));
        assert!(store.set_bounds("com.example.other", inverted));
        assert_eq!(store.get_bounds("com.example.app"), rect);
        assert_eq!(store.get_bounds("com.example.other"), inverted);
    }

    #[test]
    fn test_concurrent_reader_never_sees_mixed_rectangle() {
        let memory = Arc::new(MemoryStore::new());
        let (store, _tracker) = ready_store(memory);
        let old = WindowBounds::new(0, 0, 100, 100);
        let new = WindowBounds::new(200, 200, 500, 500);
        store.set_bounds("com.example.app", old);

        let writer_store = store.clone();
        let writer = thread::spawn(move || {
            for i in 0..200 {
                let rect = if i % 2 == 0 { new } else { old };
                writer_store.set_bounds("com.example.app", rect);
            }
        });

        for _ in 0..200 {
            let seen = store.get_bounds("com.example.app");
            assert!(seen == old || seen == new, "смешанный прямоугольник: {}", seen);
        }

        writer.join().unwrap();
    }
}
