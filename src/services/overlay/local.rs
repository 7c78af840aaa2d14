use super::r#trait::OverlayBackend;
use crate::error::Result;
use crate::model::WindowingMode;
use crate::services::storage::PACKAGE_WINDOWING_MODE_OVERLAY_NAME;
use crate::services::user_storage::UserStorage;

/// Пины в пространстве имён `package-windowing-mode-overlay` текущего пользователя
pub struct LocalOverlay {
    storage: UserStorage,
}

impl LocalOverlay {
    pub fn new(storage: UserStorage) -> Self {
        Self { storage }
    }
}

impl OverlayBackend for LocalOverlay {
    fn get(&self, identifier: &str) -> Result<Option<i32>> {
        self.storage
            .namespace(PACKAGE_WINDOWING_MODE_OVERLAY_NAME)?
            .get_int(identifier)
    }

    fn put(&self, identifier: &str, mode: WindowingMode) -> Result<()> {
        self.storage
            .namespace(PACKAGE_WINDOWING_MODE_OVERLAY_NAME)?
            .batch_put(&[(identifier.to_string(), mode.as_raw())])
    }

    fn backend_type(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WinModeError;
    use crate::model::UserId;
    use crate::services::readiness::UserUnlockTracker;
    use crate::services::storage::{KeyValueStore, MemoryStore, PACKAGE_WINDOWING_MODE_NAME};
    use std::sync::Arc;

    #[test]
    fn test_put_then_get() {
        let store = Arc::new(MemoryStore::new());
        let tracker = Arc::new(UserUnlockTracker::new());
        tracker.mark_unlocking(UserId(0));
        let overlay = LocalOverlay::new(UserStorage::new(store.clone(), tracker, UserId(0)));

        overlay.put("com.example", WindowingMode::Fullscreen).unwrap();
        assert_eq!(overlay.get("com.example").unwrap(), Some(1));
        assert_eq!(overlay.get("com.other").unwrap(), None);

        // Пины не попадают в пространство пользовательских предпочтений
        let prefs = store.open(PACKAGE_WINDOWING_MODE_NAME, UserId(0)).unwrap();
        assert_eq!(prefs.get_int("com.example").unwrap(), None);
    }

    #[test]
    fn test_not_ready_is_error() {
        let overlay = LocalOverlay::new(UserStorage::new(
            Arc::new(MemoryStore::new()),
            Arc::new(UserUnlockTracker::new()),
            UserId(0),
        ));
        assert!(matches!(overlay.get("com.example"), Err(WinModeError::NotReady(_))));
    }
}
