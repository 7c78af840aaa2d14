use crate::config::OverlayConfig;
use crate::error::Result;
use crate::model::WindowingMode;
use crate::services::user_storage::UserStorage;
use std::sync::Arc;
use tracing::info;

/// Storage capability for overlay pins
pub trait OverlayBackend: Send + Sync {
    /// Raw stored value for the identifier; `None` when there is no pin
    fn get(&self, identifier: &str) -> Result<Option<i32>>;

    /// Store a pin; `Undefined` is stored as-is and acts as "no pin"
    fn put(&self, identifier: &str, mode: WindowingMode) -> Result<()>;

    /// Backend name for diagnostics
    fn backend_type(&self) -> &'static str;
}

/// Factory function to create the overlay backend selected in the configuration
pub fn create_overlay_backend(
    config: &OverlayConfig,
    storage: UserStorage,
) -> Result<Arc<dyn OverlayBackend>> {
    info!("Создание overlay backend '{}'", config.backend);

    match config.backend.as_str() {
        "local" => Ok(Arc::new(super::local::LocalOverlay::new(storage))),
        "dbus" => Ok(Arc::new(super::remote::RemoteOverlay::new(config.clone()))),
        other => Err(crate::winmode_error!(
            internal,
            "Неизвестный backend overlay: {}",
            other
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserId;
    use crate::services::readiness::AlwaysReady;
    use crate::services::storage::MemoryStore;

    fn storage() -> UserStorage {
        UserStorage::new(Arc::new(MemoryStore::new()), Arc::new(AlwaysReady), UserId(0))
    }

    #[test]
    fn test_factory_selects_backend() {
        let mut config = crate::config::Config::default().overlay;
        assert_eq!(
            create_overlay_backend(&config, storage()).unwrap().backend_type(),
            "local"
        );

        // Создание удалённого backend не подключается к шине
        config.backend = "dbus".to_string();
        assert_eq!(
            create_overlay_backend(&config, storage()).unwrap().backend_type(),
            "dbus"
        );

        config.backend = "binder".to_string();
        assert!(create_overlay_backend(&config, storage()).is_err());
    }
}
