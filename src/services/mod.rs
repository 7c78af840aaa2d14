pub mod bounds_store;
pub mod overlay;
pub mod policy;
pub mod readiness;
pub mod resolver;
pub mod storage;
pub mod user_storage;
pub mod writer;

pub use bounds_store::WindowBoundsStore;
pub use overlay::{create_overlay_backend, OverlayBackend};
pub use policy::{GlobalEnableFlag, PolicyConstants};
pub use readiness::SessionReadiness;
pub use resolver::WindowModeResolver;
pub use storage::{create_key_value_store, KeyValueStore};
pub use user_storage::UserStorage;
pub use writer::WindowModeWriter;

use crate::config::Config;
use crate::error::Result;
use crate::model::UserId;
use std::sync::Arc;
use tracing::info;

/// Собранные сервисы режима окон одного пользователя
#[derive(Clone)]
pub struct WindowingServices {
    pub resolver: WindowModeResolver,
    pub writer: WindowModeWriter,
    pub bounds: WindowBoundsStore,
    storage: UserStorage,
}

impl WindowingServices {
    pub fn new(
        storage: UserStorage,
        policy: PolicyConstants,
        overlay: Arc<dyn OverlayBackend>,
    ) -> Self {
        Self {
            resolver: WindowModeResolver::new(storage.clone(), policy.clone(), overlay.clone()),
            writer: WindowModeWriter::new(storage.clone(), policy, overlay),
            bounds: WindowBoundsStore::new(storage.clone()),
            storage,
        }
    }

    /// Собрать хранилище, политику и overlay по конфигурации
    pub fn from_config(
        config: &Config,
        readiness: Arc<dyn SessionReadiness>,
        user: UserId,
    ) -> Result<Self> {
        let store = create_key_value_store(&config.storage)?;
        let storage = UserStorage::new(store, readiness, user);
        let policy = PolicyConstants::from_config(&config.policy);
        let overlay = create_overlay_backend(&config.overlay, storage.clone())?;

        info!(
            "Сервисы режима окон для пользователя {} инициализированы (store: {}, overlay: {})",
            user,
            storage.store().backend_type(),
            overlay.backend_type()
        );

        Ok(Self::new(storage, policy, overlay))
    }

    pub fn user(&self) -> UserId {
        self.storage.user()
    }

    pub fn storage(&self) -> &UserStorage {
        &self.storage
    }
}
