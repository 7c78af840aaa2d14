use crate::error::{Result, WinModeError};
use crate::model::{is_valid_identifier, UserId};
use crate::services::readiness::SessionReadiness;
use crate::services::storage::{KeyValueStore, NamespaceHandle};
use std::sync::Arc;

/// UserStorage binds a key-value store to one user and guards it with the readiness check.
///
/// Every resolver, writer and bounds operation goes through [`UserStorage::namespace`],
/// so no code path can reach a namespace of another user or touch storage before it is
/// unlocked.
#[derive(Clone)]
pub struct UserStorage {
    store: Arc<dyn KeyValueStore>,
    readiness: Arc<dyn SessionReadiness>,
    user: UserId,
}

impl UserStorage {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        readiness: Arc<dyn SessionReadiness>,
        user: UserId,
    ) -> Self {
        Self {
            store,
            readiness,
            user,
        }
    }

    pub fn user(&self) -> UserId {
        self.user
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub fn is_ready(&self) -> bool {
        self.readiness.is_user_storage_ready(self.user)
    }

    /// Проверка готовности; выполняется заново при каждом вызове
    pub fn ensure_ready(&self) -> Result<()> {
        if self.is_ready() {
            Ok(())
        } else {
            WinModeError::not_ready(self.user)
        }
    }

    /// Открыть пространство имён текущего пользователя после проверки готовности
    pub fn namespace(&self, namespace: &str) -> Result<Box<dyn NamespaceHandle>> {
        self.ensure_ready()?;
        self.store.open(namespace, self.user)
    }

    /// Вернуть копию с тем же хранилищем для другого пользователя
    pub fn for_user(&self, user: UserId) -> Self {
        Self {
            store: self.store.clone(),
            readiness: self.readiness.clone(),
            user,
        }
    }
}

/// Общая проверка идентификатора приложения для всех операций
pub fn check_identifier(identifier: &str) -> Result<()> {
    if is_valid_identifier(identifier) {
        Ok(())
    } else {
        Err(crate::winmode_error!(invalid_identifier, "{}", identifier))
    }
}
