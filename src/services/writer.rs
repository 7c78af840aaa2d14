use crate::error::{Result, WinModeError};
use crate::model::WindowingMode;
use crate::services::overlay::OverlayBackend;
use crate::services::policy::PolicyConstants;
use crate::services::storage::PACKAGE_WINDOWING_MODE_NAME;
use crate::services::user_storage::{check_identifier, UserStorage};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Write paths for user preferences and overlay pins.
///
/// Writes are stored as given: `Undefined` clears the choice, and disallowed
/// identifiers are accepted because only the resolver suppresses them.
#[derive(Clone)]
pub struct WindowModeWriter {
    storage: UserStorage,
    policy: PolicyConstants,
    overlay: Arc<dyn OverlayBackend>,
}

impl WindowModeWriter {
    pub fn new(
        storage: UserStorage,
        policy: PolicyConstants,
        overlay: Arc<dyn OverlayBackend>,
    ) -> Self {
        Self {
            storage,
            policy,
            overlay,
        }
    }

    /// Сохранить выбор пользователя (ярлык, кнопка в заголовке окна).
    /// Возвращает `true`, если запись применена.
    pub fn set_user_preference(&self, identifier: &str, mode: WindowingMode) -> bool {
        match self.try_set_user_preference(identifier, mode) {
            Ok(()) => true,
            Err(e) => {
                log_skipped("set_user_preference", identifier, mode, &e);
                false
            }
        }
    }

    pub fn try_set_user_preference(&self, identifier: &str, mode: WindowingMode) -> Result<()> {
        check_identifier(identifier)?;
        self.storage.ensure_ready()?;

        if !self.policy.is_pc_mode_enabled() {
            return Err(WinModeError::FeatureDisabled);
        }

        self.storage
            .namespace(PACKAGE_WINDOWING_MODE_NAME)?
            .batch_put(&[(identifier.to_string(), mode.as_raw())])?;

        info!("Режим {} сохранён для пакета {}", mode, identifier);
        Ok(())
    }

    /// Закрепить режим через overlay. Не зависит от флага PC mode.
    pub fn set_overlay(&self, identifier: &str, mode: WindowingMode) -> bool {
        match self.try_set_overlay(identifier, mode) {
            Ok(()) => true,
            Err(e) => {
                log_skipped("set_overlay", identifier, mode, &e);
                false
            }
        }
    }

    pub fn try_set_overlay(&self, identifier: &str, mode: WindowingMode) -> Result<()> {
        check_identifier(identifier)?;
        self.storage.ensure_ready()?;

        self.overlay.put(identifier, mode)?;

        info!(
            "Overlay режим {} сохранён для пакета {} ({})",
            mode,
            identifier,
            self.overlay.backend_type()
        );
        Ok(())
    }
}

fn log_skipped(operation: &str, identifier: &str, mode: WindowingMode, err: &WinModeError) {
    match err {
        WinModeError::NotReady(_) => error!(
            "Вызов {} для пакета {} с режимом {} до готовности хранилища",
            operation, identifier, mode
        ),
        WinModeError::FeatureDisabled => {
            warn!("{}: PC mode отключён, режим пакета {} не сохранён", operation, identifier)
        }
        e => error!("{} для пакета {} не выполнен: {}", operation, identifier, e),
    }
}
