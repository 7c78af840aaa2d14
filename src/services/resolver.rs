use crate::debug_if_enabled;
use crate::error::WinModeError;
use crate::model::WindowingMode;
use crate::services::overlay::OverlayBackend;
use crate::services::policy::PolicyConstants;
use crate::services::storage::PACKAGE_WINDOWING_MODE_NAME;
use crate::services::user_storage::{check_identifier, UserStorage};
use std::sync::Arc;
use tracing::{error, warn};

/// Режим, если пользователь ещё ни разу не выбирал режим для приложения
pub const DEFAULT_USER_WINDOWING_MODE: WindowingMode = WindowingMode::Freeform;

/// WindowModeResolver decides which windowing mode an application should start in.
///
/// The decision chain, first definitive answer wins:
/// 1. storage of the bound user is not ready: `Undefined`;
/// 2. the identifier is disallowed: `Undefined`;
/// 3. an overlay pin other than `Undefined` exists: the pin, regardless of PC mode;
/// 4. PC mode is disabled: `Undefined`;
/// 5. the stored user preference, `Freeform` when there is none.
///
/// Storage and transport failures count as missing values. The resolver never fails.
#[derive(Clone)]
pub struct WindowModeResolver {
    storage: UserStorage,
    policy: PolicyConstants,
    overlay: Arc<dyn OverlayBackend>,
}

impl WindowModeResolver {
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

    pub fn resolve(&self, identifier: &str) -> WindowingMode {
        if let Err(e) = check_identifier(identifier) {
            error!("resolve: {}", e);
            return WindowingMode::Undefined;
        }

        if !self.storage.is_ready() {
            error!(
                "Вызов resolve для пакета {} до готовности хранилища пользователя {}",
                identifier,
                self.storage.user()
            );
            return WindowingMode::Undefined;
        }

        if self.policy.is_disallowed(identifier) {
            debug_if_enabled!("Пакет {} в списке запрещённых - режим по умолчанию", identifier);
            return WindowingMode::Undefined;
        }

        if let Some(pinned) = self.overlay_pin(identifier) {
            return pinned;
        }

        if !self.policy.is_pc_mode_enabled() {
            debug_if_enabled!("PC mode отключён - режим по умолчанию для {}", identifier);
            return WindowingMode::Undefined;
        }

        self.user_preference(identifier)
    }

    /// Только закрепление overlay: `Undefined`, если его нет или хранилище недоступно
    pub fn resolve_overlay_only(&self, identifier: &str) -> WindowingMode {
        if let Err(e) = check_identifier(identifier) {
            error!("resolve_overlay_only: {}", e);
            return WindowingMode::Undefined;
        }

        if !self.storage.is_ready() {
            error!(
                "Вызов resolve_overlay_only для пакета {} до готовности хранилища",
                identifier
            );
            return WindowingMode::Undefined;
        }

        self.overlay_pin(identifier)
            .unwrap_or(WindowingMode::Undefined)
    }

    pub fn policy(&self) -> &PolicyConstants {
        &self.policy
    }

    // Undefined, отсутствие и неизвестное значение одинаково означают "закрепления нет"
    fn overlay_pin(&self, identifier: &str) -> Option<WindowingMode> {
        let raw = match self.overlay.get(identifier) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(
                    "Overlay ({}) недоступен для {}: {}",
                    self.overlay.backend_type(),
                    identifier,
                    e
                );
                return None;
            }
        };

        debug_if_enabled!("Найден overlay режим {} для пакета {}", raw, identifier);

        match WindowingMode::from_raw(raw) {
            Some(mode) if !mode.is_undefined() => Some(mode),
            Some(_) => None,
            None => {
                debug_if_enabled!("Игнорируем неизвестный overlay режим {} для {}", raw, identifier);
                None
            }
        }
    }

    fn user_preference(&self, identifier: &str) -> WindowingMode {
        let stored = self
            .storage
            .namespace(PACKAGE_WINDOWING_MODE_NAME)
            .and_then(|prefs| prefs.get_int(identifier));

        let mode = match stored {
            Ok(Some(raw)) => WindowingMode::from_raw(raw).unwrap_or_else(|| {
                warn!("Неизвестный сохранённый режим {} для {}", raw, identifier);
                DEFAULT_USER_WINDOWING_MODE
            }),
            Ok(None) => DEFAULT_USER_WINDOWING_MODE,
            // Хранилище заблокировалось между проверками
            Err(WinModeError::NotReady(_)) => return WindowingMode::Undefined,
            Err(e) => {
                warn!("Не удалось прочитать режим для {}: {}", identifier, e);
                DEFAULT_USER_WINDOWING_MODE
            }
        };

        debug_if_enabled!("Найден режим {} для пакета {}", mode, identifier);
        mode
    }
}
