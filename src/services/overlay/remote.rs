use super::r#trait::OverlayBackend;
use crate::config::OverlayConfig;
use crate::error::{Result, WinModeError};
use crate::model::WindowingMode;
use parking_lot::Mutex;
use tracing::{debug, error, info};
use zbus::blocking::Connection;

/// Privileged window manager interface that owns overlay pins
#[zbus::proxy(
    interface = "org.boringdroid.WindowManager",
    default_service = "org.boringdroid.WindowManager",
    default_path = "/org/boringdroid/WindowManager"
)]
pub trait WindowManager {
    fn get_package_overlay_windowing_mode(&self, package_name: &str) -> zbus::Result<i32>;

    fn save_package_overlay_windowing_mode(
        &self,
        package_name: &str,
        windowing_mode: i32,
    ) -> zbus::Result<()>;
}

/// Overlay через D-Bus-сервис оконного менеджера.
///
/// Подключение устанавливается лениво и сбрасывается после ошибки транспорта,
/// чтобы следующий вызов попробовал переподключиться.
pub struct RemoteOverlay {
    config: OverlayConfig,
    proxy: Mutex<Option<WindowManagerProxyBlocking<'static>>>,
}

impl RemoteOverlay {
    pub fn new(config: OverlayConfig) -> Self {
        Self {
            config,
            proxy: Mutex::new(None),
        }
    }

    fn connect(&self) -> zbus::Result<WindowManagerProxyBlocking<'static>> {
        info!(
            "Подключение к overlay-сервису {} {} ({} bus)",
            self.config.bus_name, self.config.object_path, self.config.bus
        );

        let connection = match self.config.bus.as_str() {
            "session" => Connection::session()?,
            _ => Connection::system()?,
        };

        WindowManagerProxyBlocking::builder(&connection)
            .destination(self.config.bus_name.clone())?
            .path(self.config.object_path.clone())?
            .build()
    }

    fn proxy(&self) -> Result<WindowManagerProxyBlocking<'static>> {
        let mut guard = self.proxy.lock();
        if let Some(proxy) = guard.as_ref() {
            return Ok(proxy.clone());
        }

        let proxy = self.connect().map_err(|e| {
            error!("Не удалось подключиться к overlay-сервису: {}", e);
            WinModeError::Transport(e.to_string())
        })?;
        *guard = Some(proxy.clone());
        Ok(proxy)
    }

    // Блокировка держится только на время выдачи прокси, сам вызов идёт без неё
    fn with_proxy<T>(
        &self,
        call: impl FnOnce(&WindowManagerProxyBlocking<'static>) -> zbus::Result<T>,
    ) -> Result<T> {
        let proxy = self.proxy()?;

        call(&proxy).map_err(|e| {
            // Следующий вызов переподключится
            *self.proxy.lock() = None;
            WinModeError::Transport(e.to_string())
        })
    }

    #[cfg(test)]
    fn is_connected(&self) -> bool {
        self.proxy.lock().is_some()
    }
}

impl OverlayBackend for RemoteOverlay {
    fn get(&self, identifier: &str) -> Result<Option<i32>> {
        let raw = self
            .with_proxy(|proxy| proxy.get_package_overlay_windowing_mode(identifier))
            .inspect_err(|e| {
                error!("Не удалось вызвать GetPackageOverlayWindowingMode для {}: {}", identifier, e)
            })?;

        debug!("Удалённый overlay {} для пакета {}", raw, identifier);
        Ok(Some(raw))
    }

    fn put(&self, identifier: &str, mode: WindowingMode) -> Result<()> {
        self.with_proxy(|proxy| {
            proxy.save_package_overlay_windowing_mode(identifier, mode.as_raw())
        })
        .inspect_err(|e| {
            error!("Не удалось вызвать SavePackageOverlayWindowingMode для {}: {}", identifier, e)
        })
    }

    fn backend_type(&self) -> &'static str {
        "dbus"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn unreachable_config() -> OverlayConfig {
        OverlayConfig {
            backend: "dbus".to_string(),
            bus: "session".to_string(),
            bus_name: "org.winmode.Missing".to_string(),
            object_path: "/org/winmode/Missing".to_string(),
        }
    }

    #[test]
    fn test_unreachable_service_is_transport_error() {
        let overlay = RemoteOverlay::new(unreachable_config());

        assert!(matches!(
            overlay.get("com.example.app"),
            Err(WinModeError::Transport(_))
        ));
        assert!(matches!(
            overlay.put("com.example.app", WindowingMode::Fullscreen),
            Err(WinModeError::Transport(_))
        ));
        assert!(!overlay.is_connected());
    }

    #[test]
    fn test_failed_calls_from_many_threads_release_the_lock() {
        let overlay = Arc::new(RemoteOverlay::new(unreachable_config()));

        let callers: Vec<_> = (0..4)
            .map(|_| {
                let overlay = overlay.clone();
                thread::spawn(move || overlay.get("com.example.app").is_err())
            })
            .collect();

        for caller in callers {
            assert!(caller.join().unwrap());
        }
        // Блокировка свободна после всех вызовов
        assert!(overlay.proxy.try_lock().is_some());
    }
}
