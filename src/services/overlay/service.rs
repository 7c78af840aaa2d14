use super::local::LocalOverlay;
use super::r#trait::OverlayBackend;
use crate::config::OverlayConfig;
use crate::error::Result;
use crate::model::WindowingMode;
use crate::services::user_storage::UserStorage;
use tracing::{info, warn};
use zbus::blocking::connection::Builder;
use zbus::blocking::Connection;

pub const OVERLAY_INTERFACE: &str = "org.boringdroid.WindowManager";

/// Привилегированная сторона overlay: обслуживает локальное пространство имён по D-Bus.
///
/// Ошибки хранилища не передаются клиенту: чтение возвращает `Undefined`, запись
/// игнорируется с записью в лог.
pub struct OverlayService {
    overlay: LocalOverlay,
}

impl OverlayService {
    pub fn new(storage: UserStorage) -> Self {
        Self {
            overlay: LocalOverlay::new(storage),
        }
    }

    pub fn overlay_mode(&self, package_name: &str) -> i32 {
        match self.overlay.get(package_name) {
            Ok(Some(raw)) => raw,
            Ok(None) => WindowingMode::Undefined.as_raw(),
            Err(e) => {
                warn!("Не удалось прочитать overlay для {}: {}", package_name, e);
                WindowingMode::Undefined.as_raw()
            }
        }
    }

    pub fn save_overlay_mode(&self, package_name: &str, windowing_mode: i32) -> bool {
        if package_name.is_empty() {
            warn!("Отклонена запись overlay с пустым пакетом");
            return false;
        }

        let Some(mode) = WindowingMode::from_raw(windowing_mode) else {
            warn!("Отклонён неизвестный режим {} для {}", windowing_mode, package_name);
            return false;
        };

        match self.overlay.put(package_name, mode) {
            Ok(()) => {
                info!("Overlay для {} установлен в {}", package_name, mode);
                true
            }
            Err(e) => {
                warn!("Не удалось сохранить overlay для {}: {}", package_name, e);
                false
            }
        }
    }
}

#[zbus::interface(name = "org.boringdroid.WindowManager")]
impl OverlayService {
    fn get_package_overlay_windowing_mode(&self, package_name: String) -> i32 {
        self.overlay_mode(&package_name)
    }

    fn save_package_overlay_windowing_mode(&self, package_name: String, windowing_mode: i32) {
        self.save_overlay_mode(&package_name, windowing_mode);
    }
}

/// Опубликовать overlay-сервис на шине; сервис работает, пока жив возвращённый `Connection`
pub fn serve_overlay(config: &OverlayConfig, storage: UserStorage) -> Result<Connection> {
    info!(
        "Публикация overlay-сервиса {} на {} ({} bus)",
        config.bus_name, config.object_path, config.bus
    );

    let builder = match config.bus.as_str() {
        "session" => Builder::session()?,
        _ => Builder::system()?,
    };

    let connection = builder
        .name(config.bus_name.as_str())?
        .serve_at(config.object_path.as_str(), OverlayService::new(storage))?
        .build()?;

    Ok(connection)
}
