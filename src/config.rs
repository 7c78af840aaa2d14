use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const DEFAULT_PC_MODE_PROPERTY: &str = "persist.sys.pcmode.enabled";
pub const DEFAULT_SYSTEMUI_PLUGIN_PROPERTY: &str = "persist.sys.systemuiplugin.enabled";
pub const DEFAULT_BUS_NAME: &str = "org.boringdroid.WindowManager";
pub const DEFAULT_OBJECT_PATH: &str = "/org/boringdroid/WindowManager";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
    pub policy: PolicyConfig,
    pub storage: StorageConfig,
    pub overlay: OverlayConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub filter: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PolicyConfig {
    /// Пакеты, которые никогда не переводятся в не-дефолтный режим
    pub disallowed_packages: Vec<String>,
    /// Файл с persist-свойствами системы (`key=value` построчно)
    pub property_file: PathBuf,
    pub pc_mode_property: String,
    pub systemui_plugin_property: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub backend: String,
    /// Корень пользовательских каталогов: `<data_dir>/<user>/<namespace>`
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OverlayConfig {
    pub backend: String,
    /// Шина D-Bus привилегированного сервиса: system | session
    pub bus: String,
    pub bus_name: String,
    pub object_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "compact".to_string(),
                filter: "winmode=info".to_string(),
            },
            policy: PolicyConfig::default(),
            storage: StorageConfig {
                backend: "file".to_string(),
                data_dir: PathBuf::from("/data/system_ce"),
            },
            overlay: OverlayConfig {
                backend: "local".to_string(),
                bus: "system".to_string(),
                bus_name: DEFAULT_BUS_NAME.to_string(),
                object_path: DEFAULT_OBJECT_PATH.to_string(),
            },
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            disallowed_packages: vec!["android".to_string(), "com.android.systemui".to_string()],
            property_file: PathBuf::from("/data/property/persist.properties"),
            pc_mode_property: DEFAULT_PC_MODE_PROPERTY.to_string(),
            systemui_plugin_property: DEFAULT_SYSTEMUI_PLUGIN_PROPERTY.to_string(),
        }
    }
}

impl PolicyConfig {
    pub fn disallowed_set(&self) -> HashSet<String> {
        self.disallowed_packages.iter().cloned().collect()
    }
}

impl Config {
    /// Загрузить конфигурацию: значения по умолчанию, затем TOML-файл, затем `WINMODE_*`
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed("WINMODE_").split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // Валидация настроек логирования
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "compact" | "full" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        // Валидация политики
        for (i, package) in self.policy.disallowed_packages.iter().enumerate() {
            if package.trim().is_empty() {
                anyhow::bail!("Пустой пакет в disallowed_packages #{}", i + 1);
            }
        }

        if self.policy.pc_mode_property.is_empty() {
            anyhow::bail!("pc_mode_property не может быть пустым");
        }

        // Валидация хранилища
        match self.storage.backend.as_str() {
            "file" | "memory" => {}
            _ => anyhow::bail!("Неверный backend хранилища: {}", self.storage.backend),
        }

        if self.storage.backend == "file" && self.storage.data_dir.as_os_str().is_empty() {
            anyhow::bail!("data_dir обязателен для файлового хранилища");
        }

        // Валидация overlay
        match self.overlay.backend.as_str() {
            "local" => {}
            "dbus" => {
                if !matches!(self.overlay.bus.as_str(), "system" | "session") {
                    anyhow::bail!("Неверная шина D-Bus: {}", self.overlay.bus);
                }
                if self.overlay.bus_name.is_empty() || !self.overlay.object_path.starts_with('/') {
                    anyhow::bail!(
                        "Неверный адрес D-Bus overlay-сервиса: {} {}",
                        self.overlay.bus_name,
                        self.overlay.object_path
                    );
                }
            }
            _ => anyhow::bail!("Неверный backend overlay: {}", self.overlay.backend),
        }

        Ok(())
    }
}
