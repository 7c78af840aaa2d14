use crate::config::PolicyConfig;
use crate::utils::PropertyFile;
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Системный shell и SystemUI никогда не переводятся в другой режим
pub static DEFAULT_DISALLOWED: Lazy<HashSet<String>> = Lazy::new(|| {
    ["android", "com.android.systemui"]
        .iter()
        .map(|package| package.to_string())
        .collect()
});

/// Source of the global "PC mode" toggle. Read on every call, never cached.
pub trait GlobalEnableFlag: Send + Sync {
    fn read(&self) -> bool;
}

/// Флаг из persist-свойства системы
pub struct PropertyFlag {
    properties: PropertyFile,
    key: String,
    default: bool,
}

impl PropertyFlag {
    pub fn new(properties: PropertyFile, key: impl Into<String>, default: bool) -> Self {
        Self {
            properties,
            key: key.into(),
            default,
        }
    }
}

impl GlobalEnableFlag for PropertyFlag {
    fn read(&self) -> bool {
        self.properties.get_bool(&self.key, self.default)
    }
}

/// Флаг, управляемый напрямую (тесты, встраивание)
#[derive(Debug)]
pub struct StaticFlag(AtomicBool);

impl StaticFlag {
    pub fn new(enabled: bool) -> Self {
        Self(AtomicBool::new(enabled))
    }

    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Relaxed);
    }
}

impl GlobalEnableFlag for StaticFlag {
    fn read(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Policy inputs shared by the resolver and the writers: disallow set and feature flags.
#[derive(Clone)]
pub struct PolicyConstants {
    disallowed: Arc<HashSet<String>>,
    pc_mode: Arc<dyn GlobalEnableFlag>,
    systemui_plugin: Arc<dyn GlobalEnableFlag>,
}

impl PolicyConstants {
    pub fn new(disallowed: HashSet<String>, pc_mode: Arc<dyn GlobalEnableFlag>) -> Self {
        Self {
            disallowed: Arc::new(disallowed),
            pc_mode,
            systemui_plugin: Arc::new(StaticFlag::new(false)),
        }
    }

    /// Политика по умолчанию с управляемым флагом PC mode
    pub fn with_default_disallowed(pc_mode: Arc<dyn GlobalEnableFlag>) -> Self {
        Self::new(DEFAULT_DISALLOWED.clone(), pc_mode)
    }

    pub fn from_config(config: &PolicyConfig) -> Self {
        let properties = PropertyFile::new(&config.property_file);
        let pc_mode = PropertyFlag::new(properties.clone(), config.pc_mode_property.clone(), true);
        let systemui_plugin =
            PropertyFlag::new(properties, config.systemui_plugin_property.clone(), false);

        Self::new(config.disallowed_set(), Arc::new(pc_mode))
            .with_systemui_plugin_flag(Arc::new(systemui_plugin))
    }

    pub fn with_systemui_plugin_flag(mut self, flag: Arc<dyn GlobalEnableFlag>) -> Self {
        self.systemui_plugin = flag;
        self
    }

    pub fn is_pc_mode_enabled(&self) -> bool {
        self.pc_mode.read()
    }

    pub fn is_systemui_plugin_enabled(&self) -> bool {
        self.systemui_plugin.read()
    }

    pub fn is_disallowed(&self, identifier: &str) -> bool {
        self.disallowed.contains(identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_disallowed_set() {
        let policy = PolicyConstants::with_default_disallowed(Arc::new(StaticFlag::new(true)));
        assert!(policy.is_disallowed("android"));
        assert!(policy.is_disallowed("com.android.systemui"));
        assert!(!policy.is_disallowed("com.android.settings"));
        assert!(!policy.is_systemui_plugin_enabled());
    }

    #[test]
    fn test_static_flag_is_read_on_every_call() {
        let flag = Arc::new(StaticFlag::new(true));
        let policy = PolicyConstants::with_default_disallowed(flag.clone());
        assert!(policy.is_pc_mode_enabled());

        flag.set(false);
        assert!(!policy.is_pc_mode_enabled());
    }

    #[test]
    fn test_from_config_reads_property_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = PolicyConfig {
            property_file: dir.path().join("persist.properties"),
            ..PolicyConfig::default()
        };
        let policy = PolicyConstants::from_config(&config);

        // Без файла: PC mode включён, плагин SystemUI выключен
        assert!(policy.is_pc_mode_enabled());
        assert!(!policy.is_systemui_plugin_enabled());

        fs::write(
            &config.property_file,
            "persist.sys.pcmode.enabled=false\npersist.sys.systemuiplugin.enabled=1\n",
        )
        .unwrap();
        assert!(!policy.is_pc_mode_enabled());
        assert!(policy.is_systemui_plugin_enabled());
    }
}
