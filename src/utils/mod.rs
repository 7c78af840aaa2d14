pub mod properties;

pub use properties::PropertyFile;

// ✅ Макрос условного логирования для горячего пути (resolve вызывается на каждый запуск окна)
#[macro_export]
macro_rules! debug_if_enabled {
    ($($arg:tt)*) => {
        if tracing::enabled!(tracing::Level::DEBUG) {
            tracing::debug!($($arg)*);
        }
    };
}

