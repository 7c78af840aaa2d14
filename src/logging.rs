use crate::config::LoggingConfig;
use anyhow::Result;

/// Установить глобальный subscriber для хост-процесса.
///
/// `RUST_LOG` имеет приоритет над `filter` из конфигурации. Повторная инициализация
/// (subscriber уже установлен хостом) возвращает ошибку, а не паникует.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let directives = if config.filter.is_empty() {
        config.level.as_str()
    } else {
        config.filter.as_str()
    };

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(directives))?;

    let registry = tracing_subscriber::registry().with(filter);

    match config.format.as_str() {
        "full" => registry.with(tracing_subscriber::fmt::layer()).try_init()?,
        _ => registry
            .with(tracing_subscriber::fmt::layer().compact())
            .try_init()?,
    }

    Ok(())
}
