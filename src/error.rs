use crate::model::UserId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WinModeError {
    #[error("Ошибка конфигурации: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Ошибка ввода-вывода: {0}")]
    Io(#[from] std::io::Error),

    #[error("Повреждённый файл хранилища: {0}")]
    StoreParse(#[from] toml::de::Error),

    #[error("Не удалось сериализовать хранилище: {0}")]
    StoreSerialize(#[from] toml::ser::Error),

    #[error("Ошибка D-Bus: {0}")]
    DBus(#[from] zbus::Error),

    #[error("Хранилище пользователя {0} ещё не готово")]
    NotReady(UserId),

    #[error("PC mode отключён")]
    FeatureDisabled,

    #[error("Пакет {0} находится в списке запрещённых")]
    Disallowed(String),

    #[error("Некорректный идентификатор приложения: {0:?}")]
    InvalidIdentifier(String),

    #[error("Ошибка транспорта: {0}")]
    Transport(String),

    #[error("Внутренняя ошибка: {0}")]
    Internal(String),
}

impl WinModeError {
    pub fn not_ready<T>(user: UserId) -> Result<T> {
        Err(WinModeError::NotReady(user))
    }
}

pub type Result<T> = std::result::Result<T, WinModeError>;

// Удобные макросы для создания ошибок
#[macro_export]
macro_rules! winmode_error {
    (transport, $($arg:tt)*) => {
        $crate::error::WinModeError::Transport(format!($($arg)*))
    };
    (invalid_identifier, $($arg:tt)*) => {
        $crate::error::WinModeError::InvalidIdentifier(format!($($arg)*))
    };
    (internal, $($arg:tt)*) => {
        $crate::error::WinModeError::Internal(format!($($arg)*))
    };
}
