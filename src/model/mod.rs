pub mod bounds;
pub mod mode;

pub use bounds::WindowBounds;
pub use mode::WindowingMode;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Идентификатор пользователя, к чьему хранилищу привязан сервис
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u32);

impl UserId {
    pub const SYSTEM: UserId = UserId(0);

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Проверить идентификатор приложения (единственное требование - непустой)
pub fn is_valid_identifier(identifier: &str) -> bool {
    !identifier.is_empty()
}
