use serde::{Deserialize, Serialize};
use std::fmt;

/// Режим окна приложения.
///
/// Числовые значения совпадают с `WindowConfiguration` платформы, поэтому значения,
/// записанные другими компонентами оболочки, читаются без преобразований.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum WindowingMode {
    /// Нет мнения: система выбирает режим сама
    #[default]
    Undefined = 0,
    Fullscreen = 1,
    Pinned = 2,
    SplitScreenPrimary = 3,
    SplitScreenSecondary = 4,
    Freeform = 5,
    MultiWindow = 6,
}

impl WindowingMode {
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    /// Неизвестные значения (включая устаревший sentinel `-1`) дают `None`
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Undefined),
            1 => Some(Self::Fullscreen),
            2 => Some(Self::Pinned),
            3 => Some(Self::SplitScreenPrimary),
            4 => Some(Self::SplitScreenSecondary),
            5 => Some(Self::Freeform),
            6 => Some(Self::MultiWindow),
            _ => None,
        }
    }

    pub fn is_undefined(self) -> bool {
        self == Self::Undefined
    }
}

impl TryFrom<i32> for WindowingMode {
    type Error = i32;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        Self::from_raw(raw).ok_or(raw)
    }
}

impl From<WindowingMode> for i32 {
    fn from(mode: WindowingMode) -> Self {
        mode.as_raw()
    }
}

impl fmt::Display for WindowingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Undefined => "undefined",
            Self::Fullscreen => "fullscreen",
            Self::Pinned => "pinned",
            Self::SplitScreenPrimary => "split-screen-primary",
            Self::SplitScreenSecondary => "split-screen-secondary",
            Self::Freeform => "freeform",
            Self::MultiWindow => "multi-window",
        };
        write!(f, "{}({})", name, self.as_raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_values_match_platform() {
        assert_eq!(WindowingMode::Undefined.as_raw(), 0);
        assert_eq!(WindowingMode::Fullscreen.as_raw(), 1);
        assert_eq!(WindowingMode::Freeform.as_raw(), 5);
        assert_eq!(WindowingMode::from_raw(5), Some(WindowingMode::Freeform));
    }

    #[test]
    fn test_unknown_raw_values() {
        assert_eq!(WindowingMode::from_raw(-1), None);
        assert_eq!(WindowingMode::from_raw(42), None);
        assert_eq!(WindowingMode::try_from(-1), Err(-1));
    }

    #[test]
    fn test_display() {
        assert_eq!(WindowingMode::Freeform.to_string(), "freeform(5)");
        assert_eq!(WindowingMode::default(), WindowingMode::Undefined);
    }
}
