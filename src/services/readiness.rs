use crate::model::UserId;
use dashmap::DashSet;
use tracing::info;

/// SessionReadiness reports whether a user's credential-protected storage can be touched.
///
/// The answer can change between calls (unlock, lock, user switch), so callers must
/// ask on every operation and never cache it.
pub trait SessionReadiness: Send + Sync {
    fn is_user_storage_ready(&self, user: UserId) -> bool;
}

/// Хранилище всегда доступно (хосты без шифрования пользовательских данных)
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysReady;

impl SessionReadiness for AlwaysReady {
    fn is_user_storage_ready(&self, _user: UserId) -> bool {
        true
    }
}

/// Набор разблокированных пользователей, которым управляет хост-процесс.
///
/// Пользователь считается готовым с момента начала разблокировки до блокировки.
#[derive(Debug, Default)]
pub struct UserUnlockTracker {
    unlocked: DashSet<UserId>,
}

impl UserUnlockTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_unlocking(&self, user: UserId) {
        if self.unlocked.insert(user) {
            info!("Хранилище пользователя {} доступно", user);
        }
    }

    pub fn mark_locked(&self, user: UserId) {
        if self.unlocked.remove(&user).is_some() {
            info!("Хранилище пользователя {} заблокировано", user);
        }
    }
}

impl SessionReadiness for UserUnlockTracker {
    fn is_user_storage_ready(&self, user: UserId) -> bool {
        self.unlocked.contains(&user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_transitions() {
        let tracker = UserUnlockTracker::new();
        assert!(!tracker.is_user_storage_ready(UserId(0)));

        tracker.mark_unlocking(UserId(0));
        assert!(tracker.is_user_storage_ready(UserId(0)));
        assert!(!tracker.is_user_storage_ready(UserId(10)));

        tracker.mark_locked(UserId(0));
        assert!(!tracker.is_user_storage_ready(UserId(0)));
    }

    #[test]
    fn test_always_ready() {
        assert!(AlwaysReady.is_user_storage_ready(UserId(42)));
    }
}
