//! The signed-in session: bearer token plus cached user profile.

use crate::error::StorageResult;
use crate::storage::{MemoryStorage, SessionStorage};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use taskz_core::User;
use tracing::{debug, warn};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Notifications emitted by the client when the session changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { user_email: Option<String> },
    SignedOut,
    /// The backend rejected the stored token. The session has already been
    /// cleared when this is delivered.
    Expired,
}

#[derive(Debug, Default, Clone)]
struct SessionState {
    token: Option<String>,
    user: Option<User>,
}

/// Token and profile held in memory and mirrored to a [`SessionStorage`].
pub struct Session {
    storage: Arc<dyn SessionStorage>,
    state: RwLock<SessionState>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("Session")
            .field("authenticated", &state.token.is_some())
            .field("user", &state.user.as_ref().map(|user| &user.user_email))
            .finish()
    }
}

impl Session {
    /// A signed-out session writing through to `storage`. Anything already
    /// in `storage` is ignored until [`Session::hydrate`] is used instead.
    pub fn empty(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            storage,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// A signed-out session that is never persisted.
    pub fn in_memory() -> Self {
        Self::empty(Arc::new(MemoryStorage::new()))
    }

    /// Restore the session saved in `storage`.
    ///
    /// A cached profile that no longer decodes is dropped rather than
    /// failing the whole session.
    pub fn hydrate(storage: Arc<dyn SessionStorage>) -> StorageResult<Self> {
        let token = storage.get(TOKEN_KEY)?.filter(|token| !token.is_empty());
        let user = match storage.get(USER_KEY)? {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!("Discarding unreadable cached user profile: {}", e);
                    storage.remove(USER_KEY)?;
                    None
                }
            },
            None => None,
        };

        debug!(
            "Hydrated session (token present: {}, user cached: {})",
            token.is_some(),
            user.is_some()
        );

        Ok(Self {
            storage,
            state: RwLock::new(SessionState { token, user }),
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store a fresh token and, when known, the user it belongs to.
    pub fn set(&self, token: impl Into<String>, user: Option<User>) -> StorageResult<()> {
        self.set_token(token)?;
        match user {
            Some(user) => self.set_user(user),
            None => {
                self.storage.remove(USER_KEY)?;
                self.write().user = None;
                Ok(())
            }
        }
    }

    pub fn set_token(&self, token: impl Into<String>) -> StorageResult<()> {
        let token = token.into();
        self.storage.set(TOKEN_KEY, &token)?;
        self.write().token = Some(token);
        Ok(())
    }

    pub fn set_user(&self, user: User) -> StorageResult<()> {
        let encoded = serde_json::to_string(&user)?;
        self.storage.set(USER_KEY, &encoded)?;
        self.write().user = Some(user);
        Ok(())
    }

    /// Forget both the token and the cached profile.
    ///
    /// The in-memory state is cleared even when the storage fails, so a
    /// rejected token is never sent again by this process.
    pub fn clear(&self) -> StorageResult<()> {
        *self.write() = SessionState::default();
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(USER_KEY)?;
        Ok(())
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().token.is_some()
    }

    pub fn has_user(&self) -> bool {
        self.read().user.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskz_core::Role;

    fn user() -> User {
        User {
            id: "u-1".to_string(),
            user_email: "a@x.com".to_string(),
            user_name: "Ann".to_string(),
            role: Role::Normal,
        }
    }

    #[test]
    fn test_lifecycle() {
        let storage = Arc::new(MemoryStorage::new());
        let session = Session::empty(storage.clone());
        assert!(!session.is_authenticated());
        assert!(!session.has_user());

        session.set("tok-1", Some(user())).unwrap();
        assert_eq!(session.token().as_deref(), Some("tok-1"));
        assert_eq!(session.user(), Some(user()));
        assert_eq!(storage.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-1"));

        session.clear().unwrap();
        assert!(!session.is_authenticated());
        assert!(!session.has_user());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_hydrate_restores_saved_state() {
        let storage = Arc::new(MemoryStorage::new());
        Session::empty(storage.clone())
            .set("tok-1", Some(user()))
            .unwrap();

        let restored = Session::hydrate(storage).unwrap();
        assert_eq!(restored.token().as_deref(), Some("tok-1"));
        assert_eq!(restored.user(), Some(user()));
    }

    #[test]
    fn test_hydrate_drops_corrupt_profile() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "tok-1").unwrap();
        storage.set(USER_KEY, "{not json").unwrap();

        let restored = Session::hydrate(storage.clone()).unwrap();
        assert!(restored.is_authenticated());
        assert!(!restored.has_user());
        assert_eq!(storage.get(USER_KEY).unwrap(), None);
    }

    #[test]
    fn test_empty_ignores_existing_storage() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_KEY, "tok-1").unwrap();
        assert!(!Session::empty(storage).is_authenticated());
    }

    #[test]
    fn test_new_token_without_user_drops_stale_profile() {
        let session = Session::in_memory();
        session.set("tok-1", Some(user())).unwrap();
        session.set("tok-2", None).unwrap();
        assert_eq!(session.token().as_deref(), Some("tok-2"));
        assert!(!session.has_user());
    }

    #[test]
    fn test_hydrate_from_corrupt_file_is_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{truncated").unwrap();

        let session = Session::hydrate(Arc::new(crate::storage::FileStorage::new(&path))).unwrap();
        assert!(!session.is_authenticated());
        assert!(!session.has_user());

        session.set("tok-1", Some(user())).unwrap();
        let restored = Session::hydrate(Arc::new(crate::storage::FileStorage::new(&path))).unwrap();
        assert_eq!(restored.token().as_deref(), Some("tok-1"));
    }
}
