/// User-profile and identity collaborators.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::core::reader::ReaderError;
use crate::schema::pattern::{UserId, UserProfile};

/// Source of a user's declared normal reading speed.
pub trait ProfileStore: Send + Sync {
    fn normal_reading_speed(&self, user: &UserId) -> Option<u32>;
}

/// Maps a bearer credential to a user.
pub trait IdentityProvider: Send + Sync {
    /// Fails with `ReaderError::Unauthorized` when the credential is
    /// missing or unknown.
    fn authenticate(&self, credential: Option<&str>) -> Result<UserId, ReaderError>;
}

/// In-memory user profiles and session tokens.
///
/// Tokens are opaque strings issued by the caller; nothing here generates
/// or verifies them cryptographically.
#[derive(Debug, Default)]
pub struct InMemoryUsers {
    profiles: RwLock<FxHashMap<UserId, UserProfile>>,
    sessions: RwLock<FxHashMap<String, UserId>>,
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a profile.
    pub fn register(&self, profile: UserProfile) {
        self.profiles.write().insert(profile.username.clone(), profile);
    }

    pub fn profile(&self, user: &UserId) -> Option<UserProfile> {
        self.profiles.read().get(user).cloned()
    }

    /// Bind `token` to a registered user. Returns false if the user is
    /// unknown.
    pub fn issue_session(&self, user: &UserId, token: impl Into<String>) -> bool {
        if !self.profiles.read().contains_key(user) {
            return false;
        }
        self.sessions.write().insert(token.into(), user.clone());
        true
    }

    pub fn revoke_session(&self, token: &str) -> bool {
        self.sessions.write().remove(token).is_some()
    }

    /// Remove a profile and every session bound to it.
    pub fn remove_user(&self, user: &UserId) -> bool {
        self.sessions.write().retain(|_, owner| owner != user);
        self.profiles.write().remove(user).is_some()
    }
}

impl ProfileStore for InMemoryUsers {
    fn normal_reading_speed(&self, user: &UserId) -> Option<u32> {
        self.profiles
            .read()
            .get(user)
            .and_then(|p| p.normal_reading_speed)
    }
}

impl IdentityProvider for InMemoryUsers {
    fn authenticate(&self, credential: Option<&str>) -> Result<UserId, ReaderError> {
        let token = credential
            .map(|c| c.strip_prefix("Bearer ").unwrap_or(c).trim())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ReaderError::Unauthorized("missing credential".to_string()))?;

        self.sessions
            .read()
            .get(token)
            .cloned()
            .ok_or_else(|| ReaderError::Unauthorized("unknown or expired credential".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> InMemoryUsers {
        let users = InMemoryUsers::new();
        users.register(UserProfile {
            username: UserId::new("ada"),
            normal_reading_speed: Some(250),
        });
        users.register(UserProfile {
            username: UserId::new("bob"),
            normal_reading_speed: None,
        });
        users
    }

    #[test]
    fn reading_speed_lookup() {
        let u = users();
        assert_eq!(u.normal_reading_speed(&UserId::new("ada")), Some(250));
        assert_eq!(u.normal_reading_speed(&UserId::new("bob")), None);
        assert_eq!(u.normal_reading_speed(&UserId::new("nobody")), None);
    }

    #[test]
    fn authenticate_with_bearer_token() {
        let u = users();
        assert!(u.issue_session(&UserId::new("ada"), "tok-1"));
        assert_eq!(u.authenticate(Some("Bearer tok-1")).unwrap(), UserId::new("ada"));
        assert_eq!(u.authenticate(Some("tok-1")).unwrap(), UserId::new("ada"));
    }

    #[test]
    fn authenticate_failures_are_unauthorized() {
        let u = users();
        assert!(matches!(u.authenticate(None), Err(ReaderError::Unauthorized(_))));
        assert!(matches!(u.authenticate(Some("Bearer ")), Err(ReaderError::Unauthorized(_))));
        assert!(matches!(u.authenticate(Some("nope")), Err(ReaderError::Unauthorized(_))));
    }

    #[test]
    fn sessions_need_a_registered_user() {
        let u = users();
        assert!(!u.issue_session(&UserId::new("ghost"), "tok"));
    }

    #[test]
    fn revoked_and_removed_sessions_stop_working() {
        let u = users();
        u.issue_session(&UserId::new("ada"), "a");
        u.issue_session(&UserId::new("bob"), "b");
        assert!(u.revoke_session("a"));
        assert!(u.authenticate(Some("a")).is_err());

        assert!(u.remove_user(&UserId::new("bob")));
        assert!(u.authenticate(Some("b")).is_err());
        assert!(u.profile(&UserId::new("bob")).is_none());
    }
}
