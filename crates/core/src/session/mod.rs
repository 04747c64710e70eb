//! Session store - who is signed in
//!
//! Holds the user directory (seeded with demo accounts) and the current user.
//! Passwords are accepted but never checked or stored; this is a stand-in
//! for a real account service.

mod persistence;

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{info, instrument, warn};

use crate::error::{Error, Result};
use crate::models::User;
use crate::simulate::{Request, Simulator};

pub use persistence::{FileSession, MemorySession, SessionPersistence, SESSION_FILE};

#[derive(Debug, Default)]
struct SessionState {
    users: Vec<User>,
    current: Option<User>,
}

/// Shared handle to the session; clones see the same state
#[derive(Clone)]
pub struct SessionStore {
    state: Arc<RwLock<SessionState>>,
    persistence: Arc<dyn SessionPersistence>,
    simulator: Simulator,
}

impl SessionStore {
    pub fn new(
        users: Vec<User>,
        persistence: Arc<dyn SessionPersistence>,
        simulator: Simulator,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState {
                users,
                current: None,
            })),
            persistence,
            simulator,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Pick up a user persisted by a previous run. A record that cannot be
    /// parsed is discarded.
    #[instrument(skip(self))]
    pub fn restore(&self) -> Result<Option<User>> {
        let user = match self.persistence.load() {
            Ok(user) => user,
            Err(Error::Serialization(e)) => {
                warn!(error = %e, "Failed to parse stored user, discarding");
                self.persistence.clear()?;
                None
            }
            Err(e) => return Err(e),
        };

        if let Some(user) = &user {
            info!(user_id = %user.id, username = %user.username, "Session restored");
            let mut state = self.write();
            if !state.users.iter().any(|u| u.id == user.id) {
                state.users.push(user.clone());
            }
            state.current = Some(user.clone());
        }

        Ok(user)
    }

    /// Sign in by email. The password is not verified.
    #[instrument(skip(self, _password))]
    pub async fn login(&self, email: &str, _password: &str) -> Result<User> {
        self.simulator.round_trip(Request::Auth).await?;

        let user = self
            .read()
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email.trim()))
            .cloned()
            .ok_or_else(|| Error::Authentication("Invalid email or password".to_string()))?;

        self.begin(&user)?;
        info!(user_id = %user.id, "Logged in");
        Ok(user)
    }

    /// Register a new account and sign it in
    #[instrument(skip(self, _password))]
    pub async fn signup(&self, username: &str, email: &str, _password: &str) -> Result<User> {
        self.simulator.round_trip(Request::Auth).await?;

        let username = username.trim();
        let email = email.trim();

        if username.is_empty() {
            return Err(Error::Registration("Username is required".to_string()));
        }
        if !is_valid_email(email) {
            return Err(Error::Registration("Invalid email address".to_string()));
        }

        let user = {
            let mut state = self.write();
            if state.users.iter().any(|u| u.email.eq_ignore_ascii_case(email)) {
                return Err(Error::Registration("Email already in use".to_string()));
            }
            if state.users.iter().any(|u| u.username.eq_ignore_ascii_case(username)) {
                return Err(Error::Registration("Username already taken".to_string()));
            }

            let user = User::new(username.to_string(), email.to_string());
            state.users.push(user.clone());
            user
        };

        self.begin(&user)?;
        info!(user_id = %user.id, "Account created");
        Ok(user)
    }

    fn begin(&self, user: &User) -> Result<()> {
        self.persistence.save(user)?;
        self.write().current = Some(user.clone());
        Ok(())
    }

    /// Sign out and forget the persisted record
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<()> {
        let previous = self.write().current.take();
        self.persistence.clear()?;

        if let Some(user) = previous {
            info!(user_id = %user.id, "Logged out");
        }
        Ok(())
    }

    pub fn current_user(&self) -> Option<User> {
        self.read().current.clone()
    }

    /// The current user, or an error naming what they tried to do
    pub fn require_user(&self, action: &'static str) -> Result<User> {
        self.current_user().ok_or(Error::NotAuthenticated(action))
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().current.is_some()
    }

    pub fn users(&self) -> Vec<User> {
        self.read().users.clone()
    }

    pub fn find_by_id(&self, user_id: uuid::Uuid) -> Option<User> {
        self.read().users.iter().find(|u| u.id == user_id).cloned()
    }

    pub fn find_by_username(&self, username: &str) -> Option<User> {
        self.read()
            .users
            .iter()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned()
    }
}

/// Loose shape check: `local@domain.tld`, no whitespace
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::mock_users;

    fn store_with(persistence: Arc<dyn SessionPersistence>) -> SessionStore {
        SessionStore::new(mock_users(), persistence, Simulator::instant())
    }

    fn store() -> SessionStore {
        store_with(Arc::new(MemorySession::new()))
    }

    #[tokio::test]
    async fn test_login_known_email() {
        let session = store();
        let user = session.login("demo@roomloop.com", "anything").await.unwrap();
        assert_eq!(user.username, "demo");
        assert!(session.is_authenticated());
        assert_eq!(session.current_user(), Some(user));
    }

    #[tokio::test]
    async fn test_login_unknown_email() {
        let session = store();
        let err = session.login("nobody@example.com", "pw").await.unwrap_err();
        assert_eq!(err.to_string(), "Authentication failed: Invalid email or password");
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_signup_rejects_duplicates() {
        let session = store();

        let err = session.signup("someone", "jane@example.com", "pw").await.unwrap_err();
        assert!(err.to_string().contains("Email already in use"));

        let err = session.signup("john", "new@example.com", "pw").await.unwrap_err();
        assert!(err.to_string().contains("Username already taken"));

        let err = session.signup("JANE", "other@example.com", "pw").await.unwrap_err();
        assert!(err.to_string().contains("Username already taken"));
        assert_eq!(session.users().len(), 3);

        let err = session.signup("alex", "not-an-email", "pw").await.unwrap_err();
        assert!(err.to_string().contains("Invalid email address"));

        let user = session.signup("alex", "alex@example.com", "pw").await.unwrap();
        assert_eq!(session.find_by_username("alex"), Some(user));
    }

    #[tokio::test]
    async fn test_session_survives_restart() {
        let persistence: Arc<dyn SessionPersistence> = Arc::new(MemorySession::new());
        let first = store_with(persistence.clone());
        let user = first.login("jane@example.com", "pw").await.unwrap();

        let second = store_with(persistence.clone());
        assert_eq!(second.restore().unwrap(), Some(user.clone()));
        assert_eq!(second.current_user(), Some(user));

        second.logout().unwrap();
        let third = store_with(persistence);
        assert!(third.restore().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_record_is_discarded() {
        let persistence = Arc::new(MemorySession::with_raw("{broken"));
        let session = store_with(persistence.clone());

        assert!(session.restore().unwrap().is_none());
        assert!(persistence.load().unwrap().is_none());
    }

    #[test]
    fn test_require_user() {
        let session = store();
        let err = session.require_user("join a room").unwrap_err();
        assert_eq!(err.to_string(), "You must be logged in to join a room");
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("demo@roomloop.com"));
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("demo@roomloop"));
        assert!(!is_valid_email("@roomloop.com"));
        assert!(!is_valid_email("demo@.com"));
        assert!(!is_valid_email("demo@com."));
        assert!(!is_valid_email("de mo@roomloop.com"));
        assert!(!is_valid_email("a@b@c.com"));
    }
}
