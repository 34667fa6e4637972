//! Authenticated session state.
//!
//! The session is loaded from persisted storage on start, published through a
//! `watch` channel so front ends can react to changes, and written back on
//! every mutation.

use std::fmt;

use cinerate_client::models::User;
use cinerate_common::{AppError, AppResult, SharedStore};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Storage key of the auth token.
pub const TOKEN_KEY: &str = "token";
/// Storage key of the JSON-encoded user.
pub const USER_KEY: &str = "user";

/// A logged-in user and the token issued for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Auth token.
    pub token: String,
    /// Authenticated user.
    pub user: User,
}

/// Session store backed by a key/value storage.
pub struct SessionStore {
    storage: SharedStore,
    state: watch::Sender<Option<Session>>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Load the persisted session.
    ///
    /// A stored user that does not parse is discarded together with the
    /// token; loading still succeeds without a session.
    pub async fn load(storage: SharedStore) -> AppResult<Self> {
        let token = storage
            .get(TOKEN_KEY)
            .await?
            .filter(|t| !t.is_empty());
        let raw_user = storage.get(USER_KEY).await?;

        let session = match (token, raw_user) {
            (Some(token), Some(raw_user)) if !matches!(raw_user.as_str(), "null" | "undefined") => {
                match serde_json::from_str::<User>(&raw_user) {
                    Ok(user) => Some(Session { token, user }),
                    Err(e) => {
                        warn!(error = %e, "Discarding corrupt stored session");
                        storage.remove(TOKEN_KEY).await?;
                        storage.remove(USER_KEY).await?;
                        None
                    }
                }
            }
            _ => None,
        };

        match &session {
            Some(s) => debug!(user_id = s.user.id, "Restored session"),
            None => debug!("No stored session"),
        }

        let (state, _) = watch::channel(session);
        Ok(Self { storage, state })
    }

    /// Persist and publish a new session.
    pub async fn login(&self, token: impl Into<String>, user: User) -> AppResult<()> {
        let session = Session {
            token: token.into(),
            user,
        };

        self.storage.set(TOKEN_KEY, &session.token).await?;
        self.storage
            .set(USER_KEY, &serde_json::to_string(&session.user)?)
            .await?;

        info!(user_id = session.user.id, "Session started");
        self.state.send_replace(Some(session));
        Ok(())
    }

    /// Clear the session.
    pub async fn logout(&self) -> AppResult<()> {
        self.storage.remove(TOKEN_KEY).await?;
        self.storage.remove(USER_KEY).await?;

        if let Some(previous) = self.state.send_replace(None) {
            info!(user_id = previous.user.id, "Session ended");
        }
        Ok(())
    }

    /// Replace the cached user, keeping the token.
    pub async fn update_user(&self, user: User) -> AppResult<()> {
        let mut session = self.current().ok_or(AppError::Unauthorized)?;

        self.storage
            .set(USER_KEY, &serde_json::to_string(&user)?)
            .await?;

        session.user = user;
        self.state.send_replace(Some(session));
        Ok(())
    }

    /// Watch the session for changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.state.subscribe()
    }

    /// The current session, if any.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.state.borrow().clone()
    }

    /// The logged-in user, if any.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.borrow().as_ref().map(|s| s.user.clone())
    }

    /// The auth token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.state.borrow().as_ref().map(|s| s.token.clone())
    }

    /// Whether a user is logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// The logged-in user, or [`AppError::Unauthorized`].
    pub fn require_user(&self) -> AppResult<User> {
        self.user().ok_or(AppError::Unauthorized)
    }
}
