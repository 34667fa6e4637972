//! Users and authentication payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::MessageResponse;

/// User identifier.
pub type UserId = i64;

/// The authenticated identity kept in the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User id.
    pub id: UserId,
    /// Username.
    pub username: String,
}

/// Username and password, as sent to register and login.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Username.
    pub username: String,
    /// Plain-text password. Redacted from `Debug` output.
    pub password: String,
}

impl Credentials {
    /// Create credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /api/auth/login`. The backend omits the numeric id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    /// Backend message, if any.
    #[serde(default)]
    pub message: Option<String>,
    /// Username the login succeeded for.
    #[serde(default)]
    pub username: Option<String>,
    /// Issued token. Some backends issue none.
    #[serde(default)]
    pub token: Option<String>,
}

/// A token plus the identity it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Auth token.
    pub token: String,
    /// Authenticated user.
    pub user: User,
}

/// Body of `POST /api/auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RegisterResponse {
    /// The backend issued a session right away.
    Authenticated(AuthResponse),
    /// The backend echoed the created user.
    Registered(UserDetails),
    /// The backend only acknowledged the registration.
    Acknowledged(MessageResponse),
}

/// Body of `GET /api/auth/users/username/{username}`.
///
/// The backend also echoes the password hash; it is deliberately not kept.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserDetails {
    /// User id.
    pub id: UserId,
    /// Username.
    pub username: String,
}

impl From<UserDetails> for User {
    fn from(details: UserDetails) -> Self {
        Self {
            id: details.id,
            username: details.username,
        }
    }
}

/// Body of `PUT /api/auth/users/{id}`. Only changed fields are sent.
#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateUserRequest {
    /// New username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// New password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UpdateUserRequest {
    /// Whether nothing would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none()
    }
}

impl fmt::Debug for UpdateUserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpdateUserRequest")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Response to a profile update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateUserResponse {
    /// Backend message, if any.
    #[serde(default)]
    pub message: Option<String>,
    /// Username after the update.
    #[serde(default)]
    pub username: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_register_response_variants() {
        let authenticated: RegisterResponse =
            serde_json::from_str(r#"{"token":"t","user":{"id":1,"username":"alice"}}"#).unwrap();
        assert!(matches!(authenticated, RegisterResponse::Authenticated(_)));

        let registered: RegisterResponse =
            serde_json::from_str(r#"{"id":4,"username":"alice","password":"$2a$10$x"}"#).unwrap();
        assert_eq!(
            registered,
            RegisterResponse::Registered(UserDetails {
                id: 4,
                username: "alice".to_string()
            })
        );

        let acknowledged: RegisterResponse =
            serde_json::from_str(r#"{"message":"User registered successfully"}"#).unwrap();
        assert_eq!(
            acknowledged,
            RegisterResponse::Acknowledged(MessageResponse {
                message: Some("User registered successfully".to_string())
            })
        );

        let empty: RegisterResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, RegisterResponse::Acknowledged(MessageResponse::default()));
    }

    #[test]
    fn test_update_request_sends_only_changed_fields() {
        let request = UpdateUserRequest {
            username: Some("bob".to_string()),
            password: None,
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"username":"bob"}"#
        );
        assert!(UpdateUserRequest::default().is_empty());
    }

    #[test]
    fn test_debug_redacts_passwords() {
        let credentials = Credentials::new("alice", "hunter22");
        assert!(!format!("{credentials:?}").contains("hunter22"));

        let update = UpdateUserRequest {
            username: None,
            password: Some("hunter22".to_string()),
        };
        assert!(!format!("{update:?}").contains("hunter22"));
    }
}
