//! User repository.

use cinerate_common::{AppError, AppResult};
use urlencoding::encode;

use crate::models::{
    AuthResponse, Credentials, LoginResponse, MessageResponse, RegisterResponse,
    UpdateUserRequest, UpdateUserResponse, User, UserDetails, UserId,
};
use crate::transport::ApiClient;

/// Token recorded when the backend's login response carries none.
pub const PLACEHOLDER_TOKEN: &str = "dummy-token";

/// User repository for auth endpoints.
#[derive(Debug, Clone)]
pub struct UserRepository {
    client: ApiClient,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Register a new account.
    pub async fn register(&self, credentials: &Credentials) -> AppResult<RegisterResponse> {
        self.client.post("/api/auth/register", credentials).await
    }

    /// Log in.
    ///
    /// The login endpoint answers with the username only, so the numeric id
    /// is resolved with a second lookup by username.
    pub async fn login(&self, credentials: &Credentials) -> AppResult<AuthResponse> {
        let response: LoginResponse = self.client.post("/api/auth/login", credentials).await?;

        let username = response
            .username
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                AppError::InvalidResponse("Login response does not contain username".to_string())
            })?;

        let details = self.find_by_username(&username).await.map_err(|e| {
            tracing::error!(error = %e, username = %username, "Failed to get user details");
            AppError::InvalidResponse(
                "Failed to get complete user information after login".to_string(),
            )
        })?;

        Ok(AuthResponse {
            token: response
                .token
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| PLACEHOLDER_TOKEN.to_string()),
            user: User::from(details),
        })
    }

    /// Find a user by username.
    pub async fn find_by_username(&self, username: &str) -> AppResult<UserDetails> {
        self.client
            .get(&format!("/api/auth/users/username/{}", encode(username)))
            .await
    }

    /// Update username and/or password.
    pub async fn update(
        &self,
        user_id: UserId,
        request: &UpdateUserRequest,
    ) -> AppResult<UpdateUserResponse> {
        self.client
            .put(&format!("/api/auth/users/{user_id}"), request)
            .await
    }

    /// Delete an account.
    pub async fn delete(&self, user_id: UserId) -> AppResult<MessageResponse> {
        self.client
            .delete(&format!("/api/auth/users/{user_id}"))
            .await
    }
}
