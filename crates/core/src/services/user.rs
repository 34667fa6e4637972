//! User service.

use std::sync::LazyLock;

use cinerate_client::models::{
    AuthResponse, Credentials, RegisterResponse, UpdateUserRequest, UpdateUserResponse, UserId,
};
use cinerate_client::repositories::UserRepository;
use cinerate_common::{AppError, AppResult};
use regex::Regex;
use tracing::{error, info};

/// Shortest accepted username, in characters.
pub const MIN_USERNAME_LENGTH: usize = 3;
/// Longest accepted username, in characters.
pub const MAX_USERNAME_LENGTH: usize = 50;
/// Shortest accepted password, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 6;
/// Longest accepted password, in characters.
pub const MAX_PASSWORD_LENGTH: usize = 100;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("valid username pattern"));

/// User service for account business logic.
#[derive(Debug, Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

/// Requested profile changes, as entered on the profile form.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    /// Desired username.
    pub username: Option<String>,
    /// Username currently on record, to detect a no-op rename.
    pub current_username: Option<String>,
    /// New password.
    pub password: Option<String>,
    /// Confirmation of the new password.
    pub confirm_password: Option<String>,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Register a new account after validating the credentials.
    pub async fn register(&self, username: &str, password: &str) -> AppResult<RegisterResponse> {
        validate_username(username)?;
        validate_password(password)?;

        info!(username, "Registering user");
        self.user_repo
            .register(&Credentials::new(username, password))
            .await
            .inspect(|_| info!(username, "User registered"))
            .inspect_err(|e| error!(error = %e, username, "Registration failed"))
    }

    /// Log in. Only presence is checked; the backend is authoritative.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<AuthResponse> {
        if username.trim().is_empty() {
            return Err(AppError::validation("Username is required"));
        }
        if password.is_empty() {
            return Err(AppError::validation("Password is required"));
        }

        info!(username, "Logging in");
        self.user_repo
            .login(&Credentials::new(username, password))
            .await
            .inspect(|auth| info!(user_id = auth.user.id, "Logged in"))
            .inspect_err(|e| error!(error = %e, username, "Login failed"))
    }

    /// Apply profile changes.
    ///
    /// Only fields that actually change are sent. A request that changes
    /// nothing is rejected with "No changes to save".
    pub async fn update_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> AppResult<UpdateUserResponse> {
        let request = build_update_request(user_id, update)?;

        info!(user_id, "Updating user");
        self.user_repo
            .update(user_id, &request)
            .await
            .inspect(|_| info!(user_id, "User updated"))
            .inspect_err(|e| error!(error = %e, user_id, "User update failed"))
    }

    /// Delete an account.
    pub async fn delete_account(&self, user_id: UserId) -> AppResult<()> {
        if user_id <= 0 {
            return Err(AppError::validation("User ID is required"));
        }

        info!(user_id, "Deleting user");
        self.user_repo
            .delete(user_id)
            .await
            .inspect_err(|e| error!(error = %e, user_id, "User deletion failed"))?;
        info!(user_id, "User deleted");
        Ok(())
    }
}

fn build_update_request(user_id: UserId, update: &ProfileUpdate) -> AppResult<UpdateUserRequest> {
    if user_id <= 0 {
        return Err(AppError::validation("User ID is required"));
    }

    let password = update.password.as_deref().filter(|p| !p.is_empty());

    if let Some(password) = password {
        if !passwords_match(password, update.confirm_password.as_deref().unwrap_or_default()) {
            return Err(AppError::validation("New passwords do not match"));
        }
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::validation(
                "Password must be at least 6 characters long",
            ));
        }
    }

    let request = UpdateUserRequest {
        username: update
            .username
            .as_deref()
            .filter(|u| !u.is_empty() && Some(*u) != update.current_username.as_deref())
            .map(str::to_string),
        password: password
            .filter(|p| !p.trim().is_empty())
            .map(str::to_string),
    };

    if request.is_empty() {
        return Err(AppError::validation("No changes to save"));
    }

    if let Some(username) = &request.username {
        validate_username(username)?;
    }
    if request
        .password
        .as_deref()
        .is_some_and(|p| p.chars().count() > MAX_PASSWORD_LENGTH)
    {
        return Err(AppError::validation(
            "Password cannot exceed 100 characters",
        ));
    }

    Ok(request)
}

/// Check a username against the account rules.
pub fn validate_username(username: &str) -> AppResult<()> {
    if username.trim().is_empty() {
        return Err(AppError::validation("Username is required"));
    }

    let length = username.chars().count();
    if length < MIN_USERNAME_LENGTH {
        return Err(AppError::validation(
            "Username must be at least 3 characters long",
        ));
    }
    if length > MAX_USERNAME_LENGTH {
        return Err(AppError::validation(
            "Username cannot exceed 50 characters",
        ));
    }
    if !USERNAME_RE.is_match(username) {
        return Err(AppError::validation(
            "Username can only contain letters, numbers, underscores, and hyphens",
        ));
    }

    Ok(())
}

/// Check a password against the account rules.
pub fn validate_password(password: &str) -> AppResult<()> {
    if password.is_empty() {
        return Err(AppError::validation("Password is required"));
    }

    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(AppError::validation(
            "Password must be at least 6 characters long",
        ));
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(AppError::validation(
            "Password cannot exceed 100 characters",
        ));
    }

    Ok(())
}

/// Whether a password and its confirmation agree.
#[must_use]
pub fn passwords_match(password: &str, confirm_password: &str) -> bool {
    password == confirm_password
}

/// Up to two upper-cased leading characters, for avatars.
#[must_use]
pub fn user_initials(username: &str) -> String {
    if username.is_empty() {
        return "??".to_string();
    }
    username.chars().take(2).flat_map(char::to_uppercase).collect()
}

/// The username to show, falling back to "Anonymous".
#[must_use]
pub fn display_username(username: &str) -> &str {
    if username.is_empty() {
        "Anonymous"
    } else {
        username
    }
}
