//! Application wiring.

use std::sync::Arc;

use cinerate_client::models::{RegisterResponse, User};
use cinerate_client::repositories::{
    FollowRepository, MovieRepository, RatingRepository, UserRepository,
};
use cinerate_client::{ApiClient, HttpBackend};
use cinerate_common::{AppResult, Config, FileStore, SharedStore};
use tracing::info;

use crate::services::{FollowService, MovieService, ProfileUpdate, RatingService, UserService};
use crate::session::SessionStore;

/// Services and session state for one front end.
#[derive(Debug)]
pub struct AppContext {
    /// Accounts and authentication.
    pub users: UserService,
    /// Movie catalogue with ratings.
    pub movies: MovieService,
    /// Ratings and profile stats.
    pub ratings: RatingService,
    /// Follow graph.
    pub follows: FollowService,
    /// Logged-in user and token.
    pub session: SessionStore,
    client: ApiClient,
}

impl AppContext {
    /// Build from configuration and restore any persisted session.
    pub async fn init(config: &Config) -> AppResult<Self> {
        let client = ApiClient::from_config(&config.api);
        let storage: SharedStore = Arc::new(FileStore::new(config.session.dir.clone()));
        Self::build(client, storage).await
    }

    /// Build on a custom HTTP backend and storage.
    pub async fn with_backend(
        base_url: &str,
        backend: Arc<dyn HttpBackend>,
        storage: SharedStore,
    ) -> AppResult<Self> {
        Self::build(ApiClient::new(base_url, backend), storage).await
    }

    async fn build(client: ApiClient, storage: SharedStore) -> AppResult<Self> {
        let user_repo = UserRepository::new(client.clone());
        let movie_repo = MovieRepository::new(client.clone());
        let rating_repo = RatingRepository::new(client.clone());
        let follow_repo = FollowRepository::new(client.clone());

        let session = SessionStore::load(storage).await?;

        Ok(Self {
            users: UserService::new(user_repo),
            movies: MovieService::new(movie_repo, rating_repo.clone()),
            ratings: RatingService::new(rating_repo, follow_repo.clone()),
            follows: FollowService::new(follow_repo),
            session,
            client,
        })
    }

    /// The API client every service talks through.
    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    /// The logged-in user, or `Unauthorized`.
    pub fn current_user(&self) -> AppResult<User> {
        self.session.require_user()
    }

    /// Log in and start a session.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<User> {
        let auth = self.users.login(username, password).await?;
        self.session.login(auth.token, auth.user.clone()).await?;
        Ok(auth.user)
    }

    /// Register and start a session.
    ///
    /// When the backend does not hand out a session on registration, the
    /// same credentials are used to log in.
    pub async fn register(&self, username: &str, password: &str) -> AppResult<User> {
        match self.users.register(username, password).await? {
            RegisterResponse::Authenticated(auth) => {
                self.session.login(auth.token, auth.user.clone()).await?;
                Ok(auth.user)
            }
            RegisterResponse::Registered(_) | RegisterResponse::Acknowledged(_) => {
                info!(username, "Registered without a session, logging in");
                self.login(username, password).await
            }
        }
    }

    /// Apply profile changes for the logged-in user and refresh the session.
    pub async fn update_profile(&self, mut update: ProfileUpdate) -> AppResult<User> {
        let user = self.current_user()?;
        if update.current_username.is_none() {
            update.current_username = Some(user.username.clone());
        }

        let response = self.users.update_profile(user.id, &update).await?;

        let username = response
            .username
            .or(update.username)
            .filter(|u| !u.is_empty())
            .unwrap_or(user.username);
        let updated = User {
            id: user.id,
            username,
        };
        self.session.update_user(updated.clone()).await?;
        Ok(updated)
    }

    /// End the session.
    pub async fn logout(&self) -> AppResult<()> {
        self.session.logout().await
    }

    /// Delete the logged-in account, then end the session.
    pub async fn delete_account(&self) -> AppResult<()> {
        let user = self.current_user()?;
        self.users.delete_account(user.id).await?;
        self.logout().await
    }
}
