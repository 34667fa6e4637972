//! Following service.

use cinerate_client::models::{FollowedUser, MessageResponse, UserId};
use cinerate_client::repositories::FollowRepository;
use cinerate_common::{AppError, AppResult};
use serde::Serialize;
use tracing::{debug, error, info, warn};

/// Following service for business logic.
#[derive(Debug, Clone)]
pub struct FollowService {
    follow_repo: FollowRepository,
}

/// Result of following someone from a search result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRefresh {
    /// The user's following list after the follow.
    pub following: Vec<FollowedUser>,
    /// The previous search results without the newly followed user.
    pub search_results: Vec<FollowedUser>,
}

impl FollowService {
    /// Create a new following service.
    #[must_use]
    pub const fn new(follow_repo: FollowRepository) -> Self {
        Self { follow_repo }
    }

    /// Follow a user.
    pub async fn follow(&self, user_id: UserId, target_id: UserId) -> AppResult<MessageResponse> {
        // Can't follow yourself
        if user_id == target_id {
            return Err(AppError::validation("You cannot follow yourself"));
        }

        info!(user_id, target_id, "Following user");
        self.follow_repo
            .follow(user_id, target_id)
            .await
            .inspect(|_| info!(user_id, target_id, "Followed user"))
            .inspect_err(|e| error!(error = %e, user_id, target_id, "Follow failed"))
    }

    /// Unfollow a user.
    pub async fn unfollow(&self, user_id: UserId, target_id: UserId) -> AppResult<MessageResponse> {
        info!(user_id, target_id, "Unfollowing user");
        self.follow_repo
            .unfollow(user_id, target_id)
            .await
            .inspect(|_| info!(user_id, target_id, "Unfollowed user"))
            .inspect_err(|e| error!(error = %e, user_id, target_id, "Unfollow failed"))
    }

    /// Users followed by `user_id`.
    pub async fn following_list(&self, user_id: UserId) -> AppResult<Vec<FollowedUser>> {
        debug!(user_id, "Fetching following list");
        self.follow_repo
            .find_following(user_id)
            .await
            .map(|r| r.following)
            .inspect_err(|e| error!(error = %e, user_id, "Failed to fetch following list"))
    }

    /// Number of users followed by `user_id`, or 0 if the lookup fails.
    pub async fn following_count(&self, user_id: UserId) -> usize {
        match self.follow_repo.find_following(user_id).await {
            Ok(response) => response.following.len(),
            Err(e) => {
                warn!(error = %e, user_id, "Failed to fetch following count");
                0
            }
        }
    }

    /// Whether `user_id` follows `target_id`. A failed lookup reads as no.
    pub async fn is_following(&self, user_id: UserId, target_id: UserId) -> bool {
        match self.follow_repo.find_following(user_id).await {
            Ok(response) => response.following.iter().any(|u| u.id == target_id),
            Err(e) => {
                warn!(error = %e, user_id, target_id, "Failed to check follow state");
                false
            }
        }
    }

    /// Flip the follow state. Returns whether `user_id` now follows `target_id`.
    pub async fn toggle_follow(&self, user_id: UserId, target_id: UserId) -> AppResult<bool> {
        if self.is_following(user_id, target_id).await {
            self.unfollow(user_id, target_id).await?;
            Ok(false)
        } else {
            self.follow(user_id, target_id).await?;
            Ok(true)
        }
    }

    /// Search for users to follow, leaving out the searcher and anyone they
    /// already follow. A blank query matches nothing.
    pub async fn search_users_to_follow(
        &self,
        query: &str,
        current_user_id: UserId,
        already_following: &[FollowedUser],
    ) -> AppResult<Vec<FollowedUser>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        debug!(query, "Searching users");
        let results = self
            .follow_repo
            .search_users(query)
            .await
            .inspect_err(|e| error!(error = %e, query, "User search failed"))?;

        Ok(results
            .into_iter()
            .filter(|u| {
                u.id != current_user_id && !already_following.iter().any(|f| f.id == u.id)
            })
            .collect())
    }

    /// Follow `target_id`, then reload the following list.
    pub async fn follow_and_refresh(
        &self,
        user_id: UserId,
        target_id: UserId,
        current_results: &[FollowedUser],
    ) -> AppResult<FollowRefresh> {
        self.follow(user_id, target_id).await?;
        let following = self.following_list(user_id).await?;

        Ok(FollowRefresh {
            following,
            search_results: current_results
                .iter()
                .filter(|u| u.id != target_id)
                .cloned()
                .collect(),
        })
    }

    /// Unfollow `target_id`, then reload the following list.
    pub async fn unfollow_and_refresh(
        &self,
        user_id: UserId,
        target_id: UserId,
    ) -> AppResult<Vec<FollowedUser>> {
        self.unfollow(user_id, target_id).await?;
        self.following_list(user_id).await
    }
}

/// Sort users by name, ignoring case.
#[must_use]
pub fn sort_users_by_username(mut users: Vec<FollowedUser>) -> Vec<FollowedUser> {
    users.sort_by_cached_key(|u| u.username.to_lowercase());
    users
}

/// Users whose name contains `query`, ignoring case. A blank query keeps all.
#[must_use]
pub fn filter_users_by_username(users: Vec<FollowedUser>, query: &str) -> Vec<FollowedUser> {
    if query.trim().is_empty() {
        return users;
    }

    let query = query.to_lowercase();
    users
        .into_iter()
        .filter(|u| u.username.to_lowercase().contains(&query))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cinerate_client::Method;
    use cinerate_client::test_utils::MockBackend;
    use serde_json::json;
    use std::sync::Arc;

    fn user(id: UserId, username: &str) -> FollowedUser {
        FollowedUser {
            id,
            username: username.to_string(),
        }
    }

    fn service(backend: &Arc<MockBackend>) -> FollowService {
        FollowService::new(FollowRepository::new(backend.client()))
    }

    #[tokio::test]
    async fn test_cannot_follow_self() {
        let backend = Arc::new(MockBackend::new());
        let err = service(&backend).follow(3, 3).await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(err.to_string(), "You cannot follow yourself");
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_follow_returns_message() {
        let backend = Arc::new(MockBackend::new().with_text(
            Method::POST,
            "/api/follows/1/follow/2",
            200,
            "Successfully followed user",
        ));

        let response = service(&backend).follow(1, 2).await.unwrap();

        assert_eq!(
            response.message.as_deref(),
            Some("Successfully followed user")
        );
        assert_eq!(
            backend.calls(),
            vec![(Method::POST, "/api/follows/1/follow/2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_count_and_state_degrade_on_failure() {
        let backend = Arc::new(MockBackend::new().with_network_error(
            Method::GET,
            "/api/follows/1/following",
        ));
        let svc = service(&backend);

        assert_eq!(svc.following_count(1).await, 0);
        assert!(!svc.is_following(1, 2).await);
        assert!(svc.following_list(1).await.is_err());
    }

    #[tokio::test]
    async fn test_toggle_follow_unfollows_when_following() {
        let backend = Arc::new(
            MockBackend::new()
                .with_json(
                    Method::GET,
                    "/api/follows/1/following",
                    json!({ "following": [{ "id": 2, "username": "bob" }] }),
                )
                .with_text(Method::DELETE, "/api/follows/1/follow/2", 200, "Unfollowed"),
        );

        let now_following = service(&backend).toggle_follow(1, 2).await.unwrap();

        assert!(!now_following);
        assert_eq!(backend.call_count(&Method::DELETE, "/api/follows/1/follow/2"), 1);
        assert_eq!(backend.call_count(&Method::POST, "/api/follows/1/follow/2"), 0);
    }

    #[tokio::test]
    async fn test_toggle_follow_follows_when_not_following() {
        let backend = Arc::new(
            MockBackend::new()
                .with_json(
                    Method::GET,
                    "/api/follows/1/following",
                    json!({ "following": [] }),
                )
                .with_text(Method::POST, "/api/follows/1/follow/2", 200, "Followed"),
        );

        assert!(service(&backend).toggle_follow(1, 2).await.unwrap());
        assert_eq!(backend.call_count(&Method::POST, "/api/follows/1/follow/2"), 1);
    }

    #[tokio::test]
    async fn test_search_filters_self_and_followed() {
        let backend = Arc::new(MockBackend::new().with_json(
            Method::GET,
            "/api/follows/search?username=a",
            json!([
                { "id": 1, "username": "alice" },
                { "id": 2, "username": "adam" },
                { "id": 3, "username": "anna" }
            ]),
        ));

        let results = service(&backend)
            .search_users_to_follow("a", 1, &[user(3, "anna")])
            .await
            .unwrap();

        assert_eq!(results, vec![user(2, "adam")]);
    }

    #[tokio::test]
    async fn test_blank_search_issues_no_request() {
        let backend = Arc::new(MockBackend::new());
        let results = service(&backend)
            .search_users_to_follow(" ", 1, &[])
            .await
            .unwrap();

        assert!(results.is_empty());
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_follow_and_refresh() {
        let backend = Arc::new(
            MockBackend::new()
                .with_text(Method::POST, "/api/follows/1/follow/2", 200, "Followed")
                .with_json(
                    Method::GET,
                    "/api/follows/1/following",
                    json!({ "following": [{ "id": 2, "username": "bob" }] }),
                ),
        );

        let refreshed = service(&backend)
            .follow_and_refresh(1, 2, &[user(2, "bob"), user(4, "dave")])
            .await
            .unwrap();

        assert_eq!(refreshed.following, vec![user(2, "bob")]);
        assert_eq!(refreshed.search_results, vec![user(4, "dave")]);
    }

    #[tokio::test]
    async fn test_unfollow_and_refresh() {
        let backend = Arc::new(
            MockBackend::new()
                .with_status(Method::DELETE, "/api/follows/1/follow/2", 204)
                .with_json(
                    Method::GET,
                    "/api/follows/1/following",
                    json!({ "following": [] }),
                ),
        );

        let following = service(&backend).unfollow_and_refresh(1, 2).await.unwrap();
        assert!(following.is_empty());
        assert_eq!(
            backend.calls(),
            vec![
                (Method::DELETE, "/api/follows/1/follow/2".to_string()),
                (Method::GET, "/api/follows/1/following".to_string()),
            ]
        );
    }

    #[test]
    fn test_sort_and_filter_users() {
        let users = vec![user(1, "charlie"), user(2, "Alice"), user(3, "bob")];

        let sorted: Vec<_> = sort_users_by_username(users.clone())
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(sorted, vec![2, 3, 1]);

        assert_eq!(
            filter_users_by_username(users.clone(), "LI"),
            vec![user(1, "charlie"), user(2, "Alice")]
        );
        assert_eq!(filter_users_by_username(users.clone(), "  ").len(), 3);
        assert!(filter_users_by_username(users, "zed").is_empty());
    }
}
