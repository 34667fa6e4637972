//! Follow repository.

use cinerate_common::AppResult;
use urlencoding::encode;

use crate::models::{FollowedUser, FollowingResponse, MessageResponse, UserId};
use crate::transport::ApiClient;

/// Follow repository.
#[derive(Debug, Clone)]
pub struct FollowRepository {
    client: ApiClient,
}

impl FollowRepository {
    /// Create a new follow repository.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Make `user_id` follow `target_id`.
    pub async fn follow(&self, user_id: UserId, target_id: UserId) -> AppResult<MessageResponse> {
        self.client
            .post_empty(&format!("/api/follows/{user_id}/follow/{target_id}"))
            .await
    }

    /// Make `user_id` stop following `target_id`.
    pub async fn unfollow(
        &self,
        user_id: UserId,
        target_id: UserId,
    ) -> AppResult<MessageResponse> {
        self.client
            .delete(&format!("/api/follows/{user_id}/follow/{target_id}"))
            .await
    }

    /// Users followed by `user_id`.
    pub async fn find_following(&self, user_id: UserId) -> AppResult<FollowingResponse> {
        self.client
            .get(&format!("/api/follows/{user_id}/following"))
            .await
    }

    /// Users whose name contains `query`.
    pub async fn search_users(&self, query: &str) -> AppResult<Vec<FollowedUser>> {
        self.client
            .get(&format!("/api/follows/search?username={}", encode(query)))
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::MockBackend;
    use reqwest::Method;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_follow_posts_without_body() {
        let backend = Arc::new(MockBackend::new().with_text(
            Method::POST,
            "/api/follows/1/follow/2",
            200,
            "Successfully followed user",
        ));
        let repo = FollowRepository::new(backend.client());

        let response = repo.follow(1, 2).await.unwrap();

        assert_eq!(
            response.message.as_deref(),
            Some("Successfully followed user")
        );
        let requests = backend.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].body, None);
    }

    #[tokio::test]
    async fn test_unfollow_and_list() {
        let backend = Arc::new(
            MockBackend::new()
                .with_status(Method::DELETE, "/api/follows/1/follow/2", 204)
                .with_json(
                    Method::GET,
                    "/api/follows/1/following",
                    json!({ "following": [{ "id": 3, "username": "carol" }] }),
                )
                .with_json(
                    Method::GET,
                    "/api/follows/search?username=car",
                    json!([{ "id": 3, "username": "carol" }]),
                ),
        );
        let repo = FollowRepository::new(backend.client());

        assert_eq!(repo.unfollow(1, 2).await.unwrap(), MessageResponse::default());
        assert_eq!(repo.find_following(1).await.unwrap().following.len(), 1);
        assert_eq!(repo.search_users("car").await.unwrap()[0].username, "carol");
    }
}
