//! Follow relationships.

use serde::{Deserialize, Serialize};

use super::{Timestamp, UserId};

/// A directed follow edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Follow {
    /// Follow record id.
    pub id: i64,
    /// The user who follows.
    pub user_id: UserId,
    /// The user being followed.
    pub followed_user_id: UserId,
    /// When the record was created.
    pub created_at: Timestamp,
}

/// A user as listed in following lists and follow searches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowedUser {
    /// User id.
    pub id: UserId,
    /// Username.
    pub username: String,
}

/// Body of `GET /api/follows/{userId}/following`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowingResponse {
    /// Users followed, in backend order.
    #[serde(default)]
    pub following: Vec<FollowedUser>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_edge_from_backend() {
        let follow: Follow = serde_json::from_str(
            r#"{"id":7,"userId":1,"followedUserId":2,"createdAt":[2024,5,1,12,0,0]}"#,
        )
        .unwrap();
        assert_eq!(follow.user_id, 1);
        assert_eq!(follow.followed_user_id, 2);
    }

    #[test]
    fn test_following_response_tolerates_missing_list() {
        let response: FollowingResponse = serde_json::from_str("{}").unwrap();
        assert!(response.following.is_empty());
    }
}
