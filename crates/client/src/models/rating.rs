//! Ratings and reviews.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{MovieId, Timestamp, UserId};

/// Rating identifier.
pub type RatingId = i64;

/// Lowest accepted star value.
pub const MIN_RATING: i32 = 1;
/// Highest accepted star value.
pub const MAX_RATING: i32 = 5;
/// Longest accepted review comment, in characters.
pub const MAX_COMMENT_LENGTH: usize = 1000;

/// One user's rating of one movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    /// Rating id.
    pub id: RatingId,
    /// Author.
    pub user_id: UserId,
    /// Rated movie.
    pub movie_id: MovieId,
    /// Stars, 1 to 5.
    pub rating: u8,
    /// Review text. Blank comments do not count as reviews.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// When the record was created.
    pub created_at: Timestamp,
    /// Last modification, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl Rating {
    /// Whether the rating carries a non-blank review comment.
    #[must_use]
    pub fn has_comment(&self) -> bool {
        self.comment.as_deref().is_some_and(|c| !c.trim().is_empty())
    }
}

/// A rating annotated with its author's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingWithUser {
    /// The rating itself.
    #[serde(flatten)]
    pub rating: Rating,
    /// Author's username. Empty when the backend omits it.
    #[serde(default)]
    pub user_name: String,
}

/// Body of `GET /api/ratings/movie/{movieId}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRatingsResponse {
    /// Ratings with author names.
    #[serde(default)]
    pub ratings: Vec<RatingWithUser>,
    /// Mean star value; absent when there are no ratings.
    #[serde(default)]
    pub average_rating: Option<f64>,
    /// Number of ratings.
    #[serde(default)]
    pub total_ratings: Option<u64>,
}

/// Body of `POST /api/ratings`. The backend upserts on `(userId, movieId)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RatingRequest {
    /// Rating author.
    pub user_id: UserId,
    /// Rated movie.
    pub movie_id: MovieId,
    /// Stars. Signed so out-of-range input reaches validation.
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    /// At most 1000 characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 1000, message = "Comment cannot exceed 1000 characters"))]
    pub comment: Option<String>,
}
