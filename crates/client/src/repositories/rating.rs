//! Rating repository.

use cinerate_common::AppResult;

use crate::models::{
    MessageResponse, MovieId, MovieRatingsResponse, Rating, RatingId, RatingRequest, UserId,
};
use crate::transport::ApiClient;

/// Rating repository.
#[derive(Debug, Clone)]
pub struct RatingRepository {
    client: ApiClient,
}

impl RatingRepository {
    /// Create a new rating repository.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Create or update the rating for `(user_id, movie_id)`.
    pub async fn upsert(&self, request: &RatingRequest) -> AppResult<Rating> {
        self.client.post("/api/ratings", request).await
    }

    /// All ratings by a user.
    pub async fn find_by_user(&self, user_id: UserId) -> AppResult<Vec<Rating>> {
        self.client
            .get(&format!("/api/ratings/user/{user_id}"))
            .await
    }

    /// All ratings of a movie plus the aggregate.
    pub async fn find_by_movie(&self, movie_id: MovieId) -> AppResult<MovieRatingsResponse> {
        self.client
            .get(&format!("/api/ratings/movie/{movie_id}"))
            .await
    }

    /// A user's rating of one movie.
    pub async fn find_by_user_and_movie(
        &self,
        user_id: UserId,
        movie_id: MovieId,
    ) -> AppResult<Rating> {
        self.client
            .get(&format!("/api/ratings/user/{user_id}/movie/{movie_id}"))
            .await
    }

    /// Delete a rating.
    pub async fn delete(&self, rating_id: RatingId) -> AppResult<MessageResponse> {
        self.client
            .delete(&format!("/api/ratings/{rating_id}"))
            .await
    }
}
