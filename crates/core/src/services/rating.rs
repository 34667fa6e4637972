//! Rating service.

use chrono::Duration;
use cinerate_client::models::{
    FollowedUser, MovieId, MovieRatingsResponse, Rating, RatingId, RatingRequest, Timestamp,
    UserId,
};
use cinerate_client::repositories::{FollowRepository, RatingRepository};
use cinerate_common::{AppError, AppResult};
use serde::Serialize;
use tracing::{debug, error, info};
use validator::Validate;

/// Number of reviews shown on a profile.
pub const PROFILE_RECENT_REVIEWS: usize = 5;
/// Number of favourite movies shown on a profile.
pub const PROFILE_FAVORITES: usize = 3;

/// Rating service for business logic.
#[derive(Debug, Clone)]
pub struct RatingService {
    rating_repo: RatingRepository,
    follow_repo: FollowRepository,
}

/// Aggregates shown on a user's profile page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileStats {
    /// Newest commented ratings.
    pub recent_reviews: Vec<Rating>,
    /// Ratings with a non-blank comment.
    pub reviews_count: usize,
    /// Mean over all ratings, one decimal.
    pub average_rating: f64,
    /// Highest-rated movies.
    pub favorite_movies: Vec<Rating>,
    /// Number of users followed.
    pub following_count: usize,
}

impl RatingService {
    /// Create a new rating service.
    #[must_use]
    pub const fn new(rating_repo: RatingRepository, follow_repo: FollowRepository) -> Self {
        Self {
            rating_repo,
            follow_repo,
        }
    }

    /// Create or update a rating.
    pub async fn submit(&self, request: &RatingRequest) -> AppResult<Rating> {
        request
            .validate()
            .map_err(|e| AppError::first_field_error(e, &["rating", "comment"]))?;

        info!(
            user_id = request.user_id,
            movie_id = request.movie_id,
            rating = request.rating,
            "Submitting rating"
        );
        self.rating_repo
            .upsert(request)
            .await
            .inspect(|r| info!(rating_id = r.id, "Rating submitted"))
            .inspect_err(|e| {
                error!(error = %e, movie_id = request.movie_id, "Rating submission failed");
            })
    }

    /// A movie's ratings with the backend's aggregate.
    pub async fn movie_ratings_with_stats(
        &self,
        movie_id: MovieId,
    ) -> AppResult<MovieRatingsResponse> {
        debug!(movie_id, "Fetching movie ratings");
        self.rating_repo
            .find_by_movie(movie_id)
            .await
            .inspect_err(|e| error!(error = %e, movie_id, "Failed to fetch movie ratings"))
    }

    /// A user's ratings, newest first.
    pub async fn user_rating_history(&self, user_id: UserId) -> AppResult<Vec<Rating>> {
        debug!(user_id, "Fetching user ratings");
        let mut ratings = self
            .rating_repo
            .find_by_user(user_id)
            .await
            .inspect_err(|e| error!(error = %e, user_id, "Failed to fetch user ratings"))?;
        ratings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(ratings)
    }

    /// A user's rating of one movie, if any.
    pub async fn user_rating_for_movie(
        &self,
        user_id: UserId,
        movie_id: MovieId,
    ) -> AppResult<Option<Rating>> {
        match self
            .rating_repo
            .find_by_user_and_movie(user_id, movie_id)
            .await
        {
            Ok(rating) => Ok(Some(rating)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => {
                error!(error = %e, user_id, movie_id, "Failed to fetch rating");
                Err(e)
            }
        }
    }

    /// Delete a rating.
    pub async fn remove(&self, rating_id: RatingId) -> AppResult<()> {
        info!(rating_id, "Deleting rating");
        self.rating_repo
            .delete(rating_id)
            .await
            .inspect_err(|e| error!(error = %e, rating_id, "Rating deletion failed"))?;
        info!(rating_id, "Rating deleted");
        Ok(())
    }

    /// Profile aggregates. Ratings and follows are fetched concurrently and
    /// either failure fails the whole call.
    pub async fn profile_stats(&self, user_id: UserId) -> AppResult<UserProfileStats> {
        let (ratings, following) = tokio::try_join!(
            self.rating_repo.find_by_user(user_id),
            self.follow_repo.find_following(user_id),
        )
        .inspect_err(|e| error!(error = %e, user_id, "Failed to load profile stats"))?;

        Ok(build_profile_stats(&ratings, &following.following))
    }
}

fn build_profile_stats(ratings: &[Rating], following: &[FollowedUser]) -> UserProfileStats {
    UserProfileStats {
        recent_reviews: recent_reviews(ratings, PROFILE_RECENT_REVIEWS),
        reviews_count: ratings.iter().filter(|r| r.has_comment()).count(),
        average_rating: average_rating(ratings),
        favorite_movies: highest_rated(ratings, PROFILE_FAVORITES),
        following_count: following.len(),
    }
}

/// Whether `value` is a whole number of stars in range.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn is_valid_rating_value(value: f64) -> bool {
    (1.0..=5.0).contains(&value) && value.fract() == 0.0
}

/// Mean star value rounded to one decimal. No ratings gives 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_rating(ratings: &[Rating]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }

    let total: u64 = ratings.iter().map(|r| u64::from(r.rating)).sum();
    let mean = total as f64 / ratings.len() as f64;
    (mean * 10.0).round() / 10.0
}

/// Up to `limit` ratings, highest stars first. Ties keep their order.
#[must_use]
pub fn highest_rated(ratings: &[Rating], limit: usize) -> Vec<Rating> {
    let mut sorted = ratings.to_vec();
    sorted.sort_by(|a, b| b.rating.cmp(&a.rating));
    sorted.truncate(limit);
    sorted
}

/// Up to `limit` ratings with a comment, newest first.
#[must_use]
pub fn recent_reviews(ratings: &[Rating], limit: usize) -> Vec<Rating> {
    let mut reviews: Vec<Rating> = ratings.iter().filter(|r| r.has_comment()).cloned().collect();
    reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    reviews.truncate(limit);
    reviews
}

/// Relative date label for a rating, e.g. `3 days ago`.
#[must_use]
pub fn format_rating_date(created_at: Timestamp) -> String {
    format_rating_date_at(created_at, Timestamp::now())
}

/// [`format_rating_date`] relative to a fixed `now`.
#[must_use]
pub fn format_rating_date_at(created_at: Timestamp, now: Timestamp) -> String {
    // Clock skew can put a fresh rating slightly in the future.
    let days = (now.naive() - created_at.naive())
        .max(Duration::zero())
        .num_days();

    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{days} days ago"),
        7..=29 => format!("{} weeks ago", days / 7),
        30..=364 => format!("{} months ago", days / 30),
        _ => created_at.naive().format("%b %-d, %Y").to_string(),
    }
}
