//! Wire models exchanged with the backend.

pub mod follow;
pub mod movie;
pub mod rating;
pub mod timestamp;
pub mod user;

use serde::{Deserialize, Serialize};

pub use follow::{Follow, FollowedUser, FollowingResponse};
pub use movie::{Movie, MovieId};
pub use rating::{
    MAX_COMMENT_LENGTH, MAX_RATING, MIN_RATING, MovieRatingsResponse, Rating, RatingId,
    RatingRequest, RatingWithUser,
};
pub use timestamp::Timestamp;
pub use user::{
    AuthResponse, Credentials, LoginResponse, RegisterResponse, UpdateUserRequest,
    UpdateUserResponse, User, UserDetails, UserId,
};

/// Acknowledgement returned by mutation endpoints.
///
/// Plain-text and empty bodies normalize to this shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Backend message, if any.
    #[serde(default)]
    pub message: Option<String>,
}
