//! Business logic services.

pub mod following;
pub mod movie;
pub mod rating;
pub mod user;

pub use following::{
    FollowRefresh, FollowService, filter_users_by_username, sort_users_by_username,
};
pub use movie::{
    MovieService, filter_by_min_rating, format_duration, sort_by_rating, sort_by_year,
};
pub use rating::{
    RatingService, UserProfileStats, average_rating, format_rating_date, format_rating_date_at,
    highest_rated, is_valid_rating_value, recent_reviews,
};
pub use user::{
    ProfileUpdate, UserService, display_username, passwords_match, user_initials,
    validate_password, validate_username,
};
