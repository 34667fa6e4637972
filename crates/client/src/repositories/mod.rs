//! Resource repositories.
//!
//! Each repository binds HTTP verbs and paths for one backend resource.
//! Repositories carry no business rules and never swallow errors.

pub mod follow;
pub mod movie;
pub mod rating;
pub mod user;

pub use follow::FollowRepository;
pub use movie::MovieRepository;
pub use rating::RatingRepository;
pub use user::{PLACEHOLDER_TOKEN, UserRepository};
