//! Command handlers. Output is plain text on stdout.

use cinerate_client::models::{FollowedUser, Movie, Rating, RatingRequest, RatingWithUser};
use cinerate_common::{AppError, AppResult};
use cinerate_core::{
    AppContext, ProfileUpdate, UserProfileStats, filter_by_min_rating, format_duration,
    format_rating_date, sort_by_rating, sort_by_year, sort_users_by_username,
};

use crate::cli::{Command, SortOrder};

/// Run one command against `ctx`.
pub async fn run(ctx: &AppContext, command: Command) -> AppResult<()> {
    match command {
        Command::Register { username, password } => {
            let user = ctx.register(&username, &password).await?;
            println!("Registered and logged in as {} (#{})", user.username, user.id);
        }
        Command::Login { username, password } => {
            let user = ctx.login(&username, &password).await?;
            println!("Logged in as {} (#{})", user.username, user.id);
        }
        Command::Logout => {
            ctx.logout().await?;
            println!("Logged out");
        }
        Command::Whoami => {
            let user = ctx.current_user()?;
            println!("{} (#{})", user.username, user.id);
        }
        Command::UpdateProfile {
            username,
            password,
            confirm_password,
        } => {
            let user = ctx
                .update_profile(ProfileUpdate {
                    username,
                    current_username: None,
                    password,
                    confirm_password,
                })
                .await?;
            println!("Profile updated: {}", user.username);
        }
        Command::DeleteAccount { yes } => {
            if !yes {
                return Err(AppError::validation(
                    "Refusing to delete the account without --yes",
                ));
            }
            ctx.delete_account().await?;
            println!("Account deleted");
        }
        Command::Movies {
            genre,
            year,
            search,
            sort,
            min_rating,
        } => {
            let movies = match (genre, year, search) {
                (_, _, Some(query)) => ctx.movies.search_by_name(&query).await?,
                (Some(genre), _, _) => ctx.movies.movies_by_genre_with_ratings(&genre).await?,
                (None, Some(year), None) => ctx.movies.movies_by_year_with_ratings(year).await?,
                (None, None, None) => ctx.movies.movies_with_ratings().await?,
            };
            let movies = arrange_movies(movies, sort, min_rating);
            if movies.is_empty() {
                println!("No movies found");
            }
            for movie in &movies {
                println!("{}", movie_line(movie));
            }
        }
        Command::Movie { id } => {
            let movie = ctx.movies.movie_with_ratings(id).await?;
            println!("{}", movie_line(&movie));
            if !movie.description.is_empty() {
                println!("\n{}", movie.description);
            }
        }
        Command::Rate {
            movie,
            stars,
            comment,
        } => {
            let user = ctx.current_user()?;
            let rating = ctx
                .ratings
                .submit(&RatingRequest {
                    user_id: user.id,
                    movie_id: movie,
                    rating: stars,
                    comment,
                })
                .await?;
            println!(
                "Rated movie #{} with {} (rating #{})",
                movie,
                stars_text(rating.rating),
                rating.id
            );
        }
        Command::Unrate { rating_id } => {
            ctx.current_user()?;
            ctx.ratings.remove(rating_id).await?;
            println!("Rating #{rating_id} deleted");
        }
        Command::Ratings { movie: Some(movie) } => {
            let response = ctx.ratings.movie_ratings_with_stats(movie).await?;
            println!(
                "Average {:.1} from {} ratings",
                response.average_rating.unwrap_or(0.0),
                response.total_ratings.unwrap_or(0)
            );
            for rating in &response.ratings {
                println!("{}", movie_rating_line(rating));
            }
        }
        Command::Ratings { movie: None } => {
            let user = ctx.current_user()?;
            let ratings = ctx.ratings.user_rating_history(user.id).await?;
            if ratings.is_empty() {
                println!("No ratings yet");
            }
            for rating in &ratings {
                println!("{}", rating_line(rating));
            }
        }
        Command::Profile => {
            let user = ctx.current_user()?;
            let stats = ctx.ratings.profile_stats(user.id).await?;
            print!("{}", profile_text(&user.username, &stats));
        }
        Command::Follow { user_id } => {
            let user = ctx.current_user()?;
            ctx.follows.follow(user.id, user_id).await?;
            println!("Now following #{user_id}");
        }
        Command::Unfollow { user_id } => {
            let user = ctx.current_user()?;
            let following = ctx.follows.unfollow_and_refresh(user.id, user_id).await?;
            println!("Unfollowed #{user_id}; following {} users", following.len());
        }
        Command::ToggleFollow { user_id } => {
            let user = ctx.current_user()?;
            if ctx.follows.toggle_follow(user.id, user_id).await? {
                println!("Now following #{user_id}");
            } else {
                println!("No longer following #{user_id}");
            }
        }
        Command::Following => {
            let user = ctx.current_user()?;
            let following = sort_users_by_username(ctx.follows.following_list(user.id).await?);
            if following.is_empty() {
                println!("Not following anyone");
            }
            for followed in &following {
                println!("{}", user_line(followed));
            }
        }
        Command::SearchUsers { query } => {
            let user = ctx.current_user()?;
            let following = ctx.follows.following_list(user.id).await?;
            let results = ctx
                .follows
                .search_users_to_follow(&query, user.id, &following)
                .await?;
            if results.is_empty() {
                println!("No users found");
            }
            for found in &results {
                println!("{}", user_line(found));
            }
        }
    }

    Ok(())
}

fn arrange_movies(
    movies: Vec<Movie>,
    sort: Option<SortOrder>,
    min_rating: Option<f64>,
) -> Vec<Movie> {
    let movies = match min_rating {
        Some(min) => filter_by_min_rating(movies, min),
        None => movies,
    };
    match sort {
        Some(SortOrder::Rating) => sort_by_rating(movies),
        Some(SortOrder::Year) => sort_by_year(movies),
        None => movies,
    }
}

fn stars_text(stars: u8) -> String {
    format!("{}{}", "★".repeat(stars.into()), "☆".repeat(5_usize.saturating_sub(stars.into())))
}

fn movie_line(movie: &Movie) -> String {
    let mut line = format!(
        "#{} {} ({}, {})",
        movie.id,
        movie.name,
        movie.release_year,
        format_duration(movie.duration_minutes)
    );
    if let Some(average) = movie.average_rating {
        line.push_str(&format!(
            " {average:.1}/5 from {} ratings",
            movie.total_ratings.unwrap_or(0)
        ));
    }
    if !movie.genres.is_empty() {
        line.push_str(&format!(" [{}]", movie.genres.join(", ")));
    }
    line
}

fn rating_line(rating: &Rating) -> String {
    let mut line = format!(
        "#{} movie #{} {} {}",
        rating.id,
        rating.movie_id,
        stars_text(rating.rating),
        format_rating_date(rating.created_at)
    );
    if let Some(comment) = rating.comment.as_deref().filter(|_| rating.has_comment()) {
        line.push_str(&format!(" \"{comment}\""));
    }
    line
}

fn movie_rating_line(rating: &RatingWithUser) -> String {
    let mut line = format!(
        "{} {} {}",
        cinerate_core::display_username(&rating.user_name),
        stars_text(rating.rating.rating),
        format_rating_date(rating.rating.created_at)
    );
    if let Some(comment) = rating
        .rating
        .comment
        .as_deref()
        .filter(|_| rating.rating.has_comment())
    {
        line.push_str(&format!(" \"{comment}\""));
    }
    line
}

fn user_line(user: &FollowedUser) -> String {
    format!(
        "[{}] {} (#{})",
        cinerate_core::user_initials(&user.username),
        user.username,
        user.id
    )
}

fn profile_text(username: &str, stats: &UserProfileStats) -> String {
    let mut text = format!(
        "{username}\n  Reviews: {}\n  Average rating: {:.1}\n  Following: {}\n",
        stats.reviews_count, stats.average_rating, stats.following_count
    );

    if !stats.favorite_movies.is_empty() {
        text.push_str("Favorites:\n");
        for rating in &stats.favorite_movies {
            text.push_str(&format!("  {}\n", rating_line(rating)));
        }
    }
    if !stats.recent_reviews.is_empty() {
        text.push_str("Recent reviews:\n");
        for rating in &stats.recent_reviews {
            text.push_str(&format!("  {}\n", rating_line(rating)));
        }
    }
    text
}
