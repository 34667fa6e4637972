//! Movie service.

use std::cmp::Ordering;

use cinerate_client::models::{Movie, MovieId};
use cinerate_client::repositories::{MovieRepository, RatingRepository};
use cinerate_common::AppResult;
use futures::future::join_all;
use tracing::{debug, error, warn};

/// Movie service for catalogue reads and rating enrichment.
#[derive(Debug, Clone)]
pub struct MovieService {
    movie_repo: MovieRepository,
    rating_repo: RatingRepository,
}

impl MovieService {
    /// Create a new movie service.
    #[must_use]
    pub const fn new(movie_repo: MovieRepository, rating_repo: RatingRepository) -> Self {
        Self {
            movie_repo,
            rating_repo,
        }
    }

    /// Every movie with its rating aggregate attached.
    pub async fn movies_with_ratings(&self) -> AppResult<Vec<Movie>> {
        debug!("Fetching all movies with ratings");
        let movies = self
            .movie_repo
            .find_all()
            .await
            .inspect_err(|e| error!(error = %e, "Failed to list movies"))?;
        Ok(self.attach_ratings(movies).await)
    }

    /// Movies tagged with `genre`, with rating aggregates attached.
    pub async fn movies_by_genre_with_ratings(&self, genre: &str) -> AppResult<Vec<Movie>> {
        debug!(genre, "Fetching movies by genre with ratings");
        let movies = self
            .movie_repo
            .find_by_genre(genre)
            .await
            .inspect_err(|e| error!(error = %e, genre, "Failed to list movies by genre"))?;
        Ok(self.attach_ratings(movies).await)
    }

    /// Movies released in `year`, with rating aggregates attached.
    pub async fn movies_by_year_with_ratings(&self, year: i32) -> AppResult<Vec<Movie>> {
        debug!(year, "Fetching movies by year with ratings");
        let movies = self
            .movie_repo
            .find_by_year(year)
            .await
            .inspect_err(|e| error!(error = %e, year, "Failed to list movies by year"))?;
        Ok(self.attach_ratings(movies).await)
    }

    /// One movie with its rating aggregate. Any failure fails the call.
    pub async fn movie_with_ratings(&self, id: MovieId) -> AppResult<Movie> {
        let movie = self.movie_repo.find_by_id(id).await?;
        let ratings = self
            .rating_repo
            .find_by_movie(id)
            .await
            .inspect_err(|e| error!(error = %e, movie_id = id, "Failed to fetch movie ratings"))?;

        Ok(movie.with_rating_stats(
            ratings.average_rating.unwrap_or(0.0),
            ratings.total_ratings.unwrap_or(0),
        ))
    }

    /// Search movies by name. A blank query matches nothing.
    pub async fn search_by_name(&self, query: &str) -> AppResult<Vec<Movie>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        debug!(query, "Searching movies");
        self.movie_repo
            .search_by_name(query)
            .await
            .inspect_err(|e| error!(error = %e, query, "Movie search failed"))
    }

    /// Fetch every movie's aggregate concurrently. A failed fetch only
    /// zeroes that movie's aggregate.
    async fn attach_ratings(&self, movies: Vec<Movie>) -> Vec<Movie> {
        join_all(movies.into_iter().map(|movie| async move {
            match self.rating_repo.find_by_movie(movie.id).await {
                Ok(ratings) => movie.with_rating_stats(
                    ratings.average_rating.unwrap_or(0.0),
                    ratings.total_ratings.unwrap_or(0),
                ),
                Err(e) => {
                    warn!(error = %e, movie_id = movie.id, "Failed to get ratings for movie");
                    movie.with_rating_stats(0.0, 0)
                }
            }
        }))
        .await
    }
}

/// Sort by average rating, highest first. A missing aggregate counts as 0.
#[must_use]
pub fn sort_by_rating(mut movies: Vec<Movie>) -> Vec<Movie> {
    movies.sort_by(|a, b| {
        b.average_rating_or_zero()
            .partial_cmp(&a.average_rating_or_zero())
            .unwrap_or(Ordering::Equal)
    });
    movies
}

/// Sort by release year, newest first.
#[must_use]
pub fn sort_by_year(mut movies: Vec<Movie>) -> Vec<Movie> {
    movies.sort_by(|a, b| b.release_year.cmp(&a.release_year));
    movies
}

/// Keep movies whose average rating is at least `min_rating`.
#[must_use]
pub fn filter_by_min_rating(movies: Vec<Movie>, min_rating: f64) -> Vec<Movie> {
    movies
        .into_iter()
        .filter(|m| m.average_rating_or_zero() >= min_rating)
        .collect()
}

/// Render a running time such as `2h 5m`.
#[must_use]
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;

    match (hours, mins) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}
