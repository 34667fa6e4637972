//! Movie repository.

use cinerate_common::AppResult;
use urlencoding::encode;

use crate::models::{Movie, MovieId};
use crate::transport::ApiClient;

/// Movie repository for the read-only catalogue.
#[derive(Debug, Clone)]
pub struct MovieRepository {
    client: ApiClient,
}

impl MovieRepository {
    /// Create a new movie repository.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List every movie.
    pub async fn find_all(&self) -> AppResult<Vec<Movie>> {
        tracing::debug!("Fetching all movies");
        self.client.get("/api/movies").await
    }

    /// Get a movie by id.
    pub async fn find_by_id(&self, id: MovieId) -> AppResult<Movie> {
        tracing::debug!(movie_id = id, "Fetching movie");
        self.client.get(&format!("/api/movies/{id}")).await
    }

    /// Search movies whose name contains `query`.
    pub async fn search_by_name(&self, query: &str) -> AppResult<Vec<Movie>> {
        tracing::debug!(query, "Searching movies");
        self.client
            .get(&format!("/api/movies/search?name={}", encode(query)))
            .await
    }

    /// Movies released in `year`.
    pub async fn find_by_year(&self, year: i32) -> AppResult<Vec<Movie>> {
        self.client.get(&format!("/api/movies/year/{year}")).await
    }

    /// Movies tagged with `genre`.
    pub async fn find_by_genre(&self, genre: &str) -> AppResult<Vec<Movie>> {
        self.client
            .get(&format!("/api/movies/genre/{}", encode(genre)))
            .await
    }
}
