//! Movies.

use serde::{Deserialize, Serialize};

use super::Timestamp;

/// Movie identifier.
pub type MovieId = i64;

/// A movie. The rating aggregates are not part of the movie resource; they
/// are attached at read time from the movie's ratings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    /// Movie id.
    pub id: MovieId,
    /// Title.
    pub name: String,
    /// Year of release.
    pub release_year: i32,
    /// Synopsis; may be empty.
    #[serde(default)]
    pub description: String,
    /// Running time in minutes.
    #[serde(default)]
    pub duration_minutes: u32,
    /// Genre names, e.g. `Drama`.
    #[serde(default)]
    pub genres: Vec<String>,
    /// Poster image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    /// Mean star value, set once ratings are attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    /// Number of ratings, set once ratings are attached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_ratings: Option<u64>,
    /// When the record was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    /// Last modification, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl Movie {
    /// Attach rating aggregates.
    #[must_use]
    pub fn with_rating_stats(mut self, average_rating: f64, total_ratings: u64) -> Self {
        self.average_rating = Some(average_rating);
        self.total_ratings = Some(total_ratings);
        self
    }

    /// Average rating, treating a missing aggregate as 0.
    #[must_use]
    pub fn average_rating_or_zero(&self) -> f64 {
        self.average_rating.unwrap_or(0.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_from_backend() {
        let movie: Movie = serde_json::from_str(
            r#"{
                "id": 3,
                "name": "Arrival",
                "releaseYear": 2016,
                "description": "Linguist meets heptapods.",
                "durationMinutes": 116,
                "genres": ["Sci-Fi", "Drama"],
                "createdAt": [2024, 1, 2, 3, 4, 5, 0],
                "updatedAt": null
            }"#,
        )
        .unwrap();

        assert_eq!(movie.name, "Arrival");
        assert_eq!(movie.release_year, 2016);
        assert_eq!(movie.genres, vec!["Sci-Fi", "Drama"]);
        assert_eq!(movie.poster_url, None);
        assert_eq!(movie.average_rating, None);
        assert!(movie.created_at.is_some());
        assert!(movie.updated_at.is_none());
        assert_eq!(movie.average_rating_or_zero(), 0.0);
    }

    #[test]
    fn test_with_rating_stats() {
        let movie: Movie =
            serde_json::from_str(r#"{"id":1,"name":"Heat","releaseYear":1995}"#).unwrap();
        let movie = movie.with_rating_stats(4.5, 12);
        assert_eq!(movie.average_rating, Some(4.5));
        assert_eq!(movie.total_ratings, Some(12));
    }
}
