//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Rate movies and follow other reviewers.
#[derive(Parser, Debug)]
#[command(name = "cinerate", version, about = "Movie rating client")]
pub struct Cli {
    /// Path to a config file (default: config/default.toml plus environment).
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// What to do.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Create an account and log in.
    Register {
        username: String,
        #[arg(long, env = "CINERATE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log in.
    Login {
        username: String,
        #[arg(long, env = "CINERATE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log out and forget the stored session.
    Logout,

    /// Show the logged-in user.
    Whoami,

    /// Change username and/or password.
    #[command(name = "update-profile")]
    UpdateProfile {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long = "confirm-password")]
        confirm_password: Option<String>,
    },

    /// Delete the logged-in account.
    #[command(name = "delete-account")]
    DeleteAccount {
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },

    /// List movies with their ratings.
    Movies {
        /// Only movies tagged with this genre.
        #[arg(long, conflicts_with_all = ["year", "search"])]
        genre: Option<String>,
        /// Only movies released this year.
        #[arg(long, conflicts_with = "search")]
        year: Option<i32>,
        /// Search by name (results carry no ratings).
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum)]
        sort: Option<SortOrder>,
        /// Hide movies rated below this.
        #[arg(long = "min-rating")]
        min_rating: Option<f64>,
    },

    /// Show one movie.
    Movie { id: i64 },

    /// Rate a movie from 1 to 5 stars.
    Rate {
        movie: i64,
        stars: i32,
        #[arg(long)]
        comment: Option<String>,
    },

    /// Delete one of your ratings.
    Unrate {
        #[arg(value_name = "RATING_ID")]
        rating_id: i64,
    },

    /// Your rating history, or a movie's ratings with --movie.
    Ratings {
        #[arg(long)]
        movie: Option<i64>,
    },

    /// Profile summary.
    Profile,

    /// Follow a user.
    Follow { user_id: i64 },

    /// Stop following a user.
    Unfollow { user_id: i64 },

    /// Follow or unfollow a user, whichever applies.
    #[command(name = "toggle-follow")]
    ToggleFollow { user_id: i64 },

    /// Users you follow.
    Following,

    /// Find users to follow.
    #[command(name = "search-users")]
    SearchUsers { query: String },
}

/// Ordering for `movies --sort`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    /// Highest average rating first.
    Rating,
    /// Newest release first.
    Year,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_movies_filters() {
        let cli = Cli::try_parse_from([
            "cinerate",
            "movies",
            "--genre",
            "Drama",
            "--sort",
            "rating",
            "--min-rating",
            "3.5",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Command::Movies {
                genre: Some("Drama".to_string()),
                year: None,
                search: None,
                sort: Some(SortOrder::Rating),
                min_rating: Some(3.5),
            }
        );
    }

    #[test]
    fn test_genre_and_year_conflict() {
        assert!(
            Cli::try_parse_from(["cinerate", "movies", "--genre", "Drama", "--year", "1999"])
                .is_err()
        );
    }

    #[test]
    fn test_parse_rate_with_global_config() {
        let cli = Cli::try_parse_from([
            "cinerate",
            "rate",
            "3",
            "5",
            "--comment",
            "Loved it",
            "--config",
            "local.toml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("local.toml")));
        assert_eq!(
            cli.command,
            Command::Rate {
                movie: 3,
                stars: 5,
                comment: Some("Loved it".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_login_password_flag() {
        let cli =
            Cli::try_parse_from(["cinerate", "login", "alice", "--password", "secret1"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Login {
                username: "alice".to_string(),
                password: "secret1".to_string(),
            }
        );
    }
}
