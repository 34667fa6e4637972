//! Common utilities and shared types for cinerate.
//!
//! This crate provides foundational components used across all cinerate crates:
//!
//! - **Configuration**: Client settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Storage**: Persisted key/value backends for client state
//!
//! # Example
//!
//! ```no_run
//! use cinerate_common::{AppResult, Config};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     println!("Backend: {}", config.api.base_url);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use storage::{FileStore, KeyValueStore, MemoryStore, SharedStore};
