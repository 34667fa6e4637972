//! Core business logic for cinerate.
//!
//! Services validate input before any request is issued and shape backend
//! responses for front ends. [`AppContext`] wires them to a backend and a
//! persisted [`SessionStore`].

pub mod context;
pub mod services;
pub mod session;

pub use context::AppContext;
pub use services::*;
pub use session::{Session, SessionStore};
