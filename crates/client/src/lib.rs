//! REST client layer for cinerate.
//!
//! - [`transport`]: the request wrapper every call funnels through
//! - [`models`]: wire types exchanged with the backend
//! - [`repositories`]: one typed binding per backend resource

pub mod models;
pub mod repositories;
pub mod transport;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use reqwest::Method;
pub use transport::{
    ApiClient, HttpBackend, HttpRequest, HttpResponse, ReqwestBackend, RequestOptions,
    normalize_body,
};
