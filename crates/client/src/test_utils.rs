//! Test utilities for code built on the API client.
//!
//! [`MockBackend`] is a route table keyed by method and path (including the
//! query string). It records every request it receives so tests can assert
//! on exactly which calls were issued.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use cinerate_common::{AppError, AppResult};
use reqwest::Method;
use serde_json::Value;

use crate::transport::{ApiClient, HttpBackend, HttpRequest, HttpResponse};

/// Base URL used by [`MockBackend::client`].
pub const MOCK_BASE_URL: &str = "http://backend.test";

#[derive(Debug, Clone)]
enum MockReply {
    Response(HttpResponse),
    NetworkError(String),
}

/// In-memory HTTP backend for tests.
#[derive(Debug, Default)]
pub struct MockBackend {
    routes: HashMap<(Method, String), MockReply>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockBackend {
    /// Create a backend with no routes. Unknown routes answer 404.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with `200` and `body` serialized as JSON.
    #[must_use]
    pub fn with_json(self, method: Method, path: &str, body: Value) -> Self {
        self.with_text(method, path, 200, body.to_string())
    }

    /// Answer `method path` with `status` and a raw text body.
    #[must_use]
    pub fn with_text(
        mut self,
        method: Method,
        path: &str,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        self.routes.insert(
            (method, path.to_string()),
            MockReply::Response(HttpResponse::new(status, body)),
        );
        self
    }

    /// Answer `method path` with `status` and an empty body.
    #[must_use]
    pub fn with_status(self, method: Method, path: &str, status: u16) -> Self {
        self.with_text(method, path, status, String::new())
    }

    /// Fail `method path` before any response is read.
    #[must_use]
    pub fn with_network_error(mut self, method: Method, path: &str) -> Self {
        self.routes.insert(
            (method, path.to_string()),
            MockReply::NetworkError("connection refused".to_string()),
        );
        self
    }

    /// An [`ApiClient`] pointed at this backend.
    #[must_use]
    pub fn client(self: &Arc<Self>) -> ApiClient {
        ApiClient::new(MOCK_BASE_URL, Arc::clone(self) as Arc<dyn HttpBackend>)
    }

    /// Every request received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// `(method, path)` of every request received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<(Method, String)> {
        self.requests()
            .iter()
            .map(|r| (r.method.clone(), path_of(&r.url)))
            .collect()
    }

    /// Number of requests received for `method path`.
    #[must_use]
    pub fn call_count(&self, method: &Method, path: &str) -> usize {
        self.calls()
            .iter()
            .filter(|(m, p)| m == method && p == path)
            .count()
    }

    /// Body of the last request sent to `method path`, parsed as JSON.
    #[must_use]
    pub fn last_json_body(&self, method: &Method, path: &str) -> Option<Value> {
        self.requests()
            .iter()
            .rev()
            .find(|r| &r.method == method && path_of(&r.url) == path)
            .and_then(|r| r.body.as_deref())
            .and_then(|b| serde_json::from_str(b).ok())
    }
}

/// Path plus query of an absolute URL.
fn path_of(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(parsed) => match parsed.query() {
            Some(q) => format!("{}?{q}", parsed.path()),
            None => parsed.path().to_string(),
        },
        Err(_) => raw.to_string(),
    }
}

#[async_trait::async_trait]
impl HttpBackend for MockBackend {
    async fn send(&self, request: HttpRequest) -> AppResult<HttpResponse> {
        let key = (request.method.clone(), path_of(&request.url));
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        match self.routes.get(&key) {
            Some(MockReply::Response(response)) => Ok(response.clone()),
            Some(MockReply::NetworkError(message)) => Err(AppError::Network(message.clone())),
            None => Ok(HttpResponse::new(
                404,
                format!("no mock route for {} {}", key.0, key.1),
            )),
        }
    }
}
