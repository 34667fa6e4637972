//! HTTP request transport.
//!
//! Every repository call goes through [`ApiClient::request`], which joins
//! the endpoint onto the configured base URL, applies the JSON content type,
//! and normalizes the response body:
//!
//! - non-2xx status: [`AppError::Api`] with the status and raw body text
//! - empty success body: `{}`
//! - JSON success body: the parsed value
//! - any other success body: `{"message": <text>}`

use std::sync::Arc;

use cinerate_common::{AppError, AppResult, config::ApiConfig};
use reqwest::Method;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::{debug, warn};

/// A fully-resolved outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Header pairs in send order.
    pub headers: Vec<(String, String)>,
    /// Serialized JSON body.
    pub body: Option<String>,
}

impl HttpRequest {
    /// Value of the first header named `name` (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and raw body text of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw body text; empty when the response had none.
    pub body: String,
}

impl HttpResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// The wire. Implementations send one request and return the status and
/// body text; they never interpret either.
#[async_trait::async_trait]
pub trait HttpBackend: Send + Sync {
    /// Send `request` and read the whole body as text.
    async fn send(&self, request: HttpRequest) -> AppResult<HttpResponse>;
}

/// Production backend on top of `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestBackend {
    client: reqwest::Client,
}

impl ReqwestBackend {
    /// Create a backend with a default `reqwest` client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend around an existing `reqwest` client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl HttpBackend for ReqwestBackend {
    async fn send(&self, request: HttpRequest) -> AppResult<HttpResponse> {
        let mut builder = self.client.request(request.method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }
}

/// Per-call request options.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Defaults to `GET`.
    pub method: Method,
    /// Extra headers merged over `Content-Type: application/json`.
    pub headers: Vec<(String, String)>,
    /// JSON body, if any.
    pub body: Option<String>,
}

impl RequestOptions {
    /// A `GET` with no body.
    #[must_use]
    pub fn get() -> Self {
        Self::default()
    }

    /// A request with the given method and no body.
    #[must_use]
    pub fn method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Serialize `body` as the JSON request body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> AppResult<Self> {
        self.body = Some(serde_json::to_string(body)?);
        Ok(self)
    }

    /// Add a header. Caller headers win over the defaults.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Normalize a success body into a JSON value.
#[must_use]
pub fn normalize_body(text: &str) -> Value {
    if text.is_empty() {
        return json!({});
    }
    serde_json::from_str(text).unwrap_or_else(|_| json!({ "message": text }))
}

/// Client for the backend REST API.
#[derive(Clone)]
pub struct ApiClient {
    backend: Arc<dyn HttpBackend>,
    base_url: Arc<str>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client over an arbitrary backend.
    pub fn new(base_url: impl Into<String>, backend: Arc<dyn HttpBackend>) -> Self {
        Self {
            backend,
            base_url: base_url.into().trim_end_matches('/').into(),
        }
    }

    /// Create a `reqwest`-backed client from configuration.
    #[must_use]
    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.base_url.clone(), Arc::new(ReqwestBackend::new()))
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for `endpoint`.
    #[must_use]
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Issue a request and return the normalized body.
    pub async fn request_value(&self, endpoint: &str, options: RequestOptions) -> AppResult<Value> {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        for (name, value) in options.headers {
            match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
                Some(existing) => *existing = (name, value),
                None => headers.push((name, value)),
            }
        }

        let request = HttpRequest {
            method: options.method,
            url: self.url(endpoint),
            headers,
            body: options.body,
        };

        debug!(method = %request.method, endpoint, "Sending API request");
        let method = request.method.clone();
        let response = self.backend.send(request).await?;

        if !response.is_success() {
            warn!(
                %method,
                endpoint,
                status = response.status,
                "API request failed"
            );
            return Err(AppError::Api {
                status: response.status,
                body: response.body,
            });
        }

        Ok(normalize_body(&response.body))
    }

    /// Issue a request and decode the normalized body into `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> AppResult<T> {
        let value = self.request_value(endpoint, options).await?;
        serde_json::from_value(value).map_err(|e| AppError::Decode(format!("{endpoint}: {e}")))
    }

    /// `GET endpoint`.
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> AppResult<T> {
        self.request(endpoint, RequestOptions::get()).await
    }

    /// `POST endpoint` with a JSON body.
    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> AppResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(endpoint, RequestOptions::method(Method::POST).json(body)?)
            .await
    }

    /// `POST endpoint` without a body.
    pub async fn post_empty<T: DeserializeOwned>(&self, endpoint: &str) -> AppResult<T> {
        self.request(endpoint, RequestOptions::method(Method::POST))
            .await
    }

    /// `PUT endpoint` with a JSON body.
    pub async fn put<T, B>(&self, endpoint: &str, body: &B) -> AppResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(endpoint, RequestOptions::method(Method::PUT).json(body)?)
            .await
    }

    /// `DELETE endpoint`.
    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> AppResult<T> {
        self.request(endpoint, RequestOptions::method(Method::DELETE))
            .await
    }
}
