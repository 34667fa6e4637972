//! Repository tests against a caller-supplied [`HttpBackend`].
//!
//! These exercise the public seam the way an embedding application would:
//! plug in a backend, build repositories on the client, and observe what
//! goes over the wire.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use cinerate_client::models::{Credentials, RatingRequest};
use cinerate_client::repositories::{FollowRepository, MovieRepository, RatingRepository};
use cinerate_client::{ApiClient, HttpBackend, HttpRequest, HttpResponse, Method};
use cinerate_common::{AppError, AppResult};

/// Replies from a fixed script, in order, and records what was sent.
#[derive(Default)]
struct ScriptedBackend {
    replies: Mutex<VecDeque<HttpResponse>>,
    sent: Mutex<Vec<HttpRequest>>,
}

impl ScriptedBackend {
    fn new(replies: impl IntoIterator<Item = (u16, &'static str)>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|(status, body)| HttpResponse::new(status, body))
                    .collect(),
            ),
            sent: Mutex::default(),
        })
    }

    fn sent(&self) -> Vec<HttpRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl HttpBackend for ScriptedBackend {
    async fn send(&self, request: HttpRequest) -> AppResult<HttpResponse> {
        self.sent.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AppError::Network("script exhausted".to_string()))
    }
}

fn client(backend: &Arc<ScriptedBackend>) -> ApiClient {
    ApiClient::new("http://localhost:8080/", Arc::clone(backend) as Arc<dyn HttpBackend>)
}

#[tokio::test]
async fn test_follow_sends_empty_post_and_parses_text() {
    let backend = ScriptedBackend::new([(200, "Successfully followed user")]);
    let repo = FollowRepository::new(client(&backend));

    let response = repo.follow(1, 2).await.unwrap();

    assert_eq!(
        response.message.as_deref(),
        Some("Successfully followed user")
    );
    let sent = backend.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].method, Method::POST);
    assert_eq!(sent[0].url, "http://localhost:8080/api/follows/1/follow/2");
    assert_eq!(sent[0].body, None);
    assert_eq!(sent[0].header("content-type"), Some("application/json"));
}

#[tokio::test]
async fn test_error_status_carries_body_text() {
    let backend = ScriptedBackend::new([(404, "Movie not found")]);
    let repo = MovieRepository::new(client(&backend));

    let err = repo.find_by_id(99).await.unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "API Error: 404 - Movie not found");
}

#[tokio::test]
async fn test_rating_upsert_round_trip() {
    let backend = ScriptedBackend::new([(
        201,
        r#"{"id":7,"userId":1,"movieId":3,"rating":5,"comment":"Classic","createdAt":[2024,5,1,9,30,0]}"#,
    )]);
    let repo = RatingRepository::new(client(&backend));

    let saved = repo
        .upsert(&RatingRequest {
            user_id: 1,
            movie_id: 3,
            rating: 5,
            comment: Some("Classic".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(saved.id, 7);
    assert!(saved.has_comment());
    assert_eq!(
        backend.sent()[0].body.as_deref(),
        Some(r#"{"userId":1,"movieId":3,"rating":5,"comment":"Classic"}"#)
    );
}

#[tokio::test]
async fn test_network_failure_propagates() {
    let backend = ScriptedBackend::new([]);
    let repo = MovieRepository::new(client(&backend));

    let err = repo.find_all().await.unwrap_err();
    assert_eq!(err.error_code(), "NETWORK_ERROR");
}

#[tokio::test]
async fn test_shape_mismatch_is_decode_error() {
    let backend = ScriptedBackend::new([(200, "")]);
    let repo = MovieRepository::new(client(&backend));

    // `{}` is not a movie list.
    let err = repo.find_all().await.unwrap_err();
    assert!(matches!(err, AppError::Decode(_)));
}

#[test]
fn test_credentials_debug_hides_password() {
    let rendered = format!("{:?}", Credentials::new("alice", "hunter22"));
    assert!(rendered.contains("alice"));
    assert!(!rendered.contains("hunter22"));
}
