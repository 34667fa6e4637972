//! End-to-end flows through [`AppContext`] with a file-backed session.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use cinerate_client::{HttpBackend, Method};
use cinerate_client::models::RatingRequest;
use cinerate_client::test_utils::{MOCK_BASE_URL, MockBackend};
use cinerate_common::{FileStore, SharedStore};
use cinerate_core::AppContext;
use serde_json::json;

fn backend() -> Arc<MockBackend> {
    Arc::new(
        MockBackend::new()
            .with_json(
                Method::POST,
                "/api/auth/login",
                json!({ "message": "Login successful", "username": "alice", "token": "jwt-1" }),
            )
            .with_json(
                Method::GET,
                "/api/auth/users/username/alice",
                json!({ "id": 1, "username": "alice" }),
            )
            .with_json(
                Method::POST,
                "/api/ratings",
                json!({
                    "id": 10, "userId": 1, "movieId": 3, "rating": 4,
                    "comment": "Tense", "createdAt": "2024-05-01T09:00:00"
                }),
            )
            .with_json(
                Method::GET,
                "/api/ratings/user/1",
                json!([{
                    "id": 10, "userId": 1, "movieId": 3, "rating": 4,
                    "comment": "Tense", "createdAt": "2024-05-01T09:00:00"
                }]),
            )
            .with_json(
                Method::GET,
                "/api/follows/1/following",
                json!({ "following": [{ "id": 2, "username": "bob" }] }),
            ),
    )
}

async fn open(backend: &Arc<MockBackend>, dir: &std::path::Path) -> AppContext {
    let storage: SharedStore = Arc::new(FileStore::new(dir.to_path_buf()));
    AppContext::with_backend(MOCK_BASE_URL, Arc::clone(backend) as Arc<dyn HttpBackend>, storage)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let backend = backend();

    let first = open(&backend, dir.path()).await;
    assert!(!first.session.is_authenticated());
    first.login("alice", "secret1").await.unwrap();
    drop(first);

    let second = open(&backend, dir.path()).await;
    let user = second.current_user().unwrap();
    assert_eq!(user.id, 1);
    assert_eq!(second.session.token().as_deref(), Some("jwt-1"));

    second.logout().await.unwrap();
    let third = open(&backend, dir.path()).await;
    assert!(!third.session.is_authenticated());
}

#[tokio::test]
async fn test_corrupt_session_file_is_discarded() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("token"), "jwt-1").unwrap();
    std::fs::write(dir.path().join("user"), "{\"id\":").unwrap();

    let ctx = open(&backend(), dir.path()).await;

    assert!(!ctx.session.is_authenticated());
    assert!(!dir.path().join("token").exists());
    assert!(!dir.path().join("user").exists());
}

#[tokio::test]
async fn test_rate_then_view_profile() {
    let dir = tempfile::tempdir().unwrap();
    let backend = backend();
    let ctx = open(&backend, dir.path()).await;
    let user = ctx.login("alice", "secret1").await.unwrap();

    ctx.ratings
        .submit(&RatingRequest {
            user_id: user.id,
            movie_id: 3,
            rating: 4,
            comment: Some("Tense".to_string()),
        })
        .await
        .unwrap();

    let stats = ctx.ratings.profile_stats(user.id).await.unwrap();
    assert_eq!(stats.reviews_count, 1);
    assert_eq!(stats.following_count, 1);
    assert_eq!(stats.favorite_movies.len(), 1);
    assert!((stats.average_rating - 4.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_invalid_rating_never_reaches_backend() {
    let dir = tempfile::tempdir().unwrap();
    let backend = backend();
    let ctx = open(&backend, dir.path()).await;

    let err = ctx
        .ratings
        .submit(&RatingRequest {
            user_id: 1,
            movie_id: 3,
            rating: 9,
            comment: None,
        })
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(backend.call_count(&Method::POST, "/api/ratings"), 0);
}
