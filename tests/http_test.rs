use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use axum::{
    Json, Router,
    extract::RawQuery,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use spexcli::reccobeats::ReccoBeats;
use spexcli::spotify::{RetryPolicy, send_with_backoff};
use tokio::net::TcpListener;

// Serves `app` on an ephemeral port and returns its base URL
async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

// Answers the first `failures` requests with `status` and an immediate
// Retry-After, then 201
fn flaky(
    hits: Arc<AtomicUsize>,
    status: StatusCode,
    failures: usize,
) -> impl Fn() -> Response + Clone + Send + Sync + 'static {
    move || {
        if hits.fetch_add(1, Ordering::SeqCst) < failures {
            (status, [("retry-after", "0")]).into_response()
        } else {
            (StatusCode::CREATED, Json(json!({"id": "pl1", "name": "Mix"}))).into_response()
        }
    }
}

#[test]
fn test_retry_policy_statuses() {
    for status in [
        StatusCode::TOO_MANY_REQUESTS,
        StatusCode::BAD_GATEWAY,
        StatusCode::SERVICE_UNAVAILABLE,
    ] {
        assert!(RetryPolicy::Idempotent.retries(status));
    }

    assert!(RetryPolicy::RateLimitOnly.retries(StatusCode::TOO_MANY_REQUESTS));
    assert!(!RetryPolicy::RateLimitOnly.retries(StatusCode::BAD_GATEWAY));
    assert!(!RetryPolicy::RateLimitOnly.retries(StatusCode::SERVICE_UNAVAILABLE));

    assert!(!RetryPolicy::Idempotent.retries(StatusCode::NOT_FOUND));
    assert!(!RetryPolicy::Idempotent.retries(StatusCode::OK));
}

#[tokio::test]
async fn test_write_is_not_resent_after_gateway_error() {
    let hits = Arc::new(AtomicUsize::new(0));
    let respond = flaky(hits.clone(), StatusCode::BAD_GATEWAY, usize::MAX);
    let base = serve(Router::new().route(
        "/users/me/playlists",
        post(move || {
            let response = respond();
            async move { response }
        }),
    ))
    .await;
    let client = reqwest::Client::new();

    let result = send_with_backoff(RetryPolicy::RateLimitOnly, || {
        client
            .post(format!("{}/users/me/playlists", base))
            .json(&json!({"name": "Mix"}))
    })
    .await;

    let err = result.unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::BAD_GATEWAY));
    // The playlist request reached the server exactly once
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_write_is_resent_after_rate_limit() {
    let hits = Arc::new(AtomicUsize::new(0));
    let respond = flaky(hits.clone(), StatusCode::TOO_MANY_REQUESTS, 1);
    let base = serve(Router::new().route(
        "/users/me/playlists",
        post(move || {
            let response = respond();
            async move { response }
        }),
    ))
    .await;
    let client = reqwest::Client::new();

    let response = send_with_backoff(RetryPolicy::RateLimitOnly, || {
        client.post(format!("{}/users/me/playlists", base))
    })
    .await
    .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_read_is_resent_after_gateway_error() {
    let hits = Arc::new(AtomicUsize::new(0));
    let respond = flaky(hits.clone(), StatusCode::SERVICE_UNAVAILABLE, 2);
    let base = serve(Router::new().route(
        "/me/tracks",
        get(move || {
            let response = respond();
            async move { response }
        }),
    ))
    .await;
    let client = reqwest::Client::new();

    let response = send_with_backoff(RetryPolicy::Idempotent, || {
        client.get(format!("{}/me/tracks", base))
    })
    .await
    .unwrap();

    assert!(response.status().is_success());
    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_audio_features_request_repeats_ids() {
    let seen_query: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
    let recorder = seen_query.clone();
    let base = serve(Router::new().route(
        "/audio-features",
        get(move |RawQuery(query): RawQuery| {
            let recorder = recorder.clone();
            async move {
                *recorder.lock().unwrap() = query;
                // "b" has no analysis and is left out
                Json(json!({
                    "content": [
                        {"id": "rb-c", "href": "https://api.reccobeats.com/v1/track/c", "tempo": 140.0},
                        {"id": "rb-a", "href": "https://api.reccobeats.com/v1/track/a", "tempo": 100.0}
                    ]
                }))
            }
        }),
    ))
    .await;
    let client = ReccoBeats::new(base);
    let ids: Vec<String> = ["a", "b", "c"].map(String::from).to_vec();

    let features = client.get_audio_features(&ids).await.unwrap();

    assert_eq!(
        seen_query.lock().unwrap().as_deref(),
        Some("ids=a&ids=b&ids=c")
    );
    let tempos: Vec<Option<f64>> = features.iter().map(|f| f.tempo).collect();
    assert_eq!(tempos, vec![Some(100.0), None, Some(140.0)]);
}
