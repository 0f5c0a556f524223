//! Router-level integration tests
//!
//! Exercise the full request path with a stubbed provider chain: handlers,
//! serialization, caching behavior and the dry-run guarantee of the estimate
//! endpoint.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
};
use tower::ServiceExt;

use application::ports::{
    ArtifactStorePort, Capability, ProviderOutcome, ProviderPayload, ProviderPort,
    ProviderRequest,
};
use application::services::{CostEstimator, FallbackChain, GenerationService, PricingTable};
use infrastructure::MemoryArtifactStore;
use infrastructure::config::GenerationConfig;
use presentation_http::{ApiKeyAuthLayer, routes, state::AppState};

/// Text provider stub that answers titles and shorts prompts and counts calls
struct StubTextProvider {
    calls: Arc<AtomicU32>,
}

#[async_trait]
impl ProviderPort for StubTextProvider {
    fn id(&self) -> &str {
        "stub"
    }

    async fn attempt(&self, request: &ProviderRequest) -> ProviderOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let ProviderRequest::Text { prompt, .. } = request else {
            return ProviderOutcome::failure(
                application::ports::FailureKind::InvalidInput,
                "stub",
                "unexpected request kind",
            );
        };

        let text = if prompt.contains("short-form video segments") {
            "SHORT 1: First Clip\nHOOK: Watch this.\nSCRIPT: Clip body one.\nCAPTION: cap\n\
             HASHTAGS: #one #two\n---\n\
             SHORT 2: Second Clip\nHOOK: And this.\nSCRIPT: Clip body two.\nCAPTION: cap\n\
             HASHTAGS: #three\n---"
                .to_string()
        } else {
            "TITLES:\n1. The Divine Flute\n2. Songs of Peace\n3. A Quiet Mind\n\n\
             THUMBNAILS:\n1. DIVINE CALL\n2. FIND PEACE\n3. BE STILL"
                .to_string()
        };

        ProviderOutcome::success(ProviderPayload::Text(text), 25, "stub")
    }
}

fn test_state(calls: Arc<AtomicU32>) -> AppState {
    let store: Arc<dyn ArtifactStorePort> = Arc::new(MemoryArtifactStore::new());
    let chain = FallbackChain::new(Duration::from_secs(5)).with_provider(
        Capability::TextGeneration,
        Arc::new(StubTextProvider { calls }),
    );

    AppState {
        generation: Arc::new(GenerationService::new(store, chain)),
        estimator: Arc::new(CostEstimator::new(PricingTable::default())),
        defaults: Arc::new(GenerationConfig::default()),
    }
}

fn test_router(calls: Arc<AtomicU32>) -> Router {
    routes::create_router(test_state(calls))
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_returns_ok() {
    let app = test_router(Arc::new(AtomicU32::new(0)));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn titles_endpoint_generates_and_then_serves_from_cache() {
    let calls = Arc::new(AtomicU32::new(0));
    let app = test_router(calls.clone());
    let body = serde_json::json!({"channel": "devotional", "theme": "divine love"});

    let first = app.clone().oneshot(post_json("/api/generate/titles", body.clone())).await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let first_json = body_json(first).await;
    assert_eq!(first_json["titles"].as_array().unwrap().len(), 3);
    assert_eq!(first_json["cached"], false);
    assert_eq!(first_json["provider"], "stub");

    let second = app.oneshot(post_json("/api/generate/titles", body)).await.unwrap();
    let second_json = body_json(second).await;
    assert_eq!(second_json["cached"], true);
    assert_eq!(second_json["titles"], first_json["titles"]);

    // Exactly one provider invocation across both requests
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn shorts_endpoint_returns_parsed_clips() {
    let app = test_router(Arc::new(AtomicU32::new(0)));
    let body = serde_json::json!({
        "script": "A long-form script with plenty of narration to slice up.",
        "num_shorts": 2
    });

    let response = app.oneshot(post_json("/api/generate/shorts", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let shorts = json["shorts"].as_array().unwrap();
    assert_eq!(shorts.len(), 2);
    assert_eq!(shorts[0]["title"], "First Clip");
    assert_eq!(shorts[0]["hashtags"][0], "#one");
}

#[tokio::test]
async fn shorts_endpoint_rejects_out_of_range_counts() {
    let app = test_router(Arc::new(AtomicU32::new(0)));
    let body = serde_json::json!({"script": "text", "num_shorts": 9});

    let response = app.oneshot(post_json("/api/generate/shorts", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn estimate_endpoint_makes_zero_provider_calls() {
    let calls = Arc::new(AtomicU32::new(0));
    let app = test_router(calls.clone());
    let body = serde_json::json!({
        "channel": "devotional",
        "output_type": "both",
        "num_shorts": 4
    });

    let response = app.oneshot(post_json("/api/estimate", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["total_units"].as_u64().unwrap() > 0);
    assert!(json["per_stage"].is_object());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn estimate_scales_with_num_shorts_and_tier() {
    let app = test_router(Arc::new(AtomicU32::new(0)));

    let estimate = |app: Router, num_shorts: u8, tier: String| async move {
        let body = serde_json::json!({
            "channel": "devotional",
            "output_type": "both",
            "num_shorts": num_shorts,
            "tier": tier
        });
        let response = app.oneshot(post_json("/api/estimate", body)).await.unwrap();
        body_json(response).await["total_units"].as_u64().unwrap()
    };

    let four_free = estimate(app.clone(), 4, "free".to_string()).await;
    let eight_free = estimate(app.clone(), 8, "free".to_string()).await;
    let four_high = estimate(app.clone(), 4, "high".to_string()).await;

    assert!(eight_free > four_free);
    assert!(four_high >= four_free);
}

#[tokio::test]
async fn invalid_channel_is_a_bad_request() {
    let app = test_router(Arc::new(AtomicU32::new(0)));
    let body = serde_json::json!({"channel": "  ", "theme": "divine love"});

    let response = app.oneshot(post_json("/api/generate/titles", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn authenticated_router_rejects_missing_key_but_not_health() {
    let app = test_router(Arc::new(AtomicU32::new(0)))
        .layer(ApiKeyAuthLayer::new(Some("top-secret".to_string())));

    let unauthorized = app
        .clone()
        .oneshot(post_json(
            "/api/generate/titles",
            serde_json::json!({"channel": "devotional", "theme": "divine love"}),
        ))
        .await
        .unwrap();
    assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);

    let health = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(health.status(), StatusCode::OK);
}

#[tokio::test]
async fn authenticated_router_accepts_the_configured_key() {
    let app = test_router(Arc::new(AtomicU32::new(0)))
        .layer(ApiKeyAuthLayer::new(Some("top-secret".to_string())));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/generate/titles")
                .header(CONTENT_TYPE, "application/json")
                .header("x-api-key", "top-secret")
                .body(Body::from(
                    serde_json::json!({"channel": "devotional", "theme": "divine love"})
                        .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
