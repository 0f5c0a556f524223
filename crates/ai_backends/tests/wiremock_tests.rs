//! Integration tests for the backend clients using WireMock
//!
//! These tests mock each provider's HTTP API to verify client behavior
//! without touching real services.

use ai_backends::{
    BackendError, CompletionRequest, GeminiConfig, GeminiTextBackend, ImageSearchBackend,
    OpenAiConfig, OpenAiTextBackend, PexelsConfig, PexelsImageBackend, SpeechBackend,
    SpeechConfig, SpeechSynthesisBackend, TextCompletionBackend,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, header, method, path, query_param},
};

// =============================================================================
// Test helpers
// =============================================================================

fn openai_config(base_url: &str) -> OpenAiConfig {
    OpenAiConfig {
        base_url: base_url.to_string(),
        timeout_ms: 5000,
        ..OpenAiConfig::with_api_key("sk-test")
    }
}

fn gemini_config(base_url: &str) -> GeminiConfig {
    GeminiConfig {
        base_url: base_url.to_string(),
        timeout_ms: 5000,
        ..GeminiConfig::with_api_key("g-test")
    }
}

fn completion_request() -> CompletionRequest {
    CompletionRequest::new("You are helpful", "Say hello", 100)
}

fn chat_success_response() -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-1",
        "model": "gpt-4o-mini",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": "Hello there!"}}
        ],
        "usage": {"prompt_tokens": 12, "completion_tokens": 4, "total_tokens": 16}
    })
}

fn gemini_success_response() -> serde_json::Value {
    serde_json::json!({
        "candidates": [
            {"content": {"role": "model", "parts": [{"text": "Hello from Gemini"}]}}
        ],
        "usageMetadata": {"totalTokenCount": 21}
    })
}

fn pexels_success_response() -> serde_json::Value {
    serde_json::json!({
        "page": 1,
        "per_page": 2,
        "photos": [
            {
                "id": 101,
                "width": 1920,
                "height": 1080,
                "alt": "temple at sunrise",
                "src": {"large2x": "https://images.pexels.test/101.jpg"}
            },
            {
                "id": 102,
                "width": 1080,
                "height": 1920,
                "alt": "",
                "src": {"large2x": "https://images.pexels.test/102.jpg"}
            }
        ]
    })
}

// =============================================================================
// OpenAI text backend
// =============================================================================

mod openai_tests {
    use super::*;

    #[tokio::test]
    async fn complete_success_returns_content_and_usage() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_string_contains("Say hello"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_success_response()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let backend = OpenAiTextBackend::new(openai_config(&mock_server.uri())).unwrap();
        let completion = backend.complete(&completion_request()).await.unwrap();

        assert_eq!(completion.content, "Hello there!");
        assert_eq!(completion.model, "gpt-4o-mini");
        assert_eq!(completion.total_tokens, Some(16));
    }

    #[tokio::test]
    async fn status_429_maps_to_quota_exceeded() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&mock_server)
            .await;

        let backend = OpenAiTextBackend::new(openai_config(&mock_server.uri())).unwrap();
        let err = backend.complete(&completion_request()).await.unwrap_err();

        assert!(matches!(err, BackendError::QuotaExceeded(_)));
    }

    #[tokio::test]
    async fn status_500_maps_to_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let backend = OpenAiTextBackend::new(openai_config(&mock_server.uri())).unwrap();
        let err = backend.complete(&completion_request()).await.unwrap_err();

        assert!(matches!(err, BackendError::ServerError { status: 500, .. }));
    }

    #[tokio::test]
    async fn malformed_body_maps_to_invalid_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let backend = OpenAiTextBackend::new(openai_config(&mock_server.uri())).unwrap();
        let err = backend.complete(&completion_request()).await.unwrap_err();

        assert!(matches!(err, BackendError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn empty_choices_maps_to_invalid_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "choices": []
            })))
            .mount(&mock_server)
            .await;

        let backend = OpenAiTextBackend::new(openai_config(&mock_server.uri())).unwrap();
        let err = backend.complete(&completion_request()).await.unwrap_err();

        assert!(matches!(err, BackendError::InvalidResponse(_)));
    }
}

// =============================================================================
// Gemini text backend
// =============================================================================

mod gemini_tests {
    use super::*;

    #[tokio::test]
    async fn complete_success_joins_candidate_parts() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
            .and(query_param("key", "g-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(gemini_success_response()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let backend = GeminiTextBackend::new(gemini_config(&mock_server.uri())).unwrap();
        let completion = backend.complete(&completion_request()).await.unwrap();

        assert_eq!(completion.content, "Hello from Gemini");
        assert_eq!(completion.model, "gemini-2.0-flash");
        assert_eq!(completion.total_tokens, Some(21));
    }

    #[tokio::test]
    async fn quota_status_maps_like_the_primary() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
            .mount(&mock_server)
            .await;

        let backend = GeminiTextBackend::new(gemini_config(&mock_server.uri())).unwrap();
        let err = backend.complete(&completion_request()).await.unwrap_err();

        assert!(matches!(err, BackendError::QuotaExceeded(_)));
    }

    #[tokio::test]
    async fn empty_candidates_maps_to_invalid_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"candidates": []})),
            )
            .mount(&mock_server)
            .await;

        let backend = GeminiTextBackend::new(gemini_config(&mock_server.uri())).unwrap();
        let err = backend.complete(&completion_request()).await.unwrap_err();

        assert!(matches!(err, BackendError::InvalidResponse(_)));
    }
}

// =============================================================================
// Speech backend
// =============================================================================

mod speech_tests {
    use super::*;

    fn speech_config(base_url: &str) -> SpeechConfig {
        SpeechConfig {
            base_url: base_url.to_string(),
            timeout_ms: 5000,
            ..SpeechConfig::with_api_key("sk-test")
        }
    }

    #[tokio::test]
    async fn synthesize_returns_audio_bytes() {
        let mock_server = MockServer::start().await;
        let audio = vec![0x49u8, 0x44, 0x33, 0x03, 0x00, 0x00];

        Mock::given(method("POST"))
            .and(path("/v1/audio/speech"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_string_contains("alloy"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(audio.clone()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let backend = SpeechSynthesisBackend::new(speech_config(&mock_server.uri())).unwrap();
        let clip = backend.synthesize("Welcome to the video", "alloy").await.unwrap();

        assert_eq!(clip.media_type, "audio/mpeg");
        assert_eq!(clip.data, audio);
    }

    #[tokio::test]
    async fn empty_audio_body_is_invalid() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/audio/speech"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(Vec::<u8>::new()))
            .mount(&mock_server)
            .await;

        let backend = SpeechSynthesisBackend::new(speech_config(&mock_server.uri())).unwrap();
        let err = backend.synthesize("text", "alloy").await.unwrap_err();

        assert!(matches!(err, BackendError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn bad_request_maps_to_invalid_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/audio/speech"))
            .respond_with(ResponseTemplate::new(400).set_body_string("unknown voice"))
            .mount(&mock_server)
            .await;

        let backend = SpeechSynthesisBackend::new(speech_config(&mock_server.uri())).unwrap();
        let err = backend.synthesize("text", "nonexistent").await.unwrap_err();

        assert!(matches!(err, BackendError::InvalidRequest(_)));
    }
}

// =============================================================================
// Pexels image backend
// =============================================================================

mod pexels_tests {
    use super::*;

    fn pexels_config(base_url: &str) -> PexelsConfig {
        PexelsConfig {
            base_url: base_url.to_string(),
            timeout_ms: 5000,
            ..PexelsConfig::with_api_key("px-test")
        }
    }

    #[tokio::test]
    async fn search_maps_photos_to_assets() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(header("authorization", "px-test"))
            .and(query_param("query", "krishna temple"))
            .and(query_param("per_page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(pexels_success_response()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let backend = PexelsImageBackend::new(pexels_config(&mock_server.uri())).unwrap();
        let assets = backend.search("krishna temple", 2).await.unwrap();

        assert_eq!(assets.len(), 2);
        assert_eq!(assets[0].url, "https://images.pexels.test/101.jpg");
        assert_eq!(assets[0].alt, "temple at sunrise");
        assert!(assets[0].is_landscape());
        assert!(!assets[1].is_landscape());
    }

    #[tokio::test]
    async fn unauthorized_maps_to_invalid_request() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&mock_server)
            .await;

        let backend = PexelsImageBackend::new(pexels_config(&mock_server.uri())).unwrap();
        let err = backend.search("anything", 5).await.unwrap_err();

        assert!(matches!(err, BackendError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn empty_results_are_a_valid_empty_list() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"photos": []})),
            )
            .mount(&mock_server)
            .await;

        let backend = PexelsImageBackend::new(pexels_config(&mock_server.uri())).unwrap();
        let assets = backend.search("nothing", 5).await.unwrap();

        assert!(assets.is_empty());
    }
}
