use std::sync::Arc;

use royale_core::chat::ChatSession;
use royale_core::dispatcher::{
    ChatDispatcher, CredentialSource, EMPTY_RESPONSE_FALLBACK, PROTOCOL_ERROR_MESSAGE,
};
use royale_core::error::ChatError;
use royale_core::gemini::{ChatBackend, ChatRequest, GeminiBackend};
use royale_core::transcript::{HistoryEntry, Role, INITIAL_CHAT_MESSAGE};
use wiremock::matchers::{
    body_partial_json, body_string_contains, header, method, path, query_param_is_missing,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn mock_gemini_response(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": {"promptTokenCount": 42, "candidatesTokenCount": 7}
    })
}

fn backend_for(server: &MockServer) -> GeminiBackend {
    GeminiBackend::new().with_base_url(format!("{}/v1beta", server.uri()))
}

fn request(message: &str) -> ChatRequest {
    ChatRequest {
        model: "gemini-2.5-flash".into(),
        system_instruction: "You are CasTo".into(),
        history: vec![HistoryEntry::new(Role::Model, INITIAL_CHAT_MESSAGE)],
        message: message.into(),
    }
}

#[tokio::test]
async fn gemini_posts_history_and_persona_with_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(query_param_is_missing("key"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(serde_json::json!({
            "contents": [
                {"role": "model", "parts": [{"text": INITIAL_CHAT_MESSAGE}]},
                {"role": "user", "parts": [{"text": "hi"}]}
            ],
            "systemInstruction": {"parts": [{"text": "You are CasTo"}]}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_gemini_response("hello")))
        .expect(1)
        .mount(&server)
        .await;

    let reply = backend_for(&server)
        .send_message("test-key", &request("hi"))
        .await
        .unwrap();
    assert_eq!(reply.as_deref(), Some("hello"));
}

#[tokio::test]
async fn gemini_non_success_status_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}
        })))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .send_message("bad-key", &request("hi"))
        .await
        .unwrap_err();
    match err {
        ChatError::Api { status, message } => {
            assert_eq!(status, 403);
            assert!(message.contains("API key not valid"));
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn gemini_malformed_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .send_message("k", &request("hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::Decode(_)));
}

#[tokio::test]
async fn gemini_unreachable_host_is_transport_error() {
    let backend = GeminiBackend::new().with_base_url("http://127.0.0.1:1/v1beta");
    let err = backend.send_message("k", &request("hi")).await.unwrap_err();
    assert!(matches!(err, ChatError::Transport(_)));
}

#[tokio::test]
async fn transport_error_text_never_contains_the_key() {
    let backend = GeminiBackend::new().with_base_url("http://127.0.0.1:1/v1beta");
    let err = backend
        .send_message("SECRET-KEY-123", &request("hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::Transport(_)));
    assert!(!format!("{err}").contains("SECRET-KEY-123"));
    assert!(!format!("{err:?}").contains("SECRET-KEY-123"));
}

#[tokio::test]
async fn dispatcher_whitespace_reply_uses_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_gemini_response("   \n")))
        .mount(&server)
        .await;

    let dispatcher = ChatDispatcher::new(
        Arc::new(backend_for(&server)),
        CredentialSource::Fixed(Some("k".into())),
        "gemini-2.5-flash",
        "persona",
    );
    let mut session = ChatSession::default();
    dispatcher.send(&mut session, "hi").await;
    assert_eq!(
        session.transcript().last().map(|m| m.text.as_str()),
        Some(EMPTY_RESPONSE_FALLBACK)
    );
}

#[tokio::test]
async fn dispatcher_round_trip_through_mock_server() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(mock_gemini_response("Ascend, traveler.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = ChatDispatcher::new(
        Arc::new(backend_for(&server)),
        CredentialSource::Fixed(Some("test-key".into())),
        "gemini-2.5-flash",
        "You are CasTo",
    );
    let mut session = ChatSession::default();
    assert!(dispatcher.send(&mut session, "hi").await);

    let texts: Vec<_> = session.transcript().iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec![INITIAL_CHAT_MESSAGE, "hi", "Ascend, traveler."]);
}

#[tokio::test]
async fn dispatcher_maps_server_failures_to_fixed_lines() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_string_contains("empty please"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{"finishReason": "SAFETY"}]
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let dispatcher = ChatDispatcher::new(
        Arc::new(backend_for(&server)),
        CredentialSource::Fixed(Some("k".into())),
        "gemini-2.5-flash",
        "persona",
    );

    let mut session = ChatSession::default();
    dispatcher.send(&mut session, "empty please").await;
    assert_eq!(
        session.transcript().last().map(|m| m.text.as_str()),
        Some(EMPTY_RESPONSE_FALLBACK)
    );

    let mut session = ChatSession::default();
    dispatcher.send(&mut session, "break it").await;
    assert_eq!(
        session.transcript().last().map(|m| m.text.as_str()),
        Some(PROTOCOL_ERROR_MESSAGE)
    );
    assert!(!session.is_loading());
}
