//! Gemini client tests against a mock HTTP server

use serde_json::json;
use stoic_diary::domain::Message;
use stoic_diary::infrastructure::{ChatBackend, Config, GeminiClient};
use stoic_diary::DiaryError;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STREAM_PATH: &str = "/models/test-model:streamGenerateContent";

fn sse_body(chunks: &[&str]) -> String {
    chunks
        .iter()
        .map(|text| {
            let event = json!({
                "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
            });
            format!("data: {}\r\n\r\n", event)
        })
        .collect()
}

fn client(server: &MockServer) -> GeminiClient {
    let config = Config {
        model: "test-model".to_string(),
        api_base: format!("{}/", server.uri()),
        timeout_secs: 5,
        ..Config::default()
    };
    GeminiClient::new("test-key".to_string(), &config).unwrap()
}

#[tokio::test]
async fn test_stream_reply_collects_chunks() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .and(query_param("alt", "sse"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "systemInstruction": { "parts": [{ "text": "Be brief." }] },
            "contents": [
                { "role": "user", "parts": [{ "text": "I overslept." }] },
                { "role": "model", "parts": [{ "text": "What was in your control?" }] },
                { "role": "user", "parts": [{ "text": "My alarm." }] }
            ]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(sse_body(&["Then set ", "it earlier."])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let history = vec![
        Message::user("I overslept."),
        Message::model("What was in your control?"),
    ];
    let mut deltas = Vec::new();
    let mut on_chunk = |d: &str| deltas.push(d.to_string());

    let full = client(&server)
        .stream_reply(&history, "Be brief.", "My alarm.", &mut on_chunk)
        .await
        .unwrap();

    assert_eq!(full, "Then set it earlier.");
    assert_eq!(deltas, vec!["Then set ", "it earlier."]);
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_string("API key not valid"))
        .mount(&server)
        .await;

    let mut on_chunk = |_: &str| {};
    let err = client(&server)
        .stream_reply(&[], "", "hello", &mut on_chunk)
        .await
        .unwrap_err();

    match err {
        DiaryError::Api { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("API key not valid"));
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_error_event_inside_stream() {
    let server = MockServer::start().await;
    let body = format!(
        "{}data: {}\n\n",
        sse_body(&["Partial"]),
        json!({ "error": { "code": 503, "message": "overloaded" } })
    );
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(body),
        )
        .mount(&server)
        .await;

    let mut seen = String::new();
    let mut on_chunk = |d: &str| seen.push_str(d);
    let err = client(&server)
        .stream_reply(&[], "", "hello", &mut on_chunk)
        .await
        .unwrap_err();

    assert!(matches!(err, DiaryError::Api { status: 503, .. }));
    assert_eq!(seen, "Partial");
}

#[tokio::test]
async fn test_blank_system_instruction_is_omitted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(STREAM_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(sse_body(&["ok"])),
        )
        .mount(&server)
        .await;

    let mut on_chunk = |_: &str| {};
    client(&server)
        .stream_reply(&[], "   ", "hello", &mut on_chunk)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert!(sent.get("systemInstruction").is_none());
    assert_eq!(sent["contents"][0]["parts"][0]["text"], "hello");
}
