use std::time::Duration;

use canopy::outbound::{
    ChatNotifier, CompletionError, CompletionProvider, DeliveryError, OpenAiProvider,
    TelegramNotifier, ask_and_forward, send_all,
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

const TOKEN: &str = "123:abc";
const CHAT_ID: &str = "42";

fn telegram(server: &MockServer) -> TelegramNotifier {
    TelegramNotifier::new(TOKEN.to_string(), CHAT_ID.to_string(), Some(server.uri()))
}

fn openai(server: &MockServer) -> OpenAiProvider {
    OpenAiProvider::new("sk-test".to_string(), Some(server.uri()))
}

/// A chat completions reply whose message content is `content`.
fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

// ============================================================================
// Telegram Notifier Tests
// ============================================================================

#[tokio::test]
async fn test_telegram_sends_escaped_html() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendMessage")))
        .and(body_partial_json(json!({
            "chat_id": CHAT_ID,
            "text": "a &lt; b &amp;&amp; c",
            "parse_mode": "HTML"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let result = telegram(&mock_server).send_message("a < b && c").await;
    assert!(result.is_ok(), "Expected delivery, got {:?}", result);
}

#[tokio::test]
async fn test_telegram_api_error_uses_description() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendMessage")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "ok": false,
            "error_code": 401,
            "description": "Unauthorized"
        })))
        .mount(&mock_server)
        .await;

    let result = telegram(&mock_server).send_message("hi").await;
    match result {
        Err(DeliveryError::Api { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Unauthorized");
        }
        other => panic!("Expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_telegram_ok_false_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/bot{TOKEN}/sendMessage")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": false,
            "description": "Bad Request: chat not found"
        })))
        .mount(&mock_server)
        .await;

    let result = telegram(&mock_server).send_message("hi").await;
    assert!(matches!(
        result,
        Err(DeliveryError::Api { ref message, .. }) if message.contains("chat not found")
    ));
}

#[tokio::test]
async fn test_telegram_unreachable_is_network_error() {
    // Port 1 is reserved and closed on test machines
    let notifier = TelegramNotifier::new(
        TOKEN.to_string(),
        CHAT_ID.to_string(),
        Some("http://127.0.0.1:1".to_string()),
    );

    let result = notifier.send_message("hi").await;
    match result {
        Err(DeliveryError::Network(message)) => assert!(!message.contains(TOKEN)),
        other => panic!("Expected network error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_send_all_partial_failure_over_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"text": "two"})))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "ok": false,
            "description": "Too Many Requests"
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let messages = vec!["one".to_string(), "two".to_string(), "three".to_string()];
    let result = send_all(&telegram(&mock_server), &messages, Duration::ZERO).await;

    match result {
        Err(DeliveryError::Partial { failed, total }) => {
            assert_eq!(total, 3);
            assert_eq!(failed.len(), 1);
            assert_eq!(failed[0].0, 2);
            assert!(failed[0].1.contains("Too Many Requests"));
        }
        other => panic!("Expected partial failure, got {:?}", other),
    }
}

// ============================================================================
// OpenAI Provider Tests
// ============================================================================

#[tokio::test]
async fn test_openai_structured_answer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4.1-mini",
            "response_format": { "type": "json_schema" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            r#"{"messages":["A tree is a graph.","It has no cycles."]}"#,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let answer = openai(&mock_server).ask("What is a tree?").await.unwrap();
    assert_eq!(
        answer.parts,
        vec![
            "A tree is a graph.".to_string(),
            "It has no cycles.".to_string()
        ]
    );
}

#[tokio::test]
async fn test_openai_plain_text_becomes_one_part() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion_body("Just text, no JSON.")),
        )
        .mount(&mock_server)
        .await;

    let answer = openai(&mock_server).ask("q").await.unwrap();
    assert_eq!(answer.parts, vec!["Just text, no JSON.".to_string()]);
}

#[tokio::test]
async fn test_openai_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let result = openai(&mock_server).ask("q").await;
    assert!(matches!(result, Err(CompletionError::Api { status: 500, .. })));
}

#[tokio::test]
async fn test_openai_empty_answer_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion_body(r#"{"messages":["  "]}"#)),
        )
        .mount(&mock_server)
        .await;

    let result = openai(&mock_server).ask("q").await;
    assert!(matches!(result, Err(CompletionError::Parse(_))));
}

#[tokio::test]
async fn test_openai_no_choices_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&mock_server)
        .await;

    let result = openai(&mock_server).ask("q").await;
    assert!(matches!(result, Err(CompletionError::Parse(_))));
}

// ============================================================================
// Ask and Forward
// ============================================================================

#[tokio::test]
async fn test_ask_and_forward_end_to_end() {
    let ai_server = MockServer::start().await;
    let chat_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            r#"{"messages":["Part one.","Part two."]}"#,
        )))
        .mount(&ai_server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"text": "Question: Why?"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&chat_server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"text": "AI answer (part 1/2):\nPart one."})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&chat_server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"text": "AI answer (part 2/2):\nPart two."})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&chat_server)
        .await;

    let completion = openai(&ai_server);
    let notifier = telegram(&chat_server);
    let outcome = ask_and_forward("Why?", &completion, Some(&notifier), Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(outcome.answer.parts.len(), 2);
    assert_eq!(outcome.forwarded, Some(Ok(())));
}

#[tokio::test]
async fn test_ask_failure_forwards_nothing() {
    let ai_server = MockServer::start().await;
    let chat_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&ai_server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(0)
        .mount(&chat_server)
        .await;

    let result = ask_and_forward(
        "Why?",
        &openai(&ai_server),
        Some(&telegram(&chat_server) as &dyn ChatNotifier),
        Duration::ZERO,
    )
    .await;
    assert!(matches!(result, Err(CompletionError::Api { status: 429, .. })));
}
