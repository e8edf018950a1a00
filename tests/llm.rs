use std::io::Read;
use std::thread;

use procurement_desk::ToolError;
use procurement_desk::config::LlmConfig;
use procurement_desk::llm::{AnthropicClient, LanguageModel, OfflineModel, build_model};
use serde_json::{Value, json};
use tiny_http::{Header, Response, Server};

/// Request as seen by the stub endpoint.
struct Captured {
    api_key: Option<String>,
    version: Option<String>,
    body: Value,
}

/// Serves one request with `reply` and hands back what the client sent.
fn one_shot_endpoint(reply: Value) -> (String, thread::JoinHandle<Captured>) {
    let server = Server::http("127.0.0.1:0").expect("http server");
    let addr = server.server_addr().to_ip().expect("ip address");
    let handle = thread::spawn(move || {
        let mut request = server.recv().expect("request received");
        let header = |name: &'static str| {
            request
                .headers()
                .iter()
                .find(|field| field.field.equiv(name))
                .map(|field| field.value.as_str().to_string())
        };
        let api_key = header("x-api-key");
        let version = header("anthropic-version");
        let mut body = String::new();
        request
            .as_reader()
            .read_to_string(&mut body)
            .expect("body read");
        let response = Response::from_string(reply.to_string()).with_header(
            Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                .expect("content type header"),
        );
        request.respond(response).expect("respond");
        Captured {
            api_key,
            version,
            body: serde_json::from_str(&body).expect("JSON request body"),
        }
    });
    (format!("http://{addr}/v1/messages"), handle)
}

fn client_for(endpoint: String) -> AnthropicClient {
    let config = LlmConfig {
        endpoint,
        timeout_secs: 5,
        ..LlmConfig::default()
    };
    AnthropicClient::with_api_key(&config, "test-key".to_string()).expect("client built")
}

#[test]
fn completion_returns_the_first_text_block() {
    let (endpoint, handle) = one_shot_endpoint(json!({
        "content": [
            {"type": "tool_use", "id": "toolu_1"},
            {"type": "text", "text": "Dear supplier, please send 100g."},
            {"type": "text", "text": "second block"}
        ]
    }));

    let reply = client_for(endpoint)
        .complete("Request a sample")
        .expect("completion");
    assert_eq!(reply, "Dear supplier, please send 100g.");

    let captured = handle.join().expect("server thread");
    assert_eq!(captured.api_key.as_deref(), Some("test-key"));
    assert_eq!(captured.version.as_deref(), Some("2023-06-01"));
    assert_eq!(
        captured.body,
        json!({
            "model": "claude-3-sonnet-20240229",
            "max_tokens": 1000,
            "messages": [{"role": "user", "content": "Request a sample"}]
        })
    );
}

#[test]
fn reply_without_text_is_a_response_error() {
    let (endpoint, handle) = one_shot_endpoint(json!({"content": [{"type": "tool_use"}]}));

    let error = client_for(endpoint)
        .complete("hello")
        .expect_err("no text block");
    assert!(matches!(error, ToolError::LlmResponse(_)));
    handle.join().expect("server thread");
}

#[test]
fn offline_model_echoes_the_request() {
    let draft = OfflineModel.complete("Request a 100g sample").expect("drafted");
    assert!(draft.contains("Request a 100g sample"));
}

#[test]
fn missing_api_key_is_reported_by_the_client() {
    let config = LlmConfig {
        api_key_env: "PROCUREMENT_DESK_TEST_UNSET_KEY".to_string(),
        ..LlmConfig::default()
    };

    let error = AnthropicClient::from_config(&config).expect_err("no key");
    assert!(matches!(error, ToolError::MissingApiKey(name) if name == "PROCUREMENT_DESK_TEST_UNSET_KEY"));

    let model = build_model(&config).expect("falls back to offline drafting");
    assert!(model.complete("hello").expect("drafted").contains("hello"));
}

#[test]
fn unreachable_endpoint_surfaces_a_transport_error() {
    let config = LlmConfig {
        endpoint: "http://127.0.0.1:9/v1/messages".to_string(),
        timeout_secs: 2,
        ..LlmConfig::default()
    };
    let client = AnthropicClient::with_api_key(&config, "test-key".to_string()).expect("client built");

    let error = client.complete("hello").expect_err("nothing listens on the discard port");
    assert!(matches!(error, ToolError::LlmTransport(_)));
}
