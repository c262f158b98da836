//! End-to-end adapter tests over a real HTTP server.

use relay_llm::{ErrorKind, request};
use relay_llm_openai::{OpenAIConfig, provider};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sse_body(payloads: &[&str]) -> String {
    payloads
        .iter()
        .map(|p| format!("data: {p}\n\n"))
        .collect()
}

#[tokio::test]
async fn streams_text_until_done_sentinel() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            sse_body(&[
                r#"{"choices":[{"index":0,"delta":{"content":"Hello"}}]}"#,
                r#"{"choices":[{"index":0,"delta":{"content":", world!"},"finish_reason":"stop"}]}"#,
                "[DONE]",
            ]),
            "text/event-stream",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider(OpenAIConfig {
        api_key: "test".into(),
        base_url: server.uri(),
        debug: false,
    })
    .unwrap();

    let mut builder = request("gpt-4o-mini");
    builder.user("Hello");
    let text = provider.chat(builder.build()).into_text().await.unwrap();
    assert_eq!(text, "Hello, world!");
}

#[tokio::test]
async fn unauthorized_is_invalid_credential() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {
                "message": "Incorrect API key provided.",
                "type": "invalid_request_error",
                "code": "invalid_api_key",
            }
        })))
        .mount(&server)
        .await;

    let provider = provider(OpenAIConfig {
        api_key: "bad".into(),
        base_url: server.uri(),
        debug: false,
    })
    .unwrap();

    let mut builder = request("gpt-4o-mini");
    builder.user("Hello");
    let err = provider.chat(builder.build()).into_text().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidCredential);
    assert_eq!(err.provider, "openai");
}
