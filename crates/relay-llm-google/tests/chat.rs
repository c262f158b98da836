//! End-to-end adapter tests over injected transports and a real HTTP server.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use relay_llm::{
    ByteStream, ChatMessage, ContentPart, ErrorKind, StreamChunk, StreamingTransport,
    TransportFailure, TransportRequest, request,
};
use relay_llm_google::{GoogleConfig, provider, with_transport};
use tokio_stream::StreamExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn sse_body(payloads: &[&str]) -> String {
    payloads
        .iter()
        .map(|p| format!("data: {p}\n\n"))
        .collect()
}

/// Transport that replays a scripted SSE body and counts invocations.
struct ScriptedTransport {
    body: String,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl StreamingTransport for ScriptedTransport {
    async fn open(&self, _request: TransportRequest) -> Result<ByteStream, TransportFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let bytes = Bytes::from(self.body.clone());
        Ok(Box::pin(tokio_stream::once(Ok(bytes))))
    }
}

/// Transport that fails every request with the given status.
struct FailingTransport {
    code: u16,
    body: String,
}

#[async_trait]
impl StreamingTransport for FailingTransport {
    async fn open(&self, _request: TransportRequest) -> Result<ByteStream, TransportFailure> {
        Err(TransportFailure::Status {
            code: self.code,
            body: self.body.clone(),
        })
    }
}

#[tokio::test]
async fn relays_chunks_in_arrival_order() {
    let calls = Arc::new(AtomicUsize::new(0));
    let transport = ScriptedTransport {
        body: sse_body(&[
            r#"{"candidates":[{"content":{"parts":[{"text":"Hello"}],"role":"model"}}]}"#,
            r#"{"candidates":[{"content":{"parts":[{"text":", "}],"role":"model"}}]}"#,
            r#"{"candidates":[{"content":{"parts":[{"text":"world!"}],"role":"model"},"finishReason":"STOP"}]}"#,
        ]),
        calls: Arc::clone(&calls),
    };
    let provider = with_transport(Arc::new(transport), false);

    let mut builder = request("gemini-pro");
    builder.user("Hello").temperature(0.0);
    let mut chunks = provider.chat(builder.build()).chunks();

    let mut texts = Vec::new();
    let mut finished = false;
    while let Some(chunk) = chunks.next().await {
        match chunk.unwrap() {
            StreamChunk::Text(t) => {
                assert!(!finished, "text after finish");
                texts.push(t);
            }
            StreamChunk::Finish { .. } => finished = true,
            other => panic!("unexpected chunk: {other:?}"),
        }
    }

    assert_eq!(texts, vec!["Hello", ", ", "world!"]);
    assert!(finished);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn non_inline_image_never_reaches_the_transport() {
    let calls = Arc::new(AtomicUsize::new(0));
    let transport = ScriptedTransport {
        body: String::new(),
        calls: Arc::clone(&calls),
    };
    let provider = with_transport(Arc::new(transport), false);

    let mut builder = request("gemini-pro-vision");
    builder.message(ChatMessage::user_parts(vec![
        ContentPart::text("Check this image:"),
        ContentPart::image_url("http://example.com/image.png"),
    ]));

    let err = provider.chat(builder.build()).into_text().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::CallerInputError);
    assert_eq!(calls.load(Ordering::SeqCst), 0, "transport must not be called");
}

#[tokio::test]
async fn vendor_refusal_is_normalized_before_surfacing() {
    let body = serde_json::json!({
        "error": {
            "code": 400,
            "message": "API key not valid. Please pass a valid API key.",
            "status": "INVALID_ARGUMENT",
            "details": [{
                "@type": "type.googleapis.com/google.rpc.ErrorInfo",
                "reason": "API_KEY_INVALID",
                "domain": "googleapis.com",
            }],
        }
    });
    let provider = with_transport(
        Arc::new(FailingTransport {
            code: 400,
            body: body.to_string(),
        }),
        false,
    );

    let mut builder = request("gemini-pro");
    builder.user("Hello");
    let err = provider.chat(builder.build()).into_text().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidCredential);
    assert_eq!(err.provider, "google");
}

#[tokio::test]
async fn streams_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-pro:streamGenerateContent"))
        .and(query_param("alt", "sse"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            sse_body(&[
                r#"{"candidates":[{"content":{"parts":[{"text":"Hello, "}],"role":"model"}}]}"#,
                r#"{"candidates":[{"content":{"parts":[{"text":"world!"}],"role":"model"},"finishReason":"STOP"}],"usageMetadata":{"promptTokenCount":1,"candidatesTokenCount":3}}"#,
            ]),
            "text/event-stream",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider(GoogleConfig {
        api_key: "test".into(),
        base_url: server.uri(),
        debug: false,
    })
    .unwrap();

    let mut builder = request("gemini-pro");
    builder.user("Hello").temperature(0.0);
    let text = provider.chat(builder.build()).into_text().await.unwrap();
    assert_eq!(text, "Hello, world!");
}

#[tokio::test]
async fn http_error_body_is_classified() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-pro:streamGenerateContent"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": {
                "code": 400,
                "message": "User location is not supported for the API use.",
                "status": "FAILED_PRECONDITION",
            }
        })))
        .mount(&server)
        .await;

    let provider = provider(GoogleConfig {
        api_key: "test".into(),
        base_url: server.uri(),
        debug: false,
    })
    .unwrap();

    let mut builder = request("gemini-pro");
    builder.user("Hello");
    let err = provider.chat(builder.build()).into_text().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnsupportedRegion);
}
