//! The streaming transport seam.
//!
//! Adapters never talk to the network directly; they hold a
//! [`StreamingTransport`] handle, constructed once and passed in. Tests
//! substitute a fake without touching any HTTP machinery.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;
use std::time::Duration;
use tokio_stream::StreamExt;

/// A byte stream as produced by a streaming POST.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportFailure>> + Send>>;

/// A vendor-shaped request, already translated; the transport only carries it.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// Path relative to the transport's base URL, including any query string.
    pub path: String,
    pub body: serde_json::Value,
}

/// Failures raised below the adapter, before classification.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportFailure {
    /// The connection could not be established or broke before a response.
    #[error("connect error: {0}")]
    Connect(String),

    /// The vendor answered with a non-success status.
    #[error("status {code}: {body}")]
    Status { code: u16, body: String },

    /// The response body stream could not be read or decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

/// A streaming chat transport: POST a JSON body, get back the raw response
/// byte stream. Dropping the returned stream aborts the request.
#[async_trait]
pub trait StreamingTransport: Send + Sync {
    async fn open(&self, request: TransportRequest) -> Result<ByteStream, TransportFailure>;
}

/// reqwest-backed transport used in production.
///
/// No request timeout by default — a stream legitimately stays open for the
/// whole generation. A bounded connect timeout can be opted into.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    headers: Vec<(String, String)>,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, headers: Vec<(String, String)>) -> Self {
        HttpTransport {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            headers,
        }
    }

    pub fn with_connect_timeout(
        base_url: impl Into<String>,
        headers: Vec<(String, String)>,
        connect_timeout: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .unwrap_or_default();
        HttpTransport {
            client,
            base_url: base_url.into(),
            headers,
        }
    }
}

#[async_trait]
impl StreamingTransport for HttpTransport {
    async fn open(&self, request: TransportRequest) -> Result<ByteStream, TransportFailure> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), request.path);
        let mut req = self.client.post(&url);
        for (name, value) in &self.headers {
            req = req.header(name, value);
        }

        let resp = req
            .json(&request.body)
            .send()
            .await
            .map_err(|e| TransportFailure::Connect(e.to_string()))?;

        if !resp.status().is_success() {
            let code = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportFailure::Status { code, body });
        }

        let bytes = resp
            .bytes_stream()
            .map(|item| item.map_err(|e| TransportFailure::Decode(e.to_string())));
        Ok(Box::pin(bytes))
    }
}
