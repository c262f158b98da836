//! Google (Gemini) provider for relay-llm.
//!
//! Translates the neutral chat contract onto the Generative Language API's
//! `streamGenerateContent` endpoint and normalizes every failure into the
//! relay-llm error taxonomy.

pub mod convert;
pub mod error;
pub mod model;
#[cfg(feature = "registry")]
mod register;
mod stream;
pub mod types;

#[cfg(feature = "registry")]
pub use register::register;

use std::sync::Arc;

use relay_llm::{
    ChatProvider, ChatProviderBackend, ChatRequest, ChatStream, HttpTransport, RuntimeError,
    StreamingTransport, TransportRequest, tee_debug,
};

pub const PROVIDER: &str = "google";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Configuration for the Google provider.
pub struct GoogleConfig {
    pub api_key: String,
    pub base_url: String,
    /// Tee every outgoing chunk into the diagnostic log.
    pub debug: bool,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        GoogleConfig {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.into(),
            debug: false,
        }
    }
}

/// Create a Google provider with the given config.
///
/// Fails fast with `InvalidCredential` when the API key is absent; no
/// request-level work happens before this check.
pub fn provider(config: GoogleConfig) -> Result<ChatProvider, RuntimeError> {
    if config.api_key.is_empty() {
        return Err(RuntimeError::invalid_credential(PROVIDER));
    }
    let transport = HttpTransport::new(
        &config.base_url,
        vec![("x-goog-api-key".into(), config.api_key)],
    );
    Ok(with_transport(Arc::new(transport), config.debug))
}

/// Create a Google provider over an injected transport.
///
/// The transport owns authentication, so no credential check happens here;
/// tests substitute fakes through this constructor.
pub fn with_transport(transport: Arc<dyn StreamingTransport>, debug: bool) -> ChatProvider {
    ChatProvider::new(GoogleChat {
        state: Arc::new(GoogleState { transport, debug }),
    })
}

struct GoogleState {
    transport: Arc<dyn StreamingTransport>,
    debug: bool,
}

struct GoogleChat {
    state: Arc<GoogleState>,
}

impl ChatProviderBackend for GoogleChat {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn chat(&self, request: ChatRequest) -> ChatStream {
        let model = model::effective_model(&request.model, &request.messages);

        // Translation failures surface synchronously, before any transport
        // call is made.
        let wire = match convert::build_request(&model, &request) {
            Ok(wire) => wire,
            Err(err) => return ChatStream::failed(err),
        };
        let body = match serde_json::to_value(&wire) {
            Ok(body) => body,
            Err(err) => {
                return ChatStream::failed(RuntimeError::transport(
                    PROVIDER,
                    format!("request serialization failed: {err}"),
                ));
            }
        };

        tracing::debug!(target: "relay_llm::google", %model, "dispatching streamGenerateContent");

        let transport_request = TransportRequest {
            path: format!("models/{model}:streamGenerateContent?alt=sse"),
            body,
        };
        let chunks = stream::open(Arc::clone(&self.state.transport), transport_request);
        ChatStream::new(tee_debug(chunks, PROVIDER, self.state.debug))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_llm::ErrorKind;

    #[test]
    fn constructing_without_api_key_fails_fast() {
        let err = provider(GoogleConfig::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCredential);
        assert_eq!(err.provider, "google");
    }

    #[test]
    fn constructing_with_api_key_succeeds() {
        let provider = provider(GoogleConfig {
            api_key: "test_api_key".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(provider.name(), "google");
    }
}
