//! OpenAI provider for relay-llm, speaking the streaming Chat Completions
//! API.

pub mod convert;
pub mod error;
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

pub const PROVIDER: &str = "openai";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for the OpenAI provider.
pub struct OpenAIConfig {
    pub api_key: String,
    pub base_url: String,
    /// Tee every outgoing chunk into the diagnostic log.
    pub debug: bool,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        OpenAIConfig {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.into(),
            debug: false,
        }
    }
}

/// Create an OpenAI provider with the given config.
///
/// Fails fast with `InvalidCredential` when the API key is absent.
pub fn provider(config: OpenAIConfig) -> Result<ChatProvider, RuntimeError> {
    if config.api_key.is_empty() {
        return Err(RuntimeError::invalid_credential(PROVIDER));
    }
    let transport = HttpTransport::new(
        &config.base_url,
        vec![(
            "Authorization".into(),
            format!("Bearer {}", config.api_key),
        )],
    );
    Ok(with_transport(Arc::new(transport), config.debug))
}

/// Create an OpenAI provider over an injected transport (fakes in tests).
pub fn with_transport(transport: Arc<dyn StreamingTransport>, debug: bool) -> ChatProvider {
    ChatProvider::new(OpenAIChat {
        state: Arc::new(OpenAIState { transport, debug }),
    })
}

struct OpenAIState {
    transport: Arc<dyn StreamingTransport>,
    debug: bool,
}

struct OpenAIChat {
    state: Arc<OpenAIState>,
}

impl ChatProviderBackend for OpenAIChat {
    fn name(&self) -> &str {
        PROVIDER
    }

    fn chat(&self, request: ChatRequest) -> ChatStream {
        let wire = convert::build_request(&request.model, &request);
        let body = match serde_json::to_value(&wire) {
            Ok(body) => body,
            Err(err) => {
                return ChatStream::failed(RuntimeError::transport(
                    PROVIDER,
                    format!("request serialization failed: {err}"),
                ));
            }
        };

        tracing::debug!(target: "relay_llm::openai", model = %request.model, "dispatching chat completion");

        let transport_request = TransportRequest {
            path: "chat/completions".into(),
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
        let err = provider(OpenAIConfig::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCredential);
        assert_eq!(err.provider, "openai");
    }
}
