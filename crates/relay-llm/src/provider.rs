use std::fmt;

use crate::request::ChatRequest;
use crate::response::ChatStream;

/// A concrete, type-erased chat provider.
///
/// Wraps a [`ChatProviderBackend`] behind a `Box<dyn ...>` so callers never
/// need generics and can swap vendors freely.
pub struct ChatProvider {
    inner: Box<dyn ChatProviderBackend>,
}

impl ChatProvider {
    pub fn new(backend: impl ChatProviderBackend + 'static) -> Self {
        ChatProvider {
            inner: Box::new(backend),
        }
    }

    /// The provider name (e.g. `"google"`, `"openai"`).
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Issue one generation call, streaming the result.
    ///
    /// Safe for concurrent use: the provider holds only immutable
    /// construction-time state, never per-call state.
    pub fn chat(&self, request: impl Into<ChatRequest>) -> ChatStream {
        self.inner.chat(request.into())
    }
}

impl fmt::Debug for ChatProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatProvider")
            .field("name", &self.name())
            .finish()
    }
}

/// Trait that vendor crates implement.
///
/// Every failure in `chat` — translation, transport, or stream consumption —
/// surfaces through the stream as a [`crate::RuntimeError`]; no vendor-native
/// error type ever crosses this boundary.
pub trait ChatProviderBackend: Send + Sync {
    fn name(&self) -> &str;
    fn chat(&self, request: ChatRequest) -> ChatStream;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RuntimeError;

    struct NullBackend;

    impl ChatProviderBackend for NullBackend {
        fn name(&self) -> &str {
            "null"
        }

        fn chat(&self, _request: ChatRequest) -> ChatStream {
            ChatStream::failed(RuntimeError::transport("null", "not wired"))
        }
    }

    // `Result<ChatProvider, _>::unwrap_err` needs this to compile.
    #[test]
    fn debug_renders_provider_name() {
        let provider = ChatProvider::new(NullBackend);
        assert_eq!(format!("{provider:?}"), r#"ChatProvider { name: "null" }"#);
    }
}
