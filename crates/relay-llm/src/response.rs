use futures::Stream;
use std::pin::Pin;
use tokio_stream::StreamExt;

use crate::error::RuntimeError;
use crate::stream::{FinishReason, StreamChunk, ToolCallChunk, Usage};

/// The canonical lazy stream of chunks returned by every adapter.
///
/// Finite, single-pass, in arrival order. Dropping it releases the
/// underlying network resource; a new call must be issued to regenerate.
pub struct ChatStream {
    inner: Pin<Box<dyn Stream<Item = Result<StreamChunk, RuntimeError>> + Send>>,
}

impl ChatStream {
    pub fn new(
        stream: impl Stream<Item = Result<StreamChunk, RuntimeError>> + Send + 'static,
    ) -> Self {
        ChatStream {
            inner: Box::pin(stream),
        }
    }

    /// A stream that fails immediately with the given error.
    pub fn failed(error: RuntimeError) -> Self {
        ChatStream::new(tokio_stream::once(Err(error)))
    }

    /// Consume as an async stream of chunks.
    pub fn chunks(self) -> Pin<Box<dyn Stream<Item = Result<StreamChunk, RuntimeError>> + Send>> {
        self.inner
    }

    /// Drain the stream, collecting only the text.
    pub async fn into_text(self) -> Result<String, RuntimeError> {
        Ok(self.into_result().await?.text)
    }

    /// Drain the stream into a single collected result.
    pub async fn into_result(self) -> Result<ChatResult, RuntimeError> {
        let mut text = String::new();
        let mut tool_calls = Vec::new();
        let mut finish_reason = None;
        let mut usage = None;

        let mut stream = self.inner;
        while let Some(chunk) = stream.next().await {
            match chunk? {
                StreamChunk::Text(delta) => text.push_str(&delta),
                StreamChunk::ToolCall(call) => tool_calls.push(call),
                StreamChunk::Finish { reason, usage: u } => {
                    finish_reason = Some(reason);
                    usage = u;
                }
            }
        }

        Ok(ChatResult {
            text,
            tool_calls,
            finish_reason: finish_reason.unwrap_or(FinishReason::Stop),
            usage: usage.unwrap_or_default(),
        })
    }
}

/// The fully-collected outcome of one generation call.
#[derive(Debug, Clone)]
pub struct ChatResult {
    pub text: String,
    pub tool_calls: Vec<ToolCallChunk>,
    pub finish_reason: FinishReason,
    pub usage: Usage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, RuntimeError};
    use tokio_stream::iter;

    #[tokio::test]
    async fn collects_text_and_finish() {
        let stream = ChatStream::new(iter(vec![
            Ok(StreamChunk::Text("Hello".into())),
            Ok(StreamChunk::Text(", world!".into())),
            Ok(StreamChunk::Finish {
                reason: FinishReason::Stop,
                usage: Some(Usage {
                    input_tokens: 3,
                    output_tokens: 5,
                }),
            }),
        ]));

        let result = stream.into_result().await.unwrap();
        assert_eq!(result.text, "Hello, world!");
        assert_eq!(result.finish_reason, FinishReason::Stop);
        assert_eq!(result.usage.output_tokens, 5);
    }

    #[tokio::test]
    async fn chunks_already_delivered_stand_when_stream_errors() {
        let stream = ChatStream::new(iter(vec![
            Ok(StreamChunk::Text("partial".into())),
            Err(RuntimeError::transport("google", "connection reset")),
        ]));

        let mut chunks = stream.chunks();
        assert_eq!(
            chunks.next().await.unwrap().unwrap(),
            StreamChunk::Text("partial".into())
        );
        let err = chunks.next().await.unwrap().unwrap_err();
        assert_eq!(err.kind, ErrorKind::TransportError);
        assert!(chunks.next().await.is_none());
    }

    #[tokio::test]
    async fn failed_stream_yields_single_error() {
        let stream = ChatStream::failed(RuntimeError::invalid_credential("google"));
        let err = stream.into_text().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidCredential);
    }
}
