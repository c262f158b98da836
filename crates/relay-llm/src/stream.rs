use futures::Stream;
use serde::{Deserialize, Serialize};
use tokio_stream::StreamExt;

use crate::error::RuntimeError;

/// One incremental unit of model output.
///
/// Chunks are delivered in vendor arrival order, exactly once, and nothing is
/// retained by the adapter after emission.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamChunk {
    /// A fragment of output text.
    Text(String),

    /// A complete tool invocation requested by the model.
    ToolCall(ToolCallChunk),

    /// Generation finished.
    Finish {
        reason: FinishReason,
        usage: Option<Usage>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallChunk {
    /// Correlation ID for matching a later tool result to this call.
    pub id: String,
    pub name: String,
    /// Raw JSON arguments string, as produced by the vendor.
    pub arguments: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    ToolCalls,
    Length,
    ContentFilter,
    Other(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Pass-through diagnostic tee.
///
/// When `enabled`, every chunk (and every error) is logged as it flows to the
/// caller. The caller-facing stream is unchanged: same items, same order, no
/// buffering.
pub fn tee_debug<S>(
    stream: S,
    provider: &str,
    enabled: bool,
) -> impl Stream<Item = Result<StreamChunk, RuntimeError>> + Send
where
    S: Stream<Item = Result<StreamChunk, RuntimeError>> + Send,
{
    let provider = provider.to_string();
    stream.map(move |item| {
        if enabled {
            match &item {
                Ok(chunk) => tracing::debug!(target: "relay_llm::stream", provider = %provider, ?chunk),
                Err(err) => tracing::debug!(target: "relay_llm::stream", provider = %provider, error = %err),
            }
        }
        item
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_stream::iter;

    #[tokio::test]
    async fn tee_preserves_items_and_order() {
        let chunks: Vec<Result<StreamChunk, RuntimeError>> = vec![
            Ok(StreamChunk::Text("Hello".into())),
            Ok(StreamChunk::Text(", ".into())),
            Ok(StreamChunk::Text("world!".into())),
        ];

        let teed: Vec<_> = tee_debug(iter(chunks), "google", true).collect().await;
        let texts: Vec<_> = teed
            .into_iter()
            .map(|c| match c.unwrap() {
                StreamChunk::Text(t) => t,
                other => panic!("unexpected chunk: {other:?}"),
            })
            .collect();
        assert_eq!(texts, vec!["Hello", ", ", "world!"]);
    }
}
