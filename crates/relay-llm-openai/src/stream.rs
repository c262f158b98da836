//! Consumes the Chat Completions SSE stream and re-emits canonical chunks.
//!
//! Tool-call arguments arrive as fragments keyed by index; they are
//! assembled here and emitted as complete calls when the stream finishes.

use std::collections::BTreeMap;
use std::sync::Arc;

use eventsource_stream::{EventStreamError, Eventsource};
use futures::Stream;
use relay_llm::{
    FinishReason, RuntimeError, StreamChunk, StreamingTransport, ToolCallChunk, TransportFailure,
    TransportRequest, Usage,
};
use tokio_stream::StreamExt;

use crate::PROVIDER;
use crate::error::classify_failure;
use crate::types::ChatCompletionChunk;

const DONE_SENTINEL: &str = "[DONE]";

pub fn open(
    transport: Arc<dyn StreamingTransport>,
    request: TransportRequest,
) -> impl Stream<Item = Result<StreamChunk, RuntimeError>> + Send {
    async_stream::try_stream! {
        let bytes = transport
            .open(request)
            .await
            .map_err(|failure| classify_failure(&failure))?;

        let mut events = bytes.eventsource();
        let mut mapper = DeltaMapper::default();

        while let Some(event) = events.next().await {
            let event = event.map_err(classify_sse_error)?;
            if event.data.trim() == DONE_SENTINEL {
                break;
            }
            let chunk: ChatCompletionChunk = serde_json::from_str(&event.data)
                .map_err(|e| {
                    RuntimeError::transport(
                        PROVIDER,
                        format!("malformed stream payload: {e}"),
                    )
                })?;
            for mapped in mapper.map_chunk(chunk) {
                yield mapped;
            }
        }

        for trailing in mapper.finish() {
            yield trailing;
        }
    }
}

fn classify_sse_error(error: EventStreamError<TransportFailure>) -> RuntimeError {
    match error {
        EventStreamError::Transport(failure) => classify_failure(&failure),
        other => RuntimeError::transport(PROVIDER, other.to_string()),
    }
}

#[derive(Default)]
struct PendingCall {
    id: String,
    name: String,
    arguments: String,
}

/// Stateful mapper from completion-chunk deltas to canonical chunks.
#[derive(Default)]
pub(crate) struct DeltaMapper {
    pending_calls: BTreeMap<usize, PendingCall>,
    finish_reason: Option<FinishReason>,
    usage: Option<Usage>,
}

impl DeltaMapper {
    pub(crate) fn map_chunk(&mut self, chunk: ChatCompletionChunk) -> Vec<StreamChunk> {
        if let Some(usage) = chunk.usage {
            self.usage = Some(Usage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            });
        }

        let Some(choice) = chunk.choices.into_iter().next() else {
            return Vec::new();
        };

        let mut out = Vec::new();
        if let Some(text) = choice.delta.content
            && !text.is_empty()
        {
            out.push(StreamChunk::Text(text));
        }

        for delta in choice.delta.tool_calls.unwrap_or_default() {
            let pending = self.pending_calls.entry(delta.index).or_default();
            if let Some(id) = delta.id {
                pending.id = id;
            }
            if let Some(function) = delta.function {
                if let Some(name) = function.name {
                    pending.name = name;
                }
                if let Some(arguments) = function.arguments {
                    pending.arguments.push_str(&arguments);
                }
            }
        }

        if let Some(reason) = choice.finish_reason {
            self.finish_reason = Some(map_finish_reason(&reason));
        }

        out
    }

    /// Emit assembled tool calls (in index order) and the final finish chunk.
    pub(crate) fn finish(&mut self) -> Vec<StreamChunk> {
        let mut out: Vec<StreamChunk> = std::mem::take(&mut self.pending_calls)
            .into_values()
            .map(|call| {
                StreamChunk::ToolCall(ToolCallChunk {
                    id: call.id,
                    name: call.name,
                    arguments: call.arguments,
                })
            })
            .collect();

        out.push(StreamChunk::Finish {
            reason: self.finish_reason.take().unwrap_or(FinishReason::Stop),
            usage: self.usage.take(),
        });
        out
    }
}

fn map_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "stop" => FinishReason::Stop,
        "tool_calls" => FinishReason::ToolCalls,
        "length" => FinishReason::Length,
        "content_filter" => FinishReason::ContentFilter,
        other => FinishReason::Other(other.to_string()),
    }
}
