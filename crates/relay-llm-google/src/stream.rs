//! Consumes the vendor SSE stream and re-emits canonical chunks.
//!
//! Pull-driven from the caller, push-driven from the network; only the
//! in-flight event is held at a time. Dropping the returned stream drops the
//! transport stream, which releases the connection.

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
use crate::types::{GenerateContentResponse, Part};

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
        let mut mapper = ResponseMapper::default();

        while let Some(event) = events.next().await {
            let event = event.map_err(classify_sse_error)?;
            let response: GenerateContentResponse = serde_json::from_str(&event.data)
                .map_err(|e| {
                    RuntimeError::transport(
                        PROVIDER,
                        format!("malformed stream payload: {e}"),
                    )
                })?;
            for chunk in mapper.map_response(response) {
                yield chunk;
            }
        }

        yield mapper.finish();
    }
}

fn classify_sse_error(error: EventStreamError<TransportFailure>) -> RuntimeError {
    match error {
        EventStreamError::Transport(failure) => classify_failure(&failure),
        other => RuntimeError::transport(PROVIDER, other.to_string()),
    }
}

/// Stateful mapper from streamed `GenerateContentResponse` fragments to
/// canonical chunks. Tracks tool calls and the final finish reason; emits
/// exactly one `Finish` when the vendor stream completes.
#[derive(Default)]
pub(crate) struct ResponseMapper {
    tool_call_ordinal: usize,
    saw_tool_call: bool,
    finish_reason: Option<FinishReason>,
    usage: Option<Usage>,
}

impl ResponseMapper {
    pub(crate) fn map_response(&mut self, response: GenerateContentResponse) -> Vec<StreamChunk> {
        let mut chunks = Vec::new();

        if let Some(usage) = response.usage_metadata {
            self.usage = Some(Usage {
                input_tokens: usage.prompt_token_count,
                output_tokens: usage.candidates_token_count,
            });
        }

        let Some(candidate) = response.candidates.into_iter().next() else {
            return chunks;
        };

        if let Some(content) = candidate.content {
            for part in content.parts {
                match part {
                    Part::Text { text } => {
                        if !text.is_empty() {
                            chunks.push(StreamChunk::Text(text));
                        }
                    }
                    Part::FunctionCall { function_call } => {
                        let ordinal = self.tool_call_ordinal;
                        self.tool_call_ordinal += 1;
                        self.saw_tool_call = true;
                        chunks.push(StreamChunk::ToolCall(ToolCallChunk {
                            id: format!("{}-{}", function_call.name, ordinal),
                            name: function_call.name,
                            arguments: function_call.args.to_string(),
                        }));
                    }
                    // Inline data never flows back on this endpoint.
                    Part::InlineData { .. } => {}
                }
            }
        }

        if let Some(reason) = candidate.finish_reason {
            self.finish_reason = Some(map_finish_reason(&reason));
        }

        chunks
    }

    pub(crate) fn finish(&mut self) -> StreamChunk {
        let reason = match self.finish_reason.take() {
            Some(FinishReason::Stop) | None if self.saw_tool_call => FinishReason::ToolCalls,
            Some(reason) => reason,
            None => FinishReason::Stop,
        };
        StreamChunk::Finish {
            reason,
            usage: self.usage.take(),
        }
    }
}

fn map_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "STOP" => FinishReason::Stop,
        "MAX_TOKENS" => FinishReason::Length,
        "SAFETY" | "RECITATION" | "PROHIBITED_CONTENT" | "BLOCKLIST" => FinishReason::ContentFilter,
        other => FinishReason::Other(other.to_string()),
    }
}
