//! Provider-neutral chat runtime: one request/stream/error contract,
//! implemented once per vendor by the `relay-llm-*` provider crates.

pub mod error;
pub mod message;
pub mod provider;
pub mod request;
pub mod response;
pub mod schema;
pub mod stream;
pub mod transport;

pub use error::{ErrorDetail, ErrorKind, RuntimeError};
pub use message::{ChatMessage, ContentPart, DataUri, MessageContent, Role};
pub use provider::{ChatProvider, ChatProviderBackend};
pub use request::{ChatOptions, ChatRequest, RequestBuilder, request};
pub use response::{ChatResult, ChatStream};
pub use schema::{Property, Schema, ToolDefinition};
pub use stream::{FinishReason, StreamChunk, ToolCallChunk, Usage, tee_debug};
pub use transport::{
    ByteStream, HttpTransport, StreamingTransport, TransportFailure, TransportRequest,
};
