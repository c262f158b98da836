//! Converts relay-llm neutral types into the Chat Completions wire format.
//!
//! Roles map one-to-one and remote image URLs are legal here; the
//! inline-data-only restriction belongs to providers that require it.

use relay_llm::{ChatRequest, ContentPart, MessageContent, Role};

use crate::types::{
    ChatCompletionRequest, ImageUrl, StreamOptions, WireContent, WireFunction, WireMessage,
    WirePart, WireRole, WireTool,
};

pub fn build_request(model: &str, request: &ChatRequest) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        messages: request.messages.iter().map(convert_message).collect(),
        stream: true,
        stream_options: Some(StreamOptions {
            include_usage: true,
        }),
        temperature: request.options.temperature,
        top_p: request.options.top_p,
        max_tokens: request.options.max_tokens,
        stop: request.options.stop.clone(),
        tools: request
            .tools
            .iter()
            .map(|tool| WireTool::Function {
                function: WireFunction {
                    name: tool.name.clone(),
                    description: tool.description.clone(),
                    parameters: tool.parameters.to_json_schema(),
                },
            })
            .collect(),
    }
}

fn convert_message(message: &relay_llm::ChatMessage) -> WireMessage {
    let role = match message.role {
        Role::System => WireRole::System,
        Role::User => WireRole::User,
        Role::Assistant => WireRole::Assistant,
    };

    let content = match &message.content {
        MessageContent::Text(text) => WireContent::Text(text.clone()),
        MessageContent::Parts(parts) => WireContent::Parts(
            parts
                .iter()
                .map(|part| match part {
                    ContentPart::Text { text } => WirePart::Text { text: text.clone() },
                    ContentPart::Image { url } => WirePart::ImageUrl {
                        image_url: ImageUrl { url: url.clone() },
                    },
                })
                .collect(),
        ),
    };

    WireMessage { role, content }
}
