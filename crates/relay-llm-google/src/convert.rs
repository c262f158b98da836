//! Converts relay-llm neutral types into the Generative Language wire format.
//!
//! Everything here runs before any transport call; translation failures are
//! caller input errors, never network errors.

use std::collections::BTreeMap;

use relay_llm::{
    ChatMessage, ChatRequest, ContentPart, DataUri, MessageContent, Role, RuntimeError,
    ToolDefinition,
};
use serde_json::Value;

use crate::PROVIDER;
use crate::types::{
    Blob, Content, DeclarationSchema, FunctionDeclaration, GenerateContentRequest,
    GenerationConfig, GoogleTool, Part, SchemaType,
};

/// Model families exempt from the strict user/model alternation rules.
///
/// Keyed on a model-name substring, matching how the backend itself gates
/// the behavior. New model names may misclassify; revisit when the family
/// list grows.
const STRICT_ALTERNATION_EXEMPT: &[&str] = &["gemini-1.5"];

fn requires_strict_alternation(model: &str) -> bool {
    !STRICT_ALTERNATION_EXEMPT
        .iter()
        .any(|family| model.contains(family))
}

/// Build the full wire request for the (already selected) effective model.
pub fn build_request(model: &str, request: &ChatRequest) -> Result<GenerateContentRequest, RuntimeError> {
    Ok(GenerateContentRequest {
        contents: build_contents(&request.messages, model)?,
        tools: build_tools(&request.tools),
        generation_config: Some(GenerationConfig {
            temperature: request.options.temperature,
            top_p: request.options.top_p,
            max_output_tokens: request.options.max_tokens,
            stop_sequences: request.options.stop.clone(),
        }),
    })
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Translate the neutral message sequence for the target model.
///
/// Strict-alternation families get two syntheses: a system message becomes a
/// user-role turn followed by an empty model turn, and a sequence ending on a
/// model turn gains a trailing empty user turn. Exempt families pass through
/// message-by-message.
pub fn build_contents(messages: &[ChatMessage], model: &str) -> Result<Vec<Content>, RuntimeError> {
    if !requires_strict_alternation(model) {
        return messages.iter().map(convert_message).collect();
    }

    let mut contents = Vec::with_capacity(messages.len() + 2);
    for message in messages {
        if message.role == Role::System {
            contents.push(Content {
                role: "user".into(),
                parts: vec![Part::Text {
                    text: message.text(),
                }],
            });
            contents.push(empty_turn("model"));
        } else {
            contents.push(convert_message(message)?);
        }
    }

    if contents.last().is_some_and(|c| c.role == "model") {
        contents.push(empty_turn("user"));
    }

    Ok(contents)
}

fn empty_turn(role: &str) -> Content {
    Content {
        role: role.into(),
        parts: vec![Part::Text { text: String::new() }],
    }
}

/// Map one neutral message to a wire content entry.
pub fn convert_message(message: &ChatMessage) -> Result<Content, RuntimeError> {
    let role = match message.role {
        Role::Assistant => "model",
        // No native system role; system text rides in a user turn.
        Role::User | Role::System => "user",
    };

    let parts = match &message.content {
        MessageContent::Text(text) => vec![Part::Text { text: text.clone() }],
        MessageContent::Parts(parts) => parts
            .iter()
            .map(convert_part)
            .collect::<Result<Vec<_>, _>>()?,
    };

    Ok(Content {
        role: role.into(),
        parts,
    })
}

/// Map one content part; image parts must carry inline data.
pub fn convert_part(part: &ContentPart) -> Result<Part, RuntimeError> {
    match part {
        ContentPart::Text { text } => Ok(Part::Text { text: text.clone() }),
        ContentPart::Image { url } => {
            let uri = DataUri::parse(url).ok_or_else(|| {
                RuntimeError::caller_input(
                    PROVIDER,
                    format!("image URL does not contain inline base64 data: {url}"),
                )
            })?;
            Ok(Part::InlineData {
                inline_data: Blob {
                    mime_type: uri.mime_type,
                    data: uri.data,
                },
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Tools
// ---------------------------------------------------------------------------

/// Translate tool definitions into function declarations. An empty list maps
/// to no `tools` field at all.
pub fn build_tools(tools: &[ToolDefinition]) -> Option<Vec<GoogleTool>> {
    if tools.is_empty() {
        return None;
    }
    Some(vec![GoogleTool {
        function_declarations: tools
            .iter()
            .map(|tool| FunctionDeclaration {
                name: tool.name.clone(),
                description: tool.description.clone(),
                parameters: Some(convert_schema(&tool.parameters.to_json_schema())),
            })
            .collect(),
    }])
}

/// Recursively map a JSON Schema node onto the declaration schema.
///
/// Keeps `description`, `properties`, `items`, and `required`; every other
/// keyword is dropped silently.
pub fn convert_schema(schema: &Value) -> DeclarationSchema {
    let schema_type = match schema.get("type").and_then(Value::as_str) {
        Some("string") => SchemaType::String,
        Some("number") => SchemaType::Number,
        Some("integer") => SchemaType::Integer,
        Some("boolean") => SchemaType::Boolean,
        Some("array") => SchemaType::Array,
        Some("object") => SchemaType::Object,
        _ => SchemaType::Unspecified,
    };

    let properties = schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .iter()
                .map(|(name, value)| (name.clone(), convert_schema(value)))
                .collect::<BTreeMap<_, _>>()
        });

    let items = schema
        .get("items")
        .map(|value| Box::new(convert_schema(value)));

    let required = schema.get("required").and_then(Value::as_array).map(|r| {
        r.iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect()
    });

    DeclarationSchema {
        schema_type,
        description: schema
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        properties,
        items,
        required,
    }
}
