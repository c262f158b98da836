use relay_llm::ChatMessage;

/// Pick the backend model variant for a request.
///
/// A `-vision` variant with no image content downgrades to its text sibling
/// (`gemini-pro-vision` → `gemini-pro`); any image part keeps the requested
/// model. Pure and idempotent.
pub fn effective_model(requested: &str, messages: &[ChatMessage]) -> String {
    if let Some(base) = requested.strip_suffix("-vision")
        && !messages.iter().any(ChatMessage::has_image)
    {
        return base.to_string();
    }
    requested.to_string()
}
