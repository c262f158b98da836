use crate::message::ChatMessage;
use crate::schema::ToolDefinition;

/// The frozen, built request — produced by a builder, read (never mutated)
/// by the provider for the duration of one call.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolDefinition>,
    pub options: ChatOptions,
}

/// Knobs that control generation behavior.
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub top_p: Option<f64>,
    pub stop: Option<Vec<String>>,
}

/// Convenience entry point: `relay_llm::request("gemini-pro")`.
pub fn request(model: impl Into<String>) -> RequestBuilder {
    RequestBuilder {
        model: model.into(),
        messages: Vec::new(),
        tools: Vec::new(),
        options: ChatOptions::default(),
    }
}

/// Provider-agnostic request builder.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    model: String,
    messages: Vec<ChatMessage>,
    tools: Vec<ToolDefinition>,
    options: ChatOptions,
}

impl RequestBuilder {
    pub fn system(&mut self, text: impl Into<String>) -> &mut Self {
        self.messages.push(ChatMessage::system(text));
        self
    }

    pub fn user(&mut self, text: impl Into<String>) -> &mut Self {
        self.messages.push(ChatMessage::user(text));
        self
    }

    pub fn assistant(&mut self, text: impl Into<String>) -> &mut Self {
        self.messages.push(ChatMessage::assistant(text));
        self
    }

    pub fn message(&mut self, message: ChatMessage) -> &mut Self {
        self.messages.push(message);
        self
    }

    pub fn messages(&mut self, messages: impl IntoIterator<Item = ChatMessage>) -> &mut Self {
        self.messages.extend(messages);
        self
    }

    pub fn tool(&mut self, tool: ToolDefinition) -> &mut Self {
        self.tools.push(tool);
        self
    }

    pub fn temperature(&mut self, t: f64) -> &mut Self {
        self.options.temperature = Some(t);
        self
    }

    pub fn max_tokens(&mut self, n: u32) -> &mut Self {
        self.options.max_tokens = Some(n);
        self
    }

    pub fn top_p(&mut self, p: f64) -> &mut Self {
        self.options.top_p = Some(p);
        self
    }

    pub fn stop(&mut self, sequences: Vec<String>) -> &mut Self {
        self.options.stop = Some(sequences);
        self
    }

    pub fn build(self) -> ChatRequest {
        self.into()
    }
}

impl From<RequestBuilder> for ChatRequest {
    fn from(b: RequestBuilder) -> Self {
        ChatRequest {
            model: b.model,
            messages: b.messages,
            tools: b.tools,
            options: b.options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;

    #[test]
    fn builder_collects_messages_in_order() {
        let mut b = request("gemini-pro");
        b.system("be terse").user("Hello").assistant("Hi").temperature(0.2);
        let req = b.build();

        assert_eq!(req.model, "gemini-pro");
        assert_eq!(req.options.temperature, Some(0.2));
        let roles: Vec<Role> = req.messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
    }
}
