//! Chat completion request shape.
//!
//! The request body is rendered from a fixed template with the minimal
//! escaper instead of a serializer, so its exact bytes are predictable:
//!
//! ```json
//! {"model":"…","messages":[{"role":"system","content":"…"},{"role":"user","content":"…"}],"temperature":0.3}
//! ```

use nexus_core::defaults::TEMPERATURE;

use crate::escape::escape_json;

/// Fixed system persona sent ahead of every question.
pub const SYSTEM_PERSONA: &str = "Você é um assistente em português que responde de forma clara, organizada e objetiva usando apenas o contexto enviado.";

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::System => "system",
            ChatRole::User => "user",
        }
    }
}

/// A single chat message.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// Request body for the chat completions endpoint.
#[derive(Debug, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

impl ChatCompletionRequest {
    /// The one request shape nexus sends: system persona, then the prompt.
    pub fn for_prompt(model: &str, prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: ChatRole::System,
                    content: SYSTEM_PERSONA.to_string(),
                },
                ChatMessage {
                    role: ChatRole::User,
                    content: prompt.to_string(),
                },
            ],
            temperature: TEMPERATURE,
        }
    }

    /// Render the wire body.
    pub fn to_body(&self) -> String {
        let messages = self
            .messages
            .iter()
            .map(|m| {
                format!(
                    "{{\"role\":\"{}\",\"content\":\"{}\"}}",
                    m.role.as_str(),
                    escape_json(&m.content)
                )
            })
            .collect::<Vec<_>>()
            .join(",");

        format!(
            "{{\"model\":\"{}\",\"messages\":[{}],\"temperature\":{}}}",
            escape_json(&self.model),
            messages,
            self.temperature
        )
    }
}
