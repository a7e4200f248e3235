//! Public types for the chat API
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "assistant")]
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One follow-up turn in an interaction's chat thread.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub interaction_id: String,
    pub role: Role,
    pub content: String,
    pub tokens: i64,
    pub cost: f64,
    pub created_at: String,
}

#[derive(Deserialize)]
pub struct ChatRequest {
    pub interaction_id: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatThreadResponse {
    pub interaction_id: String,
    pub messages: Vec<ChatMessage>,
}
