use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One bubble of the transcript, as persisted in browser storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    // older builds stored the text under `message`
    #[serde(alias = "message")]
    pub text: String,
}

impl ChatMessage {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self { sender, text: text.into() }
    }
}

/// Request body for `POST /api/gemini`.
#[derive(Clone, Debug, Serialize)]
pub struct RelayRequest {
    pub message: String,
}

/// Either shape the relay answers with: `{ reply }` or `{ error, details? }`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RelayReply {
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}
