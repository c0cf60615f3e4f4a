use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed exchange, as written to the conversation store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ConversationRecord {
    #[serde(rename = "user")]
    pub user_text: String,
    #[serde(rename = "bot")]
    pub bot_text: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationRecord {
    pub fn new(user_text: String, bot_text: String) -> Self {
        Self { user_text, bot_text, timestamp: Utc::now() }
    }
}

#[derive(Debug, Deserialize)]
pub struct RelayRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RelayResponse {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<ConversationRecord>,
}
