use std::sync::Arc;

use tracing::{debug, warn};

use crate::agent::ReplyAgent;
use crate::db::ConversationStore;
use crate::errors::AppError;
use crate::models::ConversationRecord;
use crate::service::prompt::Prompt;

pub const FALLBACK_REPLY: &str = "Sorry, I couldn't get a response.";
const HISTORY_LIMIT: i64 = 100;

/// Forwards one message upstream and records the exchange.
///
/// Both collaborators are optional: a missing agent means no credential was
/// configured, a missing store means persistence is skipped.
#[derive(Clone)]
pub struct RelayService {
    agent: Option<Arc<dyn ReplyAgent>>,
    store: Option<Arc<dyn ConversationStore>>,
}

impl RelayService {
    pub fn new(
        agent: Option<Arc<dyn ReplyAgent>>,
        store: Option<Arc<dyn ConversationStore>>,
    ) -> Self {
        Self { agent, store }
    }

    pub async fn relay(&self, message: Option<&str>) -> Result<String, AppError> {
        let message = match message {
            Some(m) if !m.trim().is_empty() => m,
            _ => return Err(AppError::MissingInput),
        };
        let agent = self.agent.as_ref().ok_or(AppError::MissingCredential)?;

        let prompt = Prompt::for_message(message);
        debug!("Relaying {:?} prompt ({} chars)", prompt.kind, prompt.text.len());

        let upstream = agent
            .generate(&prompt)
            .await?
            .unwrap_or_else(|| FALLBACK_REPLY.to_string());
        let reply = prompt.finish(upstream);

        if let Some(store) = &self.store {
            let record = ConversationRecord::new(message.to_string(), reply.clone());
            if let Err(e) = store.insert(&record).await {
                warn!("Reply delivered without persisting the exchange: {e}");
            }
        }

        Ok(reply)
    }

    pub async fn history(&self) -> Result<Vec<ConversationRecord>, AppError> {
        let store = self.store.as_ref().ok_or(AppError::StoreUnavailable)?;
        store.find_recent(HISTORY_LIMIT).await
    }
}
