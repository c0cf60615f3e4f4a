use crate::models::ChatMessage;

/// Key under which the transcript lives in browser storage.
pub const CHAT_HISTORY_KEY: &str = "chatbot_history";

/// Where the transcript is kept between page loads.
pub trait ChatStore {
    /// Returns an empty sequence when nothing is stored or the blob is unreadable.
    fn load(&self) -> Vec<ChatMessage>;
    fn save(&self, messages: &[ChatMessage]);
    fn remove(&self);
}

fn decode(raw: Option<String>) -> Vec<ChatMessage> {
    raw.and_then(|json| match serde_json::from_str(&json) {
        Ok(messages) => Some(messages),
        Err(e) => {
            log::warn!("Discarding unreadable chat history: {e}");
            None
        }
    })
    .unwrap_or_default()
}

/// `window.localStorage`, one JSON array under [`CHAT_HISTORY_KEY`].
#[derive(Clone, Copy, Debug)]
pub struct LocalStorageStore {
    key: &'static str,
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self { key: CHAT_HISTORY_KEY }
    }
}

impl LocalStorageStore {
    fn storage(&self) -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl ChatStore for LocalStorageStore {
    fn load(&self) -> Vec<ChatMessage> {
        let raw = self
            .storage()
            .and_then(|s| s.get_item(self.key).ok().flatten());
        decode(raw)
    }

    fn save(&self, messages: &[ChatMessage]) {
        let Some(storage) = self.storage() else {
            log::error!("localStorage is not available; chat history not saved");
            return;
        };
        match serde_json::to_string(messages) {
            Ok(json) => {
                if let Err(e) = storage.set_item(self.key, &json) {
                    log::error!("Failed to save chat history: {e:?}");
                }
            }
            Err(e) => log::error!("Failed to serialize chat history: {e}"),
        }
    }

    fn remove(&self) {
        if let Some(storage) = self.storage() {
            if let Err(e) = storage.remove_item(self.key) {
                log::error!("Failed to delete chat history: {e:?}");
            }
        }
    }
}
