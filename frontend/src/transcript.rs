use crate::models::{ChatMessage, Sender};
use crate::storage::ChatStore;

pub const WELCOME_MESSAGE: &str =
    "Hello! I'm your Gemini-powered chatbot. How can I assist you today?";
pub const THINKING_MESSAGE: &str = "Thinking...";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntryId(u64);

/// A bubble currently on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
    pub id: EntryId,
    pub message: ChatMessage,
    /// Placeholder shown while a reply is outstanding; never persisted.
    pub pending: bool,
}

/// Handle for an outstanding "thinking" placeholder. Consumed by [`Transcript::resolve`].
#[derive(Debug)]
pub struct PendingId(EntryId);

/// The chat transcript: what is on screen plus the persisted message sequence.
///
/// Every mutation of the persisted sequence is written straight through to the store.
/// The welcome bubble is display-only and appears whenever the sequence is empty.
pub struct Transcript<S> {
    store: S,
    history: Vec<ChatMessage>,
    entries: Vec<Entry>,
    next_id: u64,
}

impl<S: ChatStore> Transcript<S> {
    /// Reads the stored sequence and replays it without writing anything back.
    pub fn load(store: S) -> Self {
        let history = store.load();
        let mut transcript = Self { store, history, entries: Vec::new(), next_id: 0 };
        transcript.render();
        transcript
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[cfg(test)]
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn is_pending(&self) -> bool {
        self.entries.iter().any(|e| e.pending)
    }

    pub fn push(&mut self, sender: Sender, text: impl Into<String>) {
        let message = ChatMessage::new(sender, text);
        self.history.push(message.clone());
        self.store.save(&self.history);
        self.display(message, false);
    }

    pub fn begin_pending(&mut self) -> PendingId {
        let id = self.display(ChatMessage::new(Sender::Bot, THINKING_MESSAGE), true);
        PendingId(id)
    }

    /// Swaps the placeholder for the bot's reply.
    pub fn resolve(&mut self, pending: PendingId, reply: impl Into<String>) {
        self.entries.retain(|e| e.id != pending.0);
        self.push(Sender::Bot, reply);
    }

    /// Empties the transcript, leaving an empty sequence in storage.
    ///
    /// Storage holds `[]` afterwards; the welcome bubble that `render` shows is not written.
    pub fn clear(&mut self) {
        self.history.clear();
        self.store.save(&self.history);
        self.render();
    }

    /// Empties the transcript and removes the stored key altogether.
    pub fn delete_history(&mut self) {
        self.history.clear();
        self.store.remove();
        self.render();
    }

    fn render(&mut self) {
        self.entries.clear();
        if self.history.is_empty() {
            self.display(ChatMessage::new(Sender::Bot, WELCOME_MESSAGE), false);
            return;
        }
        for message in self.history.clone() {
            self.display(message, false);
        }
    }

    fn display(&mut self, message: ChatMessage, pending: bool) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, message, pending });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;

    fn shown(t: &Transcript<MemoryStore>) -> Vec<ChatMessage> {
        t.entries().iter().map(|e| e.message.clone()).collect()
    }

    fn welcome() -> ChatMessage {
        ChatMessage::new(Sender::Bot, WELCOME_MESSAGE)
    }

    #[test]
    fn empty_store_shows_welcome_only() {
        let store = MemoryStore::default();
        let t = Transcript::load(store.clone());
        assert_eq!(shown(&t), vec![welcome()]);
        assert!(t.history().is_empty());
        assert_eq!(store.raw(), None);
    }

    #[test]
    fn replay_matches_stored_sequence_without_writing() {
        let stored = r#"[{"sender":"user","text":"hi"},{"sender":"bot","text":"Hello!"}]"#;
        let store = MemoryStore::with_raw(stored);
        let t = Transcript::load(store.clone());

        assert_eq!(
            shown(&t),
            vec![ChatMessage::new(Sender::User, "hi"), ChatMessage::new(Sender::Bot, "Hello!")]
        );
        assert_eq!(store.raw().as_deref(), Some(stored));
    }

    #[test]
    fn appended_messages_survive_reload() {
        let store = MemoryStore::default();
        let mut t = Transcript::load(store.clone());
        t.push(Sender::User, "What is Rust?");
        t.push(Sender::Bot, "A systems language.");

        let reloaded = Transcript::load(store);
        assert_eq!(reloaded.history(), t.history());
        assert_eq!(shown(&reloaded), t.history().to_vec());
    }

    #[test]
    fn placeholder_is_shown_but_not_persisted() {
        let store = MemoryStore::default();
        let mut t = Transcript::load(store.clone());
        t.push(Sender::User, "hi");
        let pending = t.begin_pending();

        assert!(t.is_pending());
        assert_eq!(t.entries().last().unwrap().message.text, THINKING_MESSAGE);
        assert_eq!(Transcript::load(store.clone()).history().len(), 1);

        t.resolve(pending, "Hey!");
        assert!(!t.is_pending());
        assert!(t.entries().iter().all(|e| e.message.text != THINKING_MESSAGE));
        assert_eq!(
            Transcript::load(store).history(),
            &[ChatMessage::new(Sender::User, "hi"), ChatMessage::new(Sender::Bot, "Hey!")]
        );
    }

    #[test]
    fn resolve_removes_placeholder_by_handle_not_text() {
        let mut t = Transcript::load(MemoryStore::default());
        t.push(Sender::User, THINKING_MESSAGE);
        let pending = t.begin_pending();
        t.resolve(pending, "Still here.");

        let texts: Vec<_> = t.entries().iter().map(|e| e.message.text.as_str()).collect();
        assert_eq!(texts, vec![WELCOME_MESSAGE, THINKING_MESSAGE, "Still here."]);
    }

    #[test]
    fn clear_leaves_empty_sequence_in_storage() {
        let store = MemoryStore::default();
        let mut t = Transcript::load(store.clone());
        t.push(Sender::User, "hi");
        t.clear();

        assert_eq!(store.raw().as_deref(), Some("[]"));
        assert_eq!(shown(&t), vec![welcome()]);
    }

    #[test]
    fn delete_history_removes_the_key() {
        let store = MemoryStore::default();
        let mut t = Transcript::load(store.clone());
        t.push(Sender::User, "hi");
        t.delete_history();

        assert_eq!(store.raw(), None);
        assert_eq!(shown(&t), vec![welcome()]);
    }
}
