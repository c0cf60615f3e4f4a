use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::models::Sender;
use crate::storage::LocalStorageStore;
use crate::transcript::{Entry, Transcript};

/// Shared application state, provided via Leptos context.
#[derive(Clone, Copy)]
pub struct AppState {
    pub transcript: ReadSignal<Transcript<LocalStorageStore>>,
    set_transcript: WriteSignal<Transcript<LocalStorageStore>>,
}

impl AppState {
    /// Load the stored transcript and provide the state in the current Leptos context.
    pub fn provide() -> Self {
        let (transcript, set_transcript) = signal(Transcript::load(LocalStorageStore::default()));

        let state = Self { transcript, set_transcript };
        provide_context(state);
        state
    }

    /// True while a reply placeholder is on screen.
    pub fn is_sending(&self) -> bool {
        self.transcript.with(|t| t.is_pending())
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.transcript.with(|t| t.entries().to_vec())
    }

    /// Append the user's message, show a placeholder, and ask the relay.
    pub fn send_message(&self, text: String) {
        if self.transcript.with_untracked(|t| t.is_pending()) {
            return;
        }

        let mut pending = None;
        self.set_transcript.update(|t| {
            t.push(Sender::User, text.clone());
            pending = Some(t.begin_pending());
        });
        let Some(pending) = pending else { return };

        let set_transcript = self.set_transcript;
        spawn_local(async move {
            let reply = api::ask_relay(&text).await;
            set_transcript.update(|t| t.resolve(pending, reply));
        });
    }

    pub fn clear(&self) {
        self.set_transcript.update(|t| t.clear());
    }

    pub fn delete_history(&self) {
        self.set_transcript.update(|t| t.delete_history());
    }
}
