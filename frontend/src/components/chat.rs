use leptos::ev;
use leptos::prelude::*;

use crate::models::Sender;
use crate::state::AppState;

/// Main chat area: toolbar, transcript, and input form.
#[component]
pub fn ChatArea() -> impl IntoView {
    let state = expect_context::<AppState>();
    let is_sending = move || state.is_sending();

    view! {
        <main class="chat-area">
            <div class="chat-header">
                <h2>"Gemini Chat"</h2>
                <div class="chat-actions">
                    <button on:click=move |_| state.clear() disabled=is_sending>
                        "Clear chat"
                    </button>
                    <button on:click=move |_| state.delete_history() disabled=is_sending>
                        "Delete history"
                    </button>
                </div>
            </div>

            <div class="messages-container">
                <For
                    each=move || state.entries()
                    key=|entry| entry.id
                    let:entry
                >
                    <MessageBubble
                        sender=entry.message.sender
                        text=entry.message.text.clone()
                        pending=entry.pending
                    />
                </For>
            </div>

            <ChatInput />
        </main>
    }
}

/// A single chat bubble.
#[component]
fn MessageBubble(sender: Sender, text: String, pending: bool) -> impl IntoView {
    let row_class = match sender {
        Sender::User => "message user",
        Sender::Bot => "message bot",
    };
    let bubble_class = if pending { "bubble thinking" } else { "bubble" };

    view! {
        <div class=row_class>
            <span class=bubble_class>{text}</span>
        </div>
    }
}

#[component]
fn ChatInput() -> impl IntoView {
    let state = expect_context::<AppState>();
    let (input, set_input) = signal(String::new());

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let text = input.get_untracked();
        if text.trim().is_empty() || state.transcript.with_untracked(|t| t.is_pending()) {
            return;
        }
        set_input.set(String::new());
        state.send_message(text);
    };

    view! {
        <form class="input-row" on:submit=on_submit>
            <input
                type="text"
                placeholder="Type your message…"
                autocomplete="off"
                prop:value=input
                on:input=move |ev| set_input.set(event_target_value(&ev))
            />
            <button
                type="submit"
                class="send-btn"
                disabled=move || state.is_sending() || input.get().trim().is_empty()
            >
                {move || if state.is_sending() { "Sending…" } else { "Send" }}
            </button>
        </form>
    }
}
