use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::chat;
use crate::models::{ChatSummary, Session};
use crate::storage;

/// Which screen the shell is showing to the right of the sidebar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Section {
    Chats,
    Contacts,
}

/// Shared application state, provided via Leptos context.
///
/// The shell owns the session, theme, section and the conversation summary
/// collection. The open conversation's message sequence is NOT here: the
/// chat window owns it and rebuilds it whenever the selection changes.
#[derive(Clone)]
pub struct AppState {
    // --- Read signals (for components to subscribe to) ---
    pub session: ReadSignal<Option<Session>>,
    pub dark_mode: ReadSignal<bool>,
    pub section: ReadSignal<Section>,
    pub chats: ReadSignal<Vec<ChatSummary>>,
    pub selected_chat: ReadSignal<Option<ChatSummary>>,
    pub chats_loading: ReadSignal<bool>,
    pub sidebar_open: ReadSignal<bool>,

    // --- Write signals (for mutating state) ---
    pub set_session: WriteSignal<Option<Session>>,
    pub set_dark_mode: WriteSignal<bool>,
    pub set_section: WriteSignal<Section>,
    pub set_chats: WriteSignal<Vec<ChatSummary>>,
    pub set_selected_chat: WriteSignal<Option<ChatSummary>>,
    pub set_chats_loading: WriteSignal<bool>,
    pub set_sidebar_open: WriteSignal<bool>,
}

impl AppState {
    /// Create a new `AppState`, restore any persisted session and theme,
    /// and provide it in the current Leptos context.
    pub fn provide() -> Self {
        let (session, set_session) = signal(storage::load_session());
        let (dark_mode, set_dark_mode) = signal(storage::load_theme());
        let (section, set_section) = signal(Section::Chats);
        let (chats, set_chats) = signal(Vec::<ChatSummary>::new());
        let (selected_chat, set_selected_chat) = signal(None::<ChatSummary>);
        let (chats_loading, set_chats_loading) = signal(false);
        let (sidebar_open, set_sidebar_open) = signal(false);

        let state = Self {
            session,
            dark_mode,
            section,
            chats,
            selected_chat,
            chats_loading,
            sidebar_open,
            set_session,
            set_dark_mode,
            set_section,
            set_chats,
            set_selected_chat,
            set_chats_loading,
            set_sidebar_open,
        };

        apply_theme(dark_mode.get_untracked());
        provide_context(state.clone());
        state
    }

    /// Activate a freshly authenticated session and persist it.
    pub fn login_success(&self, session: Session) {
        storage::save_session(&session);
        self.set_session.set(Some(session));
        self.refresh_chats();
    }

    /// Log out after interactive confirmation. Clears durable storage and
    /// resets every signal to the logged-out defaults.
    pub fn logout(&self) {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message("Выйти из аккаунта?").ok())
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        storage::clear_session();
        self.set_session.set(None);
        self.set_chats.set(Vec::new());
        self.set_selected_chat.set(None);
        self.set_section.set(Section::Chats);
        self.set_sidebar_open.set(false);
    }

    /// Replace the whole conversation list with a fresh server snapshot.
    ///
    /// Called on session activation and again after every confirmed send,
    /// so unread counts and last-message previews catch up one round trip
    /// later. Failures are logged and the stale list stays on screen.
    pub fn refresh_chats(&self) {
        let Some(session) = self.session.get_untracked() else {
            return;
        };
        let state = self.clone();
        self.set_chats_loading.set(true);
        spawn_local(async move {
            match api::fetch_chats(session.user.id).await {
                Ok(chats) => state.set_chats.set(chats),
                Err(e) => log::error!("Failed to refresh chats: {e}"),
            }
            state.set_chats_loading.set(false);
        });
    }

    /// Select a conversation. The chat window reacts to the identity
    /// change and fetches the history itself.
    pub fn select_chat(&self, chat: ChatSummary) {
        self.set_selected_chat.set(Some(chat));
    }

    /// Open a conversation with a directory user: reuse the existing
    /// summary when one is already in the list, otherwise resolve the
    /// profile and hand the chat window a synthetic summary that the
    /// first send will establish server-side.
    pub fn start_chat(&self, peer_id: i64) {
        if let Some(existing) = chat::find_chat_with(&self.chats.get_untracked(), peer_id) {
            self.set_selected_chat.set(Some(existing.clone()));
            self.set_section.set(Section::Chats);
            return;
        }

        let state = self.clone();
        spawn_local(async move {
            match api::fetch_user(peer_id).await {
                Ok(peer) => {
                    state
                        .set_selected_chat
                        .set(Some(chat::synthesize_chat(&peer)));
                    state.set_section.set(Section::Chats);
                }
                Err(e) => log::error!("Failed to resolve user {peer_id}: {e}"),
            }
        });
    }

    /// Flip the dark/light preference, persist it, and restyle the page.
    pub fn toggle_theme(&self) {
        let dark = !self.dark_mode.get_untracked();
        self.set_dark_mode.set(dark);
        storage::save_theme(dark);
        apply_theme(dark);
    }
}

/// Toggles the `dark` class on `<body>`.
fn apply_theme(dark: bool) {
    let Some(body) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
    else {
        return;
    };
    let _ = if dark {
        body.class_list().add_1("dark")
    } else {
        body.class_list().remove_1("dark")
    };
}
