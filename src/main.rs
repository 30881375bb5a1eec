mod api;
mod chat;
mod components;
mod error;
mod models;
mod state;
mod storage;

use leptos::mount::mount_to_body;
use leptos::prelude::*;

use components::auth::AuthScreen;
use components::chat_list::ChatList;
use components::chat_window::ChatWindow;
use components::contacts::ContactsSection;
use components::sidebar::Sidebar;
use state::{AppState, Section};

/// Root application component: restores any persisted session and routes
/// between the auth screen and the messaging shell.
#[component]
fn App() -> impl IntoView {
    let state = AppState::provide();

    // A restored session is trusted without revalidation; a dead token
    // shows up as failed authenticated calls, not a blocked startup.
    if state.session.get_untracked().is_some() {
        state.refresh_chats();
    }

    view! {
        {move || {
            if state.session.get().is_some() {
                view! { <Shell /> }.into_any()
            } else {
                view! { <AuthScreen /> }.into_any()
            }
        }}
    }
}

/// Authenticated shell: sidebar plus the active section.
#[component]
fn Shell() -> impl IntoView {
    let state = expect_context::<AppState>();

    view! {
        <div class="app-container">
            <Sidebar />
            {move || match state.section.get() {
                Section::Chats => view! {
                    <div class="chat-layout">
                        <ChatList />
                        <ChatWindow />
                    </div>
                }
                .into_any(),
                Section::Contacts => view! { <ContactsSection /> }.into_any(),
            }}
        </div>
    }
}

fn main() {
    console_log::init_with_level(log::Level::Debug).expect("Failed to init logger");
    mount_to_body(App);
}
