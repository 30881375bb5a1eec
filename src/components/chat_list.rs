use leptos::prelude::*;

use crate::chat::clock_from_timestamp;
use crate::state::AppState;

/// Conversation list: summaries with presence, preview, unread badge and a
/// client-side filter box. The collection itself is owned by [`AppState`]
/// and replaced wholesale on every refresh.
#[component]
pub fn ChatList() -> impl IntoView {
    let state = expect_context::<AppState>();

    let (filter, set_filter) = signal(String::new());

    let visible_chats = {
        let state = state.clone();
        move || {
            let needle = filter.get().trim().to_lowercase();
            let chats = state.chats.get();
            if needle.is_empty() {
                chats
            } else {
                chats
                    .into_iter()
                    .filter(|c| c.display_name.to_lowercase().contains(&needle))
                    .collect()
            }
        }
    };

    let open_sidebar = {
        let state = state.clone();
        move |_| state.set_sidebar_open.set(true)
    };

    view! {
        <div class="chat-list">
            <div class="chat-list-header">
                <div class="chat-list-top">
                    <button class="icon-btn" on:click=open_sidebar>
                        "☰"
                    </button>
                    <h1 class="app-title">"Tulatalk"</h1>
                </div>
                <input
                    class="search-input"
                    placeholder="Поиск чатов…"
                    prop:value=filter
                    on:input=move |ev| set_filter.set(event_target_value(&ev))
                />
            </div>

            <div class="chat-list-body">
                {
                    let state = state.clone();
                    move || {
                        if state.chats_loading.get() && state.chats.get().is_empty() {
                            return view! { <div class="list-hint">"Загрузка…"</div> }.into_any();
                        }
                        if visible_chats().is_empty() {
                            return view! { <div class="list-hint">"Нет чатов"</div> }.into_any();
                        }
                        let state = state.clone();
                        view! {
                            <For
                                each=visible_chats.clone()
                                key=|c| c.other_user_id
                                let:chat
                            >
                                {
                                    let state = state.clone();
                                    let row_state = state.clone();
                                    let selected = chat.clone();
                                    let peer_id = chat.other_user_id;
                                    let online = chat.online;
                                    let unread = chat.unread_count;
                                    let time = chat
                                        .last_message_time
                                        .as_deref()
                                        .map(clock_from_timestamp)
                                        .unwrap_or_default();
                                    let preview = chat.last_message.clone().unwrap_or_default();
                                    view! {
                                        <button
                                            class="chat-row"
                                            class:active=move || {
                                                state
                                                    .selected_chat
                                                    .get()
                                                    .is_some_and(|s| s.other_user_id == peer_id)
                                            }
                                            on:click=move |_| row_state.select_chat(selected.clone())
                                        >
                                            <div class="avatar-wrap">
                                                <div class="avatar">{chat.avatar.clone()}</div>
                                                <Show when=move || online>
                                                    <span class="online-dot"></span>
                                                </Show>
                                            </div>
                                            <div class="chat-row-main">
                                                <div class="chat-row-top">
                                                    <span class="chat-name">{chat.display_name.clone()}</span>
                                                    <span class="chat-time">{time}</span>
                                                </div>
                                                <p class="chat-preview">{preview}</p>
                                            </div>
                                            <Show when={move || unread > 0}>
                                                <span class="unread-badge">{unread}</span>
                                            </Show>
                                        </button>
                                    }
                                }
                            </For>
                        }
                        .into_any()
                    }
                }
            </div>
        </div>
    }
}
