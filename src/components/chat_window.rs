use gloo_timers::callback::Interval;
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::HtmlInputElement;

use crate::api;
use crate::chat::{
    self, ChatMessage, ChatStore, LoadSequencer, format_duration, message_from_row,
};
use crate::models::{ChatSummary, MessageKind};
use crate::state::AppState;

const STICKERS: [&str; 12] = [
    "🎉", "😂", "❤️", "👍", "🔥", "😍", "🤔", "😢", "👋", "🙏", "💪", "🥳",
];

/// Current clock as `HH:MM`, used for the optimistic side of a send. May
/// disagree with the timestamp the server eventually stores.
fn now_clock() -> String {
    let date = js_sys::Date::new_0();
    chat::format_clock(date.get_hours(), date.get_minutes())
}

/// The open conversation: history, composer, sticker picker, attach menu
/// and the voice-recorder placeholder.
///
/// This component exclusively owns the message sequence. Changing the
/// selected conversation discards it and triggers exactly one tagged
/// history fetch; a late response whose tag is no longer current is
/// dropped instead of overwriting the newer conversation.
#[component]
pub fn ChatWindow() -> impl IntoView {
    let state = expect_context::<AppState>();

    let store = RwSignal::new(ChatStore::new());
    let sequencer = StoredValue::new(LoadSequencer::new());
    let (loading, set_loading) = signal(false);
    let (input, set_input) = signal(String::new());
    let (show_stickers, set_show_stickers) = signal(false);
    let (show_attach, set_show_attach) = signal(false);
    // Some(elapsed seconds) while the voice recorder runs.
    let (recording, set_recording) = signal(None::<u32>);
    let ticker = StoredValue::new_local(None::<Interval>);

    // Refetch whenever the identity of the open conversation changes. The
    // key is (peer, server chat id); a synthetic conversation has no
    // server id and therefore no history to fetch.
    {
        let state = state.clone();
        Effect::new(move |prev: Option<Option<(i64, Option<i64>)>>| {
            let key = state
                .selected_chat
                .get()
                .map(|c| (c.other_user_id, c.chat_id));
            if prev == Some(key) {
                return key;
            }

            store.update(|s| s.clear());
            set_show_stickers.set(false);
            set_show_attach.set(false);
            let tag = sequencer.try_update_value(|s| s.begin());

            let (Some((_, Some(chat_id))), Some(tag)) = (key, tag) else {
                set_loading.set(false);
                return key;
            };
            let Some(session) = state.session.get_untracked() else {
                return key;
            };

            set_loading.set(true);
            spawn_local(async move {
                let result = api::fetch_messages(session.user.id, chat_id).await;
                let current = sequencer
                    .try_with_value(|s| s.accepts(tag))
                    .unwrap_or(false);
                if !current {
                    log::debug!("Dropping stale history response for chat {chat_id}");
                    return;
                }
                match result {
                    Ok(rows) => store.update(|s| {
                        s.replace(
                            rows.into_iter()
                                .map(|r| message_from_row(r, session.user.id))
                                .collect(),
                        )
                    }),
                    Err(e) => log::error!("Failed to load messages: {e}"),
                }
                set_loading.set(false);
            });

            key
        });
    }

    // Optimistic network send shared by text and sticker paths. Appends
    // with the client clock, then rolls the bubble back if the request
    // fails; `restore_input` gets the verbatim draft back into the box.
    let send_over_network = {
        let state = state.clone();
        move |content: String, kind: MessageKind, restore_input: Option<String>| {
            let Some(selected) = state.selected_chat.get_untracked() else {
                return;
            };
            let Some(session) = state.session.get_untracked() else {
                return;
            };

            let Some(local_id) =
                store.try_update(|s| s.push_local(kind, content.clone(), now_clock(), true, None))
            else {
                return;
            };

            let state = state.clone();
            spawn_local(async move {
                match api::send_message(session.user.id, selected.other_user_id, &content, kind)
                    .await
                {
                    Ok(_) => {
                        // One extra round trip so the list preview and the
                        // synthetic-conversation id catch up.
                        state.refresh_chats();
                    }
                    Err(e) => {
                        log::error!("Failed to send message: {e}");
                        store.update(|s| {
                            s.remove(local_id);
                        });
                        if let Some(draft) = restore_input {
                            set_input.set(draft);
                        }
                    }
                }
            });
        }
    };

    let send_text = {
        let send_over_network = send_over_network.clone();
        move || {
            let draft = input.get_untracked();
            let text = draft.trim().to_string();
            if text.is_empty() {
                return;
            }
            set_input.set(String::new());
            send_over_network(text, MessageKind::Text, Some(draft));
        }
    };

    let send_sticker = {
        let send_over_network = send_over_network.clone();
        move |emoji: &str| {
            set_show_stickers.set(false);
            send_over_network(emoji.to_string(), MessageKind::Sticker, None);
        }
    };

    // Image/video attachments stay local: no upload flow exists, the
    // bubble lives only until the conversation is reloaded.
    let attach_file = move |ev: ev::Event, kind: MessageKind| {
        set_show_attach.set(false);
        let input_el = event_target::<HtmlInputElement>(&ev);
        let Some(file) = input_el.files().and_then(|fs| fs.get(0)) else {
            return;
        };
        input_el.set_value("");
        store.update(|s| {
            s.push_local(kind, file.name(), now_clock(), true, None);
        });
    };

    let start_recording = move |_| {
        set_recording.set(Some(0));
        let interval = Interval::new(1_000, move || {
            set_recording.update(|r| {
                if let Some(elapsed) = r {
                    *elapsed += 1;
                }
            });
        });
        ticker.set_value(Some(interval));
    };

    let stop_recording = move |_| {
        // Dropping the interval stops the ticks.
        ticker.update_value(|t| {
            t.take();
        });
        let Some(elapsed) = recording.get_untracked() else {
            return;
        };
        set_recording.set(None);
        store.update(|s| {
            s.push_local(
                MessageKind::Voice,
                format_duration(elapsed),
                now_clock(),
                true,
                Some(elapsed),
            );
        });
    };

    let on_keydown = {
        let send_text = send_text.clone();
        move |ev: ev::KeyboardEvent| {
            if ev.key() == "Enter" {
                ev.prevent_default();
                send_text();
            }
        }
    };

    let on_send_click = {
        let send_text = send_text.clone();
        move |_| send_text()
    };

    view! {
        {
            let state = state.clone();
            move || {
                let Some(selected) = state.selected_chat.get() else {
                    return view! {
                        <div class="chat-window chat-empty">
                            <div class="empty-state">
                                <div class="empty-icon">"💬"</div>
                                <h2>"Добро пожаловать в Tulatalk"</h2>
                                <p>"Выберите чат, чтобы начать общение"</p>
                            </div>
                        </div>
                    }
                    .into_any();
                };

                // Per-render clones so the nested reactive closures below can
                // own their copies.
                let send_sticker = send_sticker.clone();
                let on_keydown = on_keydown.clone();
                let on_send_click = on_send_click.clone();
                let online = selected.online;
                view! {
                    <div class="chat-window">
                        <ChatHeader chat=selected />

                        <div class="messages-container">
                            {move || {
                                if loading.get() {
                                    return view! {
                                        <div class="list-hint">"Загрузка…"</div>
                                    }
                                    .into_any();
                                }
                                if store.with(|s| s.is_empty()) {
                                    return view! {
                                        <div class="list-hint">
                                            {if online {
                                                "Напишите первое сообщение"
                                            } else {
                                                "Нет сообщений"
                                            }}
                                        </div>
                                    }
                                    .into_any();
                                }
                                view! {
                                    <For
                                        each=move || store.with(|s| s.messages().to_vec())
                                        key=|m| m.id
                                        let:msg
                                    >
                                        <MessageBubble msg=msg />
                                    </For>
                                }
                                .into_any()
                            }}
                        </div>

                        {move || {
                            show_stickers.get().then(|| {
                                let send_sticker = send_sticker.clone();
                                view! {
                                    <div class="sticker-panel">
                                        {STICKERS
                                            .iter()
                                            .map(|&emoji| {
                                                let send_sticker = send_sticker.clone();
                                                view! {
                                                    <button
                                                        class="sticker-option"
                                                        on:click=move |_| send_sticker(emoji)
                                                    >
                                                        {emoji}
                                                    </button>
                                                }
                                            })
                                            .collect_view()}
                                    </div>
                                }
                            })
                        }}

                        {move || {
                            show_attach.get().then(|| {
                                view! {
                                    <div class="attach-panel">
                                        <label class="attach-option">
                                            "📷 Фото"
                                            <input
                                                type="file"
                                                accept="image/*"
                                                class="hidden-input"
                                                on:change=move |ev| attach_file(ev, MessageKind::Image)
                                            />
                                        </label>
                                        <label class="attach-option">
                                            "🎬 Видео"
                                            <input
                                                type="file"
                                                accept="video/*"
                                                class="hidden-input"
                                                on:change=move |ev| attach_file(ev, MessageKind::Video)
                                            />
                                        </label>
                                    </div>
                                }
                            })
                        }}

                        <div class="composer">
                            {move || {
                                recording.get().map(|elapsed| {
                                    view! {
                                        <div class="recording-bar">
                                            <span class="recording-dot"></span>
                                            {format!("Запись… {}", format_duration(elapsed))}
                                            <button class="icon-btn" on:click=stop_recording>
                                                "⏹"
                                            </button>
                                        </div>
                                    }
                                })
                            }}

                            <div class="composer-row" class:hidden=move || recording.get().is_some()>
                                <button
                                    class="icon-btn"
                                    on:click=move |_| set_show_attach.update(|v| *v = !*v)
                                >
                                    "+"
                                </button>
                                <input
                                    class="composer-input"
                                    placeholder="Написать сообщение…"
                                    prop:value=input
                                    on:input=move |ev| set_input.set(event_target_value(&ev))
                                    on:keydown=on_keydown.clone()
                                />
                                <button
                                    class="icon-btn"
                                    on:click=move |_| set_show_stickers.update(|v| *v = !*v)
                                >
                                    "😊"
                                </button>
                                {
                                    let on_send_click = on_send_click.clone();
                                    move || {
                                        if input.get().trim().is_empty() {
                                            view! {
                                                <button class="icon-btn" on:click=start_recording>
                                                    "🎤"
                                                </button>
                                            }
                                            .into_any()
                                        } else {
                                            let on_send_click = on_send_click.clone();
                                            view! {
                                                <button class="send-btn" on:click=on_send_click>
                                                    "➤"
                                                </button>
                                            }
                                            .into_any()
                                        }
                                    }
                                }
                            </div>
                        </div>
                    </div>
                }
                .into_any()
            }
        }
    }
}

/// Conversation header: peer identity and presence.
#[component]
fn ChatHeader(chat: ChatSummary) -> impl IntoView {
    let state = expect_context::<AppState>();
    let online = chat.online;

    let on_back = move |_| state.set_selected_chat.set(None);

    view! {
        <div class="chat-header">
            <button class="icon-btn back-btn" on:click=on_back>
                "←"
            </button>
            <div class="avatar-wrap">
                <div class="avatar">{chat.avatar.clone()}</div>
                <Show when=move || online>
                    <span class="online-dot"></span>
                </Show>
            </div>
            <div class="chat-header-main">
                <h2>{chat.display_name.clone()}</h2>
                <p class="presence">
                    {if online { "В сети" } else { "Был(а) недавно" }}
                </p>
            </div>
        </div>
    }
}

/// One message bubble, rendered per kind.
#[component]
fn MessageBubble(msg: ChatMessage) -> impl IntoView {
    let css_class = if msg.mine {
        "message mine"
    } else {
        "message theirs"
    };

    let body = match msg.kind {
        MessageKind::Sticker => view! { <div class="sticker">{msg.content.clone()}</div> }.into_any(),
        MessageKind::Image => {
            view! { <p class="media-placeholder">{format!("📷 {}", msg.content)}</p> }.into_any()
        }
        MessageKind::Video => {
            view! { <p class="media-placeholder">{format!("🎬 {}", msg.content)}</p> }.into_any()
        }
        MessageKind::Voice => view! {
            <p class="media-placeholder">
                {format!(
                    "🎤 Голосовое сообщение · {}",
                    msg.duration_secs.map(format_duration).unwrap_or_default(),
                )}
            </p>
        }
        .into_any(),
        MessageKind::Text => view! { <p>{msg.content.clone()}</p> }.into_any(),
    };

    view! {
        <div class=css_class>
            <div class="bubble">
                {body}
                <div class="message-time">{msg.time.clone()}</div>
            </div>
        </div>
    }
}
