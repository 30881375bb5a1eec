use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::chat::filter_users;
use crate::models::DirectoryUser;
use crate::state::AppState;

/// Directory screen: unfiltered listing on mount, server search on demand,
/// and a defensive client-side re-filter on top of whatever came back.
#[component]
pub fn ContactsSection() -> impl IntoView {
    let state = expect_context::<AppState>();

    let (query, set_query) = signal(String::new());
    let (users, set_users) = signal(Vec::<DirectoryUser>::new());
    let (loading, set_loading) = signal(false);

    let run_search = {
        let state = state.clone();
        move || {
            let Some(session) = state.session.get_untracked() else {
                return;
            };
            let q = query.get_untracked();
            set_loading.set(true);
            spawn_local(async move {
                match api::search_users(&q, session.user.id).await {
                    Ok(found) => set_users.set(found),
                    Err(e) => log::error!("Failed to search users: {e}"),
                }
                set_loading.set(false);
            });
        }
    };

    // Initial unfiltered listing.
    run_search();

    let visible = move || filter_users(&users.get(), &query.get());

    let on_keydown = {
        let run_search = run_search.clone();
        move |ev: ev::KeyboardEvent| {
            if ev.key() == "Enter" {
                run_search();
            }
        }
    };

    let on_search_click = {
        let run_search = run_search.clone();
        move |_| run_search()
    };

    let open_sidebar = {
        let state = state.clone();
        move |_| state.set_sidebar_open.set(true)
    };

    view! {
        <div class="contacts">
            <div class="contacts-header">
                <div class="chat-list-top">
                    <button class="icon-btn" on:click=open_sidebar>
                        "☰"
                    </button>
                    <h2 class="app-title">"Контакты"</h2>
                </div>
                <div class="search-row">
                    <input
                        class="search-input"
                        placeholder="Поиск по имени или логину…"
                        prop:value=query
                        on:input=move |ev| set_query.set(event_target_value(&ev))
                        on:keydown=on_keydown
                    />
                    <button class="search-btn" on:click=on_search_click>
                        "Найти"
                    </button>
                </div>
            </div>

            <div class="contacts-body">
                {
                    let state = state.clone();
                    move || {
                        if loading.get() {
                            return view! { <div class="spinner"></div> }.into_any();
                        }
                        let found = visible();
                        if found.is_empty() {
                            let empty = if query.get().trim().is_empty() {
                                "Нет пользователей"
                            } else {
                                "Пользователи не найдены"
                            };
                            return view! {
                                <div class="empty-state">
                                    <div class="empty-icon">"🔍"</div>
                                    <p>{empty}</p>
                                </div>
                            }
                            .into_any();
                        }
                        let state = state.clone();
                        found
                            .into_iter()
                            .map(|user| {
                                let state = state.clone();
                                let online = user.online;
                                let peer_id = user.id;
                                view! {
                                    <div class="contact-card">
                                        <div class="avatar-wrap">
                                            <div class="avatar avatar-lg">{user.avatar.clone()}</div>
                                            <Show when=move || online>
                                                <span class="online-dot"></span>
                                            </Show>
                                        </div>
                                        <div class="contact-main">
                                            <h3>{user.display_name.clone()}</h3>
                                            <p class="contact-username">
                                                {format!("@{}", user.username)}
                                            </p>
                                            <p class="contact-status">
                                                {user.status.clone().unwrap_or_default()}
                                            </p>
                                        </div>
                                        <button
                                            class="start-chat-btn"
                                            on:click=move |_| state.start_chat(peer_id)
                                        >
                                            "💬"
                                        </button>
                                    </div>
                                }
                            })
                            .collect_view()
                            .into_any()
                    }
                }
            </div>
        </div>
    }
}
