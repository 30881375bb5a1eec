use leptos::prelude::*;

use crate::state::{AppState, Section};

/// Slide-in menu: profile card, section navigation, theme toggle, logout.
#[component]
pub fn Sidebar() -> impl IntoView {
    let state = expect_context::<AppState>();

    // Copy handles so each closure below can capture them freely.
    let session = state.session;
    let section = state.section;
    let dark_mode = state.dark_mode;
    let sidebar_open = state.sidebar_open;
    let set_sidebar_open = state.set_sidebar_open;
    let set_section = state.set_section;

    let open_section = move |s: Section| {
        set_section.set(s);
        set_sidebar_open.set(false);
    };

    let on_theme = {
        let state = state.clone();
        move |_| state.toggle_theme()
    };
    let on_logout = move |_| state.logout();

    view! {
        // Overlay behind the sidebar on small screens; click closes.
        {move || {
            sidebar_open.get().then(|| {
                view! {
                    <div class="sidebar-overlay" on:click=move |_| set_sidebar_open.set(false)></div>
                }
            })
        }}

        <aside class="sidebar" class:open=move || sidebar_open.get()>
            <div class="sidebar-header">
                <h2>"Меню"</h2>
                <button
                    class="icon-btn sidebar-close"
                    on:click=move |_| set_sidebar_open.set(false)
                >
                    "✕"
                </button>
            </div>

            {move || {
                session.get().map(|session| {
                    view! {
                        <div class="profile-card">
                            <div class="avatar avatar-lg">{session.user.avatar.clone()}</div>
                            <div class="profile-info">
                                <h3>{session.user.display_name.clone()}</h3>
                                <p>{format!("@{}", session.user.username)}</p>
                            </div>
                        </div>
                    }
                })
            }}

            <nav class="sidebar-nav">
                <button
                    class="nav-item"
                    class:active=move || section.get() == Section::Chats
                    on:click=move |_| open_section(Section::Chats)
                >
                    <span class="nav-icon">"💬"</span>
                    "Мои чаты"
                </button>
                <button
                    class="nav-item"
                    class:active=move || section.get() == Section::Contacts
                    on:click=move |_| open_section(Section::Contacts)
                >
                    <span class="nav-icon">"👥"</span>
                    "Контакты"
                </button>
            </nav>

            <div class="sidebar-footer">
                <button class="nav-item" on:click=on_theme>
                    <span class="nav-icon">
                        {move || if dark_mode.get() { "☀️" } else { "🌙" }}
                    </span>
                    {move || {
                        if dark_mode.get() { "Светлая тема" } else { "Тёмная тема" }
                    }}
                </button>
                <button class="nav-item nav-danger" on:click=on_logout>
                    <span class="nav-icon">"🚪"</span>
                    "Выйти"
                </button>
            </div>
        </aside>
    }
}
