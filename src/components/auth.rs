use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api;
use crate::models::Session;
use crate::state::AppState;

const AVATARS: [&str; 12] = [
    "👤", "👨‍💼", "👩‍💼", "👨‍💻", "👩‍💻", "👨‍🎨", "👩‍🎨", "🧑‍🚀", "👨‍🔧", "👩‍🔧", "🦸‍♂️", "🦸‍♀️",
];

/// Login / registration screen. Auth failures surface inline; every
/// transport failure collapses to the generic unreachable message.
#[component]
pub fn AuthScreen() -> impl IntoView {
    let state = expect_context::<AppState>();

    let (is_login, set_is_login) = signal(true);
    let (username, set_username) = signal(String::new());
    let (display_name, set_display_name) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (avatar, set_avatar) = signal(AVATARS[0].to_string());
    let (error, set_error) = signal(None::<String>);
    let (loading, set_loading) = signal(false);

    let submit = move || {
        if loading.get_untracked() {
            return;
        }
        set_error.set(None);
        set_loading.set(true);

        let state = state.clone();
        let login = is_login.get_untracked();
        let username = username.get_untracked();
        let display_name = display_name.get_untracked();
        let password = password.get_untracked();
        let avatar = avatar.get_untracked();

        spawn_local(async move {
            let result = if login {
                api::login(&username, &password).await
            } else {
                api::register(&username, &display_name, &password, &avatar).await
            };

            match result {
                Ok(resp) => {
                    state.login_success(Session {
                        user: resp.user,
                        token: resp.token,
                    });
                }
                Err(e) => {
                    log::error!("Auth failed: {e}");
                    set_error.set(Some(e.user_message()));
                }
            }
            set_loading.set(false);
        });
    };

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        submit();
    };

    let switch_mode = move |login: bool| {
        set_is_login.set(login);
        set_error.set(None);
    };

    view! {
        <div class="auth-screen">
            <div class="auth-card">
                <div class="auth-logo">"💬"</div>
                <h1 class="auth-title">"Tulatalk"</h1>
                <p class="auth-subtitle">
                    {move || {
                        if is_login.get() { "Войдите в свой аккаунт" } else { "Создайте новый аккаунт" }
                    }}
                </p>

                <div class="auth-tabs">
                    <button
                        class="auth-tab"
                        class:active=move || is_login.get()
                        on:click=move |_| switch_mode(true)
                    >
                        "Вход"
                    </button>
                    <button
                        class="auth-tab"
                        class:active=move || !is_login.get()
                        on:click=move |_| switch_mode(false)
                    >
                        "Регистрация"
                    </button>
                </div>

                <form on:submit=on_submit>
                    <Show when=move || !is_login.get()>
                        <label class="auth-label">"Выберите аватар"</label>
                        <div class="avatar-grid">
                            {AVATARS
                                .iter()
                                .map(|&av| {
                                    view! {
                                        <button
                                            type="button"
                                            class="avatar-option"
                                            class:selected=move || avatar.get() == av
                                            on:click=move |_| set_avatar.set(av.to_string())
                                        >
                                            {av}
                                        </button>
                                    }
                                })
                                .collect_view()}
                        </div>

                        <label class="auth-label">"Ваше имя"</label>
                        <input
                            class="auth-input"
                            placeholder="Иван Петров"
                            prop:value=display_name
                            on:input=move |ev| set_display_name.set(event_target_value(&ev))
                            required
                        />
                    </Show>

                    <label class="auth-label">"Логин"</label>
                    <input
                        class="auth-input"
                        placeholder="ivan_petrov"
                        prop:value=username
                        on:input=move |ev| set_username.set(event_target_value(&ev))
                        required
                        minlength="3"
                    />

                    <label class="auth-label">"Пароль"</label>
                    <input
                        class="auth-input"
                        type="password"
                        placeholder="••••••••"
                        prop:value=password
                        on:input=move |ev| set_password.set(event_target_value(&ev))
                        required
                        minlength="6"
                    />

                    {move || {
                        error.get().map(|err| {
                            view! { <div class="auth-error">{err}</div> }
                        })
                    }}

                    <button class="auth-submit" type="submit" disabled=loading>
                        {move || {
                            if loading.get() {
                                "Загрузка…"
                            } else if is_login.get() {
                                "Войти"
                            } else {
                                "Создать аккаунт"
                            }
                        }}
                    </button>
                </form>
            </div>
        </div>
    }
}
