//! localStorage persistence for the session and theme preference.
//!
//! Storage failures (private browsing, quota) are logged and otherwise
//! ignored; the app just runs without persistence.

use web_sys::Storage;

use crate::models::{Session, User};

const USER_KEY: &str = "tulatalk_user";
const TOKEN_KEY: &str = "tulatalk_token";
const THEME_KEY: &str = "tulatalk_theme";

fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Persists the session user and token.
pub fn save_session(session: &Session) {
    let Some(storage) = local_storage() else {
        log::warn!("localStorage unavailable, session will not persist");
        return;
    };
    match serde_json::to_string(&session.user) {
        Ok(user_json) => {
            let _ = storage.set_item(USER_KEY, &user_json);
            let _ = storage.set_item(TOKEN_KEY, &session.token);
        }
        Err(e) => log::error!("Failed to serialize session: {e}"),
    }
}

/// Restores a persisted session. Both the user object and the token must
/// be present; the token is not revalidated against the server here.
pub fn load_session() -> Option<Session> {
    let storage = local_storage()?;
    let user_json = storage.get_item(USER_KEY).ok().flatten()?;
    let token = storage.get_item(TOKEN_KEY).ok().flatten()?;
    let user: User = serde_json::from_str(&user_json)
        .map_err(|e| log::error!("Discarding corrupt stored session: {e}"))
        .ok()?;
    Some(Session { user, token })
}

/// Clears everything we persist. Used on logout.
pub fn clear_session() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(USER_KEY);
        let _ = storage.remove_item(TOKEN_KEY);
        let _ = storage.remove_item(THEME_KEY);
    }
}

/// Persists the theme flag as `"dark"` / `"light"`.
pub fn save_theme(dark: bool) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(THEME_KEY, if dark { "dark" } else { "light" });
    }
}

/// Restores the theme flag; defaults to light.
pub fn load_theme() -> bool {
    local_storage()
        .and_then(|s| s.get_item(THEME_KEY).ok().flatten())
        .is_some_and(|v| v == "dark")
}
