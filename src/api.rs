//! Remote chat gateway: stateless request wrappers, one per capability.
//!
//! No retries and no explicit timeout; every failure collapses into an
//! [`ApiError`] and the caller decides whether to surface or just log it.

use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::models::{
    AuthRequest, AuthResponse, ChatListResponse, ChatSummary, DirectoryUser, ErrorBody,
    MessageKind, MessageListResponse, MessageRow, SendRequest, SendResponse, UserListResponse,
    UserResponse,
};

/// Base URL of the backend API server.
const API_BASE: &str = "https://api.tulatalk.app";

fn auth_url() -> String {
    format!("{API_BASE}/auth")
}

fn messages_url() -> String {
    format!("{API_BASE}/messages")
}

fn users_url() -> String {
    format!("{API_BASE}/users")
}

/// Interprets a response: non-2xx becomes `Server` when the body carries an
/// `{"error": ...}` message and `Http(status)` otherwise; a 2xx body that
/// does not decode becomes `Decode`.
async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    if !resp.ok() {
        let status = resp.status();
        if let Ok(body) = resp.json::<ErrorBody>().await {
            return Err(ApiError::Server(body.error));
        }
        return Err(ApiError::Http(status));
    }
    resp.json::<T>().await.map_err(|_| ApiError::Decode)
}

async fn auth(body: AuthRequest) -> Result<AuthResponse, ApiError> {
    let resp = Request::post(&auth_url())
        .json(&body)
        .map_err(|_| ApiError::Decode)?
        .send()
        .await
        .map_err(|_| ApiError::Network)?;

    let auth: AuthResponse = read_json(resp).await?;
    if !auth.success {
        return Err(ApiError::Server("Произошла ошибка".to_string()));
    }
    Ok(auth)
}

/// Logs an existing user in.
pub async fn login(username: &str, password: &str) -> Result<AuthResponse, ApiError> {
    auth(AuthRequest {
        action: "login".to_string(),
        username: username.to_string(),
        display_name: None,
        password: password.to_string(),
        avatar: None,
    })
    .await
}

/// Creates a new account and logs it in.
pub async fn register(
    username: &str,
    display_name: &str,
    password: &str,
    avatar: &str,
) -> Result<AuthResponse, ApiError> {
    auth(AuthRequest {
        action: "register".to_string(),
        username: username.to_string(),
        display_name: Some(display_name.to_string()),
        password: password.to_string(),
        avatar: Some(avatar.to_string()),
    })
    .await
}

/// Fetches the full conversation list for a user. Server order is kept.
pub async fn fetch_chats(user_id: i64) -> Result<Vec<ChatSummary>, ApiError> {
    let resp = Request::get(&messages_url())
        .query([("user_id", user_id.to_string())])
        .send()
        .await
        .map_err(|_| ApiError::Network)?;

    let list: ChatListResponse = read_json(resp).await?;
    Ok(list.chats)
}

/// Fetches the full message history of one conversation. The server also
/// marks the peer's messages read as a side effect of this call.
pub async fn fetch_messages(user_id: i64, chat_id: i64) -> Result<Vec<MessageRow>, ApiError> {
    let resp = Request::get(&messages_url())
        .query([
            ("user_id", user_id.to_string()),
            ("chat_id", chat_id.to_string()),
        ])
        .send()
        .await
        .map_err(|_| ApiError::Network)?;

    let list: MessageListResponse = read_json(resp).await?;
    Ok(list.messages)
}

/// Sends one message. The server creates the conversation on first contact
/// and echoes back the assigned ids.
pub async fn send_message(
    sender_id: i64,
    recipient_id: i64,
    content: &str,
    kind: MessageKind,
) -> Result<SendResponse, ApiError> {
    let body = SendRequest {
        action: "send".to_string(),
        sender_id,
        recipient_id,
        content: content.to_string(),
        message_type: kind.as_str().to_string(),
    };

    let resp = Request::post(&messages_url())
        .json(&body)
        .map_err(|_| ApiError::Decode)?
        .send()
        .await
        .map_err(|_| ApiError::Network)?;

    let sent: SendResponse = read_json(resp).await?;
    if !sent.success {
        return Err(ApiError::Server("Сообщение не отправлено".to_string()));
    }
    Ok(sent)
}

/// Searches the user directory. An empty query lists everyone except the
/// requesting user.
pub async fn search_users(query: &str, user_id: i64) -> Result<Vec<DirectoryUser>, ApiError> {
    let mut params = vec![("user_id", user_id.to_string())];
    if !query.trim().is_empty() {
        params.push(("q", query.trim().to_string()));
    }

    let resp = Request::get(&users_url())
        .query(params)
        .send()
        .await
        .map_err(|_| ApiError::Network)?;

    let list: UserListResponse = read_json(resp).await?;
    Ok(list.users)
}

/// Resolves one user's profile by id.
pub async fn fetch_user(user_id: i64) -> Result<DirectoryUser, ApiError> {
    let resp = Request::post(&users_url())
        .json(&serde_json::json!({ "user_id": user_id }))
        .map_err(|_| ApiError::Decode)?
        .send()
        .await
        .map_err(|_| ApiError::Network)?;

    let user: UserResponse = read_json(resp).await?;
    Ok(user.user)
}
