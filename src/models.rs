use serde::{Deserialize, Serialize};

/// A user account as the backend reports it.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub avatar: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Authenticated identity plus bearer token. Persisted to localStorage and
/// restored at startup; token validity is only discovered on the first
/// authenticated call.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// Request body for the auth endpoint. `action` is `login` or `register`;
/// the registration-only fields are omitted when logging in.
#[derive(Clone, Debug, Serialize)]
pub struct AuthRequest {
    pub action: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Successful auth response.
#[derive(Clone, Debug, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub success: bool,
    pub user: User,
    pub token: String,
}

/// Application-level error body, `{"error": "..."}`.
#[derive(Clone, Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// One row of the conversation list.
///
/// `chat_id` is `None` for a synthetic conversation: one started locally
/// from the contacts screen that the server has not assigned an id to yet.
/// The first sent message establishes it server-side; the next list
/// refresh replaces the synthetic entry with the real one.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ChatSummary {
    #[serde(default)]
    pub chat_id: Option<i64>,
    pub other_user_id: i64,
    pub username: String,
    pub display_name: String,
    pub avatar: String,
    #[serde(default)]
    pub last_message: Option<String>,
    #[serde(default)]
    pub last_message_time: Option<String>,
    #[serde(default)]
    pub unread_count: i64,
    #[serde(default)]
    pub online: bool,
}

/// `{"chats": [...]}` wrapper on the list endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct ChatListResponse {
    #[serde(default)]
    pub chats: Vec<ChatSummary>,
}

/// One message row as fetched from the history endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct MessageRow {
    pub id: i64,
    pub sender_id: i64,
    pub content: String,
    pub created_at: String,
    #[serde(default = "default_message_type")]
    pub message_type: String,
}

fn default_message_type() -> String {
    "text".to_string()
}

/// `{"messages": [...]}` wrapper on the history endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct MessageListResponse {
    #[serde(default)]
    pub messages: Vec<MessageRow>,
}

/// Request body for sending a message.
#[derive(Clone, Debug, Serialize)]
pub struct SendRequest {
    pub action: String,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub content: String,
    pub message_type: String,
}

/// Response to a send: the server assigns the message and (for a first
/// message to a new peer) the conversation their ids.
#[derive(Clone, Debug, Deserialize)]
pub struct SendResponse {
    #[serde(default)]
    pub success: bool,
    pub message_id: i64,
    #[serde(default)]
    pub chat_id: Option<i64>,
}

/// A directory entry from the user search endpoint.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct DirectoryUser {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    pub avatar: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub online: bool,
}

/// `{"users": [...]}` wrapper on the search endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct UserListResponse {
    #[serde(default)]
    pub users: Vec<DirectoryUser>,
}

/// `{"user": {...}}` wrapper on the single-profile endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct UserResponse {
    pub user: DirectoryUser,
}

/// What a message carries. Image, video and voice exist only locally in
/// this client: they are appended to the open conversation without a
/// network call and vanish on reload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    Sticker,
    Image,
    Video,
    Voice,
}

impl MessageKind {
    /// Wire name used in `message_type`.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Sticker => "sticker",
            MessageKind::Image => "image",
            MessageKind::Video => "video",
            MessageKind::Voice => "voice",
        }
    }

    /// Unknown wire values fall back to plain text.
    pub fn parse(s: &str) -> Self {
        match s {
            "sticker" => MessageKind::Sticker,
            "image" => MessageKind::Image,
            "video" => MessageKind::Video,
            "voice" => MessageKind::Voice,
            _ => MessageKind::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_response_decodes() {
        let json = r#"{
            "success": true,
            "token": "abc123",
            "user": {"id": 7, "username": "ivan_petrov",
                     "display_name": "Иван Петров", "avatar": "👤"}
        }"#;
        let resp: AuthResponse = serde_json::from_str(json).unwrap();
        assert!(resp.success);
        assert_eq!(resp.user.id, 7);
        assert_eq!(resp.user.status, None);
    }

    #[test]
    fn test_chat_list_decodes_with_nulls() {
        let json = r#"{"chats": [{
            "chat_id": 3, "other_user_id": 9, "username": "anna",
            "display_name": "Анна Петрова", "avatar": "👩‍💼",
            "last_message": null, "last_message_time": null,
            "unread_count": 2, "online": true
        }]}"#;
        let resp: ChatListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.chats.len(), 1);
        assert_eq!(resp.chats[0].chat_id, Some(3));
        assert_eq!(resp.chats[0].last_message, None);
        assert_eq!(resp.chats[0].unread_count, 2);
    }

    #[test]
    fn test_message_rows_decode() {
        let json = r#"{"messages": [
            {"id": 1, "sender_id": 9, "content": "Привет! 👋",
             "created_at": "2025-10-09 14:30:05.120001", "message_type": "text"},
            {"id": 2, "sender_id": 7, "content": "🎉",
             "created_at": "2025-10-09 14:31:00.000000", "message_type": "sticker"}
        ]}"#;
        let resp: MessageListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.messages.len(), 2);
        assert_eq!(resp.messages[1].message_type, "sticker");
    }

    #[test]
    fn test_message_type_defaults_to_text() {
        let json = r#"{"id": 1, "sender_id": 9, "content": "hi",
                       "created_at": "2025-10-09 14:30:05"}"#;
        let row: MessageRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.message_type, "text");
    }

    #[test]
    fn test_kind_round_trip_and_fallback() {
        assert_eq!(MessageKind::parse("voice"), MessageKind::Voice);
        assert_eq!(MessageKind::parse(MessageKind::Sticker.as_str()), MessageKind::Sticker);
        assert_eq!(MessageKind::parse("gif"), MessageKind::Text);
    }

    #[test]
    fn test_auth_request_omits_registration_fields_on_login() {
        let req = AuthRequest {
            action: "login".to_string(),
            username: "ivan_petrov".to_string(),
            display_name: None,
            password: "secret".to_string(),
            avatar: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("display_name"));
        assert!(!json.contains("avatar"));
    }
}
