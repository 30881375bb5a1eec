//! Client-side conversation state: the message sequence of the open chat,
//! optimistic appends, stale-fetch filtering, and the list/search helpers.
//!
//! Everything here is plain data so it can be unit tested off the DOM.
//! The reconciliation strategy throughout is full snapshot replacement:
//! a refresh replaces the whole collection, never patches it.

use crate::models::{ChatSummary, DirectoryUser, MessageKind, MessageRow};

/// Message identity within the open conversation.
///
/// Server ids come from the history fetch; local ids are handed out by the
/// [`ChatStore`] for optimistic appends and for the media/voice kinds that
/// never reach the server. The two spaces cannot collide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageId {
    Server(i64),
    Local(u64),
}

/// One rendered message.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub kind: MessageKind,
    pub content: String,
    /// Display clock, `HH:MM`. Optimistic appends use the client clock,
    /// which may disagree with the server record under clock skew.
    pub time: String,
    pub mine: bool,
    /// Voice messages only.
    pub duration_secs: Option<u32>,
}

/// The open conversation's message sequence.
///
/// Order is append order: history as the server returned it, then local
/// appends in the order they happened. Messages are never re-sorted by
/// timestamp.
#[derive(Clone, Debug, Default)]
pub struct ChatStore {
    messages: Vec<ChatMessage>,
    next_local: u64,
}

impl ChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Full-snapshot reconciliation: drops whatever is held locally and
    /// adopts the fetched history. Local-only media appended before the
    /// reload are gone, by design.
    pub fn replace(&mut self, history: Vec<ChatMessage>) {
        debug_assert!(unique_ids(&history), "duplicate message id in history");
        self.messages = history;
    }

    /// Appends a message with a fresh local id and returns that id so a
    /// failed send can be rolled back.
    pub fn push_local(
        &mut self,
        kind: MessageKind,
        content: String,
        time: String,
        mine: bool,
        duration_secs: Option<u32>,
    ) -> MessageId {
        let id = MessageId::Local(self.next_local);
        self.next_local += 1;
        self.messages.push(ChatMessage {
            id,
            kind,
            content,
            time,
            mine,
            duration_secs,
        });
        id
    }

    /// Removes one message by id. Used to roll back an optimistic append
    /// whose send failed.
    pub fn remove(&mut self, id: MessageId) -> Option<ChatMessage> {
        let pos = self.messages.iter().position(|m| m.id == id)?;
        Some(self.messages.remove(pos))
    }

    /// Discards the sequence when the open conversation changes. Local id
    /// numbering keeps counting so ids from a previous conversation can
    /// never be confused with new ones.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

fn unique_ids(messages: &[ChatMessage]) -> bool {
    let mut seen = std::collections::HashSet::new();
    messages.iter().all(|m| seen.insert(m.id))
}

/// Hands out a tag per history fetch and accepts only the latest one.
///
/// Switching conversations does not cancel the in-flight fetch; instead the
/// response comes back carrying the tag it was issued, and a tag that is no
/// longer current is dropped so a slow response for a previous conversation
/// cannot overwrite the one now open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadSequencer {
    epoch: u64,
}

/// Opaque token identifying one history fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadTag(u64);

impl LoadSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new fetch, invalidating every tag issued before.
    pub fn begin(&mut self) -> LoadTag {
        self.epoch += 1;
        LoadTag(self.epoch)
    }

    /// Whether a response carrying `tag` is still the one we want.
    pub fn accepts(&self, tag: LoadTag) -> bool {
        tag.0 == self.epoch
    }
}

/// Maps a fetched history row into a renderable message. `self_id` decides
/// the bubble side.
pub fn message_from_row(row: MessageRow, self_id: i64) -> ChatMessage {
    ChatMessage {
        id: MessageId::Server(row.id),
        kind: MessageKind::parse(&row.message_type),
        content: row.content,
        time: clock_from_timestamp(&row.created_at),
        mine: row.sender_id == self_id,
        duration_secs: None,
    }
}

/// Extracts `HH:MM` from a backend timestamp (`YYYY-MM-DD HH:MM:SS...`).
/// Anything shorter is shown as-is rather than dropped.
pub fn clock_from_timestamp(ts: &str) -> String {
    match ts.get(11..16) {
        Some(hm) => hm.to_string(),
        None => ts.to_string(),
    }
}

/// Formats hours/minutes for the client-clock side of optimistic appends.
pub fn format_clock(hours: u32, minutes: u32) -> String {
    format!("{hours:02}:{minutes:02}")
}

/// Formats a recording duration as `M:SS`.
pub fn format_duration(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Finds the existing conversation with a peer, if any.
pub fn find_chat_with(chats: &[ChatSummary], peer_id: i64) -> Option<&ChatSummary> {
    chats.iter().find(|c| c.other_user_id == peer_id)
}

/// Builds a synthetic conversation handle for a peer we have never talked
/// to. No server id yet; the first send establishes the conversation and
/// the next list refresh swaps this entry for the real one.
pub fn synthesize_chat(peer: &DirectoryUser) -> ChatSummary {
    ChatSummary {
        chat_id: None,
        other_user_id: peer.id,
        username: peer.username.clone(),
        display_name: peer.display_name.clone(),
        avatar: peer.avatar.clone(),
        last_message: None,
        last_message_time: None,
        unread_count: 0,
        online: peer.online,
    }
}

/// Client-side re-filter of directory results by substring on username or
/// display name, case-insensitive. The server already filters on `q`; this
/// is applied on top so the rendered list always matches the box content.
pub fn filter_users(users: &[DirectoryUser], query: &str) -> Vec<DirectoryUser> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return users.to_vec();
    }
    users
        .iter()
        .filter(|u| {
            u.username.to_lowercase().contains(&needle)
                || u.display_name.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, sender: i64, content: &str, kind: &str) -> MessageRow {
        MessageRow {
            id,
            sender_id: sender,
            content: content.to_string(),
            created_at: "2025-10-09 14:31:02.000000".to_string(),
            message_type: kind.to_string(),
        }
    }

    fn user(id: i64, username: &str, display_name: &str) -> DirectoryUser {
        DirectoryUser {
            id,
            username: username.to_string(),
            display_name: display_name.to_string(),
            avatar: "👤".to_string(),
            status: None,
            online: false,
        }
    }

    #[test]
    fn test_replace_is_idempotent() {
        let history: Vec<ChatMessage> = vec![
            message_from_row(row(1, 9, "Привет!", "text"), 7),
            message_from_row(row(2, 7, "Привет 👋", "text"), 7),
        ];
        let mut store = ChatStore::new();
        store.replace(history.clone());
        store.replace(history.clone());
        assert_eq!(store.messages(), history.as_slice());
    }

    #[test]
    fn test_optimistic_append_and_rollback() {
        let mut store = ChatStore::new();
        store.replace(vec![message_from_row(row(1, 9, "hi", "text"), 7)]);
        let before = store.messages().to_vec();

        let id = store.push_local(
            MessageKind::Text,
            "draft".to_string(),
            "14:32".to_string(),
            true,
            None,
        );
        assert_eq!(store.messages().len(), 2);
        assert!(store.messages().last().unwrap().mine);

        // Simulated send failure: the appended bubble comes back out and
        // the sequence is exactly what it was before.
        let removed = store.remove(id).unwrap();
        assert_eq!(removed.content, "draft");
        assert_eq!(store.messages(), before.as_slice());
    }

    #[test]
    fn test_local_ids_never_repeat_across_clears() {
        let mut store = ChatStore::new();
        let a = store.push_local(MessageKind::Text, "a".into(), "10:00".into(), true, None);
        store.clear();
        let b = store.push_local(MessageKind::Text, "b".into(), "10:01".into(), true, None);
        assert_ne!(a, b);
    }

    #[test]
    fn test_local_and_server_ids_distinct() {
        let mut store = ChatStore::new();
        store.replace(vec![message_from_row(row(0, 9, "x", "text"), 7)]);
        let local = store.push_local(MessageKind::Text, "y".into(), "10:00".into(), true, None);
        assert_ne!(local, MessageId::Server(0));
        assert_eq!(store.messages().len(), 2);
    }

    #[test]
    fn test_sequencer_drops_stale_response() {
        let mut seq = LoadSequencer::new();
        let first = seq.begin();
        let second = seq.begin();
        assert!(!seq.accepts(first));
        assert!(seq.accepts(second));
    }

    #[test]
    fn test_row_mapping_sets_direction_and_kind() {
        let mine = message_from_row(row(5, 7, "🎉", "sticker"), 7);
        assert!(mine.mine);
        assert_eq!(mine.kind, MessageKind::Sticker);
        assert_eq!(mine.time, "14:31");

        let theirs = message_from_row(row(6, 9, "ok", "text"), 7);
        assert!(!theirs.mine);
    }

    #[test]
    fn test_clock_from_short_timestamp_kept_as_is() {
        assert_eq!(clock_from_timestamp("Вчера"), "Вчера");
        assert_eq!(clock_from_timestamp("2025-10-09 08:05:00"), "08:05");
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_clock(9, 5), "09:05");
        assert_eq!(format_duration(65), "1:05");
        assert_eq!(format_duration(7), "0:07");
    }

    #[test]
    fn test_find_existing_chat_not_duplicated() {
        let chats = vec![
            ChatSummary {
                chat_id: Some(3),
                other_user_id: 9,
                username: "anna".into(),
                display_name: "Анна Петрова".into(),
                avatar: "👩‍💼".into(),
                last_message: Some("Привет!".into()),
                last_message_time: Some("2025-10-09 14:32:00".into()),
                unread_count: 2,
                online: true,
            },
        ];
        assert_eq!(find_chat_with(&chats, 9), Some(&chats[0]));
        assert_eq!(find_chat_with(&chats, 10), None);
    }

    #[test]
    fn test_synthetic_chat_has_no_server_id() {
        let peer = user(10, "dmitry", "Дмитрий Иванов");
        let chat = synthesize_chat(&peer);
        assert_eq!(chat.chat_id, None);
        assert_eq!(chat.other_user_id, 10);
        assert_eq!(chat.unread_count, 0);
    }

    #[test]
    fn test_filter_users_empty_query_passes_through() {
        let users = vec![user(1, "anna", "Анна"), user(2, "dmitry", "Дмитрий")];
        assert_eq!(filter_users(&users, "  "), users);
    }

    #[test]
    fn test_filter_users_matches_either_field_case_insensitive() {
        let users = vec![
            user(1, "anna_p", "Анна Петрова"),
            user(2, "dmitry", "Дмитрий Иванов"),
        ];
        assert_eq!(filter_users(&users, "ANNA").len(), 1);
        assert_eq!(filter_users(&users, "Иванов").len(), 1);
        assert!(filter_users(&users, "nobody").is_empty());
    }
}
