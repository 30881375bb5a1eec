pub mod auth;
pub mod chat_list;
pub mod chat_window;
pub mod contacts;
pub mod sidebar;
