//! Chat session core: conversation threads, message history, titles and
//! the persistence round trip backing the sidebar.

mod store;
mod types;

pub use store::{ChatSessionStore, STORAGE_KEY};
pub use types::{
    ChatMessage, ChatSession, DEFAULT_TITLE, MessageRole, SEED_GREETING, TITLE_MAX_CHARS,
    derive_title,
};
