use crate::utils::text::{collapse_whitespace, truncate_with_ellipsis};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder title until the first user message arrives.
pub const DEFAULT_TITLE: &str = "Новый чат";

/// Assistant greeting every new session is seeded with.
pub const SEED_GREETING: &str =
    "Привет! Я AeroDoc. Задай вопрос по авиационной документации 🙂";

/// Maximum title length in characters before the ellipsis cut.
pub const TITLE_MAX_CHARS: usize = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: MessageRole,
    pub text: String,
}

impl ChatMessage {
    pub fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, text)
    }
}

/// One persisted conversation thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    /// Unix milliseconds.
    pub created_at: i64,
    /// Unix milliseconds, refreshed on every mutation; never decreases.
    pub updated_at: i64,
    /// Chronological append order. Never empty: seeded with a greeting.
    pub messages: Vec<ChatMessage>,
}

impl ChatSession {
    /// A fresh session pre-populated with the assistant greeting.
    pub fn seeded() -> Self {
        let now = now_ms();
        Self {
            id: Uuid::new_v4().to_string(),
            title: DEFAULT_TITLE.to_string(),
            created_at: now,
            updated_at: now,
            messages: vec![ChatMessage::assistant(SEED_GREETING)],
        }
    }

    pub fn has_user_message(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.role == MessageRole::User)
    }

    /// Refreshes `updated_at`, keeping it monotonically non-decreasing even
    /// if the wall clock steps backwards.
    pub(crate) fn touch(&mut self) {
        self.updated_at = now_ms().max(self.updated_at);
    }
}

/// Derives a sidebar title from the first user message: whitespace is
/// collapsed, the result is cut at [`TITLE_MAX_CHARS`] characters with an
/// ellipsis, and blank input falls back to the placeholder.
#[must_use]
pub fn derive_title(text: &str) -> String {
    let collapsed = collapse_whitespace(text);
    if collapsed.is_empty() {
        return DEFAULT_TITLE.to_string();
    }
    truncate_with_ellipsis(&collapsed, TITLE_MAX_CHARS)
}

pub(crate) fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
