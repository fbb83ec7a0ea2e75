use super::types::{ChatMessage, ChatSession, MessageRole, derive_title};
use crate::error::SessionError;
use crate::storage::KeyValueStore;

/// Fixed key the whole session set is persisted under.
pub const STORAGE_KEY: &str = "aerodoc_chats_v1";

/// Owns the session collection and the active-session pointer.
///
/// Invariants, upheld across every operation sequence:
/// - the collection is never empty (a seeded session is synthesized when
///   the last one is deleted, and on corrupt or missing storage);
/// - `active_id` always references a member of the collection.
///
/// Every mutation re-serializes the full session set to the key-value
/// store. Write failures are logged and swallowed: in-memory state stays
/// authoritative for the rest of the process.
pub struct ChatSessionStore {
    sessions: Vec<ChatSession>,
    active_id: String,
    storage: Box<dyn KeyValueStore>,
}

impl ChatSessionStore {
    /// Restores the store from persisted state, falling back to a single
    /// seeded session on missing, empty, or malformed data. Never fails.
    pub fn load(storage: Box<dyn KeyValueStore>) -> Self {
        let sessions = match storage.get(STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<ChatSession>>(&raw) {
                Ok(parsed) if !parsed.is_empty() => parsed,
                Ok(_) => {
                    tracing::warn!("persisted session set is empty, reseeding");
                    vec![ChatSession::seeded()]
                }
                Err(error) => {
                    tracing::warn!(%error, "persisted session set unreadable, reseeding");
                    vec![ChatSession::seeded()]
                }
            },
            Ok(None) => vec![ChatSession::seeded()],
            Err(error) => {
                tracing::warn!(%error, "storage read failed, starting in-memory");
                vec![ChatSession::seeded()]
            }
        };

        let active_id = sessions[0].id.clone();
        Self {
            sessions,
            active_id,
            storage,
        }
    }

    /// Creates a seeded session at the front of the collection, makes it
    /// active and persists. Always succeeds; returns the new session id.
    pub fn create_session(&mut self) -> String {
        let session = ChatSession::seeded();
        let id = session.id.clone();
        self.sessions.insert(0, session);
        self.active_id = id.clone();
        self.persist();
        id
    }

    /// Removes a session if present (no-op otherwise). Reseeds when the
    /// collection would become empty and repoints `active_id` at the first
    /// remaining session when the active one was removed.
    pub fn delete_session(&mut self, id: &str) {
        self.sessions.retain(|s| s.id != id);
        if self.sessions.is_empty() {
            self.sessions.push(ChatSession::seeded());
        }
        if !self.sessions.iter().any(|s| s.id == self.active_id) {
            self.active_id = self.sessions[0].id.clone();
        }
        self.persist();
    }

    /// Sets the active session. No-op for an unknown id: selectable ids are
    /// derived from the rendered list, so an unknown one is ignored.
    pub fn select_session(&mut self, id: &str) {
        if self.sessions.iter().any(|s| s.id == id) {
            self.active_id = id.to_string();
        }
    }

    /// Appends a message preserving order. The first user-role message of a
    /// session derives its title, exactly once.
    pub fn append_message(
        &mut self,
        session_id: &str,
        message: ChatMessage,
    ) -> Result<(), SessionError> {
        let session = self.session_mut(session_id)?;
        if message.role == MessageRole::User && !session.has_user_message() {
            session.title = derive_title(&message.text);
        }
        session.messages.push(message);
        session.touch();
        self.persist();
        Ok(())
    }

    /// Replaces a message's text in place — the incremental-reveal path.
    /// An unknown message id within an existing session is a no-op and does
    /// not refresh `updated_at`.
    pub fn update_message_text(
        &mut self,
        session_id: &str,
        message_id: &str,
        text: &str,
    ) -> Result<(), SessionError> {
        let session = self.session_mut(session_id)?;
        let Some(message) = session.messages.iter_mut().find(|m| m.id == message_id) else {
            return Ok(());
        };
        message.text = text.to_string();
        session.touch();
        self.persist();
        Ok(())
    }

    pub fn active_session(&self) -> &ChatSession {
        match self.sessions.iter().find(|s| s.id == self.active_id) {
            Some(session) => session,
            None => &self.sessions[0],
        }
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    /// Sidebar order: most recently updated first.
    pub fn sessions_by_recency(&self) -> Vec<&ChatSession> {
        let mut sorted: Vec<&ChatSession> = self.sessions.iter().collect();
        sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        sorted
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn session_mut(&mut self, id: &str) -> Result<&mut ChatSession, SessionError> {
        self.sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    fn persist(&self) {
        let payload = match serde_json::to_string(&self.sessions) {
            Ok(payload) => payload,
            Err(error) => {
                tracing::warn!(%error, "session serialization failed, skipping persist");
                return;
            }
        };
        if let Err(error) = self.storage.set(STORAGE_KEY, &payload) {
            tracing::warn!(%error, "session persist failed, in-memory state stays authoritative");
        }
    }
}
