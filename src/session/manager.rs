//! Session lifecycle management
//!
//! The manager owns the in-memory session list and the active-session
//! pointer, and keeps the durable store in step: every mutating operation
//! completes a store write before returning. Stale identifiers are treated
//! as "not found" no-ops throughout, never as errors that interrupt the
//! caller. A manager built from a share import is read-only and refuses all
//! mutations.

use crate::session::{ChatMessage, ChatSession};
use crate::storage::{share, SessionStore};
use metrics::increment_counter;

/// Welcome message seeded into every new session
pub const WELCOME_TEXT: &str = "Hey! I'm connected to your local AI brain and ready to dig \
into strategy. Ask me about your top-performing videos, or just tell me what you're working \
on. What do you want to focus on today?";

/// Owns the session list and the active-session pointer
pub struct SessionManager {
    sessions: Vec<ChatSession>,
    active_id: Option<String>,
    store: SessionStore,
    read_only: bool,
    share_base_url: String,
}

impl SessionManager {
    /// Builds a manager from the store's startup load
    ///
    /// When a share fragment is supplied and decodes, the manager holds
    /// exactly that session, read-only. Otherwise the durable slot is read;
    /// the first session (most recent) becomes active. An empty load leaves
    /// the manager without an active session; callers that need one create
    /// it explicitly.
    ///
    /// # Arguments
    ///
    /// * `store` - The durable session store
    /// * `share_base_url` - Base URL used when encoding share links
    /// * `share_fragment` - Optional fragment from a share link
    pub fn new(store: SessionStore, share_base_url: String, share_fragment: Option<&str>) -> Self {
        let loaded = store.load(share_fragment);
        let active_id = loaded.sessions.first().map(|s| s.id.clone());

        Self {
            sessions: loaded.sessions,
            active_id,
            store,
            read_only: loaded.read_only,
            share_base_url,
        }
    }

    /// All sessions, most recent first
    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    /// Identifier of the active session, if any
    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// The active session, if any
    pub fn active_session(&self) -> Option<&ChatSession> {
        let id = self.active_id.as_deref()?;
        self.session(id)
    }

    /// True when this manager was built from a share import
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Looks up a session by exact id
    pub fn session(&self, id: &str) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Mutable session lookup for the message pipeline
    pub(crate) fn session_mut(&mut self, id: &str) -> Option<&mut ChatSession> {
        self.sessions.iter_mut().find(|s| s.id == id)
    }

    /// Creates a new session seeded with the welcome message
    ///
    /// The session is prepended so the list stays most-recent-first. With
    /// `activate` the new session becomes active. Returns `None` (no-op) on
    /// a read-only manager.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use corechat::session::SessionManager;
    /// use corechat::storage::SessionStore;
    ///
    /// let store = SessionStore::open_at("/tmp/corechat-example.db").unwrap();
    /// let mut manager = SessionManager::new(store, "http://localhost:5173/".into(), None);
    /// let session = manager.create_session(true).unwrap();
    /// assert_eq!(session.messages.len(), 1);
    /// ```
    pub fn create_session(&mut self, activate: bool) -> Option<&ChatSession> {
        if self.read_only {
            tracing::debug!("Ignoring create_session on read-only view");
            return None;
        }

        let mut session = ChatSession::new();
        session.messages.push(ChatMessage::ai(WELCOME_TEXT));
        let id = session.id.clone();

        self.sessions.insert(0, session);
        if activate {
            self.active_id = Some(id);
        }
        self.persist();
        increment_counter!("corechat_sessions_created_total");

        self.sessions.first()
    }

    /// Makes the session with `id` active; unknown ids are no-ops
    pub fn select_session(&mut self, id: &str) -> bool {
        if self.session(id).is_none() {
            tracing::debug!("select_session: unknown id {}", id);
            return false;
        }
        self.active_id = Some(id.to_string());
        true
    }

    /// Renames a session; blank titles and unknown ids are no-ops
    pub fn rename_session(&mut self, id: &str, new_title: &str) -> bool {
        if self.read_only {
            return false;
        }
        let title = new_title.trim();
        if title.is_empty() {
            return false;
        }

        let Some(session) = self.session_mut(id) else {
            tracing::debug!("rename_session: unknown id {}", id);
            return false;
        };
        session.title = title.to_string();
        session.updated_at = chrono::Utc::now();
        self.persist();
        true
    }

    /// Removes a session
    ///
    /// When the removed session was active, the first remaining session
    /// becomes active, or none if the list is now empty. The manager does
    /// not auto-create a replacement.
    pub fn delete_session(&mut self, id: &str) -> bool {
        if self.read_only {
            return false;
        }
        let Some(index) = self.sessions.iter().position(|s| s.id == id) else {
            tracing::debug!("delete_session: unknown id {}", id);
            return false;
        };

        self.sessions.remove(index);
        if self.active_id.as_deref() == Some(id) {
            self.active_id = self.sessions.first().map(|s| s.id.clone());
        }
        self.persist();
        increment_counter!("corechat_sessions_deleted_total");
        true
    }

    /// Builds a share URL for a session
    ///
    /// Returns `None` for unknown ids; has no side effect. Copying the link
    /// anywhere is the caller's concern.
    pub fn share_session(&self, id: &str) -> Option<String> {
        let session = self.session(id)?;
        match share::encode_share_link(&self.share_base_url, session) {
            Ok(link) => Some(link),
            Err(e) => {
                tracing::warn!("Failed to encode share link: {}", e);
                None
            }
        }
    }

    /// Writes the full session list to the durable store
    ///
    /// Persistence failures are logged, not raised; the in-memory state is
    /// the source of truth for the rest of the run.
    pub(crate) fn persist(&self) {
        if self.read_only {
            return;
        }
        if let Err(e) = self.store.save(&self.sessions) {
            tracing::warn!("Failed to persist sessions: {}", e);
        }
    }
}
