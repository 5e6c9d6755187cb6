//! Durable session storage
//!
//! The full session list is persisted as one JSON array under a single fixed
//! key in an embedded sled database, written whole on every mutation. Startup
//! may instead import a single read-only session from a share fragment; in
//! that case the durable slot is not consulted.

use crate::error::{CorechatError, Result};
use crate::session::ChatSession;
use anyhow::Context;
use directories::ProjectDirs;
use std::path::PathBuf;

pub mod share;

/// The single slot the session list lives under
const SESSIONS_KEY: &[u8] = b"sessions";

/// Result of loading sessions at startup
///
/// `read_only` is set when the sessions came from a share fragment rather
/// than the durable slot; mutations must be refused for such a view.
#[derive(Debug, Clone, Default)]
pub struct LoadedSessions {
    /// The sessions to present, most recent first
    pub sessions: Vec<ChatSession>,
    /// True when a shared session was imported
    pub read_only: bool,
}

/// Storage backend for the chat session list
pub struct SessionStore {
    db: sled::Db,
    db_path: PathBuf,
}

impl SessionStore {
    /// Opens the store at its default location
    ///
    /// The database lives in the user's data directory. The
    /// `CORECHAT_SESSIONS_DB` environment variable overrides the path, which
    /// makes it easy to point the binary at a test database or alternate file
    /// without changing the user's application data dir.
    pub fn open() -> Result<Self> {
        if let Ok(override_path) = std::env::var("CORECHAT_SESSIONS_DB") {
            return Self::open_at(override_path);
        }

        let proj_dirs = ProjectDirs::from("com", "corechat", "corechat")
            .ok_or_else(|| CorechatError::Storage("Could not determine data directory".into()))?;

        let db_path = proj_dirs.data_dir().join("sessions.db");
        Self::open_at(db_path)
    }

    /// Opens the store at the specified database path
    ///
    /// This is primarily useful for tests where the default application data
    /// directory is not desirable (for example, using a temporary directory).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use corechat::storage::SessionStore;
    ///
    /// let store = SessionStore::open_at("/tmp/corechat-test.db").unwrap();
    /// ```
    pub fn open_at<P: Into<PathBuf>>(db_path: P) -> Result<Self> {
        let db_path = db_path.into();

        // Ensure parent directory exists so opening the database succeeds.
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create parent directory for database")
                .map_err(|e| CorechatError::Storage(e.to_string()))?;
        }

        let db = sled::open(&db_path)
            .context("Failed to open session database")
            .map_err(|e| CorechatError::Storage(e.to_string()))?;

        Ok(Self { db, db_path })
    }

    /// Path of the underlying database
    pub fn path(&self) -> &std::path::Path {
        &self.db_path
    }

    /// Loads the session list at startup
    ///
    /// A share fragment, when present and decodable, takes precedence: the
    /// decoded session becomes the only one, the view is marked read-only,
    /// and the durable slot is left untouched. A fragment that fails to
    /// decode is logged and ignored, falling back to the durable slot.
    /// Missing or corrupt durable data yields an empty list; the caller is
    /// expected to create a fresh default session. This never returns an
    /// error.
    pub fn load(&self, share_fragment: Option<&str>) -> LoadedSessions {
        if let Some(fragment) = share_fragment {
            if let Some(session) = share::decode_share_fragment(fragment) {
                tracing::info!("Imported shared session \"{}\"", session.title);
                return LoadedSessions {
                    sessions: vec![session],
                    read_only: true,
                };
            }
            tracing::warn!("Ignoring undecodable share fragment");
        }

        let raw = match self.db.get(SESSIONS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return LoadedSessions::default(),
            Err(e) => {
                tracing::warn!("Failed to read session slot: {}", e);
                return LoadedSessions::default();
            }
        };

        match serde_json::from_slice::<Vec<ChatSession>>(&raw) {
            Ok(sessions) => LoadedSessions {
                sessions,
                read_only: false,
            },
            Err(e) => {
                tracing::warn!("Session slot holds corrupt data, starting fresh: {}", e);
                LoadedSessions::default()
            }
        }
    }

    /// Writes the full session list to the durable slot
    ///
    /// The list is serialized whole and flushed before returning, so a reload
    /// immediately after any user action reflects that action.
    pub fn save(&self, sessions: &[ChatSession]) -> Result<()> {
        let json = serde_json::to_vec(sessions)
            .context("Failed to serialize sessions")
            .map_err(|e| CorechatError::Storage(e.to_string()))?;

        self.db
            .insert(SESSIONS_KEY, json)
            .context("Failed to write session slot")
            .map_err(|e| CorechatError::Storage(e.to_string()))?;

        self.db
            .flush()
            .context("Failed to flush session database")
            .map_err(|e| CorechatError::Storage(e.to_string()))?;

        Ok(())
    }
}
