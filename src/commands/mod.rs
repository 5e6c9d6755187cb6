/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `chat`      — Interactive chat session
- `history`   — Stored-session listing and management
- `telemetry` — Cognitive telemetry inspection

These handlers are intentionally small and use the library components:
the session manager, message pipeline, storage, and telemetry poller.
*/

pub mod chat;
pub mod history;
pub mod special;
pub mod telemetry;

use crate::config::Config;
use crate::error::Result;
use crate::storage::SessionStore;

/// Opens the session store, honoring a configured path override
pub fn open_store(config: &Config) -> Result<SessionStore> {
    match &config.storage.path {
        Some(path) => SessionStore::open_at(path),
        None => SessionStore::open(),
    }
}
