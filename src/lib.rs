//! Corechat - terminal chat client for a local AI brain
//!
//! This library provides the core functionality for the Corechat client:
//! session lifecycle management, the message pipeline, durable session
//! storage with share-link import, provider abstractions, and simulated
//! cognitive telemetry.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: Session lifecycle, message pipeline, and presentation state
//! - `storage`: Durable session slot and share-link encoding
//! - `providers`: Assistant provider abstraction and the local brain client
//! - `telemetry`: Polled, cached subsystem telemetry
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use corechat::session::SessionManager;
//! use corechat::storage::SessionStore;
//!
//! fn main() -> anyhow::Result<()> {
//!     let store = SessionStore::open()?;
//!     let mut manager = SessionManager::new(store, "http://localhost:5173/".into(), None);
//!     if manager.sessions().is_empty() {
//!         manager.create_session(true);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod modes;
pub mod providers;
pub mod session;
pub mod storage;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{CorechatError, Result};
pub use modes::{ResponseMode, ThinkingDepth};
pub use session::{ChatMessage, ChatSession, MessagePipeline, SessionManager};
pub use storage::SessionStore;

#[cfg(test)]
pub mod test_utils;
