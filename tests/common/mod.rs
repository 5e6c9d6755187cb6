//! Shared helpers for integration tests

// Not every test binary uses every helper.
#![allow(dead_code)]

use async_trait::async_trait;
use corechat::error::{CorechatError, Result};
use corechat::providers::{AssistantProvider, AssistantReply, ReplyRequest};
use corechat::session::{ReplyDetails, SessionManager};
use corechat::storage::SessionStore;
use std::collections::VecDeque;
use std::sync::Mutex;
use tempfile::TempDir;

/// One scripted provider outcome
pub enum ScriptedOutcome {
    Reply(AssistantReply),
    Failure(String),
}

/// Provider that replays a fixed script of outcomes
///
/// Records every prompt it is asked to answer; an exhausted script answers
/// with a plain "ok".
#[derive(Default)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<ScriptedOutcome>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&self, text: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptedOutcome::Reply(AssistantReply::text(text)));
    }

    pub fn push_reply_with_details(&self, text: &str, details: ReplyDetails) {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptedOutcome::Reply(AssistantReply::with_details(
                text, details,
            )));
    }

    pub fn push_failure(&self, message: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptedOutcome::Failure(message.to_string()));
    }

    /// Prompts seen so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssistantProvider for ScriptedProvider {
    async fn reply(&self, request: &ReplyRequest) -> Result<AssistantReply> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        match self.script.lock().unwrap().pop_front() {
            Some(ScriptedOutcome::Reply(reply)) => Ok(reply),
            Some(ScriptedOutcome::Failure(message)) => {
                Err(CorechatError::Provider(message).into())
            }
            None => Ok(AssistantReply::text("ok")),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Opens a manager over a store in the given temp directory
pub fn manager_at(dir: &TempDir) -> SessionManager {
    let store = SessionStore::open_at(dir.path().join("sessions.db")).expect("open store");
    SessionManager::new(store, "http://localhost:5173/".to_string(), None)
}
