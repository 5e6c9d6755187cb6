//! Base provider trait and request/response types
//!
//! This module defines the AssistantProvider trait that all reply providers
//! must implement, along with the request envelope the message pipeline
//! builds and the structured reply it consumes.

use crate::error::Result;
use crate::modes::{ResponseMode, ThinkingDepth};
use crate::session::{Attachment, ChatMessage, MessageSender, ReplyDetails};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One prior conversation turn, as sent to the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Role of the original sender
    pub role: MessageSender,
    /// Display text of the original message
    pub content: String,
}

impl HistoryEntry {
    /// Creates a history entry from a stored message
    ///
    /// # Examples
    ///
    /// ```
    /// use corechat::providers::HistoryEntry;
    /// use corechat::session::{ChatMessage, MessageSender};
    ///
    /// let entry = HistoryEntry::from_message(&ChatMessage::user("Hi"));
    /// assert_eq!(entry.role, MessageSender::User);
    /// assert_eq!(entry.content, "Hi");
    /// ```
    pub fn from_message(message: &ChatMessage) -> Self {
        Self {
            role: message.sender,
            content: message.text.clone(),
        }
    }
}

/// Reply controls forwarded with every request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyOptions {
    /// Requested response mode
    pub mode: ResponseMode,
    /// Requested thinking depth
    pub thinking_depth: ThinkingDepth,
}

impl Default for ReplyOptions {
    fn default() -> Self {
        Self {
            mode: ResponseMode::Standard,
            thinking_depth: ThinkingDepth::Balanced,
        }
    }
}

/// Request envelope for one assistant reply
///
/// `history` holds every message of the session prior to the prompt being
/// answered; the prompt itself is not repeated in it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyRequest {
    /// The user prompt to answer
    pub prompt: String,
    /// Prior conversation turns, oldest first
    pub history: Vec<HistoryEntry>,
    /// Optional inline attachment accompanying the prompt
    pub attachment: Option<Attachment>,
    /// Reply controls
    pub options: ReplyOptions,
}

/// Structured result of a provider call
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantReply {
    /// Display text of the reply
    pub text: String,
    /// Mode-specific annotations, when the provider supplied any
    pub details: Option<ReplyDetails>,
}

impl AssistantReply {
    /// Creates a plain text reply without annotations
    ///
    /// # Examples
    ///
    /// ```
    /// use corechat::providers::AssistantReply;
    ///
    /// let reply = AssistantReply::text("Hi!");
    /// assert_eq!(reply.text, "Hi!");
    /// assert!(reply.details.is_none());
    /// ```
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            details: None,
        }
    }

    /// Creates a reply with annotations attached
    pub fn with_details(text: impl Into<String>, details: ReplyDetails) -> Self {
        Self {
            text: text.into(),
            details: Some(details),
        }
    }
}

/// Provider trait for assistant replies
///
/// The message pipeline holds a provider behind this trait and never
/// inspects which implementation answers. A call may suspend for an
/// arbitrary, provider-controlled duration; there is no cancellation of an
/// issued call, it always resolves to success or failure.
///
/// # Examples
///
/// ```no_run
/// use corechat::providers::{AssistantProvider, AssistantReply, ReplyRequest};
/// use corechat::error::Result;
/// use async_trait::async_trait;
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl AssistantProvider for MyProvider {
///     async fn reply(&self, _request: &ReplyRequest) -> Result<AssistantReply> {
///         Ok(AssistantReply::text("Response"))
///     }
/// }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssistantProvider: Send + Sync {
    /// Produces one assistant reply for the given request
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying call fails or the response is
    /// malformed. Callers surface such failures as in-conversation error
    /// messages, never as panics.
    async fn reply(&self, request: &ReplyRequest) -> Result<AssistantReply>;

    /// Short name of this provider for logging
    fn name(&self) -> &str {
        "unknown"
    }
}
