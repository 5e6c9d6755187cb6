//! Chat data model shared across the session manager, pipeline, and storage
//!
//! Sessions and messages serialize with camelCase field names; the same shape
//! is written to the durable slot and embedded in share links.

use regex::Regex;
use serde::{Deserialize, Serialize};
use ulid::Ulid;
use uuid::Uuid;

/// Maximum number of characters taken from the first user message when
/// deriving a session title.
pub const TITLE_DERIVE_CHARS: usize = 40;

/// Title given to every freshly created session until the first user
/// message (or an explicit rename) replaces it.
pub const DEFAULT_SESSION_TITLE: &str = "New Conversation";

/// Sender of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    /// Message typed by the user
    User,
    /// Message produced by the assistant (or synthesized on its behalf)
    Ai,
}

/// Per-message feedback state
///
/// Absence of a value means "no feedback". Selecting the same value twice
/// clears it; see `MessagePipeline::set_feedback` for the toggle rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Liked,
    Disliked,
}

/// Inline file attachment carried by value inside a message
///
/// `data` holds the raw base64 payload without a data-URL prefix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Base64-encoded file content
    pub data: String,
    /// MIME type of the original file
    pub mime_type: String,
    /// Original file name
    pub name: String,
}

/// One step of a reasoning trace attached to a Pro reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningStep {
    pub step: String,
    pub details: String,
}

/// Visual analysis of an attached image or video frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionAnalysis {
    pub dominant_color: String,
    pub subject_focus: String,
    pub emotion: String,
    pub aesthetic_score: f64,
}

/// Audio analysis of an attached clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioAnalysis {
    pub speech_rate: f64,
    pub avg_pitch: f64,
    pub energy: String,
    pub emotion: String,
    pub clarity_score: f64,
}

/// Text analysis of an attached document or transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnalysis {
    pub tone: String,
    pub topic_clusters: Vec<String>,
    pub hook_strength: f64,
}

/// Structured annotations attached to an assistant reply
///
/// Each response mode has a statically known shape rather than an open bag of
/// optional fields: a Standard reply carries follow-up suggestions only, while
/// a Pro reply carries the full reasoning and analysis payload. The variants
/// only affect rendering, never lifecycle decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ReplyDetails {
    /// Annotations of a standard-mode reply
    Standard {
        #[serde(default)]
        suggested_replies: Vec<String>,
    },
    /// Annotations of a pro-mode reply
    Pro {
        confidence: f64,
        intent: String,
        #[serde(default)]
        reasoning_trace: Vec<ReasoningStep>,
        safety_score: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        vision_analysis: Option<VisionAnalysis>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        audio_analysis: Option<AudioAnalysis>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text_analysis: Option<TextAnalysis>,
    },
}

/// A single message inside a chat session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Identifier unique within the session (ULID, so insertion-sortable)
    pub id: String,
    /// Who produced the message
    pub sender: MessageSender,
    /// Display text; AI messages may end with a fenced metadata block
    pub text: String,
    /// Optional inline attachment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    /// Tri-state feedback; `None` means no feedback given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
    /// Marks a synthesized failure message; such messages are excluded from
    /// regenerate and feedback affordances
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
    /// Mode-specific reply annotations, present on provider-built AI messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ReplyDetails>,
}

impl ChatMessage {
    /// Creates a new user message with a fresh identifier
    ///
    /// # Examples
    ///
    /// ```
    /// use corechat::session::{ChatMessage, MessageSender};
    ///
    /// let msg = ChatMessage::user("Hello!");
    /// assert_eq!(msg.sender, MessageSender::User);
    /// assert!(!msg.is_error);
    /// ```
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Ulid::new().to_string(),
            sender: MessageSender::User,
            text: text.into(),
            attachment: None,
            feedback: None,
            is_error: false,
            details: None,
        }
    }

    /// Creates a new user message carrying an attachment
    pub fn user_with_attachment(text: impl Into<String>, attachment: Attachment) -> Self {
        Self {
            attachment: Some(attachment),
            ..Self::user(text)
        }
    }

    /// Creates a new assistant message
    ///
    /// # Examples
    ///
    /// ```
    /// use corechat::session::{ChatMessage, MessageSender};
    ///
    /// let msg = ChatMessage::ai("Hi there!");
    /// assert_eq!(msg.sender, MessageSender::Ai);
    /// ```
    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            id: Ulid::new().to_string(),
            sender: MessageSender::Ai,
            text: text.into(),
            attachment: None,
            feedback: None,
            is_error: false,
            details: None,
        }
    }

    /// Creates an assistant message with reply annotations
    pub fn ai_with_details(text: impl Into<String>, details: ReplyDetails) -> Self {
        Self {
            details: Some(details),
            ..Self::ai(text)
        }
    }

    /// Creates a synthesized assistant error message
    ///
    /// # Examples
    ///
    /// ```
    /// use corechat::session::ChatMessage;
    ///
    /// let msg = ChatMessage::ai_error("Something went wrong.");
    /// assert!(msg.is_error);
    /// ```
    pub fn ai_error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::ai(text)
        }
    }
}

/// One independent conversation thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    /// Stable opaque identifier assigned at creation (UUID v4)
    pub id: String,
    /// Short human-readable label
    pub title: String,
    /// Conversation messages in insertion order
    pub messages: Vec<ChatMessage>,
    /// When the session was created
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// When the session was last mutated
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl ChatSession {
    /// Creates an empty session with a fresh identifier and the default title
    ///
    /// The caller is responsible for seeding the welcome message; see
    /// `SessionManager::create_session`.
    pub fn new() -> Self {
        let now = chrono::Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: DEFAULT_SESSION_TITLE.to_string(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Finds a message by id, returning its index
    pub fn position_of(&self, message_id: &str) -> Option<usize> {
        self.messages.iter().position(|m| m.id == message_id)
    }

    /// True when the session still holds only its seeded welcome message
    ///
    /// # Examples
    ///
    /// ```
    /// use corechat::session::{ChatMessage, ChatSession};
    ///
    /// let mut session = ChatSession::new();
    /// session.messages.push(ChatMessage::ai("Welcome!"));
    /// assert!(session.is_fresh());
    ///
    /// session.messages.push(ChatMessage::user("First question"));
    /// assert!(!session.is_fresh());
    /// ```
    pub fn is_fresh(&self) -> bool {
        self.messages.len() == 1 && self.messages[0].sender == MessageSender::Ai
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Derives a session title from the first user message
///
/// Takes the first [`TITLE_DERIVE_CHARS`] characters of the trimmed text,
/// respecting character boundaries.
///
/// # Examples
///
/// ```
/// use corechat::session::derive_title;
///
/// assert_eq!(derive_title("  Short question  "), "Short question");
/// let long = "x".repeat(100);
/// assert_eq!(derive_title(&long).chars().count(), 40);
/// ```
pub fn derive_title(text: &str) -> String {
    text.trim().chars().take(TITLE_DERIVE_CHARS).collect()
}

/// Video upload metadata embedded in an assistant reply
///
/// When the assistant has finished analyzing a video it terminates its reply
/// with a fenced ```json block carrying the publish metadata. The block is
/// part of the display text; this type only extracts a parsed copy for the
/// upload affordance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadMetadata {
    pub ready_for_upload: bool,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl UploadMetadata {
    /// Extracts upload metadata from the last fenced ```json block in `text`
    ///
    /// Returns `None` when no block is present or the block does not parse as
    /// upload metadata. Extraction never modifies the message text.
    ///
    /// # Examples
    ///
    /// ```
    /// use corechat::session::UploadMetadata;
    ///
    /// let text = "All set!\n```json\n{\"readyForUpload\":true,\"title\":\"T\",\"description\":\"D\",\"tags\":[\"a\"]}\n```";
    /// let meta = UploadMetadata::extract(text).unwrap();
    /// assert!(meta.ready_for_upload);
    /// assert_eq!(meta.tags, vec!["a"]);
    /// ```
    pub fn extract(text: &str) -> Option<Self> {
        // The fence pattern is fixed; failing to compile it would be a bug.
        let re = Regex::new(r"(?s)```json\s*(\{.*?\})\s*```").ok()?;
        let captures = re.captures_iter(text).last()?;
        let body = captures.get(1)?.as_str();
        match serde_json::from_str::<Self>(body) {
            Ok(meta) => Some(meta),
            Err(e) => {
                tracing::debug!("Ignoring unparseable metadata block: {}", e);
                None
            }
        }
    }
}
