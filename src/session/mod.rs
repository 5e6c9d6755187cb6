//! Session lifecycle, message pipeline, and presentation state machines

pub mod manager;
pub mod pipeline;
pub mod reveal;
pub mod ticker;
pub mod types;

pub use manager::{SessionManager, WELCOME_TEXT};
pub use pipeline::{MessagePipeline, ERROR_REPLY_TEXT};
pub use reveal::{RevealState, TextReveal};
pub use ticker::{ThinkingTicker, THINKING_PHRASES, THINKING_TICK};
pub use types::{
    derive_title, Attachment, AudioAnalysis, ChatMessage, ChatSession, Feedback, MessageSender,
    ReasoningStep, ReplyDetails, TextAnalysis, UploadMetadata, VisionAnalysis,
    DEFAULT_SESSION_TITLE, TITLE_DERIVE_CHARS,
};
