//! Message pipeline: send, regenerate, and feedback
//!
//! The pipeline appends user messages, obtains assistant replies (or
//! synthesizes an error reply), and keeps the transient responding state.
//! At most one request is modeled as in flight per application instance;
//! caller-contract violations (stale ids, inactive sessions, regenerate
//! targets without a preceding user prompt) are no-ops, never panics.

use crate::providers::{AssistantProvider, HistoryEntry, ReplyOptions, ReplyRequest};
use crate::session::manager::SessionManager;
use crate::session::ticker::{ThinkingTicker, THINKING_TICK};
use crate::session::{derive_title, Attachment, ChatMessage, Feedback, MessageSender};
use metrics::increment_counter;
use std::sync::Arc;
use std::time::Duration;

/// Fixed explanation shown when the provider call fails
///
/// The underlying error is logged, never surfaced in the conversation.
pub const ERROR_REPLY_TEXT: &str =
    "Sorry, I couldn't reach the AI brain. Check your connection and try again.";

/// Drives message sending and regeneration for one application instance
pub struct MessagePipeline {
    provider: Arc<dyn AssistantProvider>,
    options: ReplyOptions,
    responding: bool,
    ticker_interval: Duration,
    ticker: Option<ThinkingTicker>,
}

impl MessagePipeline {
    /// Creates a pipeline around a provider
    pub fn new(provider: Arc<dyn AssistantProvider>, options: ReplyOptions) -> Self {
        Self {
            provider,
            options,
            responding: false,
            ticker_interval: THINKING_TICK,
            ticker: None,
        }
    }

    /// Current reply controls
    pub fn options(&self) -> ReplyOptions {
        self.options
    }

    /// Replaces the reply controls used for subsequent sends
    pub fn set_options(&mut self, options: ReplyOptions) {
        self.options = options;
    }

    /// True while a request is outstanding
    ///
    /// The UI is expected to disable send affordances while this is set; the
    /// pipeline itself relies on exclusive access for mutual exclusion.
    pub fn is_responding(&self) -> bool {
        self.responding
    }

    /// The thinking phrase to display, while responding
    pub fn thinking_phrase(&self) -> Option<&'static str> {
        self.ticker.as_ref().map(|t| t.current())
    }

    /// Sends a user message into a session and appends the assistant reply
    ///
    /// Preconditions (all rejected as no-ops returning `false`): the manager
    /// is not read-only, `session_id` names the currently active session,
    /// and the text is not blank.
    ///
    /// On the session's first real message the title is derived from the
    /// first forty characters of the text. The user message is persisted
    /// before the provider call; the reply (or a synthesized error message)
    /// is persisted after it. The responding flag and thinking ticker are
    /// cleared on every exit path.
    pub async fn send_message(
        &mut self,
        manager: &mut SessionManager,
        session_id: &str,
        text: &str,
        attachment: Option<Attachment>,
    ) -> bool {
        if manager.is_read_only() {
            tracing::debug!("send_message: read-only view");
            return false;
        }
        if text.trim().is_empty() {
            return false;
        }
        if manager.active_id() != Some(session_id) {
            tracing::debug!("send_message: session {} is not active", session_id);
            return false;
        }

        let history = {
            let Some(session) = manager.session_mut(session_id) else {
                return false;
            };

            let history: Vec<HistoryEntry> = session
                .messages
                .iter()
                .map(HistoryEntry::from_message)
                .collect();

            let first_real_message = session.is_fresh();
            let user_message = match attachment.clone() {
                Some(a) => ChatMessage::user_with_attachment(text, a),
                None => ChatMessage::user(text),
            };
            session.messages.push(user_message);
            if first_real_message {
                session.title = derive_title(text);
            }
            session.updated_at = chrono::Utc::now();

            history
        };
        manager.persist();
        increment_counter!("corechat_messages_sent_total");

        self.responding = true;
        self.ticker = Some(ThinkingTicker::start(self.ticker_interval));

        let request = ReplyRequest {
            prompt: text.to_string(),
            history,
            attachment,
            options: self.options,
        };

        let reply_message = match self.provider.reply(&request).await {
            Ok(reply) => {
                increment_counter!("corechat_replies_total");
                match reply.details {
                    Some(details) => ChatMessage::ai_with_details(reply.text, details),
                    None => ChatMessage::ai(reply.text),
                }
            }
            Err(e) => {
                tracing::error!("Provider {} failed: {}", self.provider.name(), e);
                increment_counter!("corechat_provider_failures_total");
                ChatMessage::ai_error(ERROR_REPLY_TEXT)
            }
        };

        // Cleanup below runs on both outcomes; the two arms converge here.
        if let Some(session) = manager.session_mut(session_id) {
            session.messages.push(reply_message);
            session.updated_at = chrono::Utc::now();
        }
        manager.persist();
        self.ticker = None;
        self.responding = false;

        true
    }

    /// Regenerates an assistant reply by resubmitting its prompt
    ///
    /// The target must have a user message immediately before it; otherwise
    /// the call is a no-op. The session is truncated to before that user
    /// message and the prompt is resubmitted through [`send_message`],
    /// minting fresh identifiers for both the user message and the reply,
    /// exactly as if the user resent the prompt.
    ///
    /// [`send_message`]: MessagePipeline::send_message
    pub async fn regenerate(
        &mut self,
        manager: &mut SessionManager,
        session_id: &str,
        message_id: &str,
    ) -> bool {
        if manager.is_read_only() {
            return false;
        }
        if manager.active_id() != Some(session_id) {
            tracing::debug!("regenerate: session {} is not active", session_id);
            return false;
        }

        let (prompt, attachment) = {
            let Some(session) = manager.session_mut(session_id) else {
                return false;
            };
            let Some(index) = session.position_of(message_id) else {
                tracing::debug!("regenerate: unknown message {}", message_id);
                return false;
            };
            if index == 0 {
                return false;
            }
            let preceding = &session.messages[index - 1];
            if preceding.sender != MessageSender::User {
                return false;
            }

            let prompt = preceding.text.clone();
            let attachment = preceding.attachment.clone();
            session.messages.truncate(index - 1);
            session.updated_at = chrono::Utc::now();
            (prompt, attachment)
        };
        manager.persist();
        increment_counter!("corechat_regenerations_total");

        self.send_message(manager, session_id, &prompt, attachment)
            .await
    }

    /// Toggles feedback on one message
    ///
    /// Setting the stored value again clears it; a different value replaces
    /// it. Synthesized error messages carry no feedback.
    pub fn set_feedback(
        &mut self,
        manager: &mut SessionManager,
        session_id: &str,
        message_id: &str,
        value: Feedback,
    ) -> bool {
        if manager.is_read_only() {
            return false;
        }
        let Some(session) = manager.session_mut(session_id) else {
            return false;
        };
        let Some(message) = session.messages.iter_mut().find(|m| m.id == message_id) else {
            tracing::debug!("set_feedback: unknown message {}", message_id);
            return false;
        };
        if message.is_error {
            return false;
        }

        message.feedback = if message.feedback == Some(value) {
            None
        } else {
            Some(value)
        };
        session.updated_at = chrono::Utc::now();
        manager.persist();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{AssistantReply, MockAssistantProvider};
    use crate::session::manager::WELCOME_TEXT;
    use crate::session::ReplyDetails;
    use crate::storage::SessionStore;
    use tempfile::tempdir;

    fn test_manager() -> (SessionManager, tempfile::TempDir) {
        let dir = tempdir().expect("failed to create tempdir");
        let store = SessionStore::open_at(dir.path().join("sessions.db")).expect("open store");
        let manager = SessionManager::new(store, "http://localhost:5173/".to_string(), None);
        (manager, dir)
    }

    fn pipeline_with(provider: MockAssistantProvider) -> MessagePipeline {
        MessagePipeline::new(Arc::new(provider), ReplyOptions::default())
    }

    fn replying_provider(text: &'static str) -> MockAssistantProvider {
        let mut provider = MockAssistantProvider::new();
        provider
            .expect_reply()
            .returning(move |_| Ok(AssistantReply::text(text)));
        provider
    }

    fn failing_provider() -> MockAssistantProvider {
        let mut provider = MockAssistantProvider::new();
        provider.expect_reply().returning(|_| {
            Err(crate::error::CorechatError::Provider("brain offline".to_string()).into())
        });
        provider.expect_name().return_const("mock".to_string());
        provider
    }

    #[tokio::test]
    async fn test_send_message_appends_user_and_reply() {
        let (mut manager, _dir) = test_manager();
        let id = manager.create_session(true).unwrap().id.clone();
        let mut pipeline = pipeline_with(replying_provider("Hi!"));

        assert!(pipeline.send_message(&mut manager, &id, "Hello", None).await);

        let session = manager.session(&id).unwrap();
        assert_eq!(session.messages.len(), 3);
        assert_eq!(session.messages[0].text, WELCOME_TEXT);
        assert_eq!(session.messages[1].sender, MessageSender::User);
        assert_eq!(session.messages[1].text, "Hello");
        assert_eq!(session.messages[2].sender, MessageSender::Ai);
        assert_eq!(session.messages[2].text, "Hi!");
        assert!(!pipeline.is_responding());
        assert!(pipeline.thinking_phrase().is_none());
    }

    #[tokio::test]
    async fn test_send_message_passes_prior_history_only() {
        let (mut manager, _dir) = test_manager();
        let id = manager.create_session(true).unwrap().id.clone();

        let mut provider = MockAssistantProvider::new();
        provider
            .expect_reply()
            .withf(|request| {
                request.prompt == "Hello"
                    && request.history.len() == 1
                    && request.history[0].content == WELCOME_TEXT
            })
            .returning(|_| Ok(AssistantReply::text("Hi!")));
        let mut pipeline = pipeline_with(provider);

        assert!(pipeline.send_message(&mut manager, &id, "Hello", None).await);
    }

    #[tokio::test]
    async fn test_send_message_derives_title_from_first_message() {
        let (mut manager, _dir) = test_manager();
        let id = manager.create_session(true).unwrap().id.clone();
        let mut pipeline = pipeline_with(replying_provider("ok"));

        let long_text = "This prompt is deliberately longer than forty characters in total.";
        assert!(pipeline
            .send_message(&mut manager, &id, long_text, None)
            .await);

        let title = manager.session(&id).unwrap().title.clone();
        assert_eq!(title, long_text.chars().take(40).collect::<String>());
        assert_eq!(title.chars().count(), 40);

        // A second message never changes the title again.
        assert!(pipeline
            .send_message(&mut manager, &id, "A different follow-up question", None)
            .await);
        assert_eq!(manager.session(&id).unwrap().title, title);
    }

    #[tokio::test]
    async fn test_send_message_provider_failure_appends_error_reply() {
        let (mut manager, _dir) = test_manager();
        let id = manager.create_session(true).unwrap().id.clone();
        let mut pipeline = pipeline_with(failing_provider());

        assert!(pipeline.send_message(&mut manager, &id, "Hello", None).await);

        let session = manager.session(&id).unwrap();
        assert_eq!(session.messages.len(), 3);
        let reply = &session.messages[2];
        assert_eq!(reply.sender, MessageSender::Ai);
        assert!(reply.is_error);
        assert_eq!(reply.text, ERROR_REPLY_TEXT);
        assert!(!pipeline.is_responding());
    }

    #[tokio::test]
    async fn test_send_message_rejects_blank_text() {
        let (mut manager, _dir) = test_manager();
        let id = manager.create_session(true).unwrap().id.clone();
        let mut pipeline = pipeline_with(MockAssistantProvider::new());

        assert!(!pipeline.send_message(&mut manager, &id, "   ", None).await);
        assert_eq!(manager.session(&id).unwrap().messages.len(), 1);
    }

    #[tokio::test]
    async fn test_send_message_rejects_inactive_session() {
        let (mut manager, _dir) = test_manager();
        let first = manager.create_session(true).unwrap().id.clone();
        manager.create_session(true); // now active

        let mut pipeline = pipeline_with(MockAssistantProvider::new());
        assert!(!pipeline.send_message(&mut manager, &first, "Hi", None).await);
        assert_eq!(manager.session(&first).unwrap().messages.len(), 1);
    }

    #[tokio::test]
    async fn test_send_message_rejects_without_active_session() {
        let (mut manager, _dir) = test_manager();
        let mut pipeline = pipeline_with(MockAssistantProvider::new());
        assert!(!pipeline.send_message(&mut manager, "ghost", "Hi", None).await);
    }

    #[tokio::test]
    async fn test_send_message_attachment_reaches_provider_and_message() {
        let (mut manager, _dir) = test_manager();
        let id = manager.create_session(true).unwrap().id.clone();

        let mut provider = MockAssistantProvider::new();
        provider
            .expect_reply()
            .withf(|request| {
                request
                    .attachment
                    .as_ref()
                    .is_some_and(|a| a.name == "clip.mp4")
            })
            .returning(|_| Ok(AssistantReply::text("Got the clip")));
        let mut pipeline = pipeline_with(provider);

        let attachment = Attachment {
            data: "AAAA".to_string(),
            mime_type: "video/mp4".to_string(),
            name: "clip.mp4".to_string(),
        };
        assert!(pipeline
            .send_message(&mut manager, &id, "Check this", Some(attachment.clone()))
            .await);

        let session = manager.session(&id).unwrap();
        assert_eq!(session.messages[1].attachment, Some(attachment));
    }

    #[tokio::test]
    async fn test_send_message_keeps_reply_details() {
        let (mut manager, _dir) = test_manager();
        let id = manager.create_session(true).unwrap().id.clone();

        let details = ReplyDetails::Standard {
            suggested_replies: vec!["Go on".to_string()],
        };
        let expected = details.clone();
        let mut provider = MockAssistantProvider::new();
        provider
            .expect_reply()
            .returning(move |_| Ok(AssistantReply::with_details("Sure", details.clone())));
        let mut pipeline = pipeline_with(provider);

        assert!(pipeline.send_message(&mut manager, &id, "Hello", None).await);
        let session = manager.session(&id).unwrap();
        assert_eq!(session.messages[2].details, Some(expected));
    }

    #[tokio::test]
    async fn test_regenerate_truncates_and_resubmits() {
        let (mut manager, _dir) = test_manager();
        let id = manager.create_session(true).unwrap().id.clone();

        let mut provider = MockAssistantProvider::new();
        provider
            .expect_reply()
            .withf(|request| request.prompt == "Hello")
            .times(2)
            .returning(|_| Ok(AssistantReply::text("Hi!")));
        let mut pipeline = pipeline_with(provider);

        assert!(pipeline.send_message(&mut manager, &id, "Hello", None).await);
        let (old_user_id, reply_id) = {
            let session = manager.session(&id).unwrap();
            (session.messages[1].id.clone(), session.messages[2].id.clone())
        };

        assert!(pipeline.regenerate(&mut manager, &id, &reply_id).await);

        let session = manager.session(&id).unwrap();
        assert_eq!(session.messages.len(), 3);
        assert_eq!(session.messages[1].text, "Hello");
        // The resubmitted prompt and the fresh reply carry new identifiers.
        assert_ne!(session.messages[1].id, old_user_id);
        assert_ne!(session.messages[2].id, reply_id);
    }

    #[tokio::test]
    async fn test_regenerate_first_message_is_noop() {
        let (mut manager, _dir) = test_manager();
        let id = manager.create_session(true).unwrap().id.clone();
        let welcome_id = manager.session(&id).unwrap().messages[0].id.clone();

        let mut pipeline = pipeline_with(MockAssistantProvider::new());
        assert!(!pipeline.regenerate(&mut manager, &id, &welcome_id).await);
        assert_eq!(manager.session(&id).unwrap().messages.len(), 1);
    }

    #[tokio::test]
    async fn test_regenerate_requires_preceding_user_message() {
        let (mut manager, _dir) = test_manager();
        let id = manager.create_session(true).unwrap().id.clone();

        // Hand-append a second AI message directly after the welcome.
        let stray = ChatMessage::ai("Stray follow-up");
        let stray_id = stray.id.clone();
        manager.session_mut(&id).unwrap().messages.push(stray);

        let mut pipeline = pipeline_with(MockAssistantProvider::new());
        assert!(!pipeline.regenerate(&mut manager, &id, &stray_id).await);
        assert_eq!(manager.session(&id).unwrap().messages.len(), 2);
    }

    #[tokio::test]
    async fn test_regenerate_unknown_message_is_noop() {
        let (mut manager, _dir) = test_manager();
        let id = manager.create_session(true).unwrap().id.clone();
        let mut pipeline = pipeline_with(MockAssistantProvider::new());

        assert!(!pipeline.regenerate(&mut manager, &id, "missing").await);
    }

    #[tokio::test]
    async fn test_regenerate_retries_after_error_reply() {
        let (mut manager, _dir) = test_manager();
        let id = manager.create_session(true).unwrap().id.clone();

        let mut pipeline = pipeline_with(failing_provider());
        assert!(pipeline.send_message(&mut manager, &id, "Hello", None).await);
        let error_id = manager.session(&id).unwrap().messages[2].id.clone();
        assert!(manager.session(&id).unwrap().messages[2].is_error);

        // A human retries by regenerating the error reply; this time the
        // provider answers.
        let mut pipeline = pipeline_with(replying_provider("Back online"));
        assert!(pipeline.regenerate(&mut manager, &id, &error_id).await);

        let session = manager.session(&id).unwrap();
        assert_eq!(session.messages.len(), 3);
        assert!(!session.messages[2].is_error);
        assert_eq!(session.messages[2].text, "Back online");
    }

    #[tokio::test]
    async fn test_set_feedback_toggle() {
        let (mut manager, _dir) = test_manager();
        let id = manager.create_session(true).unwrap().id.clone();
        let message_id = manager.session(&id).unwrap().messages[0].id.clone();
        let mut pipeline = pipeline_with(MockAssistantProvider::new());

        assert!(pipeline.set_feedback(&mut manager, &id, &message_id, Feedback::Liked));
        assert_eq!(
            manager.session(&id).unwrap().messages[0].feedback,
            Some(Feedback::Liked)
        );

        // Same value again clears it.
        assert!(pipeline.set_feedback(&mut manager, &id, &message_id, Feedback::Liked));
        assert_eq!(manager.session(&id).unwrap().messages[0].feedback, None);

        // Different value replaces.
        assert!(pipeline.set_feedback(&mut manager, &id, &message_id, Feedback::Liked));
        assert!(pipeline.set_feedback(&mut manager, &id, &message_id, Feedback::Disliked));
        assert_eq!(
            manager.session(&id).unwrap().messages[0].feedback,
            Some(Feedback::Disliked)
        );
    }

    #[tokio::test]
    async fn test_set_feedback_rejected_on_error_message() {
        let (mut manager, _dir) = test_manager();
        let id = manager.create_session(true).unwrap().id.clone();

        let mut pipeline = pipeline_with(failing_provider());
        assert!(pipeline.send_message(&mut manager, &id, "Hello", None).await);
        let error_id = manager.session(&id).unwrap().messages[2].id.clone();

        assert!(!pipeline.set_feedback(&mut manager, &id, &error_id, Feedback::Liked));
        assert_eq!(manager.session(&id).unwrap().messages[2].feedback, None);
    }

    #[tokio::test]
    async fn test_set_feedback_unknown_ids_are_noops() {
        let (mut manager, _dir) = test_manager();
        let id = manager.create_session(true).unwrap().id.clone();
        let mut pipeline = pipeline_with(MockAssistantProvider::new());

        assert!(!pipeline.set_feedback(&mut manager, "ghost", "m", Feedback::Liked));
        assert!(!pipeline.set_feedback(&mut manager, &id, "ghost", Feedback::Liked));
    }
}
