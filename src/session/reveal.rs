//! Character-by-character reveal of assistant replies
//!
//! Presentation-only state machine: `Pending` until the first tick,
//! `Revealing` while characters are appended to the display buffer, and
//! `Complete` once the buffer covers the stored text. The stored message
//! text is never modified; the machine tracks how much of it is visible.
//! Retargeting to a different message abandons the previous reveal so a
//! stale timer can never corrupt another message's buffer.

use crate::modes::ResponseMode;
use std::time::Duration;

/// Reveal progress for one message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    /// The message exists but nothing is shown yet
    Pending,
    /// Some characters are visible, more remain
    Revealing,
    /// The whole text is visible; the driving timer must be cleared
    Complete,
}

/// Tick interval for the reveal timer
///
/// Pro replies reveal faster than standard ones; both are cosmetic pacing
/// choices only.
pub fn tick_interval(mode: ResponseMode) -> Duration {
    match mode {
        ResponseMode::Standard => Duration::from_millis(18),
        ResponseMode::Pro => Duration::from_millis(8),
    }
}

/// Reveal buffer for the message currently being rendered
#[derive(Debug, Clone)]
pub struct TextReveal {
    message_id: String,
    full_text: String,
    /// Number of characters (not bytes) currently visible
    shown: usize,
}

impl TextReveal {
    /// Starts a reveal for one message
    ///
    /// # Examples
    ///
    /// ```
    /// use corechat::session::reveal::{RevealState, TextReveal};
    ///
    /// let reveal = TextReveal::new("msg-1", "Hello");
    /// assert_eq!(reveal.state(), RevealState::Pending);
    /// assert_eq!(reveal.visible(), "");
    /// ```
    pub fn new(message_id: impl Into<String>, full_text: impl Into<String>) -> Self {
        Self {
            message_id: message_id.into(),
            full_text: full_text.into(),
            shown: 0,
        }
    }

    /// Identifier of the message being revealed
    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    /// Current state of the reveal
    pub fn state(&self) -> RevealState {
        let total = self.full_text.chars().count();
        if self.shown == 0 && total > 0 {
            RevealState::Pending
        } else if self.shown < total {
            RevealState::Revealing
        } else {
            RevealState::Complete
        }
    }

    /// True once the whole text is visible
    pub fn is_complete(&self) -> bool {
        self.state() == RevealState::Complete
    }

    /// Reveals one more character
    ///
    /// Returns the newly revealed character, or `None` once complete (the
    /// caller clears its timer then).
    ///
    /// # Examples
    ///
    /// ```
    /// use corechat::session::reveal::TextReveal;
    ///
    /// let mut reveal = TextReveal::new("msg-1", "Hi");
    /// assert_eq!(reveal.tick(), Some('H'));
    /// assert_eq!(reveal.tick(), Some('i'));
    /// assert_eq!(reveal.tick(), None);
    /// ```
    pub fn tick(&mut self) -> Option<char> {
        let next = self.full_text.chars().nth(self.shown)?;
        self.shown += 1;
        Some(next)
    }

    /// The currently visible prefix of the text
    pub fn visible(&self) -> &str {
        match self.full_text.char_indices().nth(self.shown) {
            Some((byte_index, _)) => &self.full_text[..byte_index],
            None => &self.full_text,
        }
    }

    /// Switches the reveal to a different message
    ///
    /// If the identity changed, any in-progress reveal is abandoned and the
    /// buffer restarts from zero; retargeting to the same message is a no-op.
    /// Returns true when a switch happened, signalling the driver to cancel
    /// and restart its timer.
    pub fn retarget(&mut self, message_id: &str, full_text: &str) -> bool {
        if self.message_id == message_id {
            return false;
        }
        *self = Self::new(message_id, full_text);
        true
    }
}
