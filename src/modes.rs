//! Response mode and thinking depth types
//!
//! This module defines the two per-session reply controls:
//! - Response mode: standard replies vs. the heavier pro analysis replies
//! - Thinking depth: how long the assistant is asked to deliberate
//!
//! Both only shape the request sent to the assistant provider and the pacing
//! of the reveal animation; neither affects session lifecycle rules.

use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Response mode for assistant replies
///
/// Determines which annotation payload a reply carries and how quickly its
/// text is revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// Standard replies: display text plus follow-up suggestions
    Standard,

    /// Pro replies: full confidence/reasoning/analysis payload
    Pro,
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "STANDARD"),
            Self::Pro => write!(f, "PRO"),
        }
    }
}

impl ResponseMode {
    /// Parse a response mode from a string
    ///
    /// # Arguments
    ///
    /// * `s` - String representation of the mode ("standard" or "pro")
    ///
    /// # Examples
    ///
    /// ```
    /// use corechat::modes::ResponseMode;
    ///
    /// let mode = ResponseMode::parse_str("pro").unwrap();
    /// assert_eq!(mode, ResponseMode::Pro);
    /// ```
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "pro" => Ok(Self::Pro),
            other => Err(format!("Unknown response mode: {}", other)),
        }
    }

    /// Get a user-friendly description of this mode
    pub fn description(&self) -> &'static str {
        match self {
            Self::Standard => "Fast replies with follow-up suggestions",
            Self::Pro => "Deep replies with reasoning and analysis",
        }
    }

    /// Get a colored tag representation of this mode
    ///
    /// # Examples
    ///
    /// ```ignore
    /// use corechat::modes::ResponseMode;
    ///
    /// let tag = ResponseMode::Pro.colored_tag();
    /// println!("{}", tag);  // Displays "[PRO]" in cyan
    /// ```
    pub fn colored_tag(&self) -> String {
        match self {
            Self::Standard => format!("[{}]", "STANDARD".blue()),
            Self::Pro => format!("[{}]", "PRO".cyan()),
        }
    }
}

/// How long the assistant is asked to deliberate before answering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThinkingDepth {
    /// Answer quickly with minimal deliberation
    Fast,

    /// Balance latency against answer quality
    Balanced,

    /// Deliberate at length before answering
    Deep,
}

impl fmt::Display for ThinkingDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fast => write!(f, "FAST"),
            Self::Balanced => write!(f, "BALANCED"),
            Self::Deep => write!(f, "DEEP"),
        }
    }
}

impl ThinkingDepth {
    /// Parse a thinking depth from a string
    ///
    /// # Arguments
    ///
    /// * `s` - String representation ("fast", "balanced", or "deep")
    ///
    /// # Examples
    ///
    /// ```
    /// use corechat::modes::ThinkingDepth;
    ///
    /// let depth = ThinkingDepth::parse_str("deep").unwrap();
    /// assert_eq!(depth, ThinkingDepth::Deep);
    /// ```
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "balanced" => Ok(Self::Balanced),
            "deep" => Ok(Self::Deep),
            other => Err(format!("Unknown thinking depth: {}", other)),
        }
    }

    /// Get a user-friendly description of this depth
    pub fn description(&self) -> &'static str {
        match self {
            Self::Fast => "Answer quickly",
            Self::Balanced => "Balance speed and quality",
            Self::Deep => "Deliberate at length",
        }
    }

    /// Get a colored tag representation of this depth
    pub fn colored_tag(&self) -> String {
        match self {
            Self::Fast => format!("[{}]", "FAST".yellow()),
            Self::Balanced => format!("[{}]", "BALANCED".green()),
            Self::Deep => format!("[{}]", "DEEP".purple()),
        }
    }
}

/// Current reply controls during an interactive session
#[derive(Debug, Clone, Copy)]
pub struct ModeState {
    /// The current response mode
    pub mode: ResponseMode,
    /// The current thinking depth
    pub depth: ThinkingDepth,
}

impl ModeState {
    /// Create a new mode state
    ///
    /// # Examples
    ///
    /// ```
    /// use corechat::modes::{ModeState, ResponseMode, ThinkingDepth};
    ///
    /// let state = ModeState::new(ResponseMode::Standard, ThinkingDepth::Balanced);
    /// assert_eq!(state.mode, ResponseMode::Standard);
    /// ```
    pub fn new(mode: ResponseMode, depth: ThinkingDepth) -> Self {
        Self { mode, depth }
    }

    /// Switch to a new response mode, returning the one it replaced
    pub fn switch_mode(&mut self, new_mode: ResponseMode) -> ResponseMode {
        let old_mode = self.mode;
        self.mode = new_mode;
        old_mode
    }

    /// Switch to a new thinking depth, returning the one it replaced
    pub fn switch_depth(&mut self, new_depth: ThinkingDepth) -> ThinkingDepth {
        let old_depth = self.depth;
        self.depth = new_depth;
        old_depth
    }
}
