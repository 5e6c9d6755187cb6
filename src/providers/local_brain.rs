//! Local brain provider implementation
//!
//! This module implements the AssistantProvider trait against the local
//! brain server's HTTP API (`POST {host}/api/chat`). The server answers with
//! a display text plus optional flat annotation fields; this provider folds
//! those into the mode-specific `ReplyDetails` variant.

use crate::config::LocalBrainConfig;
use crate::error::{CorechatError, Result};
use crate::modes::ResponseMode;
use crate::providers::{AssistantProvider, AssistantReply, HistoryEntry, ReplyOptions, ReplyRequest};
use crate::session::{
    AudioAnalysis, ReasoningStep, ReplyDetails, TextAnalysis, VisionAnalysis,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Provider backed by the local brain server
///
/// # Examples
///
/// ```no_run
/// use corechat::config::LocalBrainConfig;
/// use corechat::providers::{AssistantProvider, LocalBrainProvider, ReplyOptions, ReplyRequest};
///
/// # async fn example() -> corechat::error::Result<()> {
/// let config = LocalBrainConfig {
///     host: "http://localhost:8000".to_string(),
///     timeout_seconds: 120,
/// };
/// let provider = LocalBrainProvider::new(config)?;
/// let request = ReplyRequest {
///     prompt: "Hello!".to_string(),
///     history: Vec::new(),
///     attachment: None,
///     options: ReplyOptions::default(),
/// };
/// let reply = provider.reply(&request).await?;
/// # Ok(())
/// # }
/// ```
pub struct LocalBrainProvider {
    client: Client,
    config: LocalBrainConfig,
}

/// Request body for the chat endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrainRequest<'a> {
    prompt: &'a str,
    history: &'a [HistoryEntry],
    #[serde(skip_serializing_if = "Option::is_none")]
    attachment: Option<BrainAttachment<'a>>,
    options: &'a ReplyOptions,
}

/// Attachment payload; the server expects raw base64 without a data-URL prefix
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrainAttachment<'a> {
    data: &'a str,
    mime_type: &'a str,
}

/// Response body from the chat endpoint
///
/// Annotation fields are flat and optional on the wire; which of them are
/// meaningful depends on the requested response mode.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BrainResponse {
    response: String,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    intent: Option<String>,
    #[serde(default)]
    reasoning_trace: Vec<ReasoningStep>,
    #[serde(default)]
    safety_score: Option<f64>,
    #[serde(default)]
    suggested_replies: Vec<String>,
    #[serde(default)]
    vision_analysis: Option<VisionAnalysis>,
    #[serde(default)]
    audio_analysis: Option<AudioAnalysis>,
    #[serde(default)]
    text_analysis: Option<TextAnalysis>,
}

impl LocalBrainProvider {
    /// Create a new local brain provider instance
    ///
    /// # Arguments
    ///
    /// * `config` - Host and timeout configuration
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use corechat::config::LocalBrainConfig;
    /// use corechat::providers::LocalBrainProvider;
    ///
    /// let provider = LocalBrainProvider::new(LocalBrainConfig::default());
    /// assert!(provider.is_ok());
    /// ```
    pub fn new(config: LocalBrainConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("corechat/0.3.0")
            .build()
            .map_err(|e| CorechatError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!("Initialized local brain provider: host={}", config.host);

        Ok(Self { client, config })
    }

    /// Get the configured brain server host
    ///
    /// # Examples
    ///
    /// ```
    /// use corechat::config::LocalBrainConfig;
    /// use corechat::providers::LocalBrainProvider;
    ///
    /// let provider = LocalBrainProvider::new(LocalBrainConfig::default()).unwrap();
    /// assert_eq!(provider.host(), "http://localhost:8000");
    /// ```
    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// Fold the flat wire annotations into the variant for the requested mode
    fn convert_details(mode: ResponseMode, body: &BrainResponse) -> Option<ReplyDetails> {
        match mode {
            ResponseMode::Standard => {
                if body.suggested_replies.is_empty() {
                    None
                } else {
                    Some(ReplyDetails::Standard {
                        suggested_replies: body.suggested_replies.clone(),
                    })
                }
            }
            ResponseMode::Pro => {
                let confidence = body.confidence?;
                let intent = body.intent.clone()?;
                Some(ReplyDetails::Pro {
                    confidence,
                    intent,
                    reasoning_trace: body.reasoning_trace.clone(),
                    safety_score: body.safety_score.unwrap_or(1.0),
                    vision_analysis: body.vision_analysis.clone(),
                    audio_analysis: body.audio_analysis.clone(),
                    text_analysis: body.text_analysis.clone(),
                })
            }
        }
    }
}

/// Strips a data-URL prefix from an attachment payload
///
/// Messages store whatever the capture layer produced, which may be a full
/// `data:<mime>;base64,<data>` URL; the brain server expects the raw base64
/// part only.
fn strip_data_url(data: &str) -> &str {
    match data.find("base64,") {
        Some(idx) => &data[idx + "base64,".len()..],
        None => data,
    }
}

#[async_trait]
impl AssistantProvider for LocalBrainProvider {
    async fn reply(&self, request: &ReplyRequest) -> Result<AssistantReply> {
        let url = format!("{}/api/chat", self.config.host);

        let attachment = request.attachment.as_ref().map(|a| BrainAttachment {
            data: strip_data_url(&a.data),
            mime_type: &a.mime_type,
        });

        let body = BrainRequest {
            prompt: &request.prompt,
            history: &request.history,
            attachment,
            options: &request.options,
        };

        tracing::debug!(
            "Sending brain request: {} history entries, attachment={}, mode={}",
            request.history.len(),
            request.attachment.is_some(),
            request.options.mode
        );

        let response = self.client.post(&url).json(&body).send().await.map_err(|e| {
            tracing::error!("Brain request failed: {}", e);
            CorechatError::Provider(format!("Failed to reach brain server at {}: {}", url, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Brain server returned error {}: {}", status, error_text);
            let message = if status.is_server_error() {
                format!("Brain server internal error ({})", status)
            } else if status == reqwest::StatusCode::NOT_FOUND {
                format!("Chat endpoint not found at {}", url)
            } else {
                format!("Brain server returned error {}: {}", status, error_text)
            };
            return Err(CorechatError::Provider(message).into());
        }

        let brain_response: BrainResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse brain response: {}", e);
            CorechatError::Provider(format!("Failed to parse brain response: {}", e))
        })?;

        let details = Self::convert_details(request.options.mode, &brain_response);

        Ok(AssistantReply {
            text: brain_response.response,
            details,
        })
    }

    fn name(&self) -> &str {
        "local-brain"
    }
}
