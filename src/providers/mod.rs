//! Provider module for Corechat
//!
//! This module contains the assistant-provider abstraction and the local
//! brain server implementation.

pub mod base;
pub mod local_brain;

pub use base::{AssistantProvider, AssistantReply, HistoryEntry, ReplyOptions, ReplyRequest};
pub use local_brain::LocalBrainProvider;

#[cfg(test)]
pub use base::MockAssistantProvider;

use crate::config::ProviderConfig;
use crate::error::Result;

/// Create a provider instance based on configuration
///
/// # Arguments
///
/// * `config` - Provider configuration
///
/// # Returns
///
/// Returns a boxed provider instance
///
/// # Errors
///
/// Returns error if the provider type is invalid or initialization fails
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn AssistantProvider>> {
    match config.provider_type.as_str() {
        "local" => Ok(Box::new(LocalBrainProvider::new(config.local.clone())?)),
        other => Err(crate::error::CorechatError::Provider(format!(
            "Unknown provider type: {}",
            other
        ))
        .into()),
    }
}
