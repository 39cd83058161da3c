//! `ChatModel` trait — abstraction over the generative API.
//!
//! The session drives the conversation through this trait so tests can
//! substitute a scripted model for the real HTTP client.

use async_trait::async_trait;

use crate::error::ChatError;

use super::Content;

/// Abstraction over a conversational model backend.
///
/// One exchange: the full history so far (ending with the newest user
/// entry) goes in, the model's reply text comes out. The implementation
/// performs a single blocking round trip; retries and timeouts are not
/// its concern.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Sends the conversation to the model and returns the reply text.
    async fn generate(&self, history: &[Content]) -> Result<String, ChatError>;

    /// Human-readable description of the backend and model.
    ///
    /// Used in status output, e.g. `"gemini (gemini-pro)"`.
    fn description(&self) -> String;
}
