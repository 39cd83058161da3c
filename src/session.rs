//! The conversation handle: ordered turn history plus the provider client.

use tracing::debug;

use crate::error::ChatError;
use crate::llm::{ChatModel, Content};

/// One process-lifetime conversation.
///
/// History grows by one (user, model) pair per successful exchange and is
/// never reordered, pruned, or persisted. Owned by the loop in `main`;
/// dropped at process exit.
pub struct ChatSession {
    model: Box<dyn ChatModel>,
    history: Vec<Content>,
}

impl ChatSession {
    /// Creates a session with empty history.
    pub fn new(model: Box<dyn ChatModel>) -> Self {
        Self {
            model,
            history: Vec::new(),
        }
    }

    /// Sends one user message, with the full history, and returns the reply.
    ///
    /// The text is forwarded verbatim, empty strings included. On failure
    /// the pending user entry is removed again so the history only ever
    /// holds completed turns.
    pub async fn send_message(&mut self, text: &str) -> Result<String, ChatError> {
        self.history.push(Content::user(text));
        match self.model.generate(&self.history).await {
            Ok(reply) => {
                self.history.push(Content::model(reply.clone()));
                debug!("Exchange complete, {} turns in history", self.turn_count());
                Ok(reply)
            }
            Err(e) => {
                self.history.pop();
                Err(e)
            }
        }
    }

    /// Number of completed (user, model) turns.
    pub fn turn_count(&self) -> usize {
        self.history.len() / 2
    }

    /// Backend description, for status logging.
    pub fn model_description(&self) -> String {
        self.model.description()
    }
}
