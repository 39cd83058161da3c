//! Shared conversation types and the provider seam.

pub mod client;
pub mod gemini;

pub use client::ChatModel;
pub use gemini::GeminiClient;

use serde::{Deserialize, Serialize};

/// Who produced a history entry. Serialized to the Gemini wire roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One entry in the conversation history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub role: Role,
    pub text: String,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Content {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Content {
            role: Role::Model,
            text: text.into(),
        }
    }
}
