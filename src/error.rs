//! Error taxonomy for a chat session.
//!
//! Every variant is fatal: nothing in the program catches or retries a
//! `ChatError`, it propagates to `main` and terminates the process.

use std::fmt;

/// Errors surfaced by credential resolution and the send operation.
#[derive(Debug)]
pub enum ChatError {
    /// No API key found in config or environment (checked before the loop).
    MissingCredential,
    /// Network-level failure: unreachable host, reset connection, timeout.
    Transport(String),
    /// The API accepted the connection but rejected the request.
    Api {
        kind: ApiErrorKind,
        status: u16,
        message: String,
    },
    /// 2xx response whose body the client could not interpret.
    MalformedResponse(String),
}

/// How the remote classified a rejected request, derived from HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 401 / 403 — key rejected.
    InvalidCredential,
    /// 429 — quota or rate limit.
    RateLimited,
    /// 400 — malformed or unsafe request content.
    InvalidRequest,
    /// 5xx — server-side fault.
    Server,
    /// Any other non-success status.
    Other,
}

impl ApiErrorKind {
    /// Maps an HTTP status code to an error kind.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => ApiErrorKind::InvalidCredential,
            429 => ApiErrorKind::RateLimited,
            400 => ApiErrorKind::InvalidRequest,
            500..=599 => ApiErrorKind::Server,
            _ => ApiErrorKind::Other,
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ApiErrorKind::InvalidCredential => "invalid credential",
            ApiErrorKind::RateLimited => "rate limited",
            ApiErrorKind::InvalidRequest => "invalid request",
            ApiErrorKind::Server => "server error",
            ApiErrorKind::Other => "api error",
        };
        f.write_str(label)
    }
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::MissingCredential => {
                write!(f, "no API key: set GEMINI_API_KEY or [llm] api_key in the config")
            }
            ChatError::Transport(msg) => write!(f, "transport error: {msg}"),
            ChatError::Api {
                kind,
                status,
                message,
            } => write!(f, "{kind} (HTTP {status}): {message}"),
            ChatError::MalformedResponse(msg) => write!(f, "malformed API response: {msg}"),
        }
    }
}

impl std::error::Error for ChatError {}

impl From<reqwest::Error> for ChatError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ChatError::MalformedResponse(e.to_string())
        } else {
            ChatError::Transport(e.to_string())
        }
    }
}
