// src/errors.rs

use eventsource_stream::EventStreamError;
use thiserror::Error;

/// Errors surfaced by the assistant, its configuration and the Gemini client.
#[derive(Debug, Error)]
pub enum EmeraudeError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("logger error: {0}")]
    Logger(#[from] flexi_logger::FlexiLoggerError),
}

impl EmeraudeError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn api_error(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }
}

impl From<EventStreamError<reqwest::Error>> for EmeraudeError {
    fn from(err: EventStreamError<reqwest::Error>) -> Self {
        match err {
            EventStreamError::Transport(e) => Self::Http(e),
            other => Self::api_error(format!("malformed event stream: {}", other)),
        }
    }
}

pub type EmeraudeResult<T> = Result<T, EmeraudeError>;
