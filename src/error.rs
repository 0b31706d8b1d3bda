use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Reply service returned {status}")]
    Status { status: reqwest::StatusCode },

    #[error("Malformed reply: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid reply service URL: {0}")]
    InvalidUrl(String),

    #[error("Reply task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, ChatError>;
