use thiserror::Error;

#[derive(Error, Debug)]
pub enum HuddleError {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Output channel closed")]
    ChannelClosed,

    #[error("{0}")]
    Other(String),
}

impl HuddleError {
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session(message.into())
    }
}

pub type Result<T> = std::result::Result<T, HuddleError>;
