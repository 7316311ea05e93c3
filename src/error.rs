use thiserror::Error;
use std::io;
use std::path::Path;

#[derive(Error, Debug)]
pub enum BubbleError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Render error: {0}")]
    Render(String),
}

impl BubbleError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn validation_error(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn render_error(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// An IO failure on `path`, keeping the original error kind.
    pub fn io_error(path: &Path, err: io::Error) -> Self {
        Self::Io(io::Error::new(err.kind(), format!("{}: {}", path.display(), err)))
    }
}

pub type Result<T> = std::result::Result<T, BubbleError>;
