use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("Invalid param descriptor: {0}")]
    InvalidParam(String),
    #[error("Unresolved value: {0}")]
    Unresolved(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl LibraryError {
    pub fn invalid_param(msg: impl Into<String>) -> Self {
        LibraryError::InvalidParam(msg.into())
    }

    pub fn unresolved(msg: impl Into<String>) -> Self {
        LibraryError::Unresolved(msg.into())
    }
}
