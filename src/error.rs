use thiserror::Error;

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error in {path}: {details}")]
    ConfigParse { path: String, details: String },

    #[error("Invalid theme name: {0}")]
    InvalidTheme(String),

    #[error("Entry is empty")]
    EmptyEntry,

    #[error("Listener error: {0}")]
    Listener(String),
}

/// Convenience type alias for Results with JournalError
pub type Result<T> = std::result::Result<T, JournalError>;
