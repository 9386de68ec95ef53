//! CLI error type
//!
//! Library errors pass through unchanged so `main` prints the same message
//! the engine produced.

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] vendor_core::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// `--json` output could not be rendered
    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),

    /// A failure reported to the user in plain words, such as a conflict
    /// count or a missing `--text`/`--from`
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
