use thiserror::Error;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from reading or writing documents and the terminal.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A document path that cannot be opened or written.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// The log file or subscriber could not be set up.
    #[error("Logging error: {0}")]
    Logging(String),
}
