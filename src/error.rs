use thiserror::Error;

/// Unified error type for buildbump operations
#[derive(Error, Debug)]
pub enum BumpError {
    #[error("invalid {grammar}: '{value}'")]
    InvalidFormat { grammar: String, value: String },

    #[error("Command execution failed: {0}")]
    Command(String),

    #[error("Version control error: {0}")]
    Vcs(String),

    #[error("Plist error: {0}")]
    Plist(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in buildbump
pub type Result<T> = std::result::Result<T, BumpError>;

impl BumpError {
    /// Create an invalid-format error naming the grammar that was violated
    pub fn invalid_format(grammar: impl Into<String>, value: impl Into<String>) -> Self {
        BumpError::InvalidFormat {
            grammar: grammar.into(),
            value: value.into(),
        }
    }

    /// Create a command execution error with context
    pub fn command(msg: impl Into<String>) -> Self {
        BumpError::Command(msg.into())
    }

    /// Create a version control error with context
    pub fn vcs(msg: impl Into<String>) -> Self {
        BumpError::Vcs(msg.into())
    }

    /// Create a plist error with context
    pub fn plist(msg: impl Into<String>) -> Self {
        BumpError::Plist(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        BumpError::Config(msg.into())
    }
}
