use thiserror::Error;

/// Errors surfaced by keyword execution
#[derive(Debug, Error)]
pub enum KeywordError {
    /// A polling wait exceeded its deadline
    #[error("{0}")]
    Timeout(String),

    /// An expected-vs-actual check on element or page state failed
    #[error("{0}")]
    AssertionFailed(String),

    /// An alias, index or locator did not resolve to anything
    #[error("{0}")]
    NotFound(String),

    /// A keyword needing a session was invoked before any application was opened
    #[error("No application is currently active")]
    NoActiveSession,

    /// An application was opened under an alias that is already tracked
    #[error("Alias '{0}' is already in use")]
    DuplicateAlias(String),

    /// A platform-specific operation was invoked on the wrong platform
    #[error("Operation '{operation}' is not supported on {platform}")]
    UnsupportedOnPlatform {
        /// Keyword or driver operation name
        operation: String,
        /// Platform of the active session
        platform: String,
    },

    /// The underlying automation driver or its transport failed
    #[error("Driver error: {0}")]
    Driver(String),

    /// A keyword was called with a malformed or missing argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Local filesystem access (screenshots, pulled files) failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A polling wait was cancelled through its cancel flag
    #[error("Wait was cancelled")]
    Cancelled,
}

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, KeywordError>;

impl KeywordError {
    /// Build a platform-mismatch error for the given operation
    pub fn unsupported(operation: &str, platform: impl Into<String>) -> Self {
        KeywordError::UnsupportedOnPlatform {
            operation: operation.to_string(),
            platform: platform.into(),
        }
    }
}
