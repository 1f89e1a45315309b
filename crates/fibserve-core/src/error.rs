//! Shared error type across fibserve crates.

use thiserror::Error;

/// Stable error codes, used as metric label values and in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The `n` query parameter was absent or blank.
    MissingParameter,
    /// The `n` query parameter was not an integer.
    MalformedParameter,
    /// The requested count is outside `0..=1000`.
    InvalidArgument,
    /// Configuration failed to parse or validate.
    InvalidConfig,
    /// Unexpected fault.
    Internal,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingParameter => "missing_parameter",
            ErrorCode::MalformedParameter => "malformed_parameter",
            ErrorCode::InvalidArgument => "invalid_argument",
            ErrorCode::InvalidConfig => "invalid_config",
            ErrorCode::Internal => "internal",
        }
    }

    /// True for errors caused by the caller's input.
    pub fn is_client_error(self) -> bool {
        matches!(
            self,
            ErrorCode::MissingParameter | ErrorCode::MalformedParameter | ErrorCode::InvalidArgument
        )
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, FibServeError>;

/// Unified error type used by core and server.
///
/// The `Display` text of the client-facing variants is the exact response
/// body returned to HTTP callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FibServeError {
    #[error("Missing 'n' parameter")]
    MissingParameter,
    #[error("Invalid 'n' parameter")]
    MalformedParameter { raw: String },
    #[error("{0}")]
    InvalidArgument(&'static str),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl FibServeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            FibServeError::MissingParameter => ErrorCode::MissingParameter,
            FibServeError::MalformedParameter { .. } => ErrorCode::MalformedParameter,
            FibServeError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            FibServeError::InvalidConfig(_) => ErrorCode::InvalidConfig,
            FibServeError::Internal(_) => ErrorCode::Internal,
        }
    }
}
