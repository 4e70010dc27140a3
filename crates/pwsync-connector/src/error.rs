//! Directory backend error types
//!
//! Raw failures raised while talking to a directory server. These never reach
//! the end user directly: the orchestrator runs them through
//! [`classify`](crate::classify::classify) first.

use thiserror::Error;

/// Error that can occur while changing a password on a directory backend.
#[derive(Debug, Error)]
pub enum DirectoryError {
    // Connection errors (usually transient)
    /// Failed to establish a connection to the directory server.
    #[error("connection failed: {message}")]
    ConnectionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Connecting did not complete within the configured bound.
    #[error("connection timeout after {timeout_secs} seconds")]
    ConnectionTimeout { timeout_secs: u64 },

    // Authentication errors (permanent)
    /// The server rejected the bind.
    #[error("authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// A bind was attempted without an identity (empty username or no search match).
    #[error("authentication failed: username is mandatory")]
    UsernameRequired,

    // Operation errors
    /// The server refused the new value (password policy, history, complexity).
    #[error("constraint violation: {message}")]
    ConstraintViolation { message: String },

    /// The target entry does not exist.
    #[error("object not found: {identifier}")]
    ObjectNotFound { identifier: String },

    /// The server answered with a result code we do not handle specifically.
    #[error("protocol error (result code {code}): {message}")]
    Protocol { code: u32, message: String },

    /// Operation failed for a reason other than a server result code.
    #[error("operation failed: {message}")]
    OperationFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Configuration errors (permanent)
    /// Backend configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl DirectoryError {
    /// Check if this error is transient and a later attempt may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DirectoryError::ConnectionFailed { .. } | DirectoryError::ConnectionTimeout { .. }
        )
    }

    /// Get an error code for log correlation.
    pub fn error_code(&self) -> &'static str {
        match self {
            DirectoryError::ConnectionFailed { .. } => "CONNECTION_FAILED",
            DirectoryError::ConnectionTimeout { .. } => "CONNECTION_TIMEOUT",
            DirectoryError::AuthenticationFailed { .. } => "AUTH_FAILED",
            DirectoryError::UsernameRequired => "USERNAME_REQUIRED",
            DirectoryError::ConstraintViolation { .. } => "CONSTRAINT_VIOLATION",
            DirectoryError::ObjectNotFound { .. } => "OBJECT_NOT_FOUND",
            DirectoryError::Protocol { .. } => "PROTOCOL_ERROR",
            DirectoryError::OperationFailed { .. } => "OPERATION_FAILED",
            DirectoryError::InvalidConfiguration { .. } => "INVALID_CONFIG",
        }
    }

    // Convenience constructors

    /// Create a connection failed error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        DirectoryError::ConnectionFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection failed error with source.
    pub fn connection_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DirectoryError::ConnectionFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an operation failed error.
    pub fn operation_failed(message: impl Into<String>) -> Self {
        DirectoryError::OperationFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create an operation failed error with source.
    pub fn operation_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DirectoryError::OperationFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// A bind was attempted with an empty password.
    ///
    /// An empty simple-bind password is an unauthenticated bind that many
    /// servers accept, so it is treated as a rejected credential.
    pub fn password_required() -> Self {
        DirectoryError::AuthenticationFailed {
            message: "password is mandatory".to_string(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        DirectoryError::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Map an LDAP result code and diagnostic text to an error.
    ///
    /// Only meaningful for non-zero codes.
    pub fn from_result_code(code: u32, text: impl Into<String>) -> Self {
        let message = text.into();
        match code {
            19 => DirectoryError::ConstraintViolation { message },
            32 => DirectoryError::ObjectNotFound {
                identifier: message,
            },
            49 => DirectoryError::AuthenticationFailed { message },
            _ => DirectoryError::Protocol { code, message },
        }
    }
}

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;
