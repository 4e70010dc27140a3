//! User-facing error taxonomy.
//!
//! Every [`DirectoryError`] raised by an adapter is mapped exactly once into a
//! [`ChangeFailure`]: a closed [`ChangeErrorKind`] plus a message that is safe
//! to show to the person changing their password.

use std::fmt;

use crate::error::DirectoryError;

/// Marker that Samba 4 and Active Directory put in front of the informative
/// part of a password-policy rejection.
const POLICY_MESSAGE_MARKER: &str = "check_password_restrictions: ";

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Username or password is incorrect!";
pub const CONNECTION_FAILURE_MESSAGE: &str = "Unable to connect to the remote server.";
pub const PROTOCOL_ERROR_MESSAGE: &str =
    "Encountered an unexpected error while communicating with the remote server.";
pub const POLICY_REJECTED_FALLBACK_MESSAGE: &str =
    "Password was rejected by the server's password policy.";

/// Kind of a classified backend failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeErrorKind {
    /// Bind failed, wrong old password, or the user identity was absent.
    InvalidCredentials,
    /// The backend enforced a password policy and refused the new value.
    PolicyRejected,
    /// The backend could not be reached.
    ConnectionFailure,
    /// Any other protocol-level failure.
    ProtocolError,
}

impl ChangeErrorKind {
    /// Whether raw backend detail for this kind must be logged for operators.
    #[must_use]
    pub fn logs_raw_detail(&self) -> bool {
        matches!(self, Self::ConnectionFailure | Self::ProtocolError)
    }
}

impl fmt::Display for ChangeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "invalid_credentials"),
            Self::PolicyRejected => write!(f, "policy_rejected"),
            Self::ConnectionFailure => write!(f, "connection_failure"),
            Self::ProtocolError => write!(f, "protocol_error"),
        }
    }
}

/// A classified backend failure carrying a user-safe message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeFailure {
    pub kind: ChangeErrorKind,
    pub message: String,
}

impl ChangeFailure {
    pub fn new(kind: ChangeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The message to present to the end user.
    #[must_use]
    pub fn user_message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ChangeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ChangeFailure {}

/// Classify a raw directory error.
#[must_use]
pub fn classify(error: &DirectoryError) -> ChangeFailure {
    match error {
        DirectoryError::AuthenticationFailed { .. } | DirectoryError::UsernameRequired => {
            ChangeFailure::new(
                ChangeErrorKind::InvalidCredentials,
                INVALID_CREDENTIALS_MESSAGE,
            )
        }
        DirectoryError::ConstraintViolation { message } => ChangeFailure::new(
            ChangeErrorKind::PolicyRejected,
            policy_rejection_message(message),
        ),
        DirectoryError::ConnectionFailed { .. } | DirectoryError::ConnectionTimeout { .. } => {
            ChangeFailure::new(
                ChangeErrorKind::ConnectionFailure,
                CONNECTION_FAILURE_MESSAGE,
            )
        }
        DirectoryError::ObjectNotFound { .. }
        | DirectoryError::Protocol { .. }
        | DirectoryError::OperationFailed { .. }
        | DirectoryError::InvalidConfiguration { .. } => {
            ChangeFailure::new(ChangeErrorKind::ProtocolError, PROTOCOL_ERROR_MESSAGE)
        }
    }
}

/// Derive a user message from a server's password-policy rejection text.
///
/// Keeps only what follows the last policy marker and normalizes the
/// capitalization to a leading upper-case letter followed by lower case.
#[must_use]
pub fn policy_rejection_message(raw: &str) -> String {
    let informative = raw.rsplit(POLICY_MESSAGE_MARKER).next().unwrap_or(raw);
    let message = capitalize(informative);
    if message.trim().is_empty() {
        POLICY_REJECTED_FALLBACK_MESSAGE.to_string()
    } else {
        message
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_errors_are_invalid_credentials() {
        let bind = classify(&DirectoryError::AuthenticationFailed {
            message: "invalid credentials".to_string(),
        });
        assert_eq!(bind.kind, ChangeErrorKind::InvalidCredentials);
        assert_eq!(bind.user_message(), INVALID_CREDENTIALS_MESSAGE);

        let missing = classify(&DirectoryError::UsernameRequired);
        assert_eq!(missing.kind, ChangeErrorKind::InvalidCredentials);
    }

    #[test]
    fn test_samba_policy_message_is_stripped_and_capitalized() {
        let failure = classify(&DirectoryError::ConstraintViolation {
            message: "0000052D: Constraint violation - check_password_restrictions: \
                      the password was already used (in history)!"
                .to_string(),
        });
        assert_eq!(failure.kind, ChangeErrorKind::PolicyRejected);
        assert_eq!(
            failure.user_message(),
            "The password was already used (in history)!"
        );
    }

    #[test]
    fn test_policy_message_without_marker_is_normalized() {
        assert_eq!(
            policy_rejection_message("PASSWORD TOO SHORT"),
            "Password too short"
        );
    }

    #[test]
    fn test_policy_message_empty_uses_fallback() {
        assert_eq!(
            policy_rejection_message("check_password_restrictions: "),
            POLICY_REJECTED_FALLBACK_MESSAGE
        );
        assert_eq!(policy_rejection_message(""), POLICY_REJECTED_FALLBACK_MESSAGE);
    }

    #[test]
    fn test_connection_errors() {
        let refused = classify(&DirectoryError::connection_failed("refused"));
        assert_eq!(refused.kind, ChangeErrorKind::ConnectionFailure);
        assert_eq!(refused.user_message(), CONNECTION_FAILURE_MESSAGE);

        let timeout = classify(&DirectoryError::ConnectionTimeout { timeout_secs: 5 });
        assert_eq!(timeout.kind, ChangeErrorKind::ConnectionFailure);
    }

    #[test]
    fn test_everything_else_is_protocol_error() {
        for err in [
            DirectoryError::Protocol {
                code: 50,
                message: "insufficient access".to_string(),
            },
            DirectoryError::operation_failed("stream closed"),
            DirectoryError::ObjectNotFound {
                identifier: "uid=alice".to_string(),
            },
            DirectoryError::invalid_configuration("missing domain"),
        ] {
            let failure = classify(&err);
            assert_eq!(failure.kind, ChangeErrorKind::ProtocolError);
            assert_eq!(failure.user_message(), PROTOCOL_ERROR_MESSAGE);
        }
    }

    #[test]
    fn test_raw_detail_logging_kinds() {
        assert!(ChangeErrorKind::ConnectionFailure.logs_raw_detail());
        assert!(ChangeErrorKind::ProtocolError.logs_raw_detail());
        assert!(!ChangeErrorKind::InvalidCredentials.logs_raw_detail());
        assert!(!ChangeErrorKind::PolicyRejected.logs_raw_detail());
    }
}
