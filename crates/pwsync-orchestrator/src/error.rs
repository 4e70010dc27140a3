//! Errors returned by the inbound change operation.

use thiserror::Error;

use pwsync_connector::ChangeFailure;
use pwsync_policy::PolicyError;

pub const CONFIRMATION_MISMATCH_MESSAGE: &str = "Password doesn't match the confirmation!";
pub const VALIDATION_FAILED_MESSAGE: &str =
    "Password does not meet complexity/strength requirements!";
pub const CONFIGURATION_ERROR_MESSAGE: &str =
    "The password service is misconfigured. Please contact your administrator.";

#[derive(Debug, Error)]
pub enum ChangeError {
    /// The new password and its confirmation differ.
    #[error("password confirmation mismatch")]
    ConfirmationMismatch,

    /// The new password failed the strength policy. No backend was touched.
    #[error("password failed strength validation: {}", .reasons.join("; "))]
    ValidationFailed { reasons: Vec<String> },

    /// A backend rejected the change; already-changed backends were reverted.
    #[error("backend change failed: {0}")]
    Backend(#[from] ChangeFailure),

    /// Operator-side misconfiguration, e.g. an unreadable dictionary.
    #[error("configuration error: {0}")]
    Configuration(#[from] PolicyError),
}

impl ChangeError {
    /// The single short message shown to the end user.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::ConfirmationMismatch => CONFIRMATION_MISMATCH_MESSAGE,
            Self::ValidationFailed { .. } => VALIDATION_FAILED_MESSAGE,
            Self::Backend(failure) => failure.user_message(),
            Self::Configuration(_) => CONFIGURATION_ERROR_MESSAGE,
        }
    }

    /// Whether the failure is the operator's to fix rather than the user's.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
