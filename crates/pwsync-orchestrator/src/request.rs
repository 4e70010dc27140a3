//! Inbound change requests.

use std::fmt;

const REDACTED: &str = "***REDACTED***";

/// One password change: who, from what, to what.
#[derive(Clone, PartialEq, Eq)]
pub struct ChangeRequest {
    pub username: String,
    pub old_password: String,
    pub new_password: String,
}

impl ChangeRequest {
    pub fn new(
        username: impl Into<String>,
        old_password: impl Into<String>,
        new_password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            old_password: old_password.into(),
            new_password: new_password.into(),
        }
    }
}

impl fmt::Debug for ChangeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeRequest")
            .field("username", &self.username)
            .field("old_password", &REDACTED)
            .field("new_password", &REDACTED)
            .finish()
    }
}

/// A change request as typed by the user, including the confirmation field.
#[derive(Clone, PartialEq, Eq)]
pub struct ChangeForm {
    pub username: String,
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl ChangeForm {
    /// Whether the new password and its confirmation match.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.new_password == self.confirm_password
    }

    #[must_use]
    pub fn into_request(self) -> ChangeRequest {
        ChangeRequest {
            username: self.username,
            old_password: self.old_password,
            new_password: self.new_password,
        }
    }
}

impl fmt::Debug for ChangeForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeForm")
            .field("username", &self.username)
            .field("old_password", &REDACTED)
            .field("new_password", &REDACTED)
            .field("confirm_password", &REDACTED)
            .finish()
    }
}
