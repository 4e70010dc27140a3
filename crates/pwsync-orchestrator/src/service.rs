//! Inbound password change operation.

use tracing::{error, info, instrument, warn};

use pwsync_policy::PasswordValidator;

use crate::error::ChangeError;
use crate::orchestrator::ChangeOrchestrator;
use crate::request::{ChangeForm, ChangeRequest};

/// Validates a requested change and applies it across all backends.
///
/// Built once at startup from immutable configuration and shared by every
/// request; concurrent calls run independent orchestration runs.
#[derive(Debug)]
pub struct PasswordChangeService {
    validator: PasswordValidator,
    orchestrator: ChangeOrchestrator,
}

impl PasswordChangeService {
    pub fn new(validator: PasswordValidator, orchestrator: ChangeOrchestrator) -> Self {
        Self {
            validator,
            orchestrator,
        }
    }

    pub fn validator(&self) -> &PasswordValidator {
        &self.validator
    }

    pub fn orchestrator(&self) -> &ChangeOrchestrator {
        &self.orchestrator
    }

    /// Handle a submitted form: confirmation first, then [`change_password`](Self::change_password).
    pub async fn submit(&self, form: ChangeForm) -> Result<(), ChangeError> {
        if !form.is_confirmed() {
            warn!(username = %form.username, "Password confirmation mismatch");
            return Err(ChangeError::ConfirmationMismatch);
        }
        self.change_password(&form.into_request()).await
    }

    /// Validate the new password, then change it on every backend.
    ///
    /// A password rejected by the strength policy never reaches a backend.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn change_password(&self, request: &ChangeRequest) -> Result<(), ChangeError> {
        let validation = match self.validator.validate(&request.new_password) {
            Ok(validation) => validation,
            Err(e) => {
                error!(error = %e, "Password policy is misconfigured");
                return Err(ChangeError::Configuration(e));
            }
        };

        if !validation.is_valid {
            let reasons = validation.reasons();
            warn!(
                username = %request.username,
                reasons = ?reasons,
                "Password does not meet strength requirements"
            );
            return Err(ChangeError::ValidationFailed { reasons });
        }

        match self.orchestrator.change_across_backends(request).await {
            Ok(()) => {
                info!(username = %request.username, "Password successfully changed");
                Ok(())
            }
            Err(failure) => {
                warn!(
                    username = %request.username,
                    kind = %failure.kind,
                    message = %failure.message,
                    "Unsuccessful attempt to change password"
                );
                Err(ChangeError::Backend(failure))
            }
        }
    }
}
