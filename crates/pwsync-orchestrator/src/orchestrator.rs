//! Compensating password change across backends.

use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn};

use pwsync_connector::{
    classify, ChangeFailure, DirectoryError, DirectoryResult, PasswordBackend,
};

use crate::outcome::{BackendOutcome, CompensationReport, DivergedBackend, RunState, SagaRun};
use crate::request::ChangeRequest;

/// Applies a password change to an ordered list of backends.
///
/// Backends are processed strictly one after another. On the first failure
/// every backend changed so far is reverted, last-changed first, and the run
/// ends with the failure of the backend that failed.
pub struct ChangeOrchestrator {
    backends: Vec<Arc<dyn PasswordBackend>>,
}

impl ChangeOrchestrator {
    /// Create an orchestrator over `backends`, in apply order.
    pub fn new(backends: Vec<Arc<dyn PasswordBackend>>) -> DirectoryResult<Self> {
        if backends.is_empty() {
            return Err(DirectoryError::invalid_configuration(
                "at least one backend must be configured",
            ));
        }
        Ok(Self { backends })
    }

    /// Backend names in apply order.
    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Change the password everywhere, or nowhere.
    pub async fn change_across_backends(
        &self,
        request: &ChangeRequest,
    ) -> Result<(), ChangeFailure> {
        self.run(request).await.into_result()
    }

    /// Run the saga and return the full record of what happened.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn run(&self, request: &ChangeRequest) -> SagaRun {
        let mut completed: Vec<usize> = Vec::with_capacity(self.backends.len());
        let mut outcomes = Vec::with_capacity(self.backends.len());

        debug!(state = %RunState::Idle, backends = self.backends.len(), "Starting password change");

        for (index, backend) in self.backends.iter().enumerate() {
            debug!(
                state = %RunState::Applying(index),
                backend = %backend.name(),
                "Changing password"
            );

            let result = backend
                .change_password(
                    &request.username,
                    &request.old_password,
                    &request.new_password,
                )
                .await;

            match result {
                Ok(()) => {
                    completed.push(index);
                    outcomes.push(BackendOutcome::succeeded(backend.name()));
                }
                Err(e) => {
                    let failure = classify_at_boundary(backend.name(), &request.username, &e);
                    outcomes.push(BackendOutcome::failed(backend.name(), failure.clone()));

                    let compensation = self.compensate(&completed, request).await;

                    debug!(state = %RunState::Failed, "Password change failed");
                    return SagaRun::failed(outcomes, compensation, failure);
                }
            }
        }

        debug!(state = %RunState::Succeeded, "Password changed on all backends");
        SagaRun::succeeded(outcomes)
    }

    /// Revert `completed` backends in reverse order.
    ///
    /// Every backend gets an attempt, regardless of earlier failures.
    async fn compensate(&self, completed: &[usize], request: &ChangeRequest) -> CompensationReport {
        let mut report = CompensationReport::default();

        for &index in completed.iter().rev() {
            let backend = &self.backends[index];
            info!(
                state = %RunState::Compensating(index),
                backend = %backend.name(),
                username = %request.username,
                "Reverting password change"
            );

            let result = backend
                .revert_password(
                    &request.username,
                    &request.old_password,
                    &request.new_password,
                )
                .await;

            match result {
                Ok(()) => report.reverted.push(backend.name().to_string()),
                Err(e) => {
                    let failure = classify(&e);
                    error!(
                        backend = %backend.name(),
                        username = %request.username,
                        kind = %failure.kind,
                        error_code = e.error_code(),
                        error = %e,
                        inconsistent = true,
                        "Failed to revert password change"
                    );
                    report.diverged.push(DivergedBackend {
                        backend: backend.name().to_string(),
                        kind: failure.kind,
                    });
                }
            }
        }

        if !report.is_consistent() {
            error!(
                username = %request.username,
                diverged = ?report.diverged_backends(),
                "Password is inconsistent across backends and needs manual reconciliation"
            );
        }

        report
    }
}

/// Classify a backend error exactly once and log it.
///
/// Raw detail goes to the log for connection and protocol failures; the
/// returned message is the only thing the user sees.
fn classify_at_boundary(backend: &str, username: &str, error: &DirectoryError) -> ChangeFailure {
    let failure = classify(error);

    if failure.kind.logs_raw_detail() {
        error!(
            backend = %backend,
            username = %username,
            kind = %failure.kind,
            error_code = error.error_code(),
            transient = error.is_transient(),
            error = %error,
            "Backend error while changing password"
        );
    }

    warn!(
        backend = %backend,
        username = %username,
        kind = %failure.kind,
        "Unsuccessful attempt to change password"
    );

    failure
}

impl std::fmt::Debug for ChangeOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeOrchestrator")
            .field("backends", &self.backend_names())
            .finish()
    }
}
