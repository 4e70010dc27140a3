//! Results of one orchestration run.

use std::fmt;

use pwsync_connector::{ChangeErrorKind, ChangeFailure};

/// State of an orchestration run.
///
/// `Idle -> Applying(0) -> ... -> Applying(n-1) -> Succeeded`, or on the
/// first failure at `Applying(i)`: `Compensating(j)` for each already-changed
/// backend `j` from `i-1` down to `0`, then `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Applying(usize),
    Compensating(usize),
    Succeeded,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Applying(index) => write!(f, "applying({index})"),
            Self::Compensating(index) => write!(f, "compensating({index})"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    Succeeded,
    Failed(ChangeFailure),
}

/// Result of applying the change to one backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendOutcome {
    pub backend: String,
    pub status: OutcomeStatus,
}

impl BackendOutcome {
    pub fn succeeded(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            status: OutcomeStatus::Succeeded,
        }
    }

    pub fn failed(backend: impl Into<String>, failure: ChangeFailure) -> Self {
        Self {
            backend: backend.into(),
            status: OutcomeStatus::Failed(failure),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Succeeded
    }
}

/// A backend whose reversal failed and still holds the new password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivergedBackend {
    pub backend: String,
    pub kind: ChangeErrorKind,
}

/// What happened while reverting already-changed backends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompensationReport {
    /// Backends successfully restored to the old password, in revert order.
    pub reverted: Vec<String>,
    /// Backends left on the new password.
    pub diverged: Vec<DivergedBackend>,
}

impl CompensationReport {
    /// Whether every reversal succeeded.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.diverged.is_empty()
    }

    /// Number of reversal attempts made.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.reverted.len() + self.diverged.len()
    }

    #[must_use]
    pub fn diverged_backends(&self) -> Vec<&str> {
        self.diverged.iter().map(|d| d.backend.as_str()).collect()
    }
}

/// Full record of one orchestration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SagaRun {
    /// Terminal state.
    pub state: RunState,
    /// One outcome per attempted backend, in apply order.
    pub outcomes: Vec<BackendOutcome>,
    /// Compensation performed after a failure (empty on success).
    pub compensation: CompensationReport,
    failure: Option<ChangeFailure>,
}

impl SagaRun {
    pub(crate) fn succeeded(outcomes: Vec<BackendOutcome>) -> Self {
        Self {
            state: RunState::Succeeded,
            outcomes,
            compensation: CompensationReport::default(),
            failure: None,
        }
    }

    pub(crate) fn failed(
        outcomes: Vec<BackendOutcome>,
        compensation: CompensationReport,
        failure: ChangeFailure,
    ) -> Self {
        Self {
            state: RunState::Failed,
            outcomes,
            compensation,
            failure: Some(failure),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.state == RunState::Succeeded
    }

    /// The classified failure of the first backend that failed.
    #[must_use]
    pub fn failure(&self) -> Option<&ChangeFailure> {
        self.failure.as_ref()
    }

    /// Name of the backend whose failure ended the run.
    #[must_use]
    pub fn failed_backend(&self) -> Option<&str> {
        self.outcomes
            .iter()
            .find(|o| !o.is_success())
            .map(|o| o.backend.as_str())
    }

    pub fn into_result(self) -> Result<(), ChangeFailure> {
        match self.failure {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_state_display() {
        assert_eq!(RunState::Applying(0).to_string(), "applying(0)");
        assert_eq!(RunState::Compensating(2).to_string(), "compensating(2)");
    }

    #[test]
    fn test_compensation_report() {
        let mut report = CompensationReport::default();
        assert!(report.is_consistent());
        assert_eq!(report.attempts(), 0);

        report.reverted.push("b".to_string());
        report.diverged.push(DivergedBackend {
            backend: "a".to_string(),
            kind: ChangeErrorKind::ConnectionFailure,
        });
        assert!(!report.is_consistent());
        assert_eq!(report.attempts(), 2);
        assert_eq!(report.diverged_backends(), vec!["a"]);
    }

    #[test]
    fn test_failed_run_into_result() {
        let failure = ChangeFailure::new(ChangeErrorKind::InvalidCredentials, "nope");
        let run = SagaRun::failed(
            vec![
                BackendOutcome::succeeded("a"),
                BackendOutcome::failed("b", failure.clone()),
            ],
            CompensationReport::default(),
            failure.clone(),
        );
        assert!(!run.is_success());
        assert_eq!(run.failed_backend(), Some("b"));
        assert_eq!(run.into_result(), Err(failure));
    }
}
