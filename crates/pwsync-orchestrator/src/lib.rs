//! # Password Change Orchestration
//!
//! Applies one password change to every configured directory backend in
//! declaration order. When a backend fails, every backend that already
//! changed is reverted in reverse order, so the password is never left
//! different across systems without that being logged.
//!
//! - [`ChangeOrchestrator`] - the compensating saga over the backends
//! - [`PasswordChangeService`] - inbound operation: confirmation, strength
//!   validation, orchestration and user messaging

pub mod error;
pub mod orchestrator;
pub mod outcome;
pub mod request;
pub mod service;

pub use error::ChangeError;
pub use orchestrator::ChangeOrchestrator;
pub use outcome::{BackendOutcome, CompensationReport, OutcomeStatus, RunState, SagaRun};
pub use request::{ChangeForm, ChangeRequest};
pub use service::PasswordChangeService;
