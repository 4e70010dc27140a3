//! # Directory Backend Framework
//!
//! Core abstractions shared by every directory backend that holds a copy of
//! a user's password.
//!
//! - [`PasswordBackend`] - capability every backend adapter implements
//! - [`BackendConfig`] - one configured backend (generic LDAP or Active Directory)
//! - [`DirectoryError`] - raw protocol-level failures raised by adapters
//! - [`classify`] - maps a [`DirectoryError`] into the user-facing [`ChangeFailure`]
//!
//! ## Crate Organization
//!
//! - [`config`] - Backend configuration types and validation
//! - [`error`] - Raw directory error type
//! - [`classify`] - Error taxonomy presented to end users
//! - [`traits`] - Backend capability trait

pub mod classify;
pub mod config;
pub mod error;
pub mod traits;

pub use classify::{classify, ChangeErrorKind, ChangeFailure};
pub use config::{validate_backends, BackendConfig, BackendKind, ConnectionSettings};
pub use error::{DirectoryError, DirectoryResult};
pub use traits::PasswordBackend;

// Re-export async_trait for backend implementors
pub use async_trait::async_trait;
