//! # Password Strength Policy
//!
//! Validates a candidate password against the configured `password_checker`
//! rules before any directory backend is touched.
//!
//! An absent policy is permissive: every password passes.

pub mod config;
pub mod dictionary;
pub mod error;
pub mod validator;

pub use config::PolicyConfig;
pub use error::{PolicyError, PolicyResult};
pub use validator::{PasswordValidationResult, PasswordValidator, PolicyViolation, SPECIAL_CHARS};
