//! Policy configuration errors.
//!
//! These are operator-facing: a password that fails a rule is reported
//! through [`PasswordValidationResult`](crate::PasswordValidationResult), not
//! through this type.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    /// The dictionary file could not be read.
    #[error("dictionary file {path} is unavailable: {source}")]
    DictionaryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The policy settings are inconsistent.
    #[error("invalid password policy: {message}")]
    InvalidConfiguration { message: String },
}

pub type PolicyResult<T> = Result<T, PolicyError>;
