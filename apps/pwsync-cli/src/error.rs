//! CLI error types and exit codes

use thiserror::Error;

use pwsync_connector::DirectoryError;
use pwsync_orchestrator::ChangeError;
use pwsync_policy::PolicyError;

/// Exit codes for the CLI
/// - 0: Success
/// - 1: The change was refused (bad credentials, weak password, backend failure)
/// - 2: Configuration error
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// User-facing refusal; the message is already phrased for the end user.
    #[error("{0}")]
    Rejected(String),

    #[error("Input error: {0}")]
    InputError(String),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => 2,
            CliError::Rejected(_) => 1,
            CliError::InputError(_) => 1,
        }
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {}", suggestion);
            } else {
                eprintln!("\nSuggestion: {}", suggestion);
            }
        }
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::Config(_) => {
                Some("Run 'pwsync check' or pass --config to point at the right settings file.")
            }
            _ => None,
        }
    }
}

impl From<ChangeError> for CliError {
    fn from(e: ChangeError) -> Self {
        if e.is_configuration_error() {
            CliError::Config(e.to_string())
        } else {
            CliError::Rejected(e.user_message().to_string())
        }
    }
}

impl From<DirectoryError> for CliError {
    fn from(e: DirectoryError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<PolicyError> for CliError {
    fn from(e: PolicyError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<dialoguer::Error> for CliError {
    fn from(e: dialoguer::Error) -> Self {
        CliError::InputError(format!("Dialog error: {}", e))
    }
}
