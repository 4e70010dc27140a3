//! Strength command - test a password against the policy without changing it

use clap::Args;
use dialoguer::Password;

use pwsync_policy::PasswordValidator;

use crate::config::AppConfig;
use crate::error::{CliError, CliResult};

/// Arguments for the strength command
#[derive(Args)]
pub struct StrengthArgs {}

/// Execute the strength command
pub fn execute(_args: StrengthArgs, config: &AppConfig) -> CliResult<()> {
    let password = Password::new()
        .with_prompt("Candidate password")
        .allow_empty_password(true)
        .interact()?;

    let reasons = evaluate(&config.validator(), &password)?;
    if reasons.is_empty() {
        println!("Password meets the strength policy");
        return Ok(());
    }

    for reason in &reasons {
        println!("  - {reason}");
    }
    Err(CliError::Rejected(
        pwsync_orchestrator::error::VALIDATION_FAILED_MESSAGE.to_string(),
    ))
}

/// Every rule the password violates, in policy order.
fn evaluate(validator: &PasswordValidator, password: &str) -> CliResult<Vec<String>> {
    let result = validator.validate(password)?;
    Ok(result.reasons())
}
