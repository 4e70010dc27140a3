//! Change command - apply a new password to every backend

use clap::Args;
use dialoguer::{Input, Password};

use pwsync_orchestrator::ChangeForm;

use crate::config::AppConfig;
use crate::error::CliResult;

/// Arguments for the change command
#[derive(Args)]
pub struct ChangeArgs {
    /// Account name; prompted for when omitted
    pub username: Option<String>,
}

/// Execute the change command
pub async fn execute(args: ChangeArgs, config: &AppConfig) -> CliResult<()> {
    let service = config.build_service()?;
    let form = prompt_form(args.username)?;

    service.submit(form).await?;

    println!("Password has been changed");
    Ok(())
}

fn prompt_form(username: Option<String>) -> CliResult<ChangeForm> {
    let username = match username {
        Some(username) => username,
        None => Input::new().with_prompt("Username").interact_text()?,
    };

    let old_password = Password::new().with_prompt("Old password").interact()?;
    let new_password = Password::new().with_prompt("New password").interact()?;
    let confirm_password = Password::new()
        .with_prompt("Confirm new password")
        .interact()?;

    Ok(ChangeForm {
        username,
        old_password,
        new_password,
        confirm_password,
    })
}
