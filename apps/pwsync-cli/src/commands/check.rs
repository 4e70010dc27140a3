//! Check command - validate configuration and list backends

use std::path::Path;

use clap::Args;

use pwsync_connector::BackendConfig;
use pwsync_policy::PolicyConfig;

use crate::config::AppConfig;
use crate::error::CliResult;

/// Arguments for the check command
#[derive(Args)]
pub struct CheckArgs {}

/// Execute the check command
///
/// Building the service runs the same validation as `change`, including the
/// warning for domain controllers reached without TLS.
pub fn execute(_args: CheckArgs, config: &AppConfig, path: &Path) -> CliResult<()> {
    let service = config.build_service()?;

    println!("Configuration: {}", path.display());
    println!("Backends (apply order):");
    for (index, backend) in config.backends.iter().enumerate() {
        println!("  {}. {}", index + 1, describe_backend(backend));
    }
    println!("Password policy: {}", describe_policy(config.validator().policy()));

    tracing::debug!(backends = ?service.orchestrator().backend_names(), "Configuration is valid");
    Ok(())
}

fn describe_backend(backend: &BackendConfig) -> String {
    format!(
        "{} ({}) {} base={} filter={}",
        backend.name,
        backend.kind,
        backend.url(),
        backend.base,
        backend.search_filter
    )
}

fn describe_policy(policy: Option<&PolicyConfig>) -> String {
    let Some(policy) = policy else {
        return "none (every password accepted)".to_string();
    };

    let mut rules = vec![format!("min length {}", policy.min_length)];
    if policy.mixed_case_required {
        rules.push("mixed case".to_string());
    }
    if policy.digit_required {
        rules.push("digit".to_string());
    }
    if policy.special_required {
        rules.push("special character".to_string());
    }
    if let Some(file) = policy
        .dictionary_file
        .as_ref()
        .filter(|_| policy.dictionary_check_enabled)
    {
        rules.push(format!("dictionary {}", file.display()));
    }
    rules.join(", ")
}
