//! Backend configuration types
//!
//! One [`BackendConfig`] per directory server holding a copy of the password.
//! The declaration order of the list is the order in which changes are applied.

use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DirectoryError, DirectoryResult};

/// Placeholder substituted with the username in a search filter.
pub const UID_PLACEHOLDER: &str = "{uid}";

/// Protocol flavor of a backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    /// Plain LDAP directory using the Password Modify extended operation.
    #[default]
    #[serde(rename = "generic", alias = "ldap")]
    Generic,
    /// Active Directory / Samba domain controller using `unicodePwd`.
    #[serde(rename = "ad", alias = "domain_controller")]
    DomainController,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Generic => write!(f, "generic"),
            Self::DomainController => write!(f, "ad"),
        }
    }
}

/// Connection settings for a single backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    /// Bound on connection establishment, in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_connect_timeout() -> u64 {
    5
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl ConnectionSettings {
    /// Set the connection timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    /// Get connection timeout as Duration.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Configuration for one directory backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Unique identifier of this backend, used in logs.
    pub name: String,

    /// Protocol flavor.
    #[serde(rename = "type", default)]
    pub kind: BackendKind,

    /// Directory server hostname or IP address.
    pub host: String,

    /// Server port. Defaults to 389, or 636 when `use_ssl` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Use SSL/TLS (LDAPS).
    #[serde(default)]
    pub use_ssl: bool,

    /// Search base for user lookups (e.g., "ou=People,dc=example,dc=com").
    pub base: String,

    /// Search filter template containing `{uid}` (e.g., "uid={uid}").
    pub search_filter: String,

    /// Domain suffix used to build the bind principal of AD backends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ad_domain: Option<String>,

    #[serde(flatten)]
    pub connection: ConnectionSettings,
}

impl BackendConfig {
    /// Create a generic backend config with required fields.
    pub fn new(
        name: impl Into<String>,
        host: impl Into<String>,
        base: impl Into<String>,
        search_filter: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: BackendKind::Generic,
            host: host.into(),
            port: None,
            use_ssl: false,
            base: base.into(),
            search_filter: search_filter.into(),
            ad_domain: None,
            connection: ConnectionSettings::default(),
        }
    }

    /// Turn this into a domain-controller backend for the given domain.
    #[must_use]
    pub fn with_ad_domain(mut self, domain: impl Into<String>) -> Self {
        self.kind = BackendKind::DomainController;
        self.ad_domain = Some(domain.into());
        self
    }

    /// Enable SSL (LDAPS).
    #[must_use]
    pub fn with_ssl(mut self) -> Self {
        self.use_ssl = true;
        self
    }

    /// Set an explicit port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set the connection timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connection = self.connection.with_connect_timeout(secs);
        self
    }

    /// Port actually used to connect.
    #[must_use]
    pub fn effective_port(&self) -> u16 {
        match self.port {
            Some(port) => port,
            None if self.use_ssl => 636,
            None => 389,
        }
    }

    /// Get the LDAP URL.
    #[must_use]
    pub fn url(&self) -> String {
        let scheme = if self.use_ssl { "ldaps" } else { "ldap" };
        format!("{}://{}:{}", scheme, self.host, self.effective_port())
    }

    /// Build the `username@domain` bind principal of an AD backend.
    pub fn principal(&self, username: &str) -> DirectoryResult<String> {
        match self.ad_domain.as_deref() {
            Some(domain) if !domain.is_empty() => Ok(format!("{username}@{domain}")),
            _ => Err(DirectoryError::invalid_configuration(format!(
                "backend '{}' has no ad_domain",
                self.name
            ))),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> DirectoryResult<()> {
        if self.name.trim().is_empty() {
            return Err(DirectoryError::invalid_configuration(
                "backend name cannot be empty",
            ));
        }

        let required = [
            ("host", &self.host),
            ("base", &self.base),
            ("search_filter", &self.search_filter),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(DirectoryError::invalid_configuration(format!(
                    "backend '{}': {field} cannot be empty",
                    self.name
                )));
            }
        }

        if !self.search_filter.contains(UID_PLACEHOLDER) {
            return Err(DirectoryError::invalid_configuration(format!(
                "backend '{}': search_filter must contain {UID_PLACEHOLDER}",
                self.name
            )));
        }

        if self.connection.connect_timeout_secs == 0 {
            return Err(DirectoryError::invalid_configuration(format!(
                "backend '{}': connect_timeout_secs must be greater than 0",
                self.name
            )));
        }

        if self.kind == BackendKind::DomainController {
            self.principal("")?;
        }

        Ok(())
    }
}

/// Validate an ordered list of backends.
///
/// The list must be non-empty, names must be unique and every entry must be
/// valid on its own.
pub fn validate_backends(backends: &[BackendConfig]) -> DirectoryResult<()> {
    if backends.is_empty() {
        return Err(DirectoryError::invalid_configuration(
            "at least one backend must be configured",
        ));
    }

    let mut seen = HashSet::new();
    for backend in backends {
        backend.validate()?;
        if !seen.insert(backend.name.as_str()) {
            return Err(DirectoryError::invalid_configuration(format!(
                "duplicate backend name '{}'",
                backend.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generic() -> BackendConfig {
        BackendConfig::new(
            "corp-ldap",
            "ldap.example.org",
            "ou=People,dc=example,dc=org",
            "uid={uid}",
        )
    }

    #[test]
    fn test_default_ports_and_url() {
        let plain = generic();
        assert_eq!(plain.effective_port(), 389);
        assert_eq!(plain.url(), "ldap://ldap.example.org:389");

        let tls = generic().with_ssl();
        assert_eq!(tls.effective_port(), 636);
        assert_eq!(tls.url(), "ldaps://ldap.example.org:636");

        let custom = generic().with_ssl().with_port(3269);
        assert_eq!(custom.url(), "ldaps://ldap.example.org:3269");
    }

    #[test]
    fn test_principal() {
        let ad = generic().with_ad_domain("example.org");
        assert_eq!(ad.principal("alice").unwrap(), "alice@example.org");
        assert!(generic().principal("alice").is_err());
    }

    #[test]
    fn test_validate_rejects_missing_placeholder() {
        let mut config = generic();
        config.search_filter = "uid=alice".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("{uid}"));
    }

    #[test]
    fn test_validate_rejects_empty_fields() {
        let mut config = generic();
        config.host = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = generic();
        config.base = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_ad_requires_domain() {
        let mut config = generic().with_ssl();
        config.kind = BackendKind::DomainController;
        assert!(config.validate().is_err());

        let config = generic().with_ssl().with_ad_domain("example.org");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config = generic().with_connect_timeout(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_backends() {
        assert!(validate_backends(&[]).is_err());
        assert!(validate_backends(&[generic()]).is_ok());

        let err = validate_backends(&[generic(), generic()]).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_deserialize_yaml() {
        let yaml = r#"
- name: corp-ldap
  host: ldap.example.org
  base: ou=People,dc=example,dc=org
  search_filter: uid={uid}
- name: corp-ad
  type: ad
  host: dc1.example.org
  port: 636
  use_ssl: true
  base: dc=example,dc=org
  search_filter: sAMAccountName={uid}
  ad_domain: example.org
  connect_timeout_secs: 10
"#;
        let backends: Vec<BackendConfig> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(backends.len(), 2);
        assert_eq!(backends[0].kind, BackendKind::Generic);
        assert_eq!(backends[0].connection.connect_timeout_secs, 5);
        assert_eq!(backends[1].kind, BackendKind::DomainController);
        assert_eq!(backends[1].ad_domain.as_deref(), Some("example.org"));
        assert_eq!(backends[1].connection.connect_timeout(), Duration::from_secs(10));
        assert!(validate_backends(&backends).is_ok());
    }

    #[test]
    fn test_deserialize_ldap_alias() {
        let yaml = "name: a\ntype: ldap\nhost: h\nbase: b\nsearch_filter: uid={uid}\n";
        let config: BackendConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.kind, BackendKind::Generic);
    }
}
