//! # LDAP Password Backends
//!
//! Directory adapters that change a user's own password, authenticating with
//! the current one.
//!
//! ## Variants
//!
//! - [`LdapPasswordBackend`] - generic LDAPv3 server: anonymous DN lookup, bind
//!   as the user, RFC 3062 Password Modify extended operation
//! - [`AdPasswordBackend`] - Active Directory / Samba: bind as
//!   `username@domain`, DN lookup on the same connection, `unicodePwd`
//!   delete/add modify
//!
//! Use [`build_backend`] to pick the variant from a [`BackendConfig`].
//!
//! ## Example
//!
//! ```ignore
//! use pwsync_connector::BackendConfig;
//! use pwsync_connector_ldap::build_backends;
//!
//! let configs = vec![BackendConfig::new(
//!     "corp-ldap",
//!     "ldap.example.org",
//!     "ou=People,dc=example,dc=org",
//!     "uid={uid}",
//! )
//! .with_ssl()];
//!
//! let backends = build_backends(&configs)?;
//! backends[0].change_password("alice", "OldPass1", "NewPass2").await?;
//! ```

pub mod ad;
pub mod connector;
pub mod filter;
mod session;

use std::sync::Arc;

use pwsync_connector::{BackendConfig, BackendKind, DirectoryResult, PasswordBackend};

// Re-exports
pub use ad::AdPasswordBackend;
pub use connector::LdapPasswordBackend;

/// Shared handle to a configured backend.
pub type BoxedBackend = Arc<dyn PasswordBackend>;

/// Build the adapter matching the configured protocol flavor.
pub fn build_backend(config: &BackendConfig) -> DirectoryResult<BoxedBackend> {
    let backend: BoxedBackend = match config.kind {
        BackendKind::Generic => Arc::new(LdapPasswordBackend::new(config.clone())?),
        BackendKind::DomainController => Arc::new(AdPasswordBackend::new(config.clone())?),
    };
    Ok(backend)
}

/// Build adapters for every configured backend, preserving declaration order.
pub fn build_backends(configs: &[BackendConfig]) -> DirectoryResult<Vec<BoxedBackend>> {
    pwsync_connector::validate_backends(configs)?;
    configs.iter().map(build_backend).collect()
}
