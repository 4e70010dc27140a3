//! Scoped LDAP sessions.
//!
//! A session is one connection to one backend. Adapters open a session, run
//! their protocol steps against it and always [`close`](LdapSession::close)
//! it before returning, whatever the steps produced.

use ldap3::exop::PasswordModify;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, LdapError, LdapResult, Mod, Scope, SearchEntry};
use tracing::{debug, warn};

use pwsync_connector::{BackendConfig, DirectoryError, DirectoryResult};

use crate::filter::render_user_filter;

pub(crate) struct LdapSession {
    ldap: Ldap,
    url: String,
}

impl LdapSession {
    /// Open an unauthenticated connection, bounded by the configured timeout.
    pub(crate) async fn connect(config: &BackendConfig) -> DirectoryResult<Self> {
        let url = config.url();
        let timeout = config.connection.connect_timeout();

        debug!(backend = %config.name, url = %url, "Connecting to LDAP server");

        let settings = LdapConnSettings::new().set_conn_timeout(timeout);

        let connected = tokio::time::timeout(timeout, LdapConnAsync::with_settings(settings, &url))
            .await
            .map_err(|_| DirectoryError::ConnectionTimeout {
                timeout_secs: config.connection.connect_timeout_secs,
            })?;

        let (conn, ldap) = connected.map_err(|e| match e {
            LdapError::Timeout { .. } => DirectoryError::ConnectionTimeout {
                timeout_secs: config.connection.connect_timeout_secs,
            },
            other => DirectoryError::connection_failed_with_source(
                format!("Failed to connect to LDAP server at {url}"),
                other,
            ),
        })?;

        // Spawn the connection driver
        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!(error = %e, "LDAP connection driver error");
            }
        });

        Ok(Self { ldap, url })
    }

    /// Simple bind as `dn`.
    ///
    /// An empty identity or password is refused before anything is sent, so
    /// neither can turn into an anonymous or unauthenticated bind.
    pub(crate) async fn bind(&mut self, dn: &str, password: &str) -> DirectoryResult<()> {
        if dn.trim().is_empty() {
            return Err(DirectoryError::UsernameRequired);
        }
        if password.is_empty() {
            return Err(DirectoryError::password_required());
        }

        debug!(url = %self.url, bind_dn = %dn, "Performing LDAP bind");

        let result = self
            .ldap
            .simple_bind(dn, password)
            .await
            .map_err(|e| map_ldap_error(e, "LDAP bind failed"))?;
        check_result(result)
    }

    /// Resolve the DN of `uid` with a subtree search under the configured base.
    ///
    /// Returns the first match, or `None` when nothing matched.
    pub(crate) async fn find_user_dn(
        &mut self,
        config: &BackendConfig,
        uid: &str,
    ) -> DirectoryResult<Option<String>> {
        let filter = render_user_filter(&config.search_filter, uid);

        debug!(base = %config.base, filter = %filter, "Searching for user DN");

        let (entries, _) = self
            .ldap
            .search(&config.base, Scope::Subtree, &filter, vec!["1.1"])
            .await
            .map_err(|e| map_ldap_error(e, "LDAP search failed"))?
            .success()
            .map_err(|e| map_ldap_error(e, "LDAP search failed"))?;

        Ok(entries
            .into_iter()
            .next()
            .map(|entry| SearchEntry::construct(entry).dn))
    }

    /// Send an RFC 3062 Password Modify extended operation.
    pub(crate) async fn password_modify(&mut self, exop: PasswordModify<'_>) -> DirectoryResult<()> {
        self.ldap
            .extended(exop)
            .await
            .map_err(|e| map_ldap_error(e, "Password modify operation failed"))?
            .success()
            .map_err(|e| map_ldap_error(e, "Password modify operation failed"))?;
        Ok(())
    }

    /// Apply a modify request to `dn`.
    pub(crate) async fn modify(&mut self, dn: &str, mods: Vec<Mod<Vec<u8>>>) -> DirectoryResult<()> {
        let result = self
            .ldap
            .modify(dn, mods)
            .await
            .map_err(|e| map_ldap_error(e, "LDAP modify failed"))?;
        check_result(result)
    }

    /// Unbind and drop the connection.
    pub(crate) async fn close(mut self) {
        if let Err(e) = self.ldap.unbind().await {
            warn!(url = %self.url, error = %e, "Error during LDAP unbind");
        }
    }
}

fn check_result(result: LdapResult) -> DirectoryResult<()> {
    if result.rc == 0 {
        Ok(())
    } else {
        Err(DirectoryError::from_result_code(result.rc, result.text))
    }
}

/// Map an `ldap3` error into a [`DirectoryError`].
pub(crate) fn map_ldap_error(error: LdapError, context: &str) -> DirectoryError {
    match error {
        LdapError::LdapResult { result } => {
            DirectoryError::from_result_code(result.rc, result.text)
        }
        other => DirectoryError::operation_failed_with_source(context.to_string(), other),
    }
}
