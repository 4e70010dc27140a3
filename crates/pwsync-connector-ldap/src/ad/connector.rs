//! Active Directory password backend.

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use pwsync_connector::{BackendConfig, BackendKind, DirectoryError, DirectoryResult, PasswordBackend};

use super::password::{ad_password_mods, validate_password_connection};
use crate::session::LdapSession;

/// Password backend for an Active Directory or Samba 4 domain controller.
///
/// Uses a single connection bound as `username@ad_domain` with the old
/// password. The DN lookup runs on that authenticated connection, since
/// domain controllers usually refuse anonymous searches.
pub struct AdPasswordBackend {
    config: BackendConfig,
}

impl AdPasswordBackend {
    /// Create a new AD backend.
    ///
    /// Fails when `ad_domain` is missing. A cleartext connection is accepted
    /// with a warning: the domain controller decides whether to allow it.
    pub fn new(config: BackendConfig) -> DirectoryResult<Self> {
        config.validate()?;
        config.principal("")?;

        if let Err(e) = validate_password_connection(config.use_ssl) {
            warn!(backend = %config.name, error = %e, "AD backend configured without SSL");
        }

        Ok(Self { config })
    }

    /// Get the backend configuration.
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    async fn run(
        &self,
        session: &mut LdapSession,
        username: &str,
        principal: &str,
        old_password: &str,
        new_password: &str,
    ) -> DirectoryResult<String> {
        session.bind(principal, old_password).await?;

        let user_dn = session
            .find_user_dn(&self.config, username)
            .await?
            .ok_or(DirectoryError::UsernameRequired)?;

        debug!(user_dn = %user_dn, "Resolved user DN");

        let mods = ad_password_mods(new_password, old_password)?;
        session.modify(&user_dn, mods).await?;
        Ok(user_dn)
    }
}

#[async_trait]
impl PasswordBackend for AdPasswordBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn kind(&self) -> BackendKind {
        BackendKind::DomainController
    }

    #[instrument(skip(self, old_password, new_password), fields(backend = %self.config.name))]
    async fn change_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> DirectoryResult<()> {
        if username.trim().is_empty() {
            return Err(DirectoryError::UsernameRequired);
        }
        if old_password.is_empty() {
            return Err(DirectoryError::password_required());
        }

        let principal = self.config.principal(username)?;

        let mut session = LdapSession::connect(&self.config).await?;
        let result = self
            .run(&mut session, username, &principal, old_password, new_password)
            .await;
        session.close().await;

        let user_dn = result?;
        info!(user_dn = %user_dn, "AD password changed");
        Ok(())
    }
}

impl std::fmt::Debug for AdPasswordBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdPasswordBackend")
            .field("name", &self.config.name)
            .field("url", &self.config.url())
            .field("ad_domain", &self.config.ad_domain)
            .finish()
    }
}
