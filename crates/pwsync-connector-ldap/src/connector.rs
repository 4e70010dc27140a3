//! Generic LDAP password backend.

use async_trait::async_trait;
use ldap3::exop::PasswordModify;
use tracing::{debug, info, instrument};

use pwsync_connector::{BackendConfig, BackendKind, DirectoryError, DirectoryResult, PasswordBackend};

use crate::session::LdapSession;

/// Password backend for a plain LDAPv3 directory server.
///
/// The change runs over two connections: an anonymous one that resolves the
/// user's DN, and a second one bound as that DN with the old password that
/// issues the Password Modify extended operation.
pub struct LdapPasswordBackend {
    config: BackendConfig,
}

impl LdapPasswordBackend {
    /// Create a new backend with the given configuration.
    pub fn new(config: BackendConfig) -> DirectoryResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the backend configuration.
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Resolve `username` to a DN over an anonymous connection.
    #[instrument(skip(self), fields(backend = %self.config.name))]
    pub async fn resolve_user_dn(&self, username: &str) -> DirectoryResult<Option<String>> {
        let mut session = LdapSession::connect(&self.config).await?;
        let result = session.find_user_dn(&self.config, username).await;
        session.close().await;
        result
    }

    async fn bind_and_modify(
        &self,
        user_dn: &str,
        old_password: &str,
        new_password: &str,
    ) -> DirectoryResult<()> {
        let mut session = LdapSession::connect(&self.config).await?;
        let result = async {
            session.bind(user_dn, old_password).await?;
            session
                .password_modify(password_modify_exop(user_dn, old_password, new_password))
                .await
        }
        .await;
        session.close().await;
        result
    }
}

/// Password Modify request changing `user_dn` from `old_password` to `new_password`.
pub(crate) fn password_modify_exop<'a>(
    user_dn: &'a str,
    old_password: &'a str,
    new_password: &'a str,
) -> PasswordModify<'a> {
    PasswordModify {
        user_id: Some(user_dn),
        old_pass: Some(old_password),
        new_pass: Some(new_password),
    }
}

#[async_trait]
impl PasswordBackend for LdapPasswordBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Generic
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

        let user_dn = self
            .resolve_user_dn(username)
            .await?
            .ok_or(DirectoryError::UsernameRequired)?;

        debug!(user_dn = %user_dn, "Resolved user DN");

        self.bind_and_modify(&user_dn, old_password, new_password)
            .await?;

        info!(user_dn = %user_dn, "LDAP password changed");
        Ok(())
    }
}

impl std::fmt::Debug for LdapPasswordBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LdapPasswordBackend")
            .field("name", &self.config.name)
            .field("url", &self.config.url())
            .finish()
    }
}
