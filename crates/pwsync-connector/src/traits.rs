//! Backend capability trait.

use async_trait::async_trait;

use crate::config::BackendKind;
use crate::error::DirectoryResult;

/// A directory backend that holds a copy of a user's password.
///
/// Implementations own every connection they open and must release it before
/// returning, on success and on failure alike.
#[async_trait]
pub trait PasswordBackend: Send + Sync {
    /// Unique name of this backend instance.
    fn name(&self) -> &str;

    /// Protocol flavor of this backend.
    fn kind(&self) -> BackendKind;

    /// Change `username`'s password from `old_password` to `new_password`.
    ///
    /// The user authenticates with `old_password`; no administrative
    /// credentials are involved.
    async fn change_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> DirectoryResult<()>;

    /// Undo a change previously made by [`change_password`](Self::change_password).
    ///
    /// Runs the identical protocol with the two passwords swapped: the value
    /// that was just set authenticates, the original value is restored.
    async fn revert_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> DirectoryResult<()> {
        self.change_password(username, new_password, old_password)
            .await
    }
}
