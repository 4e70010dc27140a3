//! AD password operations using unicodePwd attribute encoding.
//!
//! Active Directory requires passwords to be written to the `unicodePwd`
//! attribute using a specific encoding:
//! 1. Surround the password with double quotes: `"password"`
//! 2. Encode the quoted string as UTF-16LE bytes
//!
//! Domain controllers normally refuse unicodePwd modifications over
//! cleartext. A backend without SSL is still accepted, with a warning, and
//! the server's refusal surfaces as a protocol error.

use std::collections::HashSet;

use ldap3::Mod;
use pwsync_connector::{DirectoryError, DirectoryResult};

/// Attribute holding the password of an AD account.
pub const UNICODE_PWD_ATTRIBUTE: &str = "unicodePwd";

/// Encode a plaintext password for AD's unicodePwd attribute.
///
/// # Errors
/// Returns an error if the password is empty.
pub fn encode_ad_password(password: &str) -> DirectoryResult<Vec<u8>> {
    if password.is_empty() {
        return Err(DirectoryError::operation_failed("Password cannot be empty"));
    }

    let quoted = format!("\"{password}\"");
    Ok(quoted.encode_utf16().flat_map(u16::to_le_bytes).collect())
}

/// Build the modify request for a user-initiated AD password change.
///
/// The new password comes first. AD only treats the request as a change
/// (rather than an administrative reset) when it deletes the current value
/// and adds the replacement in one operation, so the old password is the
/// proof of knowledge.
pub fn ad_password_mods(new_password: &str, old_password: &str) -> DirectoryResult<Vec<Mod<Vec<u8>>>> {
    let old_encoded = encode_ad_password(old_password)?;
    let new_encoded = encode_ad_password(new_password)?;

    Ok(vec![
        Mod::Delete(
            UNICODE_PWD_ATTRIBUTE.as_bytes().to_vec(),
            HashSet::from([old_encoded]),
        ),
        Mod::Add(
            UNICODE_PWD_ATTRIBUTE.as_bytes().to_vec(),
            HashSet::from([new_encoded]),
        ),
    ])
}

/// Validate that the connection is suitable for password operations.
pub fn validate_password_connection(use_ssl: bool) -> DirectoryResult<()> {
    if !use_ssl {
        return Err(DirectoryError::invalid_configuration(
            "LDAPS (SSL) connection required for password operations. \
             AD rejects unicodePwd modifications over non-encrypted connections.",
        ));
    }
    Ok(())
}
