//! Active Directory specific modules
//!
//! AD and Samba 4 domain controllers do not implement the Password Modify
//! extended operation. A user changes their own password by binding with
//! their principal name and rewriting the `unicodePwd` attribute.

pub mod connector;
pub mod password;

pub use connector::AdPasswordBackend;
pub use password::{
    ad_password_mods, encode_ad_password, validate_password_connection, UNICODE_PWD_ATTRIBUTE,
};
