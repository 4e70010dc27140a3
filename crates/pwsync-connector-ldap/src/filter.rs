//! Search filter rendering.

use pwsync_connector::config::UID_PLACEHOLDER;

/// Escape special characters in LDAP filter values (RFC 4515).
#[must_use]
pub fn escape_filter_value(value: &str) -> String {
    value
        .replace('\\', "\\5c")
        .replace('*', "\\2a")
        .replace('(', "\\28")
        .replace(')', "\\29")
        .replace('\0', "\\00")
}

/// Render a configured search filter for `uid`.
///
/// Every `{uid}` is replaced with the escaped username, and the result is
/// wrapped in parentheses unless the template already provides them.
#[must_use]
pub fn render_user_filter(template: &str, uid: &str) -> String {
    let filter = template.replace(UID_PLACEHOLDER, &escape_filter_value(uid));
    let trimmed = filter.trim();
    if trimmed.starts_with('(') && trimmed.ends_with(')') {
        trimmed.to_string()
    } else {
        format!("({trimmed})")
    }
}
