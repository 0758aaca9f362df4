//! Authentication header building for API requests.

use super::credentials::SecureString;

/// Header name and value for authentication.
pub type AuthHeader = (String, String);

/// Build the `Authorization: Bearer` header for a token.
///
/// Returns `None` for anonymous sessions.
pub fn build_auth_header(token: Option<&SecureString>) -> Option<AuthHeader> {
    token.map(|t| ("Authorization".to_string(), format!("Bearer {}", t.expose())))
}
