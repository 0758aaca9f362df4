//! Caller identity passed explicitly to services.
//!
//! Replaces an ambient auth context: whoever builds an [`ApiClient`] or a
//! hub listener decides which session it runs under.
//!
//! [`ApiClient`]: crate::api::ApiClient

use std::fmt;

use crate::api::UserInfo;
use crate::config::SecureString;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    Member,
    Staff,
    Admin,
}

impl Role {
    /// Parse the backend's role name. Unknown roles get member rights.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "admin" | "administrator" => Role::Admin,
            "staff" | "nurse" | "doctor" => Role::Staff,
            _ => Role::Member,
        }
    }

    /// Review and update blood requests, see the request queue.
    pub fn can_manage_requests(&self) -> bool {
        matches!(self, Role::Staff | Role::Admin)
    }

    /// Publish documents and blog posts.
    pub fn can_manage_content(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Member => write!(f, "member"),
            Role::Staff => write!(f, "staff"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<SecureString>,
    user: Option<UserInfo>,
    role: Role,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: SecureString) -> Self {
        Self {
            token: Some(token),
            ..Self::default()
        }
    }

    /// Attach the user the backend reports for this token.
    pub fn with_user(mut self, user: UserInfo) -> Self {
        self.role = Role::from_name(&user.role);
        self.user = Some(user);
        self
    }

    pub fn token(&self) -> Option<&SecureString> {
        self.token.as_ref()
    }

    pub fn user(&self) -> Option<&UserInfo> {
        self.user.as_ref()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}
