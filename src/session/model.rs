//! The session value shared by every view.

use std::fmt;

use super::Role;
use crate::error::PortalError;
use crate::Result;

/// Token, role and username of a signed-in user.
///
/// Only constructible with all three fields non-empty, so a half-populated
/// session cannot exist.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
    role: Role,
    username: String,
}

impl Credentials {
    /// Build a credential triple, rejecting empty fields.
    pub fn new(token: impl Into<String>, role: Role, username: impl Into<String>) -> Result<Self> {
        let token = token.into();
        let username = username.into();

        if token.is_empty() {
            return Err(PortalError::IncompleteSession("token"));
        }
        if role.as_str().is_empty() {
            return Err(PortalError::IncompleteSession("role"));
        }
        if username.is_empty() {
            return Err(PortalError::IncompleteSession("username"));
        }

        Ok(Self {
            token,
            role,
            username,
        })
    }

    /// Bearer token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Role claim.
    pub fn role(&self) -> &Role {
        &self.role
    }

    /// Username as reported by the credential service.
    pub fn username(&self) -> &str {
        &self.username
    }
}

// The token never goes through Debug, so it cannot leak into logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("role", &self.role)
            .field("username", &self.username)
            .finish()
    }
}

/// Client-side session: either anonymous or a complete credential triple.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    credentials: Option<Credentials>,
}

impl Session {
    /// The signed-out session.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A signed-in session.
    pub fn signed_in(credentials: Credentials) -> Self {
        Self {
            credentials: Some(credentials),
        }
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.credentials.as_ref().map(Credentials::token)
    }

    pub fn role(&self) -> Option<&Role> {
        self.credentials.as_ref().map(Credentials::role)
    }

    pub fn username(&self) -> Option<&str> {
        self.credentials.as_ref().map(Credentials::username)
    }

    /// True exactly when a token is held.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Whether the session holds the given role claim.
    pub fn has_role(&self, role: &Role) -> bool {
        self.role() == Some(role)
    }
}
