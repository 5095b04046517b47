//! Wire types of the remote services.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::session::Role;

/// Form body of `POST /auth/token`.
#[derive(Clone, Serialize)]
pub struct TokenRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

impl fmt::Debug for TokenRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful response of `POST /auth/token`.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    /// Opaque bearer token.
    pub access_token: String,
    /// Role claim.
    pub role: Role,
    /// Canonical username.
    pub username: String,
    /// Token scheme as reported by the service (always `bearer` in practice).
    #[serde(default)]
    pub token_type: Option<String>,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"<redacted>")
            .field("role", &self.role)
            .field("username", &self.username)
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// One entry of `GET /api/courses`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// Body of the role-scoped content endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoleContent {
    /// The content shown on the dashboard.
    pub data: String,
    /// Greeting sent alongside; not displayed.
    #[serde(default)]
    pub message: Option<String>,
}
