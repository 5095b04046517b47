//! Credential exchange: the login form.

use std::fmt;

use tracing::{debug, info};

use super::Notice;
use crate::api::ApiClient;
use crate::routing::Route;
use crate::session::SessionManager;
use crate::Result;

/// State of the login form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginView {
    error: Option<Notice>,
}

impl LoginView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notice from the last failed attempt.
    pub fn error(&self) -> Option<Notice> {
        self.error
    }

    /// Submit the form.
    ///
    /// Returns the route to navigate to after a successful login. An empty
    /// field submits nothing and returns `None` without a notice; any failure
    /// of the exchange itself sets [`Notice::CredentialRejected`].
    pub async fn submit(
        &mut self,
        username: &str,
        password: &str,
        api: &ApiClient,
        session: &SessionManager,
    ) -> Option<Route> {
        if username.is_empty() || password.is_empty() {
            debug!("login form incomplete, not submitting");
            return None;
        }

        self.error = None;
        match exchange(username, password, api, session).await {
            Ok(target) => Some(target),
            Err(e) => {
                // The cause stays in the log; the user only learns that it failed.
                debug!(error = %e, "login failed");
                self.error = Some(Notice::CredentialRejected);
                None
            }
        }
    }
}

async fn exchange(
    username: &str,
    password: &str,
    api: &ApiClient,
    session: &SessionManager,
) -> Result<Route> {
    let response = api.request_token(username, password, session).await?;
    let target = Route::home_for(&response.role);

    session.login(response.access_token, response.role, response.username)?;

    info!(%target, "login succeeded");
    Ok(target)
}

impl fmt::Display for LoginView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Login")?;
        if let Some(error) = self.error {
            writeln!(f, "! {}", error)?;
        }
        writeln!(f, "Username: ____")?;
        writeln!(f, "Password: ____")?;
        writeln!(f)?;
        writeln!(f, "Test users:")?;
        writeln!(f, "  student1 / pass123")?;
        write!(f, "  teacher1 / pass123")
    }
}
