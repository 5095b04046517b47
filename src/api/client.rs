//! HTTP client for the credential and content services.

use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use tracing::debug;
use url::Url;

use super::types::{Course, RoleContent, TokenRequest, TokenResponse};
use super::{COURSES_PATH, TOKEN_PATH};
use crate::error::PortalError;
use crate::session::SessionManager;
use crate::Result;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the backend, e.g. `http://localhost:8000`.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl ApiConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(30),
            user_agent: format!("course-portal/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Set timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Client for the four backend endpoints.
///
/// Carries no credentials of its own. Every call takes the
/// [`SessionManager`] and lets it decorate the request.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()?;

        debug!(base_url = %config.base_url, "created API client");

        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL of an endpoint path, keeping any path prefix of the base.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let url = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&url)?)
    }

    /// Exchange a username/password pair for a token.
    pub async fn request_token(
        &self,
        username: &str,
        password: &str,
        session: &SessionManager,
    ) -> Result<TokenResponse> {
        let url = self.endpoint(TOKEN_PATH)?;
        debug!(%url, username, "requesting token");

        let request = session.decorate_request(
            self.client
                .post(url)
                .form(&TokenRequest { username, password }),
        );

        let response = send(request).await?;
        Ok(response.json().await?)
    }

    /// Public course search.
    ///
    /// The endpoint needs no credentials, but the request still goes through
    /// `session` like every other call, so it carries the bearer token while
    /// signed in and nothing otherwise.
    pub async fn search_courses(
        &self,
        term: Option<&str>,
        session: &SessionManager,
    ) -> Result<Vec<Course>> {
        let url = self.endpoint(COURSES_PATH)?;
        let mut request = self.client.get(url);
        if let Some(term) = term.filter(|t| !t.is_empty()) {
            request = request.query(&[("search", term)]);
        }

        let response = send(session.decorate_request(request)).await?;
        Ok(response.json().await?)
    }

    /// Fetch role-scoped content from `path`, authenticated by `session`.
    pub async fn fetch_role_content(
        &self,
        path: &str,
        session: &SessionManager,
    ) -> Result<RoleContent> {
        let url = self.endpoint(path)?;
        let request = session.decorate_request(self.client.get(url));

        let response = send(request).await?;
        Ok(response.json().await?)
    }
}

async fn send(request: RequestBuilder) -> Result<Response> {
    let response = request.send().await?;
    check_status(response)
}

fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        debug!(%status, url = %response.url(), "request rejected");
        Err(PortalError::Status(status))
    }
}
