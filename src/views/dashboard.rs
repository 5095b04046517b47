//! Role dashboards.
//!
//! Each dashboard checks the session's role again on its own, independent
//! of the route gate, before it fetches anything.

use std::fmt;

use tracing::{debug, warn};

use super::{LoadOutcome, MountHandle, Notice};
use crate::api::{ApiClient, STUDENTS_PATH, TEACHERS_PATH};
use crate::routing::Route;
use crate::session::{Role, SessionManager};

/// What the dashboard currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardState {
    Loading,
    Loaded(String),
    Failed(Notice),
}

/// Dashboard bound to one role and its content endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleView {
    role: Role,
    endpoint: &'static str,
    username: Option<String>,
    state: DashboardState,
}

impl RoleView {
    fn new(role: Role, endpoint: &'static str) -> Self {
        Self {
            role,
            endpoint,
            username: None,
            state: DashboardState::Loading,
        }
    }

    pub fn student() -> Self {
        Self::new(Role::Student, STUDENTS_PATH)
    }

    pub fn teacher() -> Self {
        Self::new(Role::Teacher, TEACHERS_PATH)
    }

    /// The dashboard mounted at `route`, if any.
    pub fn for_route(route: &Route) -> Option<Self> {
        match route {
            Route::Students => Some(Self::student()),
            Route::Teachers => Some(Self::teacher()),
            Route::Search { .. } | Route::Login => None,
        }
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn endpoint(&self) -> &'static str {
        self.endpoint
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Assert the role, then fetch the content once.
    ///
    /// A session without this view's role is sent to the public page and no
    /// request is made. Call again whenever the role claim changes.
    pub async fn load(
        &mut self,
        session: &SessionManager,
        api: &ApiClient,
        mount: &MountHandle,
    ) -> LoadOutcome {
        let current = session.current_session();
        if !current.has_role(&self.role) {
            warn!(required = %self.role, "role check failed in dashboard, leaving");
            return LoadOutcome::Redirect(Route::home());
        }

        self.username = current.username().map(str::to_string);
        self.state = DashboardState::Loading;

        let result = api.fetch_role_content(self.endpoint, session).await;
        if !mount.is_mounted() {
            debug!(endpoint = self.endpoint, "dashboard unmounted, dropping response");
            return LoadOutcome::Discarded;
        }

        self.state = match result {
            Ok(content) => DashboardState::Loaded(content.data),
            Err(e) => {
                debug!(error = %e, endpoint = self.endpoint, "dashboard content failed");
                DashboardState::Failed(Notice::ContentLoadFailed)
            }
        };
        LoadOutcome::Rendered
    }

    fn title(&self) -> &str {
        match self.role {
            Role::Student => "Student area",
            Role::Teacher => "Teacher area",
            Role::Unrecognized(_) => "Dashboard",
        }
    }
}

impl fmt::Display for RoleView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title())?;
        match &self.username {
            Some(name) => writeln!(f, "Welcome, {} ({})!", name, self.role)?,
            None => writeln!(f, "Welcome, {}!", self.role)?,
        }
        match &self.state {
            DashboardState::Loading => writeln!(f, "Loading...")?,
            DashboardState::Loaded(data) => writeln!(f, "Exclusive content: {}", data)?,
            DashboardState::Failed(notice) => writeln!(f, "! {}", notice)?,
        }
        write!(f, "[Logout]")
    }
}
