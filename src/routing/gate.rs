//! Role guard around protected routes.

use tracing::debug;

use super::Route;
use crate::session::{Role, Session};

/// Outcome of evaluating an [`AccessGate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Show the guarded view.
    Render,
    /// Go elsewhere instead.
    Redirect {
        to: Route,
        /// Replace the current history entry instead of pushing.
        replace: bool,
    },
}

/// Guard that admits only sessions holding one role.
///
/// Holds no state of its own: evaluate it again on every navigation and
/// whenever the session changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGate {
    required: Role,
}

impl AccessGate {
    pub fn new(required: Role) -> Self {
        Self { required }
    }

    /// The gate protecting `route`, if it is guarded.
    pub fn for_route(route: &Route) -> Option<Self> {
        route.required_role().map(Self::new)
    }

    pub fn required(&self) -> &Role {
        &self.required
    }

    /// Decide whether `session` may see `current`.
    pub fn evaluate(&self, session: &Session, current: &Route) -> GateDecision {
        let decision = match session.role() {
            _ if !session.is_authenticated() => GateDecision::Redirect {
                to: Route::Login,
                replace: true,
            },
            Some(role) if role == &self.required => GateDecision::Render,
            Some(role) => GateDecision::Redirect {
                to: Route::home_for(role),
                replace: true,
            },
            // Authenticated always implies a role; kept total for the matcher.
            None => GateDecision::Redirect {
                to: Route::home(),
                replace: true,
            },
        };

        debug!(
            route = %current,
            required = %self.required,
            ?decision,
            "access gate evaluated"
        );
        decision
    }
}
