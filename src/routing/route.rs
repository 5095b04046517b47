//! Navigable routes.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::PortalError;
use crate::session::Role;

/// Query parameter carrying the search term.
pub const SEARCH_PARAM: &str = "search";

// Only used to resolve relative paths; never contacted.
const ROUTE_BASE: &str = "http://portal.invalid/";

/// A location in the portal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/` or `/?search=term`.
    Search { term: Option<String> },
    /// `/login`.
    Login,
    /// `/students`, guarded by the student role.
    Students,
    /// `/teachers`, guarded by the teacher role.
    Teachers,
}

impl Route {
    /// The public landing page, unfiltered.
    pub fn home() -> Self {
        Route::Search { term: None }
    }

    /// The search page for a term; an empty term is the unfiltered listing.
    pub fn search(term: impl Into<String>) -> Self {
        let term = term.into();
        Route::Search {
            term: (!term.is_empty()).then_some(term),
        }
    }

    /// Where a session holding `role` belongs.
    pub fn home_for(role: &Role) -> Self {
        match role {
            Role::Student => Route::Students,
            Role::Teacher => Route::Teachers,
            Role::Unrecognized(_) => Route::home(),
        }
    }

    /// Parse a path with optional query, e.g. `/?search=math`.
    ///
    /// Full URLs are accepted too; only their path and query matter. Unknown
    /// paths resolve to the landing page.
    pub fn parse(location: &str) -> crate::Result<Self> {
        let base = Url::parse(ROUTE_BASE)?;
        let url = base.join(location)?;

        let route = match url.path().trim_end_matches('/') {
            "" => {
                let term = url
                    .query_pairs()
                    .find(|(key, _)| key == SEARCH_PARAM)
                    .map(|(_, value)| value.into_owned())
                    .unwrap_or_default();
                Route::search(term)
            }
            "/login" => Route::Login,
            "/students" => Route::Students,
            "/teachers" => Route::Teachers,
            other => {
                tracing::debug!(path = other, "unknown path, falling back to search");
                Route::home()
            }
        };
        Ok(route)
    }

    /// Path component without query.
    pub fn path(&self) -> &'static str {
        match self {
            Route::Search { .. } => "/",
            Route::Login => "/login",
            Route::Students => "/students",
            Route::Teachers => "/teachers",
        }
    }

    /// Role a session must hold to see this route, if any.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Route::Students => Some(Role::Student),
            Route::Teachers => Some(Role::Teacher),
            Route::Search { .. } | Route::Login => None,
        }
    }

    /// The search term carried in the URL.
    pub fn search_term(&self) -> Option<&str> {
        match self {
            Route::Search { term } => term.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Search { term: Some(term) } => {
                let query = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair(SEARCH_PARAM, term)
                    .finish();
                write!(f, "/?{}", query)
            }
            other => f.write_str(other.path()),
        }
    }
}

impl FromStr for Route {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s)
    }
}
