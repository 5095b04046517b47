//! Public course search.
//!
//! The term is part of the URL (`/?search=term`), so the view is rebuilt
//! from the route and any search is linkable.

use std::fmt;

use tracing::debug;

use super::{LoadOutcome, MountHandle, Notice};
use crate::api::{ApiClient, Course};
use crate::routing::Route;
use crate::session::SessionManager;

/// What the search page currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchState {
    Loading,
    Loaded(Vec<Course>),
    Failed(Notice),
}

/// Course search bound to one term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchView {
    term: Option<String>,
    state: SearchState,
}

impl SearchView {
    pub fn new(term: Option<String>) -> Self {
        Self {
            term: term.filter(|t| !t.is_empty()),
            state: SearchState::Loading,
        }
    }

    /// The view for the term carried by `route`.
    pub fn for_route(route: &Route) -> Self {
        Self::new(route.search_term().map(str::to_string))
    }

    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Fetch the listing for the current term.
    ///
    /// Works signed in or not; the session only decorates the request.
    pub async fn load(
        &mut self,
        api: &ApiClient,
        session: &SessionManager,
        mount: &MountHandle,
    ) -> LoadOutcome {
        self.state = SearchState::Loading;

        let result = api.search_courses(self.term(), session).await;
        if !mount.is_mounted() {
            debug!(term = ?self.term, "search unmounted, dropping response");
            return LoadOutcome::Discarded;
        }

        self.state = match result {
            Ok(courses) => SearchState::Loaded(courses),
            Err(e) => {
                debug!(error = %e, "course search failed");
                SearchState::Failed(Notice::CourseListUnavailable)
            }
        };
        LoadOutcome::Rendered
    }
}

impl fmt::Display for SearchView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Course search (public)")?;
        writeln!(f, "Search: [{}]", self.term().unwrap_or_default())?;
        match &self.state {
            SearchState::Loading => write!(f, "Loading..."),
            SearchState::Failed(notice) => write!(f, "! {}", notice),
            SearchState::Loaded(courses) => {
                write!(f, "Results for: \"{}\"", self.term().unwrap_or_default())?;
                if courses.is_empty() {
                    return write!(f, "\nNo courses found.");
                }
                for course in courses {
                    write!(f, "\n- {}\n  {}", course.name, course.description)?;
                }
                Ok(())
            }
        }
    }
}
