//! The portal shell: navigation, route table and screen composition.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::routing::{AccessGate, GateDecision, Navigator, Route};
use crate::session::{Role, Session, SessionManager};
use crate::views::{LoadOutcome, LoginView, MountTracker, RoleView, SearchView};
use crate::Result;

/// Upper bound on redirects followed for one navigation.
const MAX_REDIRECTS: usize = 8;

/// One entry of the navigation bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub route: Route,
}

/// Navigation bar, derived from the session alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavBar {
    pub links: Vec<NavLink>,
    /// Whether the logout control is shown.
    pub logout: bool,
}

impl NavBar {
    pub fn for_session(session: &Session) -> Self {
        let mut links = vec![NavLink {
            label: "Search",
            route: Route::home(),
        }];

        match session.role() {
            None => links.push(NavLink {
                label: "Login",
                route: Route::Login,
            }),
            Some(Role::Student) => links.push(NavLink {
                label: "Student area",
                route: Route::Students,
            }),
            Some(Role::Teacher) => links.push(NavLink {
                label: "Teacher area",
                route: Route::Teachers,
            }),
            Some(Role::Unrecognized(_)) => {}
        }

        Self {
            links,
            logout: session.is_authenticated(),
        }
    }
}

impl fmt::Display for NavBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let links: Vec<String> = self
            .links
            .iter()
            .map(|link| format!("{} ({})", link.label, link.route))
            .collect();
        write!(f, "{}", links.join(" | "))?;
        if self.logout {
            write!(f, " | [Logout]")?;
        }
        Ok(())
    }
}

/// The mounted view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Search(SearchView),
    Login(LoginView),
    Dashboard(RoleView),
}

/// Everything currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    pub route: Route,
    pub nav: NavBar,
    pub body: Body,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.nav)?;
        writeln!(f, "{}", "-".repeat(40))?;
        match &self.body {
            Body::Search(view) => write!(f, "{}", view),
            Body::Login(view) => write!(f, "{}", view),
            Body::Dashboard(view) => write!(f, "{}", view),
        }
    }
}

/// One portal instance: what a browser tab is to the web client.
///
/// Other holders of the shared [`SessionManager`] may sign in or out at any
/// time. The app notices through its subscription and re-runs the gate on
/// the next [`sync`](Self::sync) or navigation.
pub struct App {
    session: Arc<SessionManager>,
    changes: watch::Receiver<Session>,
    api: ApiClient,
    navigator: Navigator,
    mounts: Arc<MountTracker>,
    screen: Option<Screen>,
}

impl App {
    /// Create an app positioned at the landing page. Nothing is rendered
    /// until the first navigation.
    pub fn new(session: Arc<SessionManager>, api: ApiClient) -> Self {
        let changes = session.subscribe();
        Self {
            session,
            changes,
            api,
            navigator: Navigator::default(),
            mounts: MountTracker::new(),
            screen: None,
        }
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn current_route(&self) -> &Route {
        self.navigator.current()
    }

    /// The last rendered screen, as it was rendered.
    ///
    /// It may predate a session change; use [`sync`](Self::sync) to get a
    /// screen that reflects the current session.
    pub fn screen(&self) -> Option<&Screen> {
        self.screen.as_ref()
    }

    /// Whether the session changed since the current screen was resolved.
    pub fn is_stale(&self) -> bool {
        self.changes.has_changed().unwrap_or(false)
    }

    /// The current screen, re-resolved if the session changed since it was
    /// rendered.
    ///
    /// An unchanged session returns the cached screen without any request.
    pub async fn sync(&mut self) -> &Screen {
        if self.is_stale() || self.screen.is_none() {
            debug!(route = %self.navigator.current(), "session changed, re-evaluating");
            return self.show().await;
        }
        match self.screen.take() {
            Some(screen) => self.screen.insert(screen),
            None => self.show().await,
        }
    }

    /// Navigate to `route`, pushing a history entry.
    pub async fn open(&mut self, route: Route) -> &Screen {
        debug!(%route, "navigate");
        self.navigator.push(route);
        self.show().await
    }

    /// Navigate to a path such as `/students` or `/?search=math`.
    pub async fn open_path(&mut self, path: &str) -> Result<&Screen> {
        let route = Route::parse(path)?;
        Ok(self.open(route).await)
    }

    /// Go back one history entry, re-running the gate there.
    pub async fn back(&mut self) -> Option<&Screen> {
        self.navigator.back()?;
        Some(self.show().await)
    }

    /// Re-evaluate the current route against the current session.
    pub async fn refresh(&mut self) -> &Screen {
        self.show().await
    }

    /// Submit the login form, mounting it first if needed.
    pub async fn submit_login(&mut self, username: &str, password: &str) -> &Screen {
        if self.navigator.current() != &Route::Login {
            self.open(Route::Login).await;
        }

        let mut form = match self.screen.as_ref().map(|s| &s.body) {
            Some(Body::Login(view)) => view.clone(),
            _ => LoginView::new(),
        };

        match form.submit(username, password, &self.api, &self.session).await {
            Some(target) => self.open(target).await,
            None => self.set_body(Body::Login(form)),
        }
    }

    /// Change the search term, which lives in the URL.
    ///
    /// Each actual change pushes a new `/?search=` entry and fetches once;
    /// setting the term it already has does nothing.
    pub async fn set_search_term(&mut self, term: &str) -> &Screen {
        let route = Route::search(term);
        if self.navigator.current() == &route {
            return self.sync().await;
        }
        self.open(route).await
    }

    /// Logout control of the navigation bar: sign out and re-check the
    /// current route, so a guarded view falls through to `/login`.
    pub async fn logout(&mut self) -> &Screen {
        if let Err(e) = self.session.logout() {
            warn!(error = %e, "logout failed");
        }
        self.show().await
    }

    /// Logout control of a dashboard: sign out and go to the landing page.
    pub async fn dashboard_logout(&mut self) -> &Screen {
        if let Err(e) = self.session.logout() {
            warn!(error = %e, "logout failed");
        }
        self.open(Route::home()).await
    }

    fn set_body(&mut self, body: Body) -> &Screen {
        let screen = Screen {
            route: self.navigator.current().clone(),
            nav: NavBar::for_session(&self.session.current_session()),
            body,
        };
        self.screen.insert(screen)
    }

    /// Resolve the current route to a screen, following redirects.
    async fn show(&mut self) -> &Screen {
        for _ in 0..MAX_REDIRECTS {
            // Everything below reads the session as of now; later changes
            // flag the screen stale again.
            self.changes.mark_unchanged();
            let route = self.navigator.current().clone();
            let mount = self.mounts.mount();

            if let Some(gate) = AccessGate::for_route(&route) {
                if let GateDecision::Redirect { to, replace } =
                    gate.evaluate(&self.session.current_session(), &route)
                {
                    self.redirect(to, replace);
                    continue;
                }
            }

            let body = match route {
                Route::Login => Body::Login(LoginView::new()),
                Route::Search { .. } => {
                    let mut view = SearchView::for_route(&route);
                    match view.load(&self.api, &self.session, &mount).await {
                        LoadOutcome::Rendered => Body::Search(view),
                        _ => continue,
                    }
                }
                Route::Students | Route::Teachers => {
                    let Some(mut view) = RoleView::for_route(&route) else {
                        continue;
                    };

                    // A session change while the content is in flight (a
                    // logout from another control) re-runs the whole
                    // resolution; the old view's response is dropped.
                    let outcome = tokio::select! {
                        outcome = view.load(&self.session, &self.api, &mount) => outcome,
                        Ok(()) = self.changes.changed() => {
                            debug!(%route, "session changed during load, re-evaluating");
                            LoadOutcome::Discarded
                        }
                    };

                    match outcome {
                        LoadOutcome::Rendered => Body::Dashboard(view),
                        LoadOutcome::Redirect(to) => {
                            self.redirect(to, true);
                            continue;
                        }
                        LoadOutcome::Discarded => continue,
                    }
                }
            };

            return self.set_body(body);
        }

        warn!(route = %self.navigator.current(), "too many redirects, showing landing page");
        self.mounts.unmount();
        self.navigator.replace(Route::home());
        self.set_body(Body::Search(SearchView::new(None)))
    }

    fn redirect(&mut self, to: Route, replace: bool) {
        debug!(%to, replace, "redirect");
        if replace {
            self.navigator.replace(to);
        } else {
            self.navigator.push(to);
        }
    }
}
