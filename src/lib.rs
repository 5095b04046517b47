//! # course-portal
//!
//! Session-aware client for a course portal with role-based views.
//!
//! The crate signs a user in against a remote credential service, keeps the
//! resulting session in durable storage, and decides which views a session
//! may see. Its only authority for authorization is the role claim held
//! locally.
//!
//! ## Features
//!
//! - **Session management**: one [`SessionManager`] owns the session and is
//!   the only writer of its durable mirror and of the bearer header
//! - **Role gating**: [`AccessGate`] guards the student and teacher areas,
//!   and each dashboard re-checks the role before fetching
//! - **Linkable search**: the public course search keeps its term in the URL
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use course_portal::{ApiClient, ApiConfig, App, Route, SessionManager, SessionStore};
//!
//! #[tokio::main]
//! async fn main() -> course_portal::Result<()> {
//!     course_portal::logging::try_init().ok();
//!
//!     let session = Arc::new(SessionManager::hydrate(SessionStore::open("session.json")));
//!     let api = ApiClient::new(ApiConfig::new("http://localhost:8000".parse()?))?;
//!     let mut app = App::new(session, api);
//!
//!     app.submit_login("student1", "pass123").await;
//!     println!("{}", app.open(Route::Students).await);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod routing;
pub mod session;
pub mod views;

// Re-export commonly used types
pub use api::{ApiClient, ApiConfig, Course};
pub use app::{App, Body, NavBar, Screen};
pub use error::{PortalError, Result};
pub use routing::{AccessGate, GateDecision, Navigator, Route};
pub use session::{Credentials, Role, Session, SessionManager, SessionStore};
pub use views::{LoginView, Notice, RoleView, SearchView};
