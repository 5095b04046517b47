//! Views of the portal and the state they share.
//!
//! Every view catches its own remote failures and turns them into a
//! [`Notice`] or a redirect; nothing propagates further.

pub mod dashboard;
pub mod login;
pub mod search;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub use dashboard::{DashboardState, RoleView};
pub use login::LoginView;
pub use search::{SearchState, SearchView};

use crate::routing::Route;

/// User-facing failure messages.
///
/// Deliberately coarse: a rejected password and an unreachable server read
/// the same. Role mismatches have no notice at all, they redirect silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// A login attempt failed for any reason.
    CredentialRejected,
    /// Role-scoped dashboard content could not be loaded.
    ContentLoadFailed,
    /// The public course listing could not be loaded.
    CourseListUnavailable,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::CredentialRejected => "login failed, check your credentials",
            Notice::ContentLoadFailed => "access denied or load error",
            Notice::CourseListUnavailable => "could not load courses",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// What became of a view's load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The view has something to show (content or a notice).
    Rendered,
    /// The view refused to render; go here instead, replacing history.
    Redirect(Route),
    /// The view was unmounted before its response arrived.
    Discarded,
}

/// Tracks which view instance is currently mounted.
///
/// Each mount bumps an epoch; a [`MountHandle`] from an older epoch reports
/// itself unmounted, which is how late responses get dropped.
#[derive(Debug, Default)]
pub struct MountTracker {
    epoch: AtomicU64,
}

impl MountTracker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Mount a new view, unmounting the previous one.
    pub fn mount(self: &Arc<Self>) -> MountHandle {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        MountHandle {
            tracker: Arc::clone(self),
            epoch,
        }
    }

    /// Unmount whatever is mounted.
    pub fn unmount(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }
}

/// Token held by a mounted view.
#[derive(Debug, Clone)]
pub struct MountHandle {
    tracker: Arc<MountTracker>,
    epoch: u64,
}

impl MountHandle {
    pub fn is_mounted(&self) -> bool {
        self.tracker.epoch.load(Ordering::SeqCst) == self.epoch
    }
}
