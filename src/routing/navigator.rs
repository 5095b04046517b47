//! Browser-style navigation history.

use super::Route;

/// History stack with a cursor, like a browser tab's session history.
#[derive(Debug, Clone)]
pub struct Navigator {
    entries: Vec<Route>,
    index: usize,
}

impl Navigator {
    /// Start a history at `initial`.
    pub fn new(initial: Route) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
        }
    }

    pub fn current(&self) -> &Route {
        &self.entries[self.index]
    }

    /// Add a new entry after the current one, dropping any forward entries.
    pub fn push(&mut self, route: Route) {
        self.entries.truncate(self.index + 1);
        self.entries.push(route);
        self.index += 1;
    }

    /// Overwrite the current entry, so going back skips it.
    pub fn replace(&mut self, route: Route) {
        self.entries[self.index] = route;
    }

    /// Step back one entry. Returns `None` at the start of history.
    pub fn back(&mut self) -> Option<&Route> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.current())
    }

    /// Step forward one entry, if there is one.
    pub fn forward(&mut self) -> Option<&Route> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(self.current())
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[Route] {
        &self.entries
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::home())
    }
}
