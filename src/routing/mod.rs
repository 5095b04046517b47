//! Routes, navigation history and the role gate.
//!
//! ## Routes
//!
//! - `/` - public course search, term in `?search=`
//! - `/login` - credential form
//! - `/students` - student dashboard, guarded
//! - `/teachers` - teacher dashboard, guarded

mod gate;
mod navigator;
mod route;

pub use gate::{AccessGate, GateDecision};
pub use navigator::Navigator;
pub use route::{Route, SEARCH_PARAM};
