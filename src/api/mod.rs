//! Client side of the backend HTTP API.
//!
//! ## Endpoints
//!
//! - `POST /auth/token` - form `username`, `password`; returns token and role
//! - `GET /api/courses?search={term}` - public course listing
//! - `GET /api/students` - student content, bearer token required
//! - `GET /api/teachers` - teacher content, bearer token required

pub mod client;
pub mod types;

pub use client::{ApiClient, ApiConfig};
pub use types::{Course, RoleContent, TokenRequest, TokenResponse};

/// Credential exchange endpoint.
pub const TOKEN_PATH: &str = "/auth/token";
/// Public course search endpoint.
pub const COURSES_PATH: &str = "/api/courses";
/// Student content endpoint.
pub const STUDENTS_PATH: &str = "/api/students";
/// Teacher content endpoint.
pub const TEACHERS_PATH: &str = "/api/teachers";
