//! Server application models.
//!
//! Application state shared by handlers and typed session entries.

pub mod app;
pub mod session;
