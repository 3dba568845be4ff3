//! Server application core modules.
//!
//! HTTP routing, session authentication, database access and scheduled maintenance for the
//! price hub. Controllers stay thin; services own the business rules and repositories in
//! [`data`] own the queries.

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod model;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod util;
