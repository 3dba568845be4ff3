//! HTTP controller endpoints of the price hub API.
//!
//! Axum handlers grouped by API prefix. Handlers resolve the session user through
//! [`util::get_user`], delegate to the services and map results to JSON responses. Every
//! handler carries a utoipa annotation collected into the OpenAPI document by the router.

pub mod account;
pub mod admin;
pub mod auth;
pub mod config;
pub mod model;
pub mod price;
pub mod review;
pub mod settings;
pub mod user;
pub mod util;
