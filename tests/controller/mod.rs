//! Tests for HTTP controller endpoints.
//!
//! Handlers are called directly with the test context's state and in-memory session, the same
//! way the router would invoke them.

mod admin;
mod auth;
mod price;
mod review;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use pricehub::server::{
    error::Error, model::app::AppState, model::session::user::SessionUserId,
};
use pricehub_test_utils::prelude::*;

use crate::util::body_json;
