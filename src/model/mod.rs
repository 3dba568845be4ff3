//! Request and response bodies of the HTTP API.

pub mod account;
pub mod admin;
pub mod api;
pub mod key;
pub mod price;
pub mod provider;
pub mod review;
pub mod settings;
pub mod standard_model;
pub mod user;
