//! Database repositories.
//!
//! Each repository wraps one table (plus the joins it needs) and is generic over
//! [`sea_orm::ConnectionTrait`] so it can run inside a transaction.

pub mod api_key;
pub mod currency_rate;
pub mod model_request;
pub mod price;
pub mod provider;
pub mod review;
pub mod setting;
pub mod standard_model;
pub mod token;
pub mod user;
pub mod user_settings;
