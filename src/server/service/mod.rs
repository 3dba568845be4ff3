//! Service layer for business logic.
//!
//! Services validate requests, coordinate repositories inside transactions where several rows
//! change together, and talk to remote systems (SMTP, the exchange rate API, provider
//! websites). Controllers and scheduled jobs call into this layer only.

pub mod account;
pub mod auth;
pub mod comparison;
pub mod email;
pub mod exchange_rate;
pub mod expiry;
pub mod moderation;
pub mod price;
pub mod retry;
pub mod review;
pub mod settings;
pub mod standard_model;
pub mod uptime;
pub mod workspace;
