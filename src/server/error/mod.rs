//! Error types for the price hub server.
//!
//! Domain errors (authentication, account codes, prices, providers, moderation, configuration)
//! each map themselves to an HTTP response. Library errors are wrapped in [`Error`] and
//! surface as a logged, generic 500 response.

pub mod account;
pub mod admin;
pub mod auth;
pub mod config;
pub mod price;
pub mod provider;
pub mod retry;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::{
    model::api::ErrorDto,
    server::error::{
        account::AccountError, admin::AdminError, auth::AuthError, config::ConfigError,
        price::PriceError, provider::ProviderError,
    },
};

/// Main error type for the server application.
///
/// Aggregates domain-specific errors and external library errors so handlers and services can
/// use `?` throughout. The `IntoResponse` implementation delegates to the domain error or falls
/// back to [`InternalServerError`].
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Authentication error (session, credentials, TOTP, role checks).
    #[error(transparent)]
    AuthError(#[from] AuthError),
    /// Verification code flows for password reset and email change.
    #[error(transparent)]
    AccountError(#[from] AccountError),
    /// Price submission and comparison errors.
    #[error(transparent)]
    PriceError(#[from] PriceError),
    /// Provider, API key and review errors.
    #[error(transparent)]
    ProviderError(#[from] ProviderError),
    /// Moderation and system settings errors.
    #[error(transparent)]
    AdminError(#[from] AdminError),
    /// Parse error (failed to parse a value from string or other format).
    #[error("Failed to parse value: {0:?}")]
    ParseError(String),
    /// Internal error indicating a bug in the server code.
    #[error("Internal error: {0:?}")]
    InternalError(String),
    /// Database error (query failures, connection issues, constraint violations).
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),
    /// Session error (session retrieval, storage, serialization).
    #[error(transparent)]
    SessionError(#[from] tower_sessions::session::Error),
    /// Redis session store error (connection, command execution).
    #[error(transparent)]
    SessionRedisError(#[from] tower_sessions_redis_store::fred::prelude::Error),
    /// Cron scheduler error (job registration, scheduler startup).
    #[error(transparent)]
    SchedulerError(#[from] tokio_cron_scheduler::JobSchedulerError),
    /// Outbound HTTP error (exchange rate API).
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
    /// Password hashing or PHC string parsing error.
    #[error(transparent)]
    PasswordHashError(#[from] argon2::password_hash::Error),
    /// Invalid TOTP parameters.
    #[error(transparent)]
    TotpUrlError(#[from] totp_rs::TotpUrlError),
    /// Stored TOTP secret is not valid base32.
    #[error(transparent)]
    TotpSecretError(#[from] totp_rs::SecretParseError),
    /// System clock before the Unix epoch while checking a TOTP code.
    #[error(transparent)]
    SystemTimeError(#[from] std::time::SystemTimeError),
    /// SMTP transport error.
    #[error(transparent)]
    SmtpError(#[from] lettre::transport::smtp::Error),
    /// Email message construction error.
    #[error(transparent)]
    EmailError(#[from] lettre::error::Error),
    /// Invalid email address for an outgoing message.
    #[error(transparent)]
    EmailAddressError(#[from] lettre::address::AddressError),
    /// Malformed multipart request body.
    #[error(transparent)]
    MultipartError(#[from] axum::extract::multipart::MultipartError),
    /// Filesystem error (proof uploads).
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    /// JSON (de)serialization of stored lists.
    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::ConfigError(err) => err.into_response(),
            Self::AuthError(err) => err.into_response(),
            Self::AccountError(err) => err.into_response(),
            Self::PriceError(err) => err.into_response(),
            Self::ProviderError(err) => err.into_response(),
            Self::AdminError(err) => err.into_response(),
            Self::MultipartError(err) => error_response(err.status(), err.body_text()),
            err => InternalServerError(err).into_response(),
        }
    }
}

/// Build a `{"error": message}` response with the given status
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorDto {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Wrapper type for converting any displayable error into a 500 Internal Server Error response.
///
/// Logs the full error and returns a generic message so implementation details never reach the
/// client.
pub struct InternalServerError<E>(pub E);

impl<E: std::fmt::Display> IntoResponse for InternalServerError<E> {
    fn into_response(self) -> Response {
        tracing::error!("{}", self.0);

        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}
