use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

/// Errors of the verification code flows, reported to clients as stable upper-case codes
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AccountError {
    #[error("INVALID_ACTION")]
    InvalidAction,
    #[error("NEW_EMAIL_REQUIRED")]
    NewEmailRequired,
    #[error("EMAIL_UNCHANGED")]
    EmailUnchanged,
    #[error("EMAIL_TAKEN")]
    EmailTaken,
    #[error("INVALID_CODE")]
    InvalidCode,
    #[error("CODE_EXPIRED")]
    CodeExpired,
    #[error("CODE_EMAIL_MISMATCH")]
    CodeEmailMismatch,
    #[error("PASSWORD_TOO_SHORT")]
    PasswordTooShort,
    #[error("INVALID_TOTP")]
    InvalidTotp,
    #[error("VERIFICATION_REQUIRED")]
    VerificationRequired,
    #[error("EMAIL_NOT_CONFIGURED")]
    EmailNotConfigured,
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        match self {
            Self::EmailNotConfigured => {
                tracing::warn!("Verification code requested but SMTP is not configured");

                error_response(StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            err => error_response(StatusCode::BAD_REQUEST, err.to_string()),
        }
    }
}
