use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("User ID is not present in session")]
    UserNotInSession,
    #[error("User ID {0:?} not found in database despite having an active session")]
    UserNotInDatabase(i32),
    #[error("Inactive user")]
    InactiveUser,
    #[error("Email not verified")]
    EmailNotVerified,
    #[error("Admin privileges required")]
    NotAdmin,
    #[error("Super admin privileges required")]
    NotSuperAdmin,
    #[error("Invalid email format")]
    InvalidEmail,
    #[error("Password must be at least 8 characters long")]
    PasswordTooShort,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Incorrect email or password")]
    InvalidCredentials,
    #[error("TOTP code required")]
    TotpRequired,
    #[error("Invalid TOTP code")]
    InvalidTotp,
    #[error("TOTP setup has not been started")]
    TotpNotSetUp,
    #[error("TOTP is already enabled")]
    TotpAlreadyEnabled,
    #[error("TOTP is not enabled")]
    TotpNotEnabled,
    #[error("Invalid or expired verification token")]
    InvalidVerificationToken,
    #[error("Email already verified")]
    EmailAlreadyVerified,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::UserNotInSession | Self::UserNotInDatabase(_) => {
                tracing::debug!("{}", self);

                return error_response(StatusCode::UNAUTHORIZED, "Not authenticated");
            }
            Self::InvalidCredentials | Self::TotpRequired | Self::InvalidTotp => {
                StatusCode::UNAUTHORIZED
            }
            Self::InactiveUser | Self::EmailNotVerified | Self::NotAdmin | Self::NotSuperAdmin => {
                StatusCode::FORBIDDEN
            }
            Self::InvalidEmail
            | Self::PasswordTooShort
            | Self::EmailTaken
            | Self::TotpNotSetUp
            | Self::TotpAlreadyEnabled
            | Self::TotpNotEnabled
            | Self::InvalidVerificationToken
            | Self::EmailAlreadyVerified => StatusCode::BAD_REQUEST,
        };

        error_response(status, self.to_string())
    }
}
