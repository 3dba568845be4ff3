use sea_orm::DbErr;

use super::Error;

/// Strategy for handling errors in a retry context
pub enum ErrorRetryStrategy {
    /// Retry with exponential backoff (server errors)
    Retry,
    /// Failed permanently (bad request)
    Fail,
}

impl Error {
    /// Determine error retry strategy based upon application Error type
    pub fn to_retry_strategy(&self) -> ErrorRetryStrategy {
        match self {
            Self::ReqwestError(reqwest_error) => {
                if let Some(status) = reqwest_error.status() {
                    match status {
                        // Remote API temporarily unavailable
                        s if s.is_server_error() => ErrorRetryStrategy::Retry,
                        _ => ErrorRetryStrategy::Fail,
                    }
                } else if reqwest_error.is_decode() {
                    // Malformed body, refetching returns the same payload
                    ErrorRetryStrategy::Fail
                } else {
                    // Network error or connection issue
                    ErrorRetryStrategy::Retry
                }
            }

            Self::DbErr(db_err) => match db_err {
                DbErr::ConnectionAcquire(_) => ErrorRetryStrategy::Retry,
                DbErr::Conn(_) => ErrorRetryStrategy::Retry,
                _ => ErrorRetryStrategy::Fail,
            },

            // Could be Redis connection issues
            Self::SessionError(_) => ErrorRetryStrategy::Retry,
            Self::SessionRedisError(_) => ErrorRetryStrategy::Retry,

            Self::SmtpError(smtp_error) if smtp_error.is_transient() => ErrorRetryStrategy::Retry,

            Self::ConfigError(_)
            | Self::AuthError(_)
            | Self::AccountError(_)
            | Self::PriceError(_)
            | Self::ProviderError(_)
            | Self::AdminError(_)
            | Self::ParseError(_)
            | Self::InternalError(_)
            | Self::SchedulerError(_)
            | Self::PasswordHashError(_)
            | Self::TotpUrlError(_)
            | Self::TotpSecretError(_)
            | Self::SystemTimeError(_)
            | Self::SmtpError(_)
            | Self::EmailError(_)
            | Self::EmailAddressError(_)
            | Self::MultipartError(_)
            | Self::IoError(_)
            | Self::SerdeJsonError(_) => ErrorRetryStrategy::Fail,
        }
    }
}
