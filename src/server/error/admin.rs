use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Provider is not pending")]
    ProviderNotPending,
    #[error("Request not found")]
    RequestNotFound,
    #[error("Request is not pending")]
    RequestNotPending,
    #[error("Invalid role")]
    InvalidRole,
    #[error("User not found")]
    UserNotFound,
    #[error("Invalid home_display_mode")]
    InvalidDisplayMode,
    #[error("Model not found")]
    ModelNotFound,
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::RequestNotFound | Self::UserNotFound | Self::ModelNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::ProviderNotPending
            | Self::RequestNotPending
            | Self::InvalidRole
            | Self::InvalidDisplayMode => StatusCode::BAD_REQUEST,
        };

        error_response(status, self.to_string())
    }
}
