use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not found")]
    NotFound,
    #[error("Cannot access private provider")]
    PrivateProvider,
    #[error("Provider ID or name required")]
    Required,
    #[error("Proof type and content required for public submission")]
    ProofRequired,
    #[error("Provider already submitted or approved")]
    NotPrivate,
    #[error("Cannot delete provider with existing API keys. Delete the keys first.")]
    HasApiKeys,
    #[error("API key not found")]
    ApiKeyNotFound,
    #[error("Rating must be between 1 and 5")]
    InvalidRating,
}

impl IntoResponse for ProviderError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::NotFound | Self::ApiKeyNotFound => StatusCode::NOT_FOUND,
            Self::PrivateProvider => StatusCode::FORBIDDEN,
            Self::Required
            | Self::ProofRequired
            | Self::NotPrivate
            | Self::HasApiKeys
            | Self::InvalidRating => StatusCode::BAD_REQUEST,
        };

        error_response(status, self.to_string())
    }
}
