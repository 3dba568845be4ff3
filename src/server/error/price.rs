use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::server::error::error_response;

#[derive(Error, Debug)]
pub enum PriceError {
    #[error("Price not found")]
    PriceNotFound,
    #[error("Not authorized")]
    NotPriceOwner,
    #[error("Standard model not found")]
    ModelNotFound,
    #[error("Standard model ID or new model name required")]
    ModelRequired,
    #[error("Target currency not supported")]
    UnsupportedCurrency,
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
    #[error("Prices must be finite and non-negative")]
    NegativePrice,
    #[error("Invalid or missing field: {0}")]
    InvalidField(String),
}

impl IntoResponse for PriceError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::PriceNotFound | Self::ModelNotFound => StatusCode::NOT_FOUND,
            Self::NotPriceOwner => StatusCode::FORBIDDEN,
            Self::ModelRequired
            | Self::UnsupportedCurrency
            | Self::UnknownCurrency(_)
            | Self::NegativePrice
            | Self::InvalidField(_) => StatusCode::BAD_REQUEST,
        };

        error_response(status, self.to_string())
    }
}
