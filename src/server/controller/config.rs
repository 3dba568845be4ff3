//! Public configuration needed by clients before login.

use std::collections::HashMap;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    model::{api::ErrorDto, provider::ProviderDto, settings::CurrencyRateDto},
    server::{error::Error, model::app::AppState, service::settings::SettingsService},
};

pub static CONFIG_TAG: &str = "config";

/// Get all stored exchange rates
#[utoipa::path(
    get,
    path = "/api/config/rates",
    tag = CONFIG_TAG,
    responses(
        (status = 200, description = "Rates in units per US dollar", body = Vec<CurrencyRateDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_rates(State(state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let rates = SettingsService::new(&state.db).rates().await?;

    Ok((StatusCode::OK, Json(rates)))
}

/// Get all approved providers
#[utoipa::path(
    get,
    path = "/api/config/providers",
    tag = CONFIG_TAG,
    responses(
        (status = 200, description = "Approved providers", body = Vec<ProviderDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_providers(State(state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let providers = SettingsService::new(&state.db).approved_providers().await?;

    Ok((StatusCode::OK, Json(providers)))
}

/// Get the settings clients may read without logging in
#[utoipa::path(
    get,
    path = "/api/config/public-settings",
    tag = CONFIG_TAG,
    responses(
        (status = 200, description = "site_name, home_display_mode and force_email_verification when set", body = HashMap<String, String>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_public_settings(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, Error> {
    let settings = SettingsService::new(&state.db).public_settings().await?;

    Ok((StatusCode::OK, Json(settings)))
}
