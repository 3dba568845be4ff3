use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        settings::{CurrencyDto, UpdateUserPreferencesDto, UserPreferencesDto},
    },
    server::{
        controller::util::get_user::get_active_user, error::Error, model::app::AppState,
        service::settings::SettingsService,
    },
};

pub static SETTINGS_TAG: &str = "settings";

/// Get supported currencies with display hints
#[utoipa::path(
    get,
    path = "/api/settings/currencies",
    tag = SETTINGS_TAG,
    responses(
        (status = 200, description = "Currencies with rate, flag and common marker", body = Vec<CurrencyDto>),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_currencies(State(state): State<AppState>) -> Result<impl IntoResponse, Error> {
    let currencies = SettingsService::new(&state.db).currencies().await?;

    Ok((StatusCode::OK, Json(currencies)))
}

/// Get the currency preferences of the logged in user, created on first access
#[utoipa::path(
    get,
    path = "/api/settings/user",
    tag = SETTINGS_TAG,
    responses(
        (status = 200, description = "Currency preferences", body = UserPreferencesDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_user_preferences(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let user = get_active_user(&state, &session).await?;

    let preferences = SettingsService::new(&state.db)
        .user_preferences(user.id)
        .await?;

    Ok((StatusCode::OK, Json(preferences)))
}

#[utoipa::path(
    put,
    path = "/api/settings/user",
    tag = SETTINGS_TAG,
    request_body = UpdateUserPreferencesDto,
    responses(
        (status = 200, description = "Updated preferences", body = UserPreferencesDto),
        (status = 400, description = "Unknown default currency", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_user_preferences(
    State(state): State<AppState>,
    session: Session,
    Json(changes): Json<UpdateUserPreferencesDto>,
) -> Result<impl IntoResponse, Error> {
    let user = get_active_user(&state, &session).await?;

    let preferences = SettingsService::new(&state.db)
        .update_user_preferences(user.id, changes)
        .await?;

    Ok((StatusCode::OK, Json(preferences)))
}
